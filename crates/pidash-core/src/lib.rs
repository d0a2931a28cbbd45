//! # pidash-core
//!
//! Protocol types and pure logic for the pidash dashboard.
//!
//! The dashboard talks to a Raspberry Pi telemetry server over a single
//! WebSocket: outbound, one `key:*` token every 100 ms encoding the current
//! directional intent; inbound, JSON telemetry frames carrying temperature,
//! voltage rails, clock frequency, throttle flags, and a camera still.
//!
//! Everything in this crate is synchronous and side-effect free so it can be
//! exercised without a terminal, a gamepad, or a socket:
//!
//! ```
//! use pidash_core::{DirectionalState, DriveCommand};
//!
//! let state = DirectionalState { up: true, down: true, ..Default::default() };
//! assert_eq!(DriveCommand::from_state(state).token(), "key:up");
//! ```
//!
//! The transport shell, event sampling, and rendering live in `pidash-cli`.

pub mod gauge;
pub mod history;
pub mod input;
pub mod telemetry;

pub use gauge::{Rgb, SemiGauge, color_for, gradient_stops};
pub use history::{HistoryPoint, SampleHistory, HISTORY_CAPACITY};
pub use input::{DirectionalState, DriveCommand, AXIS_DEADZONE};
pub use telemetry::{TelemetrySnapshot, ThrottleFlags, VoltageRails, DEFAULT_PORT};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
