//! Terminal-side input sampling: arrow keys and gamepads.
//!
//! Keyboard and gamepad each produce a `DirectionalState`; the UI loop
//! merges them and writes the result to the input mirror once per tick.
//!
//! Terminals only deliver key-release events under the keyboard-enhancement
//! protocol. Where it is available the tracker uses real releases; elsewhere
//! a hold timeout stands in: press/repeat events keep a direction asserted,
//! and it drops once no event has arrived for [`HOLD_TIMEOUT`].

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEventKind};
use gilrs::{Axis, Button, Gilrs};

use pidash_core::{DirectionalState, AXIS_DEADZONE};

/// Fallback release delay; covers the typical initial key-repeat gap.
pub const HOLD_TIMEOUT: Duration = Duration::from_millis(500);

const UP: usize = 0;
const DOWN: usize = 1;
const LEFT: usize = 2;
const RIGHT: usize = 3;

fn slot(code: KeyCode) -> Option<usize> {
    match code {
        KeyCode::Up => Some(UP),
        KeyCode::Down => Some(DOWN),
        KeyCode::Left => Some(LEFT),
        KeyCode::Right => Some(RIGHT),
        _ => None,
    }
}

/// Arrow-key state, with real or simulated releases.
pub struct KeyboardTracker {
    held: [bool; 4],
    last_seen: [Option<Instant>; 4],
    release_events: bool,
    hold_timeout: Duration,
}

impl KeyboardTracker {
    /// `release_events`: whether the terminal reports key releases.
    pub fn new(release_events: bool) -> Self {
        Self {
            held: [false; 4],
            last_seen: [None; 4],
            release_events,
            hold_timeout: HOLD_TIMEOUT,
        }
    }

    /// Feed one key event. Non-arrow keys are ignored.
    pub fn handle(&mut self, code: KeyCode, kind: KeyEventKind, now: Instant) {
        let Some(i) = slot(code) else { return };
        match kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.held[i] = true;
                self.last_seen[i] = Some(now);
            }
            KeyEventKind::Release => {
                self.held[i] = false;
                self.last_seen[i] = None;
            }
        }
    }

    /// Expire held directions in fallback mode.
    pub fn tick(&mut self, now: Instant) {
        if self.release_events {
            return;
        }
        for i in 0..4 {
            if self.held[i] {
                let stale = self.last_seen[i]
                    .map_or(true, |seen| now.duration_since(seen) > self.hold_timeout);
                if stale {
                    self.held[i] = false;
                    self.last_seen[i] = None;
                }
            }
        }
    }

    pub fn state(&self) -> DirectionalState {
        DirectionalState {
            up: self.held[UP],
            down: self.held[DOWN],
            left: self.held[LEFT],
            right: self.held[RIGHT],
        }
    }
}

/// Polls every connected gamepad once per UI tick.
///
/// A direction asserts when ANY pad reports its D-pad button pressed or its
/// left stick past the deadzone; pads OR together. A missing or failed
/// gamepad subsystem contributes all-false.
pub struct GamepadSampler {
    gilrs: Option<Gilrs>,
}

impl GamepadSampler {
    pub fn new() -> Self {
        let gilrs = match Gilrs::new() {
            Ok(gilrs) => Some(gilrs),
            Err(e) => {
                log::warn!("gamepad support unavailable: {e}");
                None
            }
        };
        Self { gilrs }
    }

    pub fn poll(&mut self) -> DirectionalState {
        let Some(gilrs) = self.gilrs.as_mut() else {
            return DirectionalState::NONE;
        };
        // Drain pending events so the cached gamepad state is current.
        while gilrs.next_event().is_some() {}

        let mut state = DirectionalState::NONE;
        for (_id, pad) in gilrs.gamepads() {
            let dpad = DirectionalState {
                up: pad.is_pressed(Button::DPadUp),
                down: pad.is_pressed(Button::DPadDown),
                left: pad.is_pressed(Button::DPadLeft),
                right: pad.is_pressed(Button::DPadRight),
            };
            let stick = DirectionalState::from_stick(
                pad.value(Axis::LeftStickX),
                pad.value(Axis::LeftStickY),
                AXIS_DEADZONE,
            );
            state = state.merge(dpad).merge(stick);
        }
        state
    }
}
