//! CLI for pidash — live dashboard and drive control for a Raspberry Pi
//! telemetry server.

mod client;
mod commands;
mod input;
mod tui;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pidash")]
#[command(about = "pidash — live dashboard and drive control for a Pi telemetry server")]
#[command(version = pidash_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Live interactive dashboard (TUI) with key/gamepad drive control
    Monitor {
        /// Server host or IP (e.g. 192.168.1.42)
        host: String,

        /// Server port
        #[arg(long, default_value_t = pidash_core::DEFAULT_PORT)]
        port: u16,

        /// Do not reconnect after a dropped connection
        #[arg(long)]
        no_reconnect: bool,
    },

    /// Fetch a single telemetry frame and print a summary (or JSON)
    Snapshot {
        /// Server host or IP
        host: String,

        /// Server port
        #[arg(long, default_value_t = pidash_core::DEFAULT_PORT)]
        port: u16,

        /// Write the frame as pretty JSON to this path instead
        #[arg(long)]
        output: Option<String>,

        /// Seconds to wait for the first frame
        #[arg(long, default_value = "10.0")]
        timeout: f64,
    },

    /// Print telemetry frames to stdout as JSON lines (pipe-friendly)
    Stream {
        /// Server host or IP
        host: String,

        /// Server port
        #[arg(long, default_value_t = pidash_core::DEFAULT_PORT)]
        port: u16,

        /// Stop after this many frames (0 = run until Ctrl-C)
        #[arg(long, default_value = "0")]
        limit: usize,
    },

    /// Render the semicircle gauge for a value as standalone SVG
    Gauge {
        /// Gauge value, clamped to [0, 100]
        #[arg(long)]
        value: f64,

        /// Gauge size in SVG pixels
        #[arg(long, default_value = "200.0")]
        size: f64,

        /// Arc stroke width in SVG pixels
        #[arg(long, default_value = "20.0")]
        stroke_width: f64,

        /// Output path (stdout when omitted)
        #[arg(long)]
        output: Option<String>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Monitor {
            host,
            port,
            no_reconnect,
        } => commands::monitor::run(&host, port, !no_reconnect),
        Commands::Snapshot {
            host,
            port,
            output,
            timeout,
        } => commands::snapshot::run(&host, port, output.as_deref(), timeout),
        Commands::Stream { host, port, limit } => commands::stream::run(&host, port, limit),
        Commands::Gauge {
            value,
            size,
            stroke_width,
            output,
        } => commands::gauge::run(value, size, stroke_width, output.as_deref()),
    }
}
