//! Fetch a single telemetry frame and print it.

use std::time::{Duration, Instant};

use pidash_core::TelemetrySnapshot;

use crate::client::{ClientEvent, TelemetryClient};

pub fn run(host: &str, port: u16, output: Option<&str>, timeout_sec: f64) {
    let config = super::make_config(host, port, false);
    let client = TelemetryClient::connect(config);
    let deadline = Instant::now() + Duration::from_secs_f64(timeout_sec);

    let snapshot = loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            eprintln!("timed out waiting for a telemetry frame");
            std::process::exit(1);
        }
        match client.wait_event(remaining) {
            Some(ClientEvent::Snapshot(snapshot)) => break *snapshot,
            Some(ClientEvent::Connected) => {}
            Some(ClientEvent::ConnectFailed { error }) => {
                eprintln!("connect failed: {error}");
                std::process::exit(1);
            }
            Some(ClientEvent::Disconnected { reason }) => {
                eprintln!("disconnected before a frame arrived: {reason}");
                std::process::exit(1);
            }
            None => {
                eprintln!("timed out waiting for a telemetry frame");
                std::process::exit(1);
            }
        }
    };
    client.shutdown();

    match output {
        Some(path) => {
            let json = match serde_json::to_string_pretty(&snapshot) {
                Ok(json) => json,
                Err(e) => {
                    eprintln!("serialize failed: {e}");
                    std::process::exit(1);
                }
            };
            if let Err(e) = std::fs::write(path, json) {
                eprintln!("write to {path} failed: {e}");
                std::process::exit(1);
            }
            println!("snapshot written to {path}");
        }
        None => print_summary(&snapshot),
    }
}

fn print_summary(snapshot: &TelemetrySnapshot) {
    match snapshot.temperature {
        Some(t) => println!("temperature   {t:.1} °C"),
        None => println!("temperature   n/a"),
    }
    match snapshot.frequency {
        Some(mhz) => println!("clock         {mhz:.0} MHz"),
        None => println!("clock         n/a"),
    }
    let rails = snapshot.voltage.unwrap_or_default();
    for (name, value) in [
        ("core", rails.core),
        ("sdram", rails.sdram),
        ("sdram_i", rails.sdram_i),
        ("sdram_p", rails.sdram_p),
    ] {
        match value {
            Some(v) => println!("volt {name:<8} {v:.2} V"),
            None => println!("volt {name:<8} n/a"),
        }
    }
    let labels = snapshot.throttled.active_labels();
    if labels.is_empty() {
        println!("throttled     none");
    } else {
        println!("throttled     {}", labels.join(", "));
    }
    match snapshot.decode_image() {
        Ok(Some(bytes)) => println!("camera        {:.1} KiB", bytes.len() as f64 / 1024.0),
        Ok(None) => println!("camera        none"),
        Err(e) => println!("camera        undecodable ({e})"),
    }
}
