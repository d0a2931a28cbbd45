//! Print telemetry frames as JSON lines (pipe-friendly).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::client::{ClientEvent, TelemetryClient};

pub fn run(host: &str, port: u16, limit: usize) {
    let config = super::make_config(host, port, true);
    let client = TelemetryClient::connect(config);

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        if let Err(e) = ctrlc::set_handler(move || stop.store(true, Ordering::Relaxed)) {
            log::warn!("Ctrl-C handler unavailable: {e}");
        }
    }

    let mut printed = 0usize;
    while !stop.load(Ordering::Relaxed) {
        match client.wait_event(Duration::from_millis(200)) {
            Some(ClientEvent::Snapshot(snapshot)) => {
                match serde_json::to_string(&*snapshot) {
                    Ok(line) => println!("{line}"),
                    Err(e) => log::warn!("serialize failed: {e}"),
                }
                printed += 1;
                if limit != 0 && printed >= limit {
                    break;
                }
            }
            Some(ClientEvent::ConnectFailed { error }) => eprintln!("connect failed: {error}"),
            Some(ClientEvent::Disconnected { reason }) => eprintln!("disconnected: {reason}"),
            Some(ClientEvent::Connected) | None => {}
        }
    }

    client.shutdown();
}
