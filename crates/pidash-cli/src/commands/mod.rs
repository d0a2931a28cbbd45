pub mod gauge;
pub mod monitor;
pub mod snapshot;
pub mod stream;

use crate::client::ClientConfig;

/// Build a client config from the shared host/port flags.
pub fn make_config(host: &str, port: u16, reconnect: bool) -> ClientConfig {
    let mut config = ClientConfig::new(host);
    config.port = port;
    config.reconnect = reconnect;
    config
}
