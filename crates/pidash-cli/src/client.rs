//! WebSocket client shell.
//!
//! The client runs on its own thread with a single-threaded tokio runtime
//! so the UI loop never blocks on the socket. One session is one `select!`
//! loop over two things: a 100 ms send interval that reads the input mirror
//! and puts the current command token on the wire (every tick, not only on
//! change), and the inbound stream of telemetry frames. Events cross back to
//! the UI over an mpsc channel.
//!
//! Malformed inbound frames are logged and dropped; the previous snapshot
//! stays on screen. A dropped connection reconnects with capped exponential
//! backoff unless the config disables it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use pidash_core::{DirectionalState, DriveCommand, TelemetrySnapshot, DEFAULT_PORT};

/// How often the current command token is sent while connected.
pub const SEND_INTERVAL: Duration = Duration::from_millis(100);

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;
type Sink = SplitSink<Socket, Message>;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub send_interval: Duration,
    pub reconnect: bool,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            send_interval: SEND_INTERVAL,
            reconnect: true,
        }
    }

    pub fn url(&self) -> String {
        format!("ws://{}:{}", self.host, self.port)
    }
}

/// Events delivered to the UI thread.
#[derive(Debug)]
pub enum ClientEvent {
    Connected,
    Snapshot(Box<TelemetrySnapshot>),
    Disconnected { reason: String },
    ConnectFailed { error: String },
}

/// Shared cell holding the freshest combined directional state.
///
/// The send timer reads it on every tick, so the samplers can write as often
/// as they like without the timer ever observing stale state or needing to
/// be re-armed.
#[derive(Clone, Default)]
pub struct InputMirror(Arc<Mutex<DirectionalState>>);

impl InputMirror {
    pub fn set(&self, state: DirectionalState) {
        *self.0.lock().unwrap() = state;
    }

    pub fn get(&self) -> DirectionalState {
        *self.0.lock().unwrap()
    }
}

/// Handle to the background client thread.
pub struct TelemetryClient {
    events: Receiver<ClientEvent>,
    input: InputMirror,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TelemetryClient {
    /// Spawn the client thread and start connecting.
    pub fn connect(config: ClientConfig) -> Self {
        let (tx, events) = mpsc::channel();
        let input = InputMirror::default();
        let stop = Arc::new(AtomicBool::new(false));

        let handle = {
            let input = input.clone();
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let rt = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(e) => {
                        let _ = tx.send(ClientEvent::ConnectFailed {
                            error: format!("runtime build failed: {e}"),
                        });
                        return;
                    }
                };
                rt.block_on(run(config, tx, input, stop));
            })
        };

        Self {
            events,
            input,
            stop,
            handle: Some(handle),
        }
    }

    /// The live input mirror the send timer reads from.
    pub fn input(&self) -> InputMirror {
        self.input.clone()
    }

    /// Non-blocking event poll, for the UI loop.
    pub fn try_event(&self) -> Option<ClientEvent> {
        self.events.try_recv().ok()
    }

    /// Blocking event wait with timeout, for the one-shot commands.
    pub fn wait_event(&self, timeout: Duration) -> Option<ClientEvent> {
        self.events.recv_timeout(timeout).ok()
    }

    /// Stop the client and wait for the thread to exit.
    pub fn shutdown(mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for TelemetryClient {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

async fn run(
    config: ClientConfig,
    tx: Sender<ClientEvent>,
    input: InputMirror,
    stop: Arc<AtomicBool>,
) {
    let url = config.url();
    let mut backoff = INITIAL_BACKOFF;

    loop {
        if stop.load(Ordering::Relaxed) {
            return;
        }
        log::debug!("connecting to {url}");
        match connect_async(url.as_str()).await {
            Ok((socket, _response)) => {
                if tx.send(ClientEvent::Connected).is_err() {
                    return;
                }
                backoff = INITIAL_BACKOFF;
                let reason =
                    drive_session(socket, &tx, &input, &stop, config.send_interval).await;
                log::debug!("session with {url} ended: {reason}");
                if tx.send(ClientEvent::Disconnected { reason }).is_err() {
                    return;
                }
            }
            Err(e) => {
                log::warn!("connect to {url} failed: {e}");
                if tx
                    .send(ClientEvent::ConnectFailed {
                        error: e.to_string(),
                    })
                    .is_err()
                {
                    return;
                }
            }
        }

        if !config.reconnect || stop.load(Ordering::Relaxed) {
            return;
        }
        if sleep_interruptible(backoff, &stop).await {
            return;
        }
        backoff = (backoff * 2).min(MAX_BACKOFF);
    }
}

/// One connected session. Returns the human-readable reason it ended.
async fn drive_session(
    socket: Socket,
    tx: &Sender<ClientEvent>,
    input: &InputMirror,
    stop: &AtomicBool,
    send_interval: Duration,
) -> String {
    let (mut sink, mut stream) = socket.split();
    let mut ticker = tokio::time::interval(send_interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if stop.load(Ordering::Relaxed) {
                    let _ = sink.send(Message::Close(None)).await;
                    return "closed by user".into();
                }
                if let Err(e) = send_command(&mut sink, input.get()).await {
                    return format!("send failed: {e}");
                }
            }
            msg = stream.next() => match msg {
                Some(Ok(Message::Text(frame))) => match TelemetrySnapshot::parse(&frame) {
                    Ok(snapshot) => {
                        if tx.send(ClientEvent::Snapshot(Box::new(snapshot))).is_err() {
                            return "receiver dropped".into();
                        }
                    }
                    Err(e) => log::warn!("dropping malformed frame: {e}"),
                },
                Some(Ok(Message::Close(_))) => return "closed by server".into(),
                // Ping/pong are handled by tungstenite; binary frames are
                // not part of the protocol.
                Some(Ok(_)) => {}
                Some(Err(e)) => return format!("socket error: {e}"),
                None => return "connection lost".into(),
            }
        }
    }
}

async fn send_command(
    sink: &mut Sink,
    state: DirectionalState,
) -> Result<(), tokio_tungstenite::tungstenite::Error> {
    let token = DriveCommand::from_state(state).token();
    sink.send(Message::Text(token.to_string())).await
}

/// Sleep in 100 ms slices so a stop request is honored promptly.
/// Returns true when stopped.
async fn sleep_interruptible(total: Duration, stop: &AtomicBool) -> bool {
    let step = Duration::from_millis(100);
    let mut remaining = total;
    while remaining > Duration::ZERO {
        if stop.load(Ordering::Relaxed) {
            return true;
        }
        let chunk = remaining.min(step);
        tokio::time::sleep(chunk).await;
        remaining -= chunk;
    }
    stop.load(Ordering::Relaxed)
}
