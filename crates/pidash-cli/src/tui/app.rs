//! TUI application state and event loop.
//!
//! Design: the client thread owns the socket, the UI thread owns the
//! terminal. Every loop pass (50 ms poll) the app drains client events,
//! samples keyboard and gamepad, and writes the merged state to the input
//! mirror — the 100 ms send timer on the client thread always sees the
//! freshest intent.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};

use chrono::Local;
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use pidash_core::{SampleHistory, TelemetrySnapshot};

use crate::client::{ClientConfig, ClientEvent, InputMirror, TelemetryClient};
use crate::input::{GamepadSampler, KeyboardTracker};

pub struct App {
    client: TelemetryClient,
    input: InputMirror,
    keyboard: KeyboardTracker,
    gamepad: GamepadSampler,
    url: String,
    running: bool,
    connected: bool,
    status: String,
    snapshot: Option<TelemetrySnapshot>,
    freq_history: SampleHistory,
    volt_history: SampleHistory,
    frames: u64,
    last_frame_at: Option<Instant>,
    last_save: Option<PathBuf>,
    enhanced_keys: bool,
}

impl App {
    pub fn new(config: ClientConfig) -> Self {
        let url = config.url();
        let client = TelemetryClient::connect(config);
        let input = client.input();
        Self {
            client,
            input,
            keyboard: KeyboardTracker::new(false),
            gamepad: GamepadSampler::new(),
            url,
            running: true,
            connected: false,
            status: "connecting…".into(),
            snapshot: None,
            freq_history: SampleHistory::new(),
            volt_history: SampleHistory::new(),
            frames: 0,
            last_frame_at: None,
            last_save: None,
            enhanced_keys: false,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        // Real key releases where the terminal can report them; the tracker
        // falls back to a hold timeout elsewhere.
        self.enhanced_keys =
            crossterm::terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.enhanced_keys {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        self.keyboard = KeyboardTracker::new(self.enhanced_keys);

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Install panic hook that restores the terminal before printing.
        let pushed_flags = self.enhanced_keys;
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if pushed_flags {
                let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
            }
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
            original_hook(info);
        }));

        let result = self.run_loop(&mut terminal);

        let _ = std::panic::take_hook();
        if self.enhanced_keys {
            let _ = execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags);
        }
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        result
    }

    /// Stop the client thread. Call after `run` returns.
    pub fn shutdown(self) {
        self.client.shutdown();
    }

    fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
        while self.running {
            terminal.draw(|f| super::ui::draw(f, self))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }

            let now = Instant::now();
            self.keyboard.tick(now);
            self.input.set(self.keyboard.state().merge(self.gamepad.poll()));

            while let Some(event) = self.client.try_event() {
                self.apply_event(event);
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
                self.keyboard.handle(key.code, key.kind, Instant::now());
            }
            _ if key.kind != KeyEventKind::Press => {}
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('s') => self.save_still(),
            _ => {}
        }
    }

    fn apply_event(&mut self, event: ClientEvent) {
        match event {
            ClientEvent::Connected => {
                self.connected = true;
                self.status = format!("connected to {}", self.url);
            }
            ClientEvent::Snapshot(snapshot) => {
                let label = Local::now().format("%H:%M:%S").to_string();
                self.apply_snapshot(*snapshot, label);
            }
            ClientEvent::Disconnected { reason } => {
                self.connected = false;
                self.snapshot = None;
                self.status = format!("disconnected: {reason}");
            }
            ClientEvent::ConnectFailed { error } => {
                self.connected = false;
                self.status = format!("connect failed: {error}");
            }
        }
    }

    /// Replace the displayed snapshot wholesale and extend the histories for
    /// every sensor the frame actually carried.
    fn apply_snapshot(&mut self, snapshot: TelemetrySnapshot, label: String) {
        if let Some(freq) = snapshot.frequency {
            self.freq_history.push(label.clone(), freq);
        }
        if let Some(core) = snapshot.core_voltage() {
            self.volt_history.push(label, core);
        }
        self.frames += 1;
        self.last_frame_at = Some(Instant::now());
        self.snapshot = Some(snapshot);
    }

    fn save_still(&mut self) {
        let Some(snapshot) = &self.snapshot else {
            self.status = "no frame to save".into();
            return;
        };
        match snapshot.decode_image() {
            Ok(Some(bytes)) => {
                let epoch = SystemTime::now()
                    .duration_since(SystemTime::UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_secs();
                let path = PathBuf::from(format!("pidash-still-{epoch}.jpg"));
                match fs::write(&path, bytes) {
                    Ok(()) => {
                        self.status = format!("still saved to {}", path.display());
                        self.last_save = Some(path);
                    }
                    Err(e) => self.status = format!("save failed: {e}"),
                }
            }
            Ok(None) => self.status = "no camera image in latest frame".into(),
            Err(e) => self.status = format!("image decode failed: {e}"),
        }
    }

    // --- Accessors for rendering ---

    pub fn url(&self) -> &str {
        &self.url
    }
    pub fn is_connected(&self) -> bool {
        self.connected
    }
    pub fn status(&self) -> &str {
        &self.status
    }
    pub fn snapshot(&self) -> Option<&TelemetrySnapshot> {
        self.snapshot.as_ref()
    }
    pub fn freq_history(&self) -> &SampleHistory {
        &self.freq_history
    }
    pub fn volt_history(&self) -> &SampleHistory {
        &self.volt_history
    }
    pub fn frames(&self) -> u64 {
        self.frames
    }
    pub fn last_frame_age(&self) -> Option<Duration> {
        self.last_frame_at.map(|t| t.elapsed())
    }
    pub fn last_save(&self) -> Option<&PathBuf> {
        self.last_save.as_ref()
    }
    pub fn held_state(&self) -> pidash_core::DirectionalState {
        self.input.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pidash_core::HISTORY_CAPACITY;

    fn app() -> App {
        let mut config = ClientConfig::new("127.0.0.1");
        // Nothing listens on port 1; the client thread idles in ConnectFailed.
        config.port = 1;
        config.reconnect = false;
        App::new(config)
    }

    fn frame(temp: Option<f64>, freq: Option<f64>, core: Option<f64>) -> TelemetrySnapshot {
        TelemetrySnapshot {
            temperature: temp,
            frequency: freq,
            voltage: core.map(|c| pidash_core::VoltageRails {
                core: Some(c),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn snapshot_replaces_wholesale_and_appends_present_values() {
        let mut app = app();
        app.apply_snapshot(frame(Some(42.1), Some(1000.0), Some(1.2)), "10:00:00".into());
        assert_eq!(app.snapshot().unwrap().temperature, Some(42.1));
        assert_eq!(app.freq_history().len(), 1);
        assert_eq!(app.volt_history().len(), 1);
        assert_eq!(app.volt_history().latest().unwrap().value, 1.2);

        // A frame missing a sensor replaces the display but skips its chart.
        app.apply_snapshot(frame(None, Some(1200.0), None), "10:00:01".into());
        assert!(app.snapshot().unwrap().temperature.is_none());
        assert_eq!(app.freq_history().len(), 2);
        assert_eq!(app.volt_history().len(), 1);
        assert_eq!(app.frames(), 2);
    }

    #[test]
    fn histories_stay_bounded_across_many_frames() {
        let mut app = app();
        for i in 0..50 {
            app.apply_snapshot(
                frame(None, Some(f64::from(i)), Some(1.0)),
                format!("t{i}"),
            );
        }
        assert_eq!(app.freq_history().len(), HISTORY_CAPACITY);
        assert_eq!(app.freq_history().latest().unwrap().value, 49.0);
    }

    #[test]
    fn disconnect_resets_display_but_keeps_charts() {
        let mut app = app();
        app.apply_event(ClientEvent::Connected);
        assert!(app.is_connected());
        app.apply_snapshot(frame(Some(40.0), Some(900.0), None), "t".into());

        app.apply_event(ClientEvent::Disconnected {
            reason: "closed by server".into(),
        });
        assert!(!app.is_connected());
        assert!(app.snapshot().is_none(), "display resets to no-data");
        assert_eq!(app.freq_history().len(), 1, "chart context is kept");
        assert!(app.status().contains("closed by server"));
    }

    #[test]
    fn connect_failure_surfaces_in_status() {
        let mut app = app();
        app.apply_event(ClientEvent::ConnectFailed {
            error: "connection refused".into(),
        });
        assert!(!app.is_connected());
        assert!(app.status().contains("connection refused"));
    }
}
