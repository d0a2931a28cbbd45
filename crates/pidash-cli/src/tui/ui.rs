//! TUI rendering.
//!
//! ┌──────────────────────────────────────────────────┐
//! │  📡 pidash   ws://192.168.1.42:8765  ● connected │
//! ├───────────────────────┬──────────────────────────┤
//! │  Readings             │  SoC temperature         │
//! │  temp     42.1 °C     │  ▓▓▓▓▓▓▓░░░░░  42.1 °C   │
//! │  clock    1000 MHz    ├──────────────────────────┤
//! │  core     1.20 V      │  ╭ clock (MHz)           │
//! │  flags    UV ·· TH ·· │  │   ~~~~/\~~~           │
//! ├───────────────────────┤  ╰───────────────────────│
//! │  Camera               │  ╭ core (V)              │
//! │  still: 34.2 KiB      │  │   ~~~~~~~~            │
//! │                       │  ╰───────────────────────│
//! ├───────────────────────┴──────────────────────────┤
//! │  ←↑↓→ drive   s: save still   q: quit            │
//! └──────────────────────────────────────────────────┘

use ratatui::{prelude::*, widgets::*};

use pidash_core::{color_for, SampleHistory, SemiGauge, ThrottleFlags};

use super::app::App;

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(12),   // main
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    draw_title(f, rows[0], app);
    draw_main(f, rows[1], app);
    draw_keys(f, rows[2], app);
}

fn draw_title(f: &mut Frame, area: Rect, app: &App) {
    let (marker, marker_style) = if app.is_connected() {
        ("● connected", Style::default().fg(Color::Green))
    } else {
        ("○ offline", Style::default().fg(Color::Red))
    };
    let age = match app.last_frame_age() {
        Some(age) if app.is_connected() => format!("  #{} {:.1}s ago ", app.frames(), age.as_secs_f64()),
        _ => String::from(" "),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(vec![
            Span::styled(" 📡 pidash ", Style::default().bold().fg(Color::Cyan)),
            Span::raw(format!(" {} ", app.url())),
            Span::styled(marker, marker_style.bold()),
            Span::styled(age, Style::default().fg(Color::DarkGray)),
        ]));
    let status = Paragraph::new(Line::from(Span::styled(
        app.status(),
        Style::default().fg(Color::DarkGray),
    )))
    .block(block);

    f.render_widget(status, area);
}

fn draw_main(f: &mut Frame, area: Rect, app: &App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(5)])
        .split(cols[0]);

    draw_readings(f, left[0], app);
    draw_camera(f, left[1], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(50),
            Constraint::Percentage(50),
        ])
        .split(cols[1]);

    draw_temperature_gauge(f, right[0], app);
    draw_chart(f, right[1], " clock (MHz) ", app.freq_history());
    draw_chart(f, right[2], " core (V) ", app.volt_history());
}

fn draw_readings(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" Readings ");

    let Some(snap) = app.snapshot() else {
        let p = Paragraph::new("waiting for data…")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(p, area);
        return;
    };

    let mut lines = Vec::new();

    let temp_span = match snap.temperature {
        Some(t) => {
            let c = color_for(t);
            Span::styled(
                format!("{t:.1} °C"),
                Style::default().fg(Color::Rgb(c.r, c.g, c.b)).bold(),
            )
        }
        None => Span::styled("n/a", Style::default().fg(Color::DarkGray)),
    };
    lines.push(Line::from(vec![Span::raw("temp    "), temp_span]));

    let freq = match snap.frequency {
        Some(mhz) => format!("{mhz:.0} MHz"),
        None => "n/a".into(),
    };
    lines.push(Line::from(format!("clock   {freq}")));

    lines.push(Line::from(""));
    let rails = snap.voltage.unwrap_or_default();
    for (name, value) in [
        ("core   ", rails.core),
        ("sdram  ", rails.sdram),
        ("sdram_i", rails.sdram_i),
        ("sdram_p", rails.sdram_p),
    ] {
        let v = match value {
            Some(v) => format!("{v:.2} V"),
            None => "n/a".into(),
        };
        lines.push(Line::from(format!("{name} {v}")));
    }

    lines.push(Line::from(""));
    lines.push(throttle_line(snap.throttled));

    let p = Paragraph::new(lines).block(block);
    f.render_widget(p, area);
}

fn throttle_line(flags: ThrottleFlags) -> Line<'static> {
    let mut spans = vec![Span::raw("flags   ")];
    for (label, active) in [
        ("under-voltage", flags.under_voltage()),
        ("freq-capped", flags.freq_capped()),
        ("throttled", flags.throttled()),
        ("soft-temp", flags.soft_temp_limit()),
    ] {
        let style = if active {
            Style::default().fg(Color::Red).bold()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw("  "));
    }
    Line::from(spans)
}

fn draw_temperature_gauge(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" SoC temperature ");

    let (ratio, label, color) = match app.snapshot().and_then(|s| s.temperature) {
        Some(t) => {
            let c = color_for(t);
            (
                SemiGauge::fraction(t),
                format!("{t:.1} °C"),
                Color::Rgb(c.r, c.g, c.b),
            )
        }
        None => (0.0, "—".to_string(), Color::DarkGray),
    };

    let gauge = Gauge::default()
        .block(block)
        .gauge_style(Style::default().fg(color))
        .ratio(ratio)
        .label(label);
    f.render_widget(gauge, area);
}

fn draw_chart(f: &mut Frame, area: Rect, title: &str, history: &SampleHistory) {
    if history.is_empty() {
        let block = Block::default().borders(Borders::ALL).title(title.to_string());
        let p = Paragraph::new("no samples yet")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let values = history.values();
    let data: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v))
        .collect();

    let latest = values.last().copied().unwrap_or(0.0);
    let min_val = values.iter().copied().fold(f64::MAX, f64::min);
    let max_val = values.iter().copied().fold(f64::MIN, f64::max);
    // Pad flat series so the line does not sit on the frame.
    let pad = ((max_val - min_val) * 0.1).max(max_val.abs() * 0.01).max(0.1);
    let y_min = min_val - pad;
    let y_max = max_val + pad;

    let datasets = vec![Dataset::default()
        .name(format!("{latest:.2}"))
        .marker(symbols::Marker::Braille)
        .style(Style::default().fg(Color::Cyan))
        .data(&data)];

    let first_label = history.iter().next().map(|p| p.label.clone()).unwrap_or_default();
    let last_label = history.latest().map(|p| p.label.clone()).unwrap_or_default();
    let x_max = (values.len().saturating_sub(1) as f64).max(1.0);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{title} {latest:.2} ")),
        )
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(vec![Line::from(first_label), Line::from(last_label)]),
        )
        .y_axis(Axis::default().bounds([y_min, y_max]).labels(vec![
            Line::from(format!("{y_min:.1}")),
            Line::from(format!("{y_max:.1}")),
        ]));

    f.render_widget(chart, area);
}

fn draw_camera(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" Camera ");

    let mut lines = Vec::new();
    match app.snapshot().and_then(|s| s.image.as_deref()) {
        Some(b64) if !b64.is_empty() => {
            // Base64 expands by 4/3; close enough for a size readout.
            let approx = b64.len() * 3 / 4;
            lines.push(Line::from(format!(
                "still: {:.1} KiB (s to save)",
                approx as f64 / 1024.0
            )));
        }
        _ => lines.push(Line::from(Span::styled(
            "no camera image",
            Style::default().fg(Color::DarkGray),
        ))),
    }
    if let Some(path) = app.last_save() {
        lines.push(Line::from(Span::styled(
            format!("saved: {}", path.display()),
            Style::default().fg(Color::Green),
        )));
    }

    let p = Paragraph::new(lines).block(block);
    f.render_widget(p, area);
}

fn draw_keys(f: &mut Frame, area: Rect, app: &App) {
    let token = pidash_core::DriveCommand::from_state(app.held_state()).token();
    let bar = Paragraph::new(Line::from(vec![
        Span::raw(" ←↑↓→ drive   s: save still   q: quit   sending: "),
        Span::styled(token.to_string(), Style::default().bold().fg(Color::Yellow)),
    ]))
    .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(bar, area);
}
