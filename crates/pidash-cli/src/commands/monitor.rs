use crate::tui::app::App;

pub fn run(host: &str, port: u16, reconnect: bool) {
    let config = super::make_config(host, port, reconnect);
    let mut app = App::new(config);
    let result = app.run();
    app.shutdown();
    if let Err(e) = result {
        eprintln!("TUI error: {e}");
        std::process::exit(1);
    }
}
