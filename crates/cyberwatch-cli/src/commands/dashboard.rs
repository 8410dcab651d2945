//! `cyberwatch dashboard` — launch the interactive TUI.

use super::make_engine;

pub fn run(refresh_ms: u64, scenario: &str, seed: Option<u64>) {
    let engine = make_engine(scenario, seed);
    let mut app = crate::tui::app::App::new(engine, refresh_ms);
    if let Err(e) = app.run() {
        eprintln!("TUI error: {e}");
        std::process::exit(1);
    }
}
