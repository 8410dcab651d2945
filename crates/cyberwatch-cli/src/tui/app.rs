//! TUI application state and event loop.
//!
//! Design: the engine owns all simulation state; the App owns the terminal
//! and the key map. Each pass draws the current state, polls input briefly,
//! and advances the simulation by the measured frame delta (clamped to the
//! 40ms equivalent so a stalled terminal cannot teleport packets).

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use cyberwatch_core::{Engine, FRAME_MS, write_snapshot};

/// Directory snapshot exports land in.
const SNAPSHOT_DIR: &str = "snapshots";

pub struct App {
    engine: Engine,
    refresh: Duration,
    running: bool,
    /// Last export path or error, shown in the title bar.
    status: Option<String>,
}

impl App {
    pub fn new(engine: Engine, refresh_ms: u64) -> Self {
        let mut engine = engine;
        // Gentle auto-playback of the flow strip on startup.
        engine.flow_toggle();
        Self {
            engine,
            refresh: Duration::from_millis(refresh_ms.max(1)),
            running: true,
            status: None,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Install panic hook that restores terminal before printing the panic.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
            original_hook(info);
        }));

        let result = self.run_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error.
        let _ = std::panic::take_hook(); // remove our hook
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        result
    }

    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        let mut last_tick = Instant::now();

        while self.running {
            terminal.draw(|f| super::ui::draw(f, self))?;

            if event::poll(Duration::from_millis(16))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key.code);
            }

            if last_tick.elapsed() >= self.refresh {
                let dt = last_tick.elapsed().as_secs_f64() * 1000.0 / FRAME_MS;
                if self.engine.playing() {
                    self.engine.advance(dt);
                }
                last_tick = Instant::now();
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char(' ') => self.engine.toggle_playing(),
            KeyCode::Char('s') => {
                // Single-step one frame, even while paused.
                self.engine.advance(1.0);
            }
            KeyCode::Char('r') => self.engine.replay_burst(),
            KeyCode::Char('c') => self.engine.compute_risk_and_apply(),
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                let id = self
                    .engine
                    .store()
                    .ids()
                    .get(idx)
                    .map(|s| (*s).to_string());
                if let Some(id) = id {
                    self.engine.apply_scenario(&id);
                    self.status = None;
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let rate = self.engine.packet_rate() + 1.0;
                self.engine.set_packet_rate(rate);
            }
            KeyCode::Char('-') => {
                let rate = (self.engine.packet_rate() - 1.0).max(0.0);
                self.engine.set_packet_rate(rate);
            }
            KeyCode::Char('f') => self.engine.flow_toggle(),
            KeyCode::Char('n') => self.engine.flow_step(),
            KeyCode::Char('t') => self.engine.toggle_tour(),
            KeyCode::Char('e') => self.export_snapshot(),
            _ => {}
        }
    }

    fn export_snapshot(&mut self) {
        let snap = self.engine.snapshot();
        match write_snapshot(&snap, &PathBuf::from(SNAPSHOT_DIR)) {
            Ok(path) => self.status = Some(format!("saved {}", path.display())),
            Err(e) => self.status = Some(format!("export failed: {e}")),
        }
    }
}
