//! Terminal browser using ratatui
//!
//! Tabs for characters, weapons, bosses and missions, a search line, facet
//! pickers and detail pages. Navigation goes through the router: opening a
//! card follows its `?type=..&id=..` link, going back follows `?`.

mod components;
mod state;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::dataset::Dataset;

pub use components::draw;
pub use state::{BrowserState, Focus};

type Screen = Terminal<CrosstermBackend<Stdout>>;

const TICK: Duration = Duration::from_millis(250);

/// Run `undo` when `result` is an error, then pass the result on
fn undo_on_err<T, E>(result: Result<T, E>, undo: impl FnOnce()) -> Result<T, E> {
    if result.is_err() {
        undo();
    }
    result
}

fn enter_screen() -> io::Result<Screen> {
    io::stdout().execute(EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(io::stdout()))
}

fn leave_screen(screen: &mut Screen) -> io::Result<()> {
    disable_raw_mode()?;
    screen.backend_mut().execute(LeaveAlternateScreen)?;
    screen.show_cursor()
}

/// Interactive browser; holds raw mode and the alternate screen until dropped
pub struct BrowserApp {
    screen: Screen,
    state: BrowserState,
    restored: bool,
}

impl BrowserApp {
    pub fn new(dataset: Arc<Dataset>, export_file: PathBuf) -> Result<Self> {
        enable_raw_mode()?;
        // No Drop runs if setup fails here, so raw mode is undone by hand
        let screen = undo_on_err(enter_screen(), || {
            disable_raw_mode().ok();
            io::stdout().execute(LeaveAlternateScreen).ok();
        })?;

        Ok(Self {
            screen,
            state: BrowserState::new(dataset, export_file),
            restored: false,
        })
    }

    /// Start at `location` instead of the list view
    pub fn open(&mut self, location: &str) {
        self.state.navigate(location);
    }

    /// Run until the user quits, then restore the terminal
    pub fn run(mut self) -> Result<()> {
        info!(location = self.state.location(), "browser started");
        while !self.state.should_quit() {
            let state = &self.state;
            self.screen.draw(|frame| draw(frame, state))?;

            if !event::poll(TICK)? {
                continue;
            }
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.state.handle_key(key);
                }
            }
        }
        info!("browser closed");

        self.restored = true;
        leave_screen(&mut self.screen)?;
        Ok(())
    }
}

impl Drop for BrowserApp {
    fn drop(&mut self) {
        if !self.restored {
            leave_screen(&mut self.screen).ok();
        }
    }
}
