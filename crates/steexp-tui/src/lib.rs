//! Terminal account view
//!
//! Drives an [`AccountExplorer`] from the keyboard and draws whatever screen
//! its loader state maps to, plus the two paginated history lists.

mod feeds;
mod render;

use std::time::Duration;

use crossterm::event::{self, Event as CEvent, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use steexp_explorer::{AccountExplorer, Screen};
use steexp_horizon::HorizonClient;
use steexp_types::FeedKind;
use thiserror::Error;

use crate::feeds::Feeds;

#[derive(Debug, Error)]
pub enum TuiError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum InputMode {
    #[default]
    Normal,
    Editing,
}

#[derive(Debug, Default)]
pub(crate) struct TuiState {
    pub mode: InputMode,
    pub input: String,
    pub status_line: String,
}

/// What a key press asks the run loop to do
#[derive(Debug, PartialEq, Eq)]
enum Action {
    None,
    Show(String),
    Reload,
    Next(FeedKind),
    Prev(FeedKind),
    Quit,
}

impl TuiState {
    fn on_key(&mut self, code: KeyCode) -> Action {
        match self.mode {
            InputMode::Editing => match code {
                KeyCode::Enter => {
                    self.mode = InputMode::Normal;
                    let account_id = self.input.trim().to_string();
                    self.input.clear();
                    if account_id.is_empty() {
                        Action::None
                    } else {
                        Action::Show(account_id)
                    }
                }
                KeyCode::Esc => {
                    self.mode = InputMode::Normal;
                    self.input.clear();
                    Action::None
                }
                KeyCode::Backspace => {
                    self.input.pop();
                    Action::None
                }
                KeyCode::Char(c) if !c.is_whitespace() => {
                    self.input.push(c);
                    Action::None
                }
                _ => Action::None,
            },
            InputMode::Normal => match code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
                KeyCode::Char('/') => {
                    self.mode = InputMode::Editing;
                    Action::None
                }
                KeyCode::Char('r') | KeyCode::Char('R') => Action::Reload,
                KeyCode::Char(']') => Action::Next(FeedKind::Operations),
                KeyCode::Char('[') => Action::Prev(FeedKind::Operations),
                KeyCode::Char('}') => Action::Next(FeedKind::Transactions),
                KeyCode::Char('{') => Action::Prev(FeedKind::Transactions),
                _ => Action::None,
            },
        }
    }
}

/// Run the account view until the user quits
///
/// `horizon` serves the history lists; the explorer's own fetcher serves the
/// account records. `initial` is looked up right away when given.
pub async fn run_account_tui(
    explorer: AccountExplorer,
    horizon: HorizonClient,
    initial: Option<String>,
) -> Result<(), TuiError> {
    if let Some(account_id) = initial.as_deref() {
        explorer.show(account_id);
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let horizon_url = horizon.base_url().to_string();
    let feeds = Feeds::new(horizon);
    let mut state = TuiState::default();

    let result = loop {
        let screen = explorer.screen();
        match &screen {
            Screen::Account(view) => feeds.attach(view),
            _ => feeds.detach(),
        }

        let drawn = terminal.draw(|frame| {
            let lists = feeds.lock();
            render::draw_ui(frame, &horizon_url, &screen, lists.as_ref(), &state);
        });
        if let Err(err) = drawn {
            break Err(err.into());
        }

        match poll_key() {
            Ok(Some(code)) => match state.on_key(code) {
                Action::Quit => break Ok(()),
                Action::Show(account_id) => {
                    state.status_line = format!("looking up {}", account_id);
                    explorer.show(&account_id);
                }
                Action::Reload => {
                    state.status_line = "reloading".to_string();
                    explorer.loader().reload();
                }
                Action::Next(kind) => feeds.next(kind),
                Action::Prev(kind) => feeds.prev(kind),
                Action::None => {}
            },
            Ok(None) => {}
            Err(err) => break Err(err.into()),
        }

        // Let spawned fetches make progress on a single-threaded runtime.
        tokio::task::yield_now().await;
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn poll_key() -> std::io::Result<Option<KeyCode>> {
    if event::poll(Duration::from_millis(150))? {
        if let CEvent::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(Some(key.code));
            }
        }
    }
    Ok(None)
}
