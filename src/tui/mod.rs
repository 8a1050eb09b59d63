use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Margin},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{DaylogError, DaylogResult};

mod theme {
    use ratatui::style::Color;

    pub const ACCENT: Color = Color::Cyan;
    pub const TEXT_PRIMARY: Color = Color::White;
    pub const TEXT_DIM: Color = Color::Rgb(120, 120, 120);
    pub const HIGHLIGHT_FG: Color = Color::Black;
    pub const HIGHLIGHT_BG: Color = Color::White;
}

/// Something that can choose one daylog file out of a list
pub trait DaylogSelector {
    /// Returns `None` when the operator backs out without choosing
    fn select(&mut self, options: &[PathBuf]) -> DaylogResult<Option<PathBuf>>;
}

/// Result of feeding one key to the selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Redraw and wait for the next key
    Render,
    Confirmed(usize),
    Cancelled,
}

/// Cursor state of the picker, independent of any terminal
pub struct SelectorState {
    labels: Vec<String>,
    cursor: usize,
    list_state: ListState,
}

impl SelectorState {
    pub fn new(labels: Vec<String>) -> Self {
        let mut list_state = ListState::default();
        if !labels.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            labels,
            cursor: 0,
            list_state,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Transition {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Transition::Cancelled;
        }

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                // Cursor stays on the last option
                if self.cursor < self.labels.len().saturating_sub(1) {
                    self.cursor += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Enter if !self.labels.is_empty() => {
                return Transition::Confirmed(self.cursor);
            }
            KeyCode::Esc | KeyCode::Char('q') => return Transition::Cancelled,
            _ => {}
        }

        if !self.labels.is_empty() {
            self.list_state.select(Some(self.cursor));
        }
        Transition::Render
    }
}

/// Owns the terminal for the lifetime of a selection
///
/// Raw mode, the alternate screen and the hidden cursor are released in `Drop`,
/// so every exit path (including `?` and panics) hands back a usable terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn acquire() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, Hide) {
            restore_terminal();
            return Err(e);
        }

        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                restore_terminal();
                Err(e)
            }
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

fn restore_terminal() {
    if let Err(e) = disable_raw_mode() {
        tracing::warn!(error = %e, "failed to leave raw mode");
    }
    if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, Show) {
        tracing::warn!(error = %e, "failed to restore screen");
    }
}

/// Full-screen list picker over crossterm
#[derive(Debug, Default)]
pub struct InteractiveSelector;

impl InteractiveSelector {
    pub fn new() -> Self {
        Self
    }
}

impl DaylogSelector for InteractiveSelector {
    fn select(&mut self, options: &[PathBuf]) -> DaylogResult<Option<PathBuf>> {
        if options.is_empty() {
            return Ok(None);
        }

        if !is_tty() {
            return Err(DaylogError::Terminal(io::Error::other(
                "interactive selection requires a terminal",
            )));
        }

        let labels = options.iter().map(|p| label_for(p)).collect();
        let mut state = SelectorState::new(labels);

        let choice = {
            let mut guard = TerminalGuard::acquire()?;
            run_selector(&mut guard.terminal, &mut state)?
        };

        match choice {
            Some(index) => {
                tracing::debug!(choice = %options[index].display(), "daylog selected");
                Ok(Some(options[index].clone()))
            }
            None => {
                tracing::debug!("selection cancelled");
                Ok(None)
            }
        }
    }
}

fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout) && atty::is(atty::Stream::Stdin)
}

/// Display label for a daylog file (its file name)
pub fn label_for(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn run_selector(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut SelectorState,
) -> io::Result<Option<usize>> {
    loop {
        terminal.draw(|f| ui(f, state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match state.handle_key(key) {
                Transition::Render => {}
                Transition::Confirmed(index) => return Ok(Some(index)),
                Transition::Cancelled => return Ok(None),
            }
        }
    }
}

fn ui(f: &mut Frame, state: &mut SelectorState) {
    let area = f.area().inner(Margin {
        horizontal: 2,
        vertical: 1,
    });

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Min(1),    // Options
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            "Select a daylog",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{}", state.labels.len()),
            Style::default().fg(theme::TEXT_DIM),
        ),
    ]));
    f.render_widget(title, chunks[0]);

    let items: Vec<ListItem> = state
        .labels
        .iter()
        .map(|label| {
            ListItem::new(Line::from(Span::styled(
                label.clone(),
                Style::default().fg(theme::TEXT_PRIMARY),
            )))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::NONE))
        .highlight_style(
            Style::default()
                .fg(theme::HIGHLIGHT_FG)
                .bg(theme::HIGHLIGHT_BG),
        )
        .highlight_symbol("▸ ");
    f.render_stateful_widget(list, chunks[1], &mut state.list_state);

    let hints = Paragraph::new(Line::from(Span::styled(
        "j/↓ down  k/↑ up  enter select  esc cancel",
        Style::default()
            .fg(theme::TEXT_DIM)
            .add_modifier(Modifier::DIM),
    )));
    f.render_widget(hints, chunks[2]);
}
