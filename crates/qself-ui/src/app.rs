//! Main application state and TUI event loop for qself.
//!
//! [`App`] owns the theme and the ordered sequence of display blocks built
//! by the binary.  One block is shown at a time; the user pages between
//! blocks and scrolls within long tables.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};

use qself_core::Table;

use crate::table_view;
use crate::themes::Theme;

/// Rows scrolled per PageUp / PageDown press.
const PAGE_STEP: usize = 10;

// ── DisplayBlock ──────────────────────────────────────────────────────────────

/// One renderable unit emitted by a pipeline run, in display order.
#[derive(Debug, Clone)]
pub enum DisplayBlock {
    /// A labeled table view.
    Table { title: String, table: Table },
    /// An error banner for a failed pipeline.
    Error { title: String, message: String },
}

impl DisplayBlock {
    pub fn table(title: impl Into<String>, table: Table) -> Self {
        DisplayBlock::Table {
            title: title.into(),
            table,
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        DisplayBlock::Error {
            title: title.into(),
            message: message.into(),
        }
    }

    /// The label shown in the view selector line.
    pub fn title(&self) -> &str {
        match self {
            DisplayBlock::Table { title, .. } => title,
            DisplayBlock::Error { title, .. } => title,
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the qself TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    /// Ordered display blocks for this run.
    pub blocks: Vec<DisplayBlock>,
    /// Index of the block currently shown.
    pub selected: usize,
    /// First visible data row within the current table block.
    pub row_offset: usize,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    /// Construct the application for one run's block sequence.
    pub fn new(theme_name: &str, blocks: Vec<DisplayBlock>) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            blocks,
            selected: 0,
            row_offset: 0,
            should_quit: false,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the viewer until the user quits with `q` or Ctrl+C.
    pub fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            terminal.draw(|frame| self.render(frame))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Apply a key press to the application state.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => self.next_block(),
            KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => self.prev_block(),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
            KeyCode::PageDown => self.scroll_by(PAGE_STEP as isize),
            KeyCode::PageUp => self.scroll_by(-(PAGE_STEP as isize)),
            KeyCode::Home => self.row_offset = 0,
            _ => {}
        }
    }

    /// Advance to the next block (wrapping) and reset the scroll position.
    pub fn next_block(&mut self) {
        if self.blocks.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.blocks.len();
        self.row_offset = 0;
    }

    /// Go back to the previous block (wrapping) and reset the scroll position.
    pub fn prev_block(&mut self) {
        if self.blocks.is_empty() {
            return;
        }
        self.selected = (self.selected + self.blocks.len() - 1) % self.blocks.len();
        self.row_offset = 0;
    }

    /// Scroll the current table by `delta` rows, clamped to its row range.
    /// Error banners ignore scrolling.
    pub fn scroll_by(&mut self, delta: isize) {
        let max_offset = match self.blocks.get(self.selected) {
            Some(DisplayBlock::Table { table, .. }) => table.len().saturating_sub(1),
            _ => return,
        };
        let next = self.row_offset as isize + delta;
        self.row_offset = next.clamp(0, max_offset as isize) as usize;
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the header lines and the current block.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        if self.blocks.is_empty() {
            table_view::render_no_data(frame, area, &self.theme);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(3)])
            .split(area);

        self.render_header(frame, chunks[0]);

        match &self.blocks[self.selected] {
            DisplayBlock::Table { title, table } => {
                table_view::render_table(frame, chunks[1], title, table, self.row_offset, &self.theme);
            }
            DisplayBlock::Error { title, message } => {
                table_view::render_error_banner(frame, chunks[1], title, message, &self.theme);
            }
        }
    }

    fn render_header(&self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let clock = chrono::Local::now().format("%H:%M:%S").to_string();
        let selector = format!(
            "[{}/{}] {}",
            self.selected + 1,
            self.blocks.len(),
            self.blocks[self.selected].title()
        );
        let lines = vec![
            Line::from(vec![
                Span::styled("qself", self.theme.header),
                Span::styled("  ", self.theme.text),
                Span::styled(selector, self.theme.bold),
                Span::styled(format!("  {}", clock), self.theme.dim),
            ]),
            Line::from(Span::styled(
                "←/→ switch view · ↑/↓ scroll · q quit",
                self.theme.dim,
            )),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
