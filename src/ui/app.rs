//! Main TUI application state and logic

use super::panes::{self, OutlineEntry, SourceScrollState};
use crate::parser::diagnostics::Diagnostic;
use crate::parser::module::Module;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use rustc_hash::FxHashSet;
use std::io;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Tree,
    Diagnostics,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> tree -> diagnostics)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Tree,
            FocusedPane::Tree => FocusedPane::Diagnostics,
            FocusedPane::Diagnostics => FocusedPane::Source,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Diagnostics,
            FocusedPane::Tree => FocusedPane::Source,
            FocusedPane::Diagnostics => FocusedPane::Tree,
        }
    }
}

/// The main application state
pub struct App {
    /// The source being shown
    pub source_code: String,

    /// Rows of the module tree, built once from the module
    pub outline: Vec<OutlineEntry>,

    pub diagnostics: Vec<Diagnostic>,

    /// Lines that carry at least one diagnostic
    pub error_lines: FxHashSet<usize>,

    /// Index into `diagnostics`
    pub selected: Option<usize>,

    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: SourceScrollState,
    pub tree_scroll: usize,
    pub diagnostics_scroll: usize,

    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    /// Create a viewer for `module`. The module may be partial after a failed parse.
    pub fn new(module: &Module, diagnostics: Vec<Diagnostic>, source_code: String) -> Self {
        let error_lines = diagnostics.iter().map(Diagnostic::line).collect();
        let selected = if diagnostics.is_empty() { None } else { Some(0) };
        let status_message = match diagnostics.first() {
            Some(first) => first.to_string(),
            None => format!("{} parsed successfully", module.file()),
        };
        App {
            source_code,
            outline: panes::module_outline(module),
            diagnostics,
            error_lines,
            selected,
            focused_pane: FocusedPane::Source,
            source_scroll: SourceScrollState::default(),
            tree_scroll: 0,
            diagnostics_scroll: 0,
            should_quit: false,
            status_message,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key_event(key);
                }
            }
        }

        Ok(())
    }

    /// Line of the selected diagnostic, 0 when nothing is selected
    pub fn current_line(&self) -> usize {
        self.selected
            .and_then(|index| self.diagnostics.get(index))
            .map_or(0, Diagnostic::line)
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes on top, status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        // Source | Tree
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(main_chunks[0]);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[0]);

        let current_line = self.current_line();
        panes::render_source_pane(
            frame,
            columns[0],
            &self.source_code,
            current_line,
            &self.error_lines,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_tree_pane(
            frame,
            columns[1],
            &self.outline,
            self.focused_pane == FocusedPane::Tree,
            &mut self.tree_scroll,
        );

        panes::render_diagnostics_pane(
            frame,
            rows[1],
            &self.diagnostics,
            self.selected,
            self.focused_pane == FocusedPane::Diagnostics,
            &mut self.diagnostics_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.diagnostics.len(),
            self.selected,
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Char('n') => self.select_diagnostic(1),
            KeyCode::Char('p') => self.select_diagnostic(-1),
            KeyCode::Up => self.scroll_up(),
            KeyCode::Down => self.scroll_down(),
            _ => {}
        }
    }

    fn scroll_up(&mut self) {
        match self.focused_pane {
            FocusedPane::Source => {
                if self.current_line() == 0 {
                    self.source_scroll.offset = self.source_scroll.offset.saturating_sub(1);
                } else if let Some(row) = self.source_scroll.target_line_row {
                    // Scrolling up makes the selected line move down visually
                    self.source_scroll.target_line_row = Some(row.saturating_add(1));
                }
            }
            FocusedPane::Tree => {
                self.tree_scroll = self.tree_scroll.saturating_sub(1);
            }
            FocusedPane::Diagnostics => self.select_diagnostic(-1),
        }
    }

    fn scroll_down(&mut self) {
        match self.focused_pane {
            FocusedPane::Source => {
                if self.current_line() == 0 {
                    self.source_scroll.offset = self.source_scroll.offset.saturating_add(1);
                } else if let Some(row) = self.source_scroll.target_line_row {
                    self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                }
            }
            FocusedPane::Tree => {
                self.tree_scroll = self.tree_scroll.saturating_add(1);
            }
            FocusedPane::Diagnostics => self.select_diagnostic(1),
        }
    }

    /// Move the selection by `delta`, wrapping around the list.
    fn select_diagnostic(&mut self, delta: isize) {
        let total = self.diagnostics.len();
        if total == 0 {
            self.status_message = "No diagnostics".to_string();
            return;
        }
        let current = self.selected.unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(total as isize) as usize;
        self.selected = Some(next);
        self.status_message = self.diagnostics[next].to_string();
    }
}
