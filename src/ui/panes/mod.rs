//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: IDL source with keyword highlighting and diagnostic lines marked
//! - [`tree`]: namespace tree of the parsed module with method signatures
//! - [`diagnostics`]: the diagnostic list with the selected entry highlighted
//! - [`status`]: Status bar with keybindings and parse result
//!
//! Each pane module exports a primary `render_*` function taking the frame,
//! its area, the data to show and its scroll state.

pub mod diagnostics;
pub mod source;
pub mod status;
pub mod tree;

// Re-export render functions for convenience
pub use diagnostics::render_diagnostics_pane;
pub use source::{render_source_pane, SourceScrollState};
pub use status::render_status_bar;
pub use tree::{module_outline, render_tree_pane, OutlineEntry, OutlineKind};

use crate::ui::theme::DEFAULT_THEME;
use ratatui::style::{Modifier, Style};

pub(crate) fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    }
}

/// Clamp a scroll offset so the last page stays full.
pub(crate) fn clamp_scroll(offset: &mut usize, total: usize, visible_height: usize) {
    if total > visible_height {
        *offset = (*offset).min(total - visible_height);
    } else {
        *offset = 0;
    }
}
