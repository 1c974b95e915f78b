//! Diagnostics pane rendering

use super::border_style;
use crate::parser::diagnostics::{Diagnostic, DiagnosticKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

fn kind_color(kind: DiagnosticKind) -> Color {
    match kind {
        DiagnosticKind::Lexical | DiagnosticKind::Syntax => DEFAULT_THEME.error,
        DiagnosticKind::Resolution | DiagnosticKind::Redeclaration => DEFAULT_THEME.secondary,
        DiagnosticKind::Semantic | DiagnosticKind::Integrity => DEFAULT_THEME.warning,
    }
}

/// Render the diagnostic list. `selected` is kept visible.
pub fn render_diagnostics_pane(
    frame: &mut Frame,
    area: Rect,
    diagnostics: &[Diagnostic],
    selected: Option<usize>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(format!(" Diagnostics ({}) ", diagnostics.len()))
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    if diagnostics.is_empty() {
        let paragraph = Paragraph::new("No diagnostics")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.success));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    if let Some(index) = selected {
        if index < *scroll_offset {
            *scroll_offset = index;
        } else if index >= *scroll_offset + visible_height {
            *scroll_offset = index + 1 - visible_height;
        }
    }
    super::clamp_scroll(scroll_offset, diagnostics.len(), visible_height);

    let items: Vec<ListItem> = diagnostics
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(index, diag)| {
            let mut item = ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:>16} ", diag.kind.label()),
                    Style::default().fg(kind_color(diag.kind)),
                ),
                Span::styled(
                    format!("{}:{} ", diag.line(), diag.column()),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(diag.message.clone(), Style::default().fg(DEFAULT_THEME.fg)),
            ]));
            if selected == Some(index) {
                item = item.style(
                    Style::default()
                        .bg(DEFAULT_THEME.current_line_bg)
                        .add_modifier(Modifier::BOLD),
                );
            }
            item
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
