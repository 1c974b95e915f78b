//! Source pane rendering with keyword highlighting
//!
//! Shows the IDL file with line numbers. Lines carrying at least one
//! diagnostic get a dim red background; the line of the selected diagnostic is
//! marked with an arrow and kept at a fixed row while the selection moves.

use super::border_style;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use rustc_hash::FxHashSet;

/// Simple syntax highlighting for one line of IDL
fn highlight_source_line(line: &str) -> Line<'_> {
    // Continuation lines of a block comment
    if line.trim_start().starts_with('*') {
        return Line::from(Span::styled(line, Style::default().fg(DEFAULT_THEME.comment)));
    }

    let mut spans = Vec::new();
    let mut current_word = String::new();

    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Comments run to end of line
        if c == '/' && matches!(chars.get(i + 1), Some('/') | Some('*')) {
            if !current_word.is_empty() {
                spans.push(Span::raw(current_word.clone()));
                current_word.clear();
            }
            let rest: String = chars[i..].iter().collect();
            spans.push(Span::styled(rest, Style::default().fg(DEFAULT_THEME.comment)));
            return Line::from(spans);
        }

        if !c.is_alphanumeric() && c != '_' && c != '.' {
            if !current_word.is_empty() {
                let is_method = c == '(';
                let style = get_keyword_style(&current_word, is_method);
                spans.push(Span::styled(current_word.clone(), style));
                current_word.clear();
            }

            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' | '<' | '>' => {
                    Style::default().fg(DEFAULT_THEME.primary)
                }
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };
            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    if !current_word.is_empty() {
        let style = get_keyword_style(&current_word, false);
        spans.push(Span::styled(current_word, style));
    }

    Line::from(spans)
}

fn get_keyword_style(word: &str, is_method: bool) -> Style {
    match word {
        "boolean" | "byte" | "short" | "int" | "long" | "float" | "double" | "char" | "String"
        | "void" | "List" | "Map" => Style::default().fg(DEFAULT_THEME.type_name),
        "interface" | "sequenceable" | "oneway" | "in" | "out" | "inout" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        _ if is_method => Style::default().fg(DEFAULT_THEME.method),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Scroll state for the source pane
#[derive(Debug, Default)]
pub struct SourceScrollState {
    pub offset: usize,
    /// Visual row the selected line is pinned to (None = center on first render)
    pub target_line_row: Option<usize>,
}

/// Render the source pane.
///
/// `current_line` is the 1-based line of the selected diagnostic, 0 for none.
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    current_line: usize,
    error_lines: &FxHashSet<usize>,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let block = Block::default()
        .title(" Source ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let lines: Vec<&str> = source_code.lines().collect();
    let total_lines = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders (2), min 1

    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    if current_line > 0 && current_line <= total_lines {
        scroll_state.offset = (current_line - 1).saturating_sub(target_row);
    }
    super::clamp_scroll(&mut scroll_state.offset, total_lines, visible_height);

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_current = line_num == current_line;
            let has_error = error_lines.contains(&line_num);

            let marker = if is_current { "▶" } else { " " };
            let number = format!("{}{:4} ", marker, line_num);
            let (num_style, background) = if is_current {
                (
                    Style::default()
                        .fg(DEFAULT_THEME.error)
                        .add_modifier(Modifier::BOLD),
                    Some(DEFAULT_THEME.current_line_bg),
                )
            } else if has_error {
                (
                    Style::default().fg(DEFAULT_THEME.error),
                    Some(DEFAULT_THEME.error_line_bg),
                )
            } else {
                (Style::default().fg(DEFAULT_THEME.comment), None)
            };

            let mut content = highlight_source_line(line);
            if let Some(bg) = background {
                for span in &mut content.spans {
                    span.style = span.style.bg(bg);
                }
            }

            let mut spans = vec![Span::styled(number, num_style)];
            spans.extend(content.spans);
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(line: &Line) -> Vec<String> {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn test_highlight_splits_words_and_punctuation() {
        let line = highlight_source_line("int bar(in a.b.Foo x);");
        assert_eq!(
            texts(&line),
            vec!["int", " ", "bar", "(", "in", " ", "a.b.Foo", " ", "x", ")", ";"]
        );
        assert_eq!(line.spans[0].style.fg, Some(DEFAULT_THEME.type_name));
        assert_eq!(line.spans[2].style.fg, Some(DEFAULT_THEME.method));
    }

    #[test]
    fn test_highlight_comment_rest_of_line() {
        let line = highlight_source_line("void f(); // done");
        let last = line.spans.last().unwrap();
        assert_eq!(last.content, "// done");
        assert_eq!(last.style.fg, Some(DEFAULT_THEME.comment));
    }
}
