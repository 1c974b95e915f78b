//! Module tree pane
//!
//! Flattens the namespace forest of a [`Module`] into indented rows: each
//! namespace, the sequenceables and interfaces declared in it, and the methods
//! of each interface together with their mangled signatures.

use super::border_style;
use crate::parser::ast::TypeId;
use crate::parser::module::Module;
use crate::parser::namespace::NamespaceId;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineKind {
    Namespace,
    Sequenceable,
    Interface,
    Method,
}

/// One row of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub depth: usize,
    pub kind: OutlineKind,
    pub text: String,
    /// Mangled signature, shown dimmed after the text
    pub detail: String,
}

/// Build the rows for `module`, roots in declaration order.
pub fn module_outline(module: &Module) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();
    for &root in module.root_namespaces() {
        outline_namespace(module, root, 0, &mut entries);
    }
    entries
}

fn outline_namespace(
    module: &Module,
    id: NamespaceId,
    depth: usize,
    entries: &mut Vec<OutlineEntry>,
) {
    let namespace = module.namespace(id);
    let text = if namespace.is_global() {
        "(global)".to_string()
    } else {
        namespace.name.clone()
    };
    entries.push(OutlineEntry {
        depth,
        kind: OutlineKind::Namespace,
        text,
        detail: String::new(),
    });

    for &seq in &namespace.sequenceables {
        entries.push(OutlineEntry {
            depth: depth + 1,
            kind: OutlineKind::Sequenceable,
            text: format!("sequenceable {}", type_simple_name(module, seq)),
            detail: module.signature(seq),
        });
    }
    for &id in &namespace.interfaces {
        outline_interface(module, id, depth + 1, entries);
    }
    for &inner in &namespace.inner {
        outline_namespace(module, inner, depth + 1, entries);
    }
}

fn outline_interface(module: &Module, id: TypeId, depth: usize, entries: &mut Vec<OutlineEntry>) {
    let Some(interface) = module.interface(id) else {
        return;
    };
    let mut text = String::new();
    if interface.oneway {
        text.push_str("oneway ");
    }
    text.push_str("interface ");
    text.push_str(&interface.name);
    if interface.external {
        text.push_str(" (external)");
    }
    entries.push(OutlineEntry {
        depth,
        kind: OutlineKind::Interface,
        text,
        detail: module.signature(id),
    });

    for method in &interface.methods {
        entries.push(OutlineEntry {
            depth: depth + 1,
            kind: OutlineKind::Method,
            text: module.method_declaration(method),
            detail: module.method_signature(method),
        });
    }
}

fn type_simple_name(module: &Module, id: TypeId) -> String {
    let qualified = module.qualified_name(id);
    match qualified.rfind('.') {
        Some(index) => qualified[index + 1..].to_string(),
        None => qualified,
    }
}

/// Render the module tree pane
pub fn render_tree_pane(
    frame: &mut Frame,
    area: Rect,
    entries: &[OutlineEntry],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(" Module ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    if entries.is_empty() {
        let paragraph = Paragraph::new("(nothing declared)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    super::clamp_scroll(scroll_offset, entries.len(), visible_height);

    let items: Vec<ListItem> = entries
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|entry| {
            let style = match entry.kind {
                OutlineKind::Namespace => Style::default()
                    .fg(DEFAULT_THEME.primary)
                    .add_modifier(Modifier::BOLD),
                OutlineKind::Sequenceable => Style::default().fg(DEFAULT_THEME.type_name),
                OutlineKind::Interface => Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD),
                OutlineKind::Method => Style::default().fg(DEFAULT_THEME.fg),
            };
            let mut spans = vec![
                Span::raw("  ".repeat(entry.depth)),
                Span::styled(entry.text.clone(), style),
            ];
            if !entry.detail.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", entry.detail),
                    Style::default().fg(DEFAULT_THEME.signature),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;

    #[test]
    fn test_outline_follows_namespaces() {
        let mut parser = Parser::default();
        parser.parse_source(
            "Svc.idl",
            "sequenceable a.b.Data;\ninterface a.ISvc { void put(in Data d); }",
        );
        let module = parser.module().unwrap();
        let entries = module_outline(module);
        let rows: Vec<(usize, OutlineKind, &str)> = entries
            .iter()
            .map(|e| (e.depth, e.kind, e.text.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![
                (0, OutlineKind::Namespace, "a"),
                (1, OutlineKind::Interface, "interface ISvc"),
                (2, OutlineKind::Method, "void put(in a.b.Data d)"),
                (1, OutlineKind::Namespace, "b"),
                (2, OutlineKind::Sequenceable, "sequenceable Data"),
            ]
        );
    }

    #[test]
    fn test_outline_method_signature_detail() {
        let mut parser = Parser::default();
        parser.parse_source("T.idl", "oneway interface T { void f(in int[] x, in String s); }");
        let entries = module_outline(parser.module().unwrap());
        assert_eq!(entries[0].text, "(global)");
        assert_eq!(entries[1].text, "oneway interface T");
        assert_eq!(entries[1].detail, "LT;");
        assert_eq!(entries[2].detail, "([IT)V");
    }
}
