//! Renders a compiled tree as styled terminal lines.
//!
//! Structured style records accumulate down the ancestor path, so a text
//! leaf inside bold-inside-quote carries both decorations. `Br` leaves
//! start a new visual line.

use livetree_engine::style::{FontStyle, FontWeight, TextDecoration};
use livetree_engine::{FormatKind, NodeId, StyleRecord, Tree};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub fn render_tree(tree: &Tree) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for &line_id in &tree.node(tree.root()).children {
        let mut spans = Vec::new();
        let flushed = lines.len();
        render_node(tree, line_id, &StyleRecord::default(), &mut spans, &mut lines);
        // a line node whose last leaf was a break already flushed its rows
        if !spans.is_empty() || lines.len() == flushed {
            lines.push(Line::from(spans));
        }
    }
    lines
}

fn render_node(
    tree: &Tree,
    id: NodeId,
    inherited: &StyleRecord,
    spans: &mut Vec<Span<'static>>,
    lines: &mut Vec<Line<'static>>,
) {
    let node = tree.node(id);
    let effective = match &node.style {
        Some(own) => inherited.clone().overlay(own),
        None => inherited.clone(),
    };

    match node.kind {
        FormatKind::Text => {
            if let Some(text) = &node.text {
                spans.push(Span::styled(text.clone(), terminal_style(&effective)));
            }
        }
        FormatKind::Br => {
            lines.push(Line::from(std::mem::take(spans)));
        }
        _ => {
            for &child in &node.children {
                render_node(tree, child, &effective, spans, lines);
            }
        }
    }
}

fn terminal_style(record: &StyleRecord) -> Style {
    let mut style = Style::default();
    if let Some(color) = record.color.as_deref().and_then(parse_hex_color) {
        style = style.fg(color);
    }
    if let Some(color) = record.background_color.as_deref().and_then(parse_hex_color) {
        style = style.bg(color);
    }
    if record.font_weight == Some(FontWeight::Bold) {
        style = style.add_modifier(Modifier::BOLD);
    }
    if record.font_style == Some(FontStyle::Italic) {
        style = style.add_modifier(Modifier::ITALIC);
    }
    match record.text_decoration {
        Some(TextDecoration::Underline) => style = style.add_modifier(Modifier::UNDERLINED),
        Some(TextDecoration::LineThrough) => style = style.add_modifier(Modifier::CROSSED_OUT),
        _ => {}
    }
    style
}

/// Parses `#rrggbb`; anything else maps to no color.
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use livetree_engine::{MarkdownRange, MarkdownStyle, parse_ranges_to_tree};
    use pretty_assertions::assert_eq;

    fn compile(text: &str, ranges: &[MarkdownRange]) -> Tree {
        parse_ranges_to_tree(text, ranges, &MarkdownStyle::default_style(), false)
    }

    #[test]
    fn hex_colors_parse() {
        assert_eq!(parse_hex_color("#ff0080"), Some(Color::Rgb(255, 0, 128)));
        assert_eq!(parse_hex_color("ff0080"), None);
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn plain_lines_map_one_to_one() {
        let tree = compile("one\ntwo", &[]);
        let lines = render_tree(&tree);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].content, "one");
        assert_eq!(lines[1].spans[0].content, "two");
    }

    #[test]
    fn bold_span_carries_the_modifier() {
        let ranges = vec![
            MarkdownRange::new(FormatKind::Syntax, 0, 1),
            MarkdownRange::new(FormatKind::Bold, 1, 4),
            MarkdownRange::new(FormatKind::Syntax, 5, 1),
        ];
        let tree = compile("*loud*", &ranges);
        let lines = render_tree(&tree);
        let bold = lines[0]
            .spans
            .iter()
            .find(|s| s.content == "loud")
            .unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn nested_styles_accumulate() {
        // bold wrapping italic: the inner text gets both modifiers
        let ranges = vec![
            MarkdownRange::new(FormatKind::Bold, 0, 3),
            MarkdownRange::new(FormatKind::Italic, 1, 1),
        ];
        let tree = compile("axb", &ranges);
        let lines = render_tree(&tree);
        let inner = lines[0].spans.iter().find(|s| s.content == "x").unwrap();
        assert!(inner.style.add_modifier.contains(Modifier::BOLD));
        assert!(inner.style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn empty_line_renders_as_blank_line() {
        let tree = compile("a\n\nb", &[]);
        let lines = render_tree(&tree);
        assert_eq!(lines.len(), 3);
        assert!(lines[1].spans.is_empty());
        assert_eq!(lines[2].spans[0].content, "b");
    }

    #[test]
    fn merged_multiline_node_splits_on_breaks() {
        let ranges = vec![MarkdownRange::new(FormatKind::Pre, 0, 7)];
        let tree = compile("one\ntwo", &ranges);
        let lines = render_tree(&tree);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].content, "one");
        assert_eq!(lines[1].spans[0].content, "two");
    }
}
