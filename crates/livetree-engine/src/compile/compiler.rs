use super::lines::Paragraph;
use super::ranges::FormatKind;
use super::tree::{NodeId, Tree};
use crate::style::{MarkdownStyle, resolve_style};

/// Compiles merged lines into the node tree.
///
/// Ranges arrive pre-sorted by `start` (detector contract). The walk keeps a
/// "currently open" node; the parent chain of that node is the stack of open
/// intervals:
///
/// - gap text between the previously consumed offset and the next range is
///   emitted under the currently open node;
/// - a range whose successor starts before its own end (and whose kind is
///   not `syntax`) becomes the new open node, so subsequent content nests;
/// - otherwise the range's own text becomes leaves inside its node, and the
///   walk unnests: it climbs the parent chain, flushing each ancestor's
///   trailing gap text, for as long as the next range starts at or beyond
///   the ancestor's end. The climb stops at the line node unless the line
///   itself is exhausted.
pub(super) fn compile_lines(
    tree: &mut Tree,
    text: &str,
    lines: Vec<Paragraph>,
    escaped_len: usize,
    style: &MarkdownStyle,
    disable_inline_styles: bool,
) {
    let root = tree.root();
    for line in lines {
        let line_text = if line.ranges.is_empty() {
            Some(line.text.as_str())
        } else {
            None
        };
        let mut current = add_paragraph(
            tree,
            root,
            line_text,
            line.start,
            line.length,
            style,
            disable_inline_styles,
        );
        let mut last_end = line.start;

        for (i, range) in line.ranges.iter().enumerate() {
            let range_end = range.end();
            let next_start = line
                .ranges
                .get(i + 1)
                .map(|r| r.start)
                .unwrap_or(escaped_len);

            // gap text before the range, under the currently open node
            let before = substring(
                &line.text,
                last_end.saturating_sub(line.start),
                range.start.saturating_sub(line.start),
            );
            if !before.is_empty() {
                add_text_leaves(tree, current, before, last_end);
            }

            let span = tree.append_child(current, range.kind, range.start, range.length);
            decorate(tree, span, range.kind, style, disable_inline_styles);

            if i + 1 < line.ranges.len() && next_start < range_end && range.kind != FormatKind::Syntax
            {
                // the next range opens while this one is still open: nest
                current = span;
                last_end = range.start;
            } else {
                // leaf range: its own text goes inside, then unnest
                let content = substring(text, range.start, range_end);
                if !content.is_empty() {
                    add_text_leaves(tree, span, content, range.start);
                }
                last_end = range_end;

                loop {
                    let (parent, open_end) = {
                        let node = tree.node(current);
                        (node.parent, node.end())
                    };
                    let Some(parent) = parent else { break };
                    if next_start < open_end {
                        break;
                    }
                    let after = substring(
                        &line.text,
                        last_end.saturating_sub(line.start),
                        open_end.saturating_sub(line.start),
                    );
                    if !after.is_empty() {
                        add_text_leaves(tree, current, after, last_end);
                    }
                    last_end = open_end;
                    current = parent;
                }
            }
        }
    }
}

/// Adds a `Line` node under `parent`.
///
/// With `Some(text)` the line's content is emitted immediately as leaves
/// (the no-ranges path); the empty string still yields a single `Br` leaf so
/// an empty line renders a visible break. With `None` the caller fills the
/// line in during the range walk.
pub(super) fn add_paragraph(
    tree: &mut Tree,
    parent: NodeId,
    text: Option<&str>,
    start: usize,
    length: usize,
    style: &MarkdownStyle,
    disable_inline_styles: bool,
) -> NodeId {
    // an empty line claims one unit of interval for its mandatory break
    let line = tree.append_child(parent, FormatKind::Line, start, length.max(1));
    decorate(tree, line, FormatKind::Line, style, disable_inline_styles);

    match text {
        Some("") => {
            tree.append_child(line, FormatKind::Br, start, 1);
        }
        Some(text) => add_text_leaves(tree, line, text, start),
        None => {}
    }
    line
}

/// Emits literal text as `Text`/`Br` leaves under `parent`.
///
/// The text splits on `'\n'`: every non-empty segment becomes a `Text` leaf
/// and a `Br` leaf (length 1) sits between consecutive segments. Empty input
/// emits nothing; the empty-line break is the caller's concern.
pub(super) fn add_text_leaves(tree: &mut Tree, parent: NodeId, text: &str, start: usize) {
    let segments: Vec<&str> = text.split('\n').collect();
    let last = segments.len() - 1;
    let mut offset = start;
    for (i, segment) in segments.iter().enumerate() {
        if !segment.is_empty() {
            let leaf = tree.append_child(parent, FormatKind::Text, offset, segment.len());
            tree.node_mut(leaf).text = Some((*segment).to_string());
        }
        offset += segment.len();
        if i < last {
            tree.append_child(parent, FormatKind::Br, offset, 1);
            offset += 1;
        }
    }
}

fn decorate(
    tree: &mut Tree,
    id: NodeId,
    kind: FormatKind,
    style: &MarkdownStyle,
    disable_inline_styles: bool,
) {
    if disable_inline_styles {
        return;
    }
    if let Some(record) = resolve_style(kind, style) {
        tree.node_mut(id).style = Some(record);
    }
}

/// Byte-range slice clamped to the string, empty when inverted or when an
/// offset misses a UTF-8 boundary. Detectors are expected to emit valid byte
/// offsets, so the clamping only ever fires on malformed input.
fn substring(s: &str, from: usize, to: usize) -> &str {
    let from = from.min(s.len());
    let to = to.clamp(from, s.len());
    s.get(from..to).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_clamps() {
        assert_eq!(substring("hello", 1, 3), "el");
        assert_eq!(substring("hello", 3, 1), "");
        assert_eq!(substring("hello", 2, 99), "llo");
        assert_eq!(substring("hello", 99, 100), "");
    }

    #[test]
    fn text_leaves_split_on_breaks() {
        let mut tree = Tree::new(20);
        let line = tree.append_child(tree.root(), FormatKind::Line, 0, 7);
        add_text_leaves(&mut tree, line, "ab\ncd", 0);
        let kinds: Vec<_> = tree
            .node(line)
            .children
            .iter()
            .map(|&c| tree.node(c).kind)
            .collect();
        assert_eq!(kinds, vec![FormatKind::Text, FormatKind::Br, FormatKind::Text]);
        let br = tree.node(tree.node(line).children[1]);
        assert_eq!((br.start, br.length), (2, 1));
    }

    #[test]
    fn trailing_break_emits_br_without_empty_leaf() {
        let mut tree = Tree::new(20);
        let line = tree.append_child(tree.root(), FormatKind::Line, 0, 4);
        add_text_leaves(&mut tree, line, "ab\n", 0);
        let kinds: Vec<_> = tree
            .node(line)
            .children
            .iter()
            .map(|&c| tree.node(c).kind)
            .collect();
        assert_eq!(kinds, vec![FormatKind::Text, FormatKind::Br]);
    }

    #[test]
    fn leading_break_emits_br_first() {
        let mut tree = Tree::new(20);
        let line = tree.append_child(tree.root(), FormatKind::Line, 0, 4);
        add_text_leaves(&mut tree, line, "\nab", 0);
        let kinds: Vec<_> = tree
            .node(line)
            .children
            .iter()
            .map(|&c| tree.node(c).kind)
            .collect();
        assert_eq!(kinds, vec![FormatKind::Br, FormatKind::Text]);
    }
}
