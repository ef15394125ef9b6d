pub mod compiler;
pub mod invariants;
pub mod lines;
pub mod merge;
pub mod ranges;
pub mod tree;

use crate::style::MarkdownStyle;
use compiler::{add_paragraph, compile_lines};
use merge::merge_lines_with_multiline_ranges;
use ranges::{MarkdownRange, normalize_ranges};
use tree::Tree;

pub use lines::split_text_into_lines;

/// Compiles raw text plus detected ranges into a tree of visual nodes.
///
/// The pipeline: normalize grouped ranges, segment the text into lines,
/// re-merge lines spanned by a multi-line range, then walk ranges and text
/// in lockstep per line. The result is a brand-new tree on every call; no
/// incremental node diffing happens here.
///
/// `disable_inline_styles` skips structural style resolution, producing an
/// undecorated tree (useful for content-only comparisons).
///
/// Malformed input (offsets beyond the text, unsorted ranges) is out of
/// contract: the compiler stays panic-free but the resulting shape is
/// unspecified.
pub fn parse_ranges_to_tree(
    text: &str,
    ranges: &[MarkdownRange],
    style: &MarkdownStyle,
    disable_inline_styles: bool,
) -> Tree {
    let escaped_len = escaped_text_length(text);
    let mut tree = Tree::new(escaped_len);
    let root = tree.root();

    let lines = split_text_into_lines(text);

    if ranges.is_empty() {
        for line in &lines {
            add_paragraph(
                &mut tree,
                root,
                Some(&line.text),
                line.start,
                line.length,
                style,
                disable_inline_styles,
            );
        }
        return tree;
    }

    let ranges = normalize_ranges(ranges);
    let lines = merge_lines_with_multiline_ranges(lines, ranges);
    compile_lines(
        &mut tree,
        text,
        lines,
        escaped_len,
        style,
        disable_inline_styles,
    );
    tree
}

/// Length of the text with every line break counted as the two-character
/// escape `\n`. This inflated value is the root node's display length and
/// the sentinel "next range start" once a line's ranges are exhausted; all
/// containment invariants rely on per-line/per-range offsets instead.
fn escaped_text_length(text: &str) -> usize {
    text.len() + text.matches('\n').count()
}
