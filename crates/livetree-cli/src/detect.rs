//! A small regex-based markdown classifier for the playground.
//!
//! The engine treats the detector as a black box; this one covers enough of
//! the common grammar (headings, quotes, fenced code, emphasis, mentions,
//! links) to exercise every compilation path interactively.

use livetree_engine::{FormatKind, MarkdownRange};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static H1_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^# ").unwrap());
static QUOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(>+) ?").unwrap());
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*\n]+)\*").unwrap());
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_([^_\n]+)_").unwrap());
static STRIKE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~([^~\n]+)~").unwrap());
static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`\n]+)`").unwrap());
static MENTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@[[:word:]]+").unwrap());
// marker characters are excluded so a link can never straddle an emphasis span
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s*_~`]+").unwrap());

/// Classifies `text` into sorted, properly nested markdown ranges.
pub fn detect_ranges(text: &str) -> Vec<MarkdownRange> {
    let mut ranges = Vec::new();
    let raw_zones = detect_fences(text, &mut ranges);

    let mut offset = 0;
    for line in text.split('\n') {
        let line_start = offset;
        offset += line.len() + 1;
        if raw_zones.iter().any(|z| z.contains(&line_start)) {
            continue;
        }
        detect_line(line, line_start, &mut ranges);
    }

    // outermost first among ranges sharing a start
    ranges.sort_by(|a, b| a.start.cmp(&b.start).then(b.length.cmp(&a.length)));
    ranges
}

/// Finds ``` fenced blocks. Emits syntax ranges for both fences and one
/// `Pre` range covering everything between them (newlines included), and
/// returns the byte zones the line pass must leave untouched.
fn detect_fences(text: &str, ranges: &mut Vec<MarkdownRange>) -> Vec<Range<usize>> {
    let mut zones = Vec::new();
    let mut open: Option<usize> = None;

    let mut offset = 0;
    for line in text.split('\n') {
        let line_start = offset;
        offset += line.len() + 1;
        if line.trim_end() != "```" {
            continue;
        }
        match open.take() {
            None => open = Some(line_start),
            Some(fence_start) => {
                let open_end = fence_start + 3;
                ranges.push(MarkdownRange::new(FormatKind::Syntax, fence_start, 3));
                ranges.push(MarkdownRange::new(
                    FormatKind::Pre,
                    open_end,
                    line_start - open_end,
                ));
                ranges.push(MarkdownRange::new(FormatKind::Syntax, line_start, 3));
                zones.push(fence_start..line_start + 3);
            }
        }
    }
    zones
}

/// Line-level structure (heading, quote marker) followed by inline spans.
fn detect_line(line: &str, line_start: usize, ranges: &mut Vec<MarkdownRange>) {
    if let Some(m) = H1_RE.find(line) {
        ranges.push(MarkdownRange::new(FormatKind::Syntax, line_start, m.len()));
        let rest = line.len() - m.len();
        if rest > 0 {
            ranges.push(MarkdownRange::new(
                FormatKind::H1,
                line_start + m.len(),
                rest,
            ));
        }
        detect_inline(&line[m.len()..], line_start + m.len(), ranges);
        return;
    }

    if let Some(caps) = QUOTE_RE.captures(line) {
        let marker = caps.get(0).map_or(0, |m| m.len());
        let depth = caps.get(1).map_or(1, |m| m.len() as u32);
        ranges.push(MarkdownRange::new(FormatKind::Syntax, line_start, marker));
        let rest = line.len() - marker;
        if rest > 0 {
            ranges.push(MarkdownRange {
                kind: FormatKind::Blockquote,
                start: line_start + marker,
                length: rest,
                depth: (depth > 1).then_some(depth),
            });
        }
        detect_inline(&line[marker..], line_start + marker, ranges);
        return;
    }

    detect_inline(line, line_start, ranges);
}

/// Emphasis and code spans, scanned left to right so spans never partially
/// overlap; emphasis contents are re-scanned for nested spans.
fn detect_inline(text: &str, base: usize, ranges: &mut Vec<MarkdownRange>) {
    let spans: [(&Regex, FormatKind, bool); 4] = [
        (&BOLD_RE, FormatKind::Bold, true),
        (&ITALIC_RE, FormatKind::Italic, true),
        (&STRIKE_RE, FormatKind::Strikethrough, true),
        (&CODE_RE, FormatKind::Code, false),
    ];

    let mut at = 0;
    while at < text.len() {
        let rest = &text[at..];
        let mut earliest: Option<(usize, usize, FormatKind, bool)> = None;
        for &(re, kind, recurse) in &spans {
            if let Some(m) = re.find(rest) {
                let better = earliest.is_none_or(|(s, _, _, _)| m.start() < s);
                if better {
                    earliest = Some((m.start(), m.end(), kind, recurse));
                }
            }
        }
        let Some((from, to, kind, recurse)) = earliest else {
            break;
        };
        if from > 0 {
            detect_atoms(&rest[..from], base + at, ranges);
        }
        let start = base + at + from;
        ranges.push(MarkdownRange::new(FormatKind::Syntax, start, 1));
        ranges.push(MarkdownRange::new(kind, start + 1, to - from - 2));
        ranges.push(MarkdownRange::new(
            FormatKind::Syntax,
            base + at + to - 1,
            1,
        ));
        if recurse {
            detect_inline(&rest[from + 1..to - 1], start + 1, ranges);
        }
        at += to;
    }
    if at < text.len() {
        detect_atoms(&text[at..], base + at, ranges);
    }
}

/// Mentions and links: atomic spans scanned only over text no emphasis or
/// code span consumed, so nested occurrences are emitted exactly once (by
/// the recursion into the enclosing span).
fn detect_atoms(text: &str, base: usize, ranges: &mut Vec<MarkdownRange>) {
    for m in MENTION_RE.find_iter(text) {
        let kind = if m.as_str() == "@here" {
            FormatKind::MentionHere
        } else {
            FormatKind::MentionUser
        };
        ranges.push(MarkdownRange::new(kind, base + m.start(), m.len()));
    }
    for m in LINK_RE.find_iter(text) {
        ranges.push(MarkdownRange::new(FormatKind::Link, base + m.start(), m.len()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn range(kind: FormatKind, start: usize, length: usize) -> MarkdownRange {
        MarkdownRange::new(kind, start, length)
    }

    #[rstest]
    #[case("plain text", vec![])]
    #[case("# Title", vec![
        range(FormatKind::Syntax, 0, 2),
        range(FormatKind::H1, 2, 5),
    ])]
    #[case("*bold* here", vec![
        range(FormatKind::Syntax, 0, 1),
        range(FormatKind::Bold, 1, 4),
        range(FormatKind::Syntax, 5, 1),
    ])]
    #[case("ping @here now", vec![range(FormatKind::MentionHere, 5, 5)])]
    #[case("cc @sam", vec![range(FormatKind::MentionUser, 3, 4)])]
    #[case("see https://example.com ok", vec![range(FormatKind::Link, 4, 19)])]
    fn single_line_shapes(#[case] text: &str, #[case] expected: Vec<MarkdownRange>) {
        assert_eq!(detect_ranges(text), expected);
    }

    #[test]
    fn quote_marker_splits_into_syntax_and_content() {
        let ranges = detect_ranges("> quoted");
        assert_eq!(
            ranges,
            vec![
                range(FormatKind::Syntax, 0, 2),
                range(FormatKind::Blockquote, 2, 6),
            ]
        );
        assert_eq!(ranges[1].depth, None);
    }

    #[test]
    fn nested_quote_carries_depth() {
        let ranges = detect_ranges(">> deep");
        assert_eq!(ranges[0], range(FormatKind::Syntax, 0, 3));
        assert_eq!(ranges[1].kind, FormatKind::Blockquote);
        assert_eq!(ranges[1].depth, Some(2));
    }

    #[test]
    fn emphasis_nests_recursively() {
        // "*a _b_*" -> bold over "a _b_", italic inside it
        let ranges = detect_ranges("*a _b_*");
        assert_eq!(
            ranges,
            vec![
                range(FormatKind::Syntax, 0, 1),
                range(FormatKind::Bold, 1, 5),
                range(FormatKind::Syntax, 3, 1),
                range(FormatKind::Italic, 4, 1),
                range(FormatKind::Syntax, 5, 1),
                range(FormatKind::Syntax, 6, 1),
            ]
        );
    }

    #[test]
    fn code_span_contents_are_not_rescanned() {
        let ranges = detect_ranges("`*x*`");
        assert_eq!(
            ranges,
            vec![
                range(FormatKind::Syntax, 0, 1),
                range(FormatKind::Code, 1, 3),
                range(FormatKind::Syntax, 4, 1),
            ]
        );
    }

    #[test]
    fn fenced_block_spans_lines_and_masks_contents() {
        let text = "pre\n```\n*raw*\n```";
        let ranges = detect_ranges(text);
        assert_eq!(
            ranges,
            vec![
                range(FormatKind::Syntax, 4, 3),
                range(FormatKind::Pre, 7, 7),
                range(FormatKind::Syntax, 14, 3),
            ]
        );
    }

    #[test]
    fn unclosed_fence_is_ignored() {
        let ranges = detect_ranges("```\n*bold*");
        assert_eq!(
            ranges,
            vec![
                range(FormatKind::Syntax, 4, 1),
                range(FormatKind::Bold, 5, 4),
                range(FormatKind::Syntax, 9, 1),
            ]
        );
    }

    #[test]
    fn mention_inside_emphasis_is_emitted_once() {
        let ranges = detect_ranges("*@here*");
        let mentions: Vec<_> = ranges
            .iter()
            .filter(|r| r.kind == FormatKind::MentionHere)
            .collect();
        assert_eq!(mentions.len(), 1);
        assert_eq!((mentions[0].start, mentions[0].length), (1, 5));
    }

    #[test]
    fn output_is_sorted_outermost_first() {
        let ranges = detect_ranges("x *b* y\n> q");
        let mut sorted = ranges.clone();
        sorted.sort_by(|a, b| a.start.cmp(&b.start).then(b.length.cmp(&a.length)));
        assert_eq!(ranges, sorted);
    }
}
