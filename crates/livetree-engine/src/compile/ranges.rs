use serde::{Deserialize, Serialize};

/// The closed set of node kinds appearing in a compiled tree.
///
/// Most variants come from the upstream range detector. `Line`, `Syntax`,
/// `Text` and `Br` are structural: the compiler emits them itself and the
/// detector never produces `Line`, `Text` or `Br`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatKind {
    Line,
    Syntax,
    Bold,
    Italic,
    Strikethrough,
    Emoji,
    MentionHere,
    MentionUser,
    MentionReport,
    Link,
    Code,
    Pre,
    Blockquote,
    H1,
    InlineImage,
    Text,
    Br,
}

impl FormatKind {
    /// Wire/display name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            FormatKind::Line => "line",
            FormatKind::Syntax => "syntax",
            FormatKind::Bold => "bold",
            FormatKind::Italic => "italic",
            FormatKind::Strikethrough => "strikethrough",
            FormatKind::Emoji => "emoji",
            FormatKind::MentionHere => "mention-here",
            FormatKind::MentionUser => "mention-user",
            FormatKind::MentionReport => "mention-report",
            FormatKind::Link => "link",
            FormatKind::Code => "code",
            FormatKind::Pre => "pre",
            FormatKind::Blockquote => "blockquote",
            FormatKind::H1 => "h1",
            FormatKind::InlineImage => "inline-image",
            FormatKind::Text => "text",
            FormatKind::Br => "br",
        }
    }

    /// True for kinds the compiler emits itself rather than the detector.
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            FormatKind::Line | FormatKind::Syntax | FormatKind::Text | FormatKind::Br
        )
    }
}

/// A detected markdown span over the *original* text.
///
/// `start` and `length` are byte offsets into the full input, never re-based
/// to a line. The detector contract requires offsets on UTF-8 boundaries and
/// ranges sorted by `start`.
///
/// `depth`, when present and greater than zero, is a grouped encoding: the
/// same range detected that many independent times (nested blockquotes use
/// this). [`normalize_ranges`] flattens the grouping and strips the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownRange {
    #[serde(rename = "type")]
    pub kind: FormatKind,
    pub start: usize,
    pub length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
}

impl MarkdownRange {
    pub fn new(kind: FormatKind, start: usize, length: usize) -> Self {
        Self {
            kind,
            start,
            length,
            depth: None,
        }
    }

    /// Exclusive end offset.
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Expands grouped ranges into a flat, ordered list.
///
/// A range with `depth = d > 0` is replaced by `d` adjacent identical copies;
/// ranges without `depth` (or with `depth = 0`) pass through unchanged in
/// count. Relative order between distinct input ranges is preserved, offsets
/// are untouched, and no output range carries `depth`.
pub fn normalize_ranges(ranges: &[MarkdownRange]) -> Vec<MarkdownRange> {
    let mut out = Vec::with_capacity(ranges.len());
    for range in ranges {
        let flat = MarkdownRange {
            depth: None,
            ..range.clone()
        };
        match range.depth {
            None | Some(0) => out.push(flat),
            Some(depth) => {
                for _ in 0..depth {
                    out.push(flat.clone());
                }
            }
        }
    }
    out
}
