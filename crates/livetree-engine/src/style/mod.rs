pub mod sheet;

use serde::{Deserialize, Serialize};

use crate::compile::ranges::FormatKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Display {
    Block,
    Inline,
    InlineBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontStyle {
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextDecoration {
    None,
    Underline,
    LineThrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerticalAlign {
    Baseline,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BorderStyle {
    None,
    Solid,
}

/// A structured style record attached to decorated nodes.
///
/// Every field is optional; unset fields inherit from the surrounding
/// rendering context. Records combine by explicit overlay (see
/// [`StyleRecord::overlay`]) rather than ad hoc map merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StyleRecord {
    pub display: Option<Display>,
    pub font_weight: Option<FontWeight>,
    pub font_style: Option<FontStyle>,
    pub text_decoration: Option<TextDecoration>,
    pub vertical_align: Option<VerticalAlign>,
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub border_color: Option<String>,
    pub border_left_style: Option<BorderStyle>,
    pub border_radius: Option<f32>,
    pub padding: Option<f32>,
    pub margin: Option<f32>,
}

impl StyleRecord {
    /// Returns a copy of `self` with every field set in `over` taking
    /// precedence. The overlay order is fixed: base kind defaults, then
    /// kind-specific additions, then caller-supplied overrides.
    pub fn overlay(mut self, over: &StyleRecord) -> StyleRecord {
        if over.display.is_some() {
            self.display = over.display;
        }
        if over.font_weight.is_some() {
            self.font_weight = over.font_weight;
        }
        if over.font_style.is_some() {
            self.font_style = over.font_style;
        }
        if over.text_decoration.is_some() {
            self.text_decoration = over.text_decoration;
        }
        if over.vertical_align.is_some() {
            self.vertical_align = over.vertical_align;
        }
        if over.color.is_some() {
            self.color.clone_from(&over.color);
        }
        if over.background_color.is_some() {
            self.background_color.clone_from(&over.background_color);
        }
        if over.font_family.is_some() {
            self.font_family.clone_from(&over.font_family);
        }
        if over.font_size.is_some() {
            self.font_size = over.font_size;
        }
        if over.border_color.is_some() {
            self.border_color.clone_from(&over.border_color);
        }
        if over.border_left_style.is_some() {
            self.border_left_style = over.border_left_style;
        }
        if over.border_radius.is_some() {
            self.border_radius = over.border_radius;
        }
        if over.padding.is_some() {
            self.padding = over.padding;
        }
        if over.margin.is_some() {
            self.margin = over.margin;
        }
        self
    }
}

/// Caller-supplied style set: one record per detected kind.
///
/// `MarkdownStyle::default()` is the all-unset partial set; callers usually
/// start from [`MarkdownStyle::default_style`] or merge their overrides into
/// it with [`MarkdownStyle::merged_with_defaults`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MarkdownStyle {
    pub syntax: StyleRecord,
    pub emoji: StyleRecord,
    pub mention_here: StyleRecord,
    pub mention_user: StyleRecord,
    pub mention_report: StyleRecord,
    pub link: StyleRecord,
    pub code: StyleRecord,
    pub pre: StyleRecord,
    pub blockquote: StyleRecord,
    pub h1: StyleRecord,
}

impl MarkdownStyle {
    /// The built-in baseline style set.
    pub fn default_style() -> Self {
        let code_like = StyleRecord {
            font_family: Some("monospace".to_string()),
            color: Some("#0451a5".to_string()),
            background_color: Some("#f0f0f0".to_string()),
            ..StyleRecord::default()
        };
        Self {
            syntax: StyleRecord {
                color: Some("#969696".to_string()),
                ..StyleRecord::default()
            },
            emoji: StyleRecord {
                font_size: Some(19.0),
                ..StyleRecord::default()
            },
            mention_here: StyleRecord {
                color: Some("#006400".to_string()),
                background_color: Some("#b0ffb0".to_string()),
                ..StyleRecord::default()
            },
            mention_user: StyleRecord {
                color: Some("#0000ff".to_string()),
                background_color: Some("#b0b0ff".to_string()),
                ..StyleRecord::default()
            },
            mention_report: StyleRecord {
                color: Some("#0000ff".to_string()),
                background_color: Some("#b0b0ff".to_string()),
                ..StyleRecord::default()
            },
            link: StyleRecord {
                color: Some("#0000ee".to_string()),
                ..StyleRecord::default()
            },
            code: code_like.clone(),
            pre: StyleRecord {
                border_color: Some("#808080".to_string()),
                border_radius: Some(4.0),
                padding: Some(5.0),
                ..code_like
            },
            blockquote: StyleRecord {
                border_color: Some("#808080".to_string()),
                padding: Some(6.0),
                ..StyleRecord::default()
            },
            h1: StyleRecord {
                font_size: Some(25.0),
                ..StyleRecord::default()
            },
        }
    }

    /// Overlays caller `overrides` onto the baseline set, per kind.
    pub fn merged_with_defaults(overrides: &MarkdownStyle) -> Self {
        let base = Self::default_style();
        Self {
            syntax: base.syntax.overlay(&overrides.syntax),
            emoji: base.emoji.overlay(&overrides.emoji),
            mention_here: base.mention_here.overlay(&overrides.mention_here),
            mention_user: base.mention_user.overlay(&overrides.mention_user),
            mention_report: base.mention_report.overlay(&overrides.mention_report),
            link: base.link.overlay(&overrides.link),
            code: base.code.overlay(&overrides.code),
            pre: base.pre.overlay(&overrides.pre),
            blockquote: base.blockquote.overlay(&overrides.blockquote),
            h1: base.h1.overlay(&overrides.h1),
        }
    }
}

/// Resolves the structural style record for a node kind.
///
/// Precedence, lowest to highest: base structural defaults, kind-specific
/// additions (emoji centering, link underline, blockquote border, heading
/// weight), caller-supplied per-kind record. `Text` and `Br` leaves are
/// never decorated.
pub fn resolve_style(kind: FormatKind, style: &MarkdownStyle) -> Option<StyleRecord> {
    let record = match kind {
        FormatKind::Line => StyleRecord {
            display: Some(Display::Block),
            margin: Some(0.0),
            padding: Some(0.0),
            ..StyleRecord::default()
        },
        FormatKind::Syntax => style.syntax.clone(),
        FormatKind::Bold => StyleRecord {
            font_weight: Some(FontWeight::Bold),
            ..StyleRecord::default()
        },
        FormatKind::Italic => StyleRecord {
            font_style: Some(FontStyle::Italic),
            ..StyleRecord::default()
        },
        FormatKind::Strikethrough => StyleRecord {
            text_decoration: Some(TextDecoration::LineThrough),
            ..StyleRecord::default()
        },
        FormatKind::Emoji => StyleRecord {
            vertical_align: Some(VerticalAlign::Middle),
            ..StyleRecord::default()
        }
        .overlay(&style.emoji),
        FormatKind::MentionHere => style.mention_here.clone(),
        FormatKind::MentionUser => style.mention_user.clone(),
        FormatKind::MentionReport => style.mention_report.clone(),
        FormatKind::Link => StyleRecord {
            text_decoration: Some(TextDecoration::Underline),
            ..StyleRecord::default()
        }
        .overlay(&style.link),
        FormatKind::Code => style.code.clone(),
        FormatKind::Pre => style.pre.clone(),
        FormatKind::Blockquote => StyleRecord {
            display: Some(Display::InlineBlock),
            border_left_style: Some(BorderStyle::Solid),
            ..StyleRecord::default()
        }
        .overlay(&style.blockquote),
        FormatKind::H1 => StyleRecord {
            font_weight: Some(FontWeight::Bold),
            ..StyleRecord::default()
        }
        .overlay(&style.h1),
        FormatKind::InlineImage => StyleRecord {
            display: Some(Display::Block),
            ..StyleRecord::default()
        },
        FormatKind::Text | FormatKind::Br => return None,
    };
    Some(record)
}
