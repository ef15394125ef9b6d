//! Reconciliation driver: orchestrates detection, compilation, content
//! diffing and caret re-placement against an abstract rendering surface.

use crate::compile::parse_ranges_to_tree;
use crate::compile::ranges::MarkdownRange;
use crate::compile::tree::Tree;
use crate::style::MarkdownStyle;

/// Upstream markdown classifier, consumed as a black box.
///
/// Returned ranges must be sorted by `start`; ranges may be nested (one
/// fully containing another) or disjoint, never partially overlapping
/// except via the grouped `depth` convention.
pub trait RangeDetector {
    fn detect(&self, text: &str) -> Vec<MarkdownRange>;
}

impl<F> RangeDetector for F
where
    F: Fn(&str) -> Vec<MarkdownRange>,
{
    fn detect(&self, text: &str) -> Vec<MarkdownRange> {
        self(text)
    }
}

/// When a rendering engine allows the caret to be re-placed relative to a
/// content commit. Some engines only accept caret moves after new content
/// is committed; others need the move applied unconditionally at the end of
/// every update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaretTiming {
    /// Re-place the caret immediately after a commit, and only then.
    #[default]
    OnCommit,
    /// Re-place the caret after every update, committed or not.
    AfterUpdate,
}

/// The rendered surface owning committed visual content.
///
/// The driver diffs by serialized token and replaces content only when it
/// changed; the surface's internal representation is its own business.
pub trait RenderSurface {
    /// Token of the currently committed content, if any.
    fn committed_token(&self) -> Option<&str>;
    /// Replaces the rendered content with a freshly compiled tree.
    fn commit(&mut self, tree: Tree, token: String);
    /// Empties the surface (the empty-text path).
    fn clear(&mut self);
    /// Engine-specific caret commit-ordering quirk.
    fn caret_timing(&self) -> CaretTiming {
        CaretTiming::default()
    }
}

/// Caret access on the rendered surface.
pub trait CursorProvider {
    fn is_focused(&self) -> bool;
    /// Current caret offset, `None` when unknown.
    fn cursor(&self) -> Option<usize>;
    fn set_cursor(&mut self, offset: usize);
    fn move_cursor_to_end(&mut self);
}

/// Result of one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Whether new content was committed (serialized content differed).
    pub committed: bool,
    /// The effective caret offset used for re-placement.
    pub cursor: usize,
}

/// Runs one full reconciliation turn for `text`.
///
/// Compiles the tree via the detector and [`parse_ranges_to_tree`], compares
/// its serialization against the committed content and commits only on
/// change. A `cursor_index` beyond the text length means "move to end", as
/// does `always_move_to_end`; an absent candidate falls back to the
/// surface's current caret when focused. Unfocused surfaces never receive
/// caret calls. Empty text clears the surface outright.
pub fn update_input_structure<S, D>(
    surface: &mut S,
    detector: &D,
    text: &str,
    cursor_index: Option<usize>,
    style: &MarkdownStyle,
    always_move_to_end: bool,
) -> UpdateOutcome
where
    S: RenderSurface + CursorProvider,
    D: RangeDetector + ?Sized,
{
    // beyond-the-end candidates degrade to "move the caret to the end"
    let mut cursor = cursor_index.filter(|&offset| offset <= text.len());
    let focused = surface.is_focused();
    if focused && cursor_index.is_none() {
        cursor = surface.cursor();
    }

    if text.is_empty() {
        surface.clear();
        return UpdateOutcome {
            committed: false,
            cursor: cursor.unwrap_or(0),
        };
    }

    let ranges = detector.detect(text);
    let tree = parse_ranges_to_tree(text, &ranges, style, false);
    let token = tree.serialize();

    let changed = surface.committed_token() != Some(token.as_str());
    if changed {
        surface.commit(tree, token);
        if surface.caret_timing() == CaretTiming::OnCommit {
            place_caret(surface, focused, always_move_to_end, cursor);
        }
    }
    if surface.caret_timing() == CaretTiming::AfterUpdate {
        place_caret(surface, focused, always_move_to_end, cursor);
    }

    UpdateOutcome {
        committed: changed,
        cursor: cursor.unwrap_or(0),
    }
}

fn place_caret<S: CursorProvider>(
    surface: &mut S,
    focused: bool,
    always_move_to_end: bool,
    cursor: Option<usize>,
) {
    if !focused {
        return;
    }
    match cursor {
        Some(offset) if !always_move_to_end => surface.set_cursor(offset),
        _ => surface.move_cursor_to_end(),
    }
}
