//! Inline image preview contract.
//!
//! The metrics probe is the one asynchronous boundary in the system: it is
//! fire-and-forget, resolves on a later turn, and applies its result through
//! a stable order-index lookup. A stale lookup (the node was re-rendered
//! away) or a load failure yields no visual update — never a fault.

use crate::compile::ranges::{FormatKind, MarkdownRange};
use crate::compile::tree::{NodeId, Tree};

pub const MAX_PREVIEW_WIDTH: u32 = 200;
pub const MAX_PREVIEW_HEIGHT: u32 = 200;

/// Intrinsic dimensions reported by the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Resolved preview layout for an inline image.
///
/// Exactly one of `width`/`height` is pinned (the other axis scales);
/// `padding_bottom` reserves the scaled display height beneath the line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewBox {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub padding_bottom: f32,
}

/// Computes the preview box for an image with the given intrinsic size.
///
/// Landscape images pin the width (capped at [`MAX_PREVIEW_WIDTH`]) and
/// reserve the proportionally scaled height; portrait and square images pin
/// the height (capped at [`MAX_PREVIEW_HEIGHT`]).
pub fn preview_box(natural_width: u32, natural_height: u32) -> PreviewBox {
    if natural_width > natural_height {
        let width = MAX_PREVIEW_WIDTH.min(natural_width);
        let padding = width as f32 / natural_width as f32 * natural_height as f32;
        PreviewBox {
            width: Some(width),
            height: None,
            padding_bottom: padding,
        }
    } else {
        let height = MAX_PREVIEW_HEIGHT.min(natural_height);
        PreviewBox {
            width: None,
            height: Some(height),
            padding_bottom: height as f32,
        }
    }
}

/// Extracts the image URL: the text of the first `Link` range.
pub fn image_href<'a>(text: &'a str, ranges: &[MarkdownRange]) -> Option<&'a str> {
    let link = ranges.iter().find(|r| r.kind == FormatKind::Link)?;
    text.get(link.start..link.end())
}

/// True for kinds rendered as block-level structures.
pub fn is_block_kind(kind: FormatKind) -> bool {
    matches!(kind, FormatKind::InlineImage)
}

/// First block-level range in a detector result, if any.
pub fn first_block_range(ranges: &[MarkdownRange]) -> Option<&MarkdownRange> {
    ranges.iter().find(|r| is_block_kind(r.kind))
}

/// Asynchronous image-metrics source.
///
/// Implementations resolve later, on their own turn; there is no
/// cancellation and no ordering guarantee between concurrent probes.
/// `None` signals a load failure.
pub trait ImageMetricsProbe {
    fn fetch(&self, url: &str, on_loaded: Box<dyn FnOnce(Option<ImageSize>) + Send>);
}

/// Resolves a completed probe against the currently rendered tree.
///
/// Returns the node to decorate and its preview box, or `None` when the
/// probe failed or the order index no longer resolves (a stale lookup after
/// a subsequent re-render) — both are silently skipped, last-resolved-wins.
pub fn resolve_preview(
    tree: &Tree,
    order_index: &str,
    size: Option<ImageSize>,
) -> Option<(NodeId, PreviewBox)> {
    let size = size?;
    let id = tree.find_by_order_index(order_index)?;
    Some((id, preview_box(size.width, size.height)))
}
