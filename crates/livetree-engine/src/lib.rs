pub mod compile;
pub mod images;
pub mod reconcile;
pub mod style;

// Re-export key types for easier usage
pub use compile::lines::Paragraph;
pub use compile::ranges::{FormatKind, MarkdownRange, normalize_ranges};
pub use compile::tree::{Node, NodeId, Tree};
pub use compile::{parse_ranges_to_tree, split_text_into_lines};
pub use reconcile::{
    CaretTiming, CursorProvider, RangeDetector, RenderSurface, UpdateOutcome,
    update_input_structure,
};
pub use style::{MarkdownStyle, StyleRecord, resolve_style};
