//! The terminal-backed rendering surface the reconciliation driver writes to.

use livetree_engine::{CaretTiming, CursorProvider, RenderSurface, Tree};

/// Holds the last committed tree plus its serialized token for diffing.
///
/// The driver asks the surface to "move the caret to the end" without
/// knowing the text length, so the app records it before each update.
pub struct TerminalSurface {
    tree: Option<Tree>,
    token: Option<String>,
    cursor: Option<usize>,
    text_len: usize,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self {
            tree: None,
            token: None,
            cursor: None,
            text_len: 0,
        }
    }

    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    pub fn begin_update(&mut self, text_len: usize) {
        self.text_len = text_len;
    }
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSurface for TerminalSurface {
    fn committed_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn commit(&mut self, tree: Tree, token: String) {
        log::debug!("committing tree with {} nodes", tree.node_count());
        self.tree = Some(tree);
        self.token = Some(token);
    }

    fn clear(&mut self) {
        self.tree = None;
        self.token = None;
    }

    fn caret_timing(&self) -> CaretTiming {
        CaretTiming::OnCommit
    }
}

impl CursorProvider for TerminalSurface {
    fn is_focused(&self) -> bool {
        // the TUI has exactly one input and it always owns the caret
        true
    }

    fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    fn set_cursor(&mut self, offset: usize) {
        self.cursor = Some(offset);
    }

    fn move_cursor_to_end(&mut self) {
        self.cursor = Some(self.text_len);
    }
}
