use super::ranges::FormatKind;
use crate::style::StyleRecord;

/// Index of a node inside its [`Tree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A visual node of the compiled tree.
///
/// `start`/`length` are byte offsets into the original text. For every node
/// below the root, `parent.start <= start` and `start + length <=
/// parent.start + parent.length`; sibling intervals are disjoint and ordered
/// by `start`. The root's own length is a display bound only (line breaks
/// are counted escaped) and carries no containment guarantee.
///
/// An empty line claims interval length 1 for the `Br` leaf it always
/// renders, so containment holds for that leaf too.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: FormatKind,
    pub start: usize,
    pub length: usize,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Dotted child path from the root (`"0"`, `"0.2.1"`, ...): the stable
    /// identifier the image-metrics probe uses to find a rendered node
    /// after the fact.
    pub order_index: String,
    /// Resolved structural style, absent for undecorated nodes.
    pub style: Option<StyleRecord>,
    /// Literal content, present on `Text` leaves only.
    pub text: Option<String>,
}

impl Node {
    /// Exclusive end offset.
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Arena-backed node tree produced by the compiler.
///
/// Nodes are owned by a flat vector and addressed by [`NodeId`]; parent
/// back-references are plain indices, so walking up the ancestor chain is
/// the compiler's implicit open-interval stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Creates a tree holding only the root node (kind `Text`, start 0).
    pub fn new(root_length: usize) -> Self {
        Self {
            nodes: vec![Node {
                kind: FormatKind::Text,
                start: 0,
                length: root_length,
                parent: None,
                children: Vec::new(),
                order_index: String::new(),
                style: None,
                text: None,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// All node ids in creation order (root first).
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Appends a new child node under `parent` and returns its id.
    pub fn append_child(
        &mut self,
        parent: NodeId,
        kind: FormatKind,
        start: usize,
        length: usize,
    ) -> NodeId {
        let order_index = {
            let p = self.node(parent);
            let slot = p.children.len();
            if p.order_index.is_empty() {
                slot.to_string()
            } else {
                format!("{}.{}", p.order_index, slot)
            }
        };
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            start,
            length,
            parent: Some(parent),
            children: Vec::new(),
            order_index,
            style: None,
            text: None,
        });
        self.node_mut(parent).children.push(id);
        id
    }

    /// Looks a node up by its stable order index. Returns `None` when the
    /// path no longer exists (a stale lookup after a re-render).
    pub fn find_by_order_index(&self, order_index: &str) -> Option<NodeId> {
        if order_index.is_empty() {
            return Some(self.root());
        }
        let mut current = self.root();
        for part in order_index.split('.') {
            let slot: usize = part.parse().ok()?;
            current = *self.node(current).children.get(slot)?;
        }
        Some(current)
    }

    /// Serializes the tree into a deterministic comparable token.
    ///
    /// Two trees serialize equally iff they have the same shape, kinds,
    /// intervals and leaf content; the reconciliation driver diffs committed
    /// content by this token.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        self.serialize_into(self.root(), &mut out);
        out
    }

    fn serialize_into(&self, id: NodeId, out: &mut String) {
        let node = self.node(id);
        out.push_str(node.kind.as_str());
        out.push_str(&format!("[{},{}]", node.start, node.length));
        if let Some(text) = &node.text {
            out.push('"');
            for c in text.chars() {
                if c == '"' || c == '\\' {
                    out.push('\\');
                }
                out.push(c);
            }
            out.push('"');
        }
        if !node.children.is_empty() {
            out.push('{');
            for (i, &child) in node.children.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                self.serialize_into(child, out);
            }
            out.push('}');
        }
    }
}
