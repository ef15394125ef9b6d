use super::ranges::FormatKind;
use super::tree::Tree;

/// Validates compiler output invariants.
///
/// Asserts that:
/// - every non-root node's interval lies within its parent's interval
///   (containment is not checked against the root, whose length is a
///   display bound only)
/// - sibling intervals are disjoint and appear in non-decreasing start order
/// - parent/child back-references are mutually consistent
/// - `Text` leaves carry content whose byte length equals their interval
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(tree: &Tree) {
    let root = tree.root();
    for id in tree.ids() {
        let node = tree.node(id);
        let mut prev_end: Option<usize> = None;
        for &child_id in &node.children {
            let child = tree.node(child_id);
            assert_eq!(
                child.parent,
                Some(id),
                "child {:?} does not point back to its parent",
                child.order_index
            );
            if id != root {
                assert!(
                    node.start <= child.start && child.end() <= node.end(),
                    "node {} [{},{}) straddles parent [{},{})",
                    child.order_index,
                    child.start,
                    child.end(),
                    node.start,
                    node.end()
                );
            }
            if let Some(prev_end) = prev_end {
                assert!(
                    child.start >= prev_end,
                    "sibling {} [{},{}) overlaps previous sibling ending at {}",
                    child.order_index,
                    child.start,
                    child.end(),
                    prev_end
                );
            }
            prev_end = Some(child.end());
        }

        if node.kind == FormatKind::Text
            && let Some(text) = &node.text
        {
            assert_eq!(
                text.len(),
                node.length,
                "text leaf {} content length mismatch",
                node.order_index
            );
        }
    }
}

/// Rebuilds the source text from the tree's leaves.
///
/// Within a line node, `Text` leaves contribute their content and `Br`
/// leaves a separator; an empty line (interval claimed by its synthetic
/// break) contributes nothing. Line reconstructions joined with `'\n'`
/// must reproduce the compiled text exactly — the coverage property.
pub fn reconstruct_text(tree: &Tree) -> String {
    let root = tree.root();
    let mut lines = Vec::new();
    for &line_id in &tree.node(root).children {
        let line = tree.node(line_id);
        if line.kind != FormatKind::Line {
            continue;
        }
        let mut text = String::new();
        // a lone Br directly under a line is the synthetic empty-line break,
        // not a literal separator
        if !is_lone_break(tree, line_id) {
            collect_leaves(tree, line_id, &mut text);
        }
        lines.push(text);
    }
    lines.join("\n")
}

fn is_lone_break(tree: &Tree, line_id: super::tree::NodeId) -> bool {
    let children = &tree.node(line_id).children;
    children.len() == 1 && tree.node(children[0]).kind == FormatKind::Br
}

fn collect_leaves(tree: &Tree, id: super::tree::NodeId, out: &mut String) {
    let node = tree.node(id);
    match node.kind {
        FormatKind::Text => {
            if let Some(text) = &node.text {
                out.push_str(text);
            }
        }
        FormatKind::Br => out.push('\n'),
        _ => {
            for &child in &node.children {
                collect_leaves(tree, child, out);
            }
        }
    }
}
