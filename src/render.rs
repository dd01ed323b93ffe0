//! Rendering of rich-text document trees to normalized plain text.
//!
//! The renderer is a pure function of its input: headings, lists, code
//! blocks and paragraph spacing are reproduced with deterministic rules
//! so that the extraction stage downstream sees the same text for the
//! same tree, every time. Structurally odd input degrades to empty
//! output rather than failing.

use crate::domain::{DocNode, NodeKind};

/// The default recursion cap when rendering.
///
/// Realistic documents nest a handful of levels deep; the cap exists so
/// a pathological payload cannot blow the stack.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Renders a document tree to plain text with the default depth cap.
///
/// The result is trimmed of leading and trailing whitespace.
#[must_use]
pub fn render(root: &DocNode) -> String {
    render_with_depth(root, DEFAULT_MAX_DEPTH)
}

/// Renders a document tree to plain text, recursing at most `max_depth`
/// levels. Content nested deeper than the cap is dropped.
#[must_use]
pub fn render_with_depth(root: &DocNode, max_depth: usize) -> String {
    let mut out = String::new();
    render_node(root, &mut out, 0, max_depth);
    out.trim().to_string()
}

fn render_node(node: &DocNode, out: &mut String, depth: usize, max_depth: usize) {
    if depth >= max_depth {
        tracing::debug!("document nesting exceeds depth cap {max_depth}, dropping subtree");
        return;
    }

    match node.kind() {
        NodeKind::Text => {
            if let Some(text) = node.node_text() {
                out.push_str(text);
            }
        }
        NodeKind::Paragraph => {
            render_children(node, out, depth, max_depth);
            out.push_str("\n\n");
        }
        NodeKind::BulletList | NodeKind::OrderedList => {
            for item in node.children() {
                out.push_str("- ");
                // A well-formed list holds list items, whose content is
                // inlined after the marker; anything else is rendered in
                // place so a sloppy payload still produces its text.
                if item.kind() == NodeKind::ListItem {
                    render_children(item, out, depth + 1, max_depth);
                } else {
                    render_node(item, out, depth + 1, max_depth);
                }
                out.push('\n');
            }
            out.push('\n');
        }
        NodeKind::CodeBlock => {
            out.push_str("```\n");
            render_children(node, out, depth, max_depth);
            out.push_str("\n```\n\n");
        }
        NodeKind::Heading => {
            let level = usize::from(node.heading_level().unwrap_or(1).clamp(1, 6));
            for _ in 0..level {
                out.push('#');
            }
            out.push(' ');
            render_children(node, out, depth, max_depth);
            out.push_str("\n\n");
        }
        // A bare list item outside a list, and unrecognised kinds, pass
        // their children through without added separators.
        NodeKind::ListItem | NodeKind::Other => {
            render_children(node, out, depth, max_depth);
        }
    }
}

fn render_children(node: &DocNode, out: &mut String, depth: usize, max_depth: usize) {
    for child in node.children() {
        render_node(child, out, depth + 1, max_depth);
    }
}
