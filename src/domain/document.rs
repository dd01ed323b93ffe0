use serde::Deserialize;

/// The kind of a [`DocNode`].
///
/// Tracker document formats evolve independently of this tool, so the set
/// is deliberately open: any kind this tool does not recognise
/// deserializes to [`NodeKind::Other`] and renders as a pass-through of
/// its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// A leaf node carrying literal text.
    Text,
    /// A paragraph of inline content.
    Paragraph,
    /// An unordered list of list items.
    BulletList,
    /// A numbered list of list items.
    OrderedList,
    /// One entry of a bullet or ordered list.
    ListItem,
    /// A fenced block of preformatted text.
    CodeBlock,
    /// A heading with an optional level.
    Heading,
    /// Any kind this tool does not recognise.
    #[default]
    #[serde(other)]
    Other,
}

/// One node of a rich-text document tree.
///
/// Constructed once from a tracker's document payload and consumed
/// read-only by the renderer; never mutated. Every field is optional in
/// the payload, so a structurally odd document still deserializes; a
/// container with no children simply renders to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocNode {
    kind: NodeKind,
    text: Option<String>,
    children: Vec<DocNode>,
    heading_level: Option<u8>,
}

impl DocNode {
    /// A text leaf.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text,
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// A paragraph containing the given children.
    #[must_use]
    pub fn paragraph(children: Vec<Self>) -> Self {
        Self::container(NodeKind::Paragraph, children)
    }

    /// A bullet list containing the given children.
    #[must_use]
    pub fn bullet_list(children: Vec<Self>) -> Self {
        Self::container(NodeKind::BulletList, children)
    }

    /// An ordered list containing the given children.
    #[must_use]
    pub fn ordered_list(children: Vec<Self>) -> Self {
        Self::container(NodeKind::OrderedList, children)
    }

    /// A list item containing the given children.
    #[must_use]
    pub fn list_item(children: Vec<Self>) -> Self {
        Self::container(NodeKind::ListItem, children)
    }

    /// A code block containing the given children.
    #[must_use]
    pub fn code_block(children: Vec<Self>) -> Self {
        Self::container(NodeKind::CodeBlock, children)
    }

    /// A heading of the given level.
    #[must_use]
    pub fn heading(level: u8, children: Vec<Self>) -> Self {
        Self {
            kind: NodeKind::Heading,
            heading_level: Some(level),
            children,
            ..Self::default()
        }
    }

    /// A node of an unrecognised kind, rendered as a pass-through.
    #[must_use]
    pub fn other(children: Vec<Self>) -> Self {
        Self::container(NodeKind::Other, children)
    }

    fn container(kind: NodeKind, children: Vec<Self>) -> Self {
        Self {
            kind,
            children,
            ..Self::default()
        }
    }

    /// The kind of this node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The literal text of this node, present only on text leaves.
    #[must_use]
    pub fn node_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// The ordered children of this node.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// The heading level, present only on heading nodes.
    #[must_use]
    pub const fn heading_level(&self) -> Option<u8> {
        self.heading_level
    }
}
