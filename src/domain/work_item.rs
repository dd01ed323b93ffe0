use serde::Deserialize;

use crate::domain::{DocNode, ItemKey};

/// A work item as exported from the source tracker.
///
/// The payload carries the item's key, a title, an optional rich-text
/// description, and an optional flat list of criterion strings stored
/// separately from the description. Only `key` is required; everything
/// else defaults so that a sparse export still loads.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkItem {
    key: ItemKey,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<DocNode>,
    #[serde(default)]
    criteria: Vec<String>,
}

impl WorkItem {
    /// Creates a work item from its parts.
    #[must_use]
    pub const fn new(
        key: ItemKey,
        title: String,
        description: Option<DocNode>,
        criteria: Vec<String>,
    ) -> Self {
        Self {
            key,
            title,
            description,
            criteria,
        }
    }

    /// The tracker key of this item.
    #[must_use]
    pub const fn key(&self) -> &ItemKey {
        &self.key
    }

    /// The item title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The rich-text description, if the item has one.
    #[must_use]
    pub const fn description(&self) -> Option<&DocNode> {
        self.description.as_ref()
    }

    /// The explicitly stored criterion strings, if the item has any.
    #[must_use]
    pub fn criteria(&self) -> &[String] {
        &self.criteria
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_full_payload() {
        let payload = r#"{
            "key": "PROJ-123",
            "title": "Login flow",
            "description": {
                "kind": "paragraph",
                "children": [{ "kind": "text", "text": "GIVEN a user" }]
            },
            "criteria": ["Users can log in"]
        }"#;

        let item: WorkItem = serde_json::from_str(payload).unwrap();
        assert_eq!(item.key().to_string(), "PROJ-123");
        assert_eq!(item.title(), "Login flow");
        assert!(item.description().is_some());
        assert_eq!(item.criteria(), &["Users can log in".to_string()]);
    }

    #[test]
    fn sparse_payload_defaults() {
        let item: WorkItem = serde_json::from_str(r#"{ "key": "PROJ-1" }"#).unwrap();
        assert_eq!(item.title(), "");
        assert!(item.description().is_none());
        assert!(item.criteria().is_empty());
    }

    #[test]
    fn invalid_key_is_rejected() {
        let result = serde_json::from_str::<WorkItem>(r#"{ "key": "not a key" }"#);
        assert!(result.is_err());
    }
}
