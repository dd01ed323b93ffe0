//! Filesystem storage for extraction results.
//!
//! Checklists are markdown documents with YAML frontmatter, written next
//! to the work-item payloads they were extracted from.

/// Markdown serialization for checklists.
pub mod checklist;
mod workspace;

pub use checklist::{Checklist, LoadError, source_fingerprint};
pub use workspace::{
    Extraction, ExtractionError, Freshness, META_DIR, Workspace, WriteChecklistsError,
};
