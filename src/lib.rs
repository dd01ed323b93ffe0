//! Acceptance-criteria extraction from rich-text work items.
//!
//! Work items exported from a tracker carry a rich-text description and
//! sometimes a separately stored list of criterion strings. This crate
//! renders the description to normalized plain text, extracts discrete,
//! testable acceptance criteria from it with layered heuristics, and
//! stores the result as markdown checklists.

pub mod domain;
pub use domain::{Config, Criterion, CriterionStatus, DocNode, ItemKey, NodeKind, WorkItem};

/// Rendering of document trees to plain text.
pub mod render;

/// Extraction strategies and the pipeline composing them.
pub mod extract;
pub use extract::{ExtractionInput, Pipeline, extract_criteria};

/// Filesystem storage for checklists and workspace batch runs.
pub mod storage;
pub use storage::{Checklist, Workspace};
