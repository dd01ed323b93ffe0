//! Domain models for work items and their acceptance criteria.
//!
//! This module contains the core domain types: the rich-text document
//! tree delivered by a tracker, work-item keys, extracted criteria, and
//! configuration.

mod config;
pub use config::{Config, DEFAULT_CUE_WORDS};

/// Acceptance-criterion types and identifier allocation.
pub mod criterion;
pub use criterion::{Criterion, CriterionStatus, IdAllocator};

/// Rich-text document tree as delivered by a tracker.
pub mod document;
pub use document::{DocNode, NodeKind};

/// Work-item key types and parsing.
pub mod key;
pub use key::{Error as KeyError, ItemKey};

mod work_item;
pub use work_item::WorkItem;
