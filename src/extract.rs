//! Criteria extraction strategies and the pipeline composing them.
//!
//! Three independent strategies share one [`Strategy`] contract:
//!
//! - [`gwt::GwtExtractor`] detects Given/When/Then paragraphs in rendered
//!   text and derives test-case hints from the full matches,
//! - [`explicit::ExplicitExtractor`] wraps a flat criterion list stored
//!   on the work item itself,
//! - [`heuristic::HeuristicExtractor`] falls back to scanning free text
//!   line by line for bullet markers and modal cue words.
//!
//! [`Pipeline`] applies them in a fixed priority order; see
//! [`pipeline::Pipeline::run`] for the exact policy.

/// Wrapping of explicitly stored criterion lists.
pub mod explicit;
/// Given/When/Then block detection.
pub mod gwt;
/// Fallback line-by-line scanning of free text.
pub mod heuristic;
/// Strategy composition and the public extraction entry point.
pub mod pipeline;

pub use pipeline::{Pipeline, extract_criteria};

use crate::domain::{Criterion, ItemKey};

/// The input to one extraction run: the plain-text rendering of a work
/// item's description, the item's explicitly stored criterion strings
/// (possibly none), and the item key used to namespace explicit
/// identifiers.
#[derive(Debug, Clone)]
pub struct ExtractionInput {
    text: String,
    explicit: Vec<String>,
    key: ItemKey,
}

impl ExtractionInput {
    /// An input with rendered description text and no explicit list.
    #[must_use]
    pub const fn new(text: String, key: ItemKey) -> Self {
        Self {
            text,
            explicit: Vec::new(),
            key,
        }
    }

    /// Attaches an explicitly stored criterion list.
    #[must_use]
    pub fn with_explicit(mut self, explicit: Vec<String>) -> Self {
        self.explicit = explicit;
        self
    }

    /// The rendered description text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The explicitly stored criterion strings.
    #[must_use]
    pub fn explicit(&self) -> &[String] {
        &self.explicit
    }

    /// The work-item key.
    #[must_use]
    pub const fn key(&self) -> &ItemKey {
        &self.key
    }
}

/// A single extraction strategy.
///
/// Every strategy is pure: it allocates a fresh identifier counter per
/// invocation, reads only the parts of the input it cares about, and can
/// never fail: inputs with nothing to extract yield an empty sequence.
pub trait Strategy {
    /// Extracts criteria from the input.
    fn extract(&self, input: &ExtractionInput) -> Vec<Criterion>;
}
