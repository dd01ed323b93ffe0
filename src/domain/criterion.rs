use std::fmt;

use serde::Serialize;

use crate::domain::ItemKey;

/// The progress state of an acceptance criterion.
///
/// The extraction pipeline always creates criteria as
/// [`CriterionStatus::Pending`]; the other states are set by whoever
/// works the checklist afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CriterionStatus {
    /// Not yet started.
    #[default]
    Pending,
    /// Being worked on.
    InProgress,
    /// Done.
    Completed,
}

impl CriterionStatus {
    /// The checkbox symbol used in checklist markdown.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Pending => ' ',
            Self::InProgress => '~',
            Self::Completed => 'x',
        }
    }

    /// Parses a checkbox symbol back into a status.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            ' ' => Some(Self::Pending),
            '~' => Some(Self::InProgress),
            'x' | 'X' => Some(Self::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for CriterionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in-progress"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// A single structured acceptance requirement.
///
/// Created by exactly one extraction strategy and immutable thereafter.
/// The requirement text is always trimmed and non-empty, with any leading
/// bullet or numbering markers already stripped. The constructors
/// enforce this, returning `None` rather than producing an empty record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    id: String,
    criterion: String,
    status: CriterionStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    test_cases: Vec<String>,
}

impl Criterion {
    /// Creates a pending criterion with no derived test cases.
    ///
    /// Returns `None` if `text` is empty after trimming.
    #[must_use]
    pub fn new(id: String, text: &str) -> Option<Self> {
        Self::with_test_cases(id, text, Vec::new())
    }

    /// Creates a pending criterion with derived test-case hints.
    ///
    /// Returns `None` if `text` is empty after trimming.
    #[must_use]
    pub fn with_test_cases(id: String, text: &str, test_cases: Vec<String>) -> Option<Self> {
        Self::restore(id, text, CriterionStatus::default(), test_cases)
    }

    /// Reconstructs a criterion in an arbitrary status, as read back from
    /// a stored checklist.
    ///
    /// Returns `None` if `text` is empty after trimming.
    #[must_use]
    pub fn restore(
        id: String,
        text: &str,
        status: CriterionStatus,
        test_cases: Vec<String>,
    ) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        Some(Self {
            id,
            criterion: trimmed.to_string(),
            status,
            test_cases,
        })
    }

    /// The identifier, unique within one extraction run.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The normalized requirement statement.
    #[must_use]
    pub fn criterion(&self) -> &str {
        &self.criterion
    }

    /// The progress state.
    #[must_use]
    pub const fn status(&self) -> CriterionStatus {
        self.status
    }

    /// Derived test-case hints, present only on criteria produced from a
    /// full Given/When/Then match.
    #[must_use]
    pub fn test_cases(&self) -> &[String] {
        &self.test_cases
    }
}

/// Allocates stable, ordered criterion identifiers within one extraction
/// run.
///
/// Each strategy constructs its own allocator per invocation, so counters
/// are never shared between strategies or between runs.
#[derive(Debug)]
pub struct IdAllocator {
    key: Option<ItemKey>,
    next: usize,
}

impl IdAllocator {
    /// An allocator producing unprefixed identifiers: `AC-1`, `AC-2`, ...
    #[must_use]
    pub const fn local() -> Self {
        Self { key: None, next: 0 }
    }

    /// An allocator producing identifiers namespaced by a work-item key:
    /// `PROJ-123-AC-1`, `PROJ-123-AC-2`, ...
    #[must_use]
    pub const fn scoped(key: ItemKey) -> Self {
        Self {
            key: Some(key),
            next: 0,
        }
    }

    /// Returns the next identifier in sequence.
    pub fn next_id(&mut self) -> String {
        self.next += 1;
        match &self.key {
            Some(key) => format!("{key}-AC-{}", self.next),
            None => format!("AC-{}", self.next),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_text() {
        let criterion = Criterion::new("AC-1".to_string(), "  must log in  ").unwrap();
        assert_eq!(criterion.criterion(), "must log in");
        assert_eq!(criterion.status(), CriterionStatus::Pending);
        assert!(criterion.test_cases().is_empty());
    }

    #[test]
    fn empty_text_yields_none() {
        assert!(Criterion::new("AC-1".to_string(), "   ").is_none());
    }

    #[test]
    fn local_allocator_sequence() {
        let mut ids = IdAllocator::local();
        assert_eq!(ids.next_id(), "AC-1");
        assert_eq!(ids.next_id(), "AC-2");
        assert_eq!(ids.next_id(), "AC-3");
    }

    #[test]
    fn scoped_allocator_prefixes_with_key() {
        let mut ids = IdAllocator::scoped("PROJ-123".parse().unwrap());
        assert_eq!(ids.next_id(), "PROJ-123-AC-1");
        assert_eq!(ids.next_id(), "PROJ-123-AC-2");
    }

    #[test]
    fn fresh_allocators_are_independent() {
        let mut first = IdAllocator::local();
        first.next_id();
        first.next_id();

        let mut second = IdAllocator::local();
        assert_eq!(second.next_id(), "AC-1");
    }

    #[test]
    fn status_symbol_roundtrip() {
        for status in [
            CriterionStatus::Pending,
            CriterionStatus::InProgress,
            CriterionStatus::Completed,
        ] {
            assert_eq!(CriterionStatus::from_symbol(status.symbol()), Some(status));
        }
        assert_eq!(CriterionStatus::from_symbol('?'), None);
    }

    #[test]
    fn serializes_to_camel_case() {
        let criterion = Criterion::with_test_cases(
            "AC-1".to_string(),
            "GIVEN a\nWHEN b\nTHEN c",
            vec!["Test: b".to_string(), "Expected: c".to_string()],
        )
        .unwrap();

        let json = serde_json::to_value(&criterion).unwrap();
        assert_eq!(json["id"], "AC-1");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["testCases"][0], "Test: b");
    }
}
