use regex::Regex;

use crate::{
    domain::{Criterion, IdAllocator},
    extract::{ExtractionInput, Strategy},
};

/// Detects Given/When/Then paragraphs in rendered text.
///
/// The text is split into paragraphs on blank-line boundaries (a run of
/// whitespace containing at least two newlines). Each paragraph whose
/// first token is `GIVEN` (any case) is matched against a three-group
/// pattern: GIVEN up to the first WHEN, WHEN up to the first THEN, THEN
/// to the end. A full match becomes a three-line criterion plus two
/// derived test-case hints; a paragraph that starts with GIVEN but fails
/// the full match degrades to a single verbatim criterion, so no
/// author-intended block is silently lost.
#[derive(Debug)]
pub struct GwtExtractor {
    blank_line: Regex,
    given_prefix: Regex,
    three_part: Regex,
}

impl GwtExtractor {
    /// Builds the extractor's patterns.
    #[must_use]
    pub fn new() -> Self {
        Self {
            blank_line: Regex::new(r"\n\s*\n").expect("valid literal pattern"),
            given_prefix: Regex::new(r"(?i)^given\b").expect("valid literal pattern"),
            // Lazy groups bind each section to the *first* occurrence of
            // the next keyword.
            three_part: Regex::new(r"(?is)^given\b\s*(.*?)\s*\bwhen\b\s*(.*?)\s*\bthen\b\s*(.*)$")
                .expect("valid literal pattern"),
        }
    }

    fn extract_paragraph(&self, paragraph: &str, ids: &mut IdAllocator) -> Option<Criterion> {
        if let Some(caps) = self.three_part.captures(paragraph) {
            let (given, when, then) = (caps[1].trim(), caps[2].trim(), caps[3].trim());
            if !given.is_empty() && !when.is_empty() && !then.is_empty() {
                let text = format!("GIVEN {given}\nWHEN {when}\nTHEN {then}");
                let test_cases = vec![format!("Test: {when}"), format!("Expected: {then}")];
                return Criterion::with_test_cases(ids.next_id(), &text, test_cases);
            }
        }

        tracing::debug!("paragraph starts with GIVEN but is not a full block, keeping verbatim");
        Criterion::new(ids.next_id(), paragraph)
    }
}

impl Default for GwtExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for GwtExtractor {
    fn extract(&self, input: &ExtractionInput) -> Vec<Criterion> {
        let mut ids = IdAllocator::local();

        self.blank_line
            .split(input.text())
            .map(str::trim)
            .filter(|paragraph| !paragraph.is_empty())
            .filter(|paragraph| self.given_prefix.is_match(paragraph))
            .filter_map(|paragraph| self.extract_paragraph(paragraph, &mut ids))
            .collect()
    }
}
