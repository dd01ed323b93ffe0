use regex::Regex;

use crate::{
    domain::{Config, Criterion, DEFAULT_CUE_WORDS, IdAllocator},
    extract::{ExtractionInput, Strategy},
};

/// Fallback line-by-line scan of free text.
///
/// A line is a candidate when, after trimming, it starts with a bullet
/// marker (`*`, `-`) or a numbered-list marker (`3.`), or when it
/// contains one of the modal cue words anywhere, case-insensitively.
/// Candidates of ten characters or fewer are rejected as noise, and any
/// leading marker is stripped before the line becomes a criterion.
///
/// The rule set is built per instance from configuration; nothing is
/// shared between runs.
#[derive(Debug)]
pub struct HeuristicExtractor {
    cue_words: Vec<String>,
    min_line_len: usize,
    marker: Regex,
}

impl HeuristicExtractor {
    /// Builds the extractor with the default rules.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(
            DEFAULT_CUE_WORDS.iter().map(ToString::to_string).collect(),
            10,
        )
    }

    /// Builds the extractor with the rules from a configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::with_rules(config.cue_words().to_vec(), config.min_line_len())
    }

    fn with_rules(cue_words: Vec<String>, min_line_len: usize) -> Self {
        Self {
            cue_words: cue_words.into_iter().map(|w| w.to_lowercase()).collect(),
            min_line_len,
            marker: Regex::new(r"^(?:[*-]|\d+\.)\s*").expect("valid literal pattern"),
        }
    }

    fn has_cue(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.cue_words.iter().any(|cue| lower.contains(cue))
    }
}

impl Default for HeuristicExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for HeuristicExtractor {
    fn extract(&self, input: &ExtractionInput) -> Vec<Criterion> {
        let mut ids = IdAllocator::local();
        let mut out = Vec::new();

        for line in input.text().lines() {
            let trimmed = line.trim();
            if !self.marker.is_match(trimmed) && !self.has_cue(trimmed) {
                continue;
            }
            // Noise guard: markers and cue words alone don't make a
            // requirement statement.
            if trimmed.chars().count() <= self.min_line_len {
                continue;
            }

            let text = self.marker.replace(trimmed, "");
            if let Some(criterion) = Criterion::new(ids.next_id(), &text) {
                out.push(criterion);
            }
        }

        out
    }
}
