use regex::Regex;

use crate::{
    domain::{Config, Criterion, DocNode, ItemKey},
    extract::{
        ExtractionInput, Strategy, explicit::ExplicitExtractor, gwt::GwtExtractor,
        heuristic::HeuristicExtractor,
    },
    render,
};

/// Composes the three extraction strategies in fixed priority order.
///
/// For the free-text source, the choice between the Given/When/Then pass
/// and the heuristic line scan is made by a token-presence gate: if the
/// rendered text mentions `AC`, `Acceptance Criteria` / `Criterion`, or a
/// Given...When...Then sequence *anywhere*, the GWT pass runs, even if no
/// paragraph then matches as a block. Only a text with no such tokens at
/// all falls back to the heuristic scan. This mirrors the behaviour of
/// the tracker exports this tool was built against; whether a failed GWT
/// pass *should* fall through to the heuristics is an open product
/// question, so the gate is deliberately kept in one place
/// ([`Pipeline::has_ac_markers`]).
///
/// The explicitly stored list is an independent, additive source: it is
/// wrapped whenever present, regardless of what the text produced.
#[derive(Debug)]
pub struct Pipeline {
    markers: Regex,
    gwt: GwtExtractor,
    explicit: ExplicitExtractor,
    heuristic: HeuristicExtractor,
    max_render_depth: usize,
}

impl Pipeline {
    /// Builds a pipeline with the default rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::with_heuristic(HeuristicExtractor::new(), render::DEFAULT_MAX_DEPTH)
    }

    /// Builds a pipeline with the rule set from a configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::with_heuristic(
            HeuristicExtractor::from_config(config),
            config.max_render_depth(),
        )
    }

    fn with_heuristic(heuristic: HeuristicExtractor, max_render_depth: usize) -> Self {
        Self {
            markers: Regex::new(
                r"(?is)\bac\b|\bacceptance\s+criteri(?:a|on)\b|\bgiven\b.*?\bwhen\b.*?\bthen\b",
            )
            .expect("valid literal pattern"),
            gwt: GwtExtractor::new(),
            explicit: ExplicitExtractor,
            heuristic,
            max_render_depth,
        }
    }

    /// Whether the text contains any acceptance-criteria marker token.
    ///
    /// This is a scan over tokens, not over matched blocks: scattered
    /// keywords that never form a complete paragraph-level block still
    /// count.
    #[must_use]
    pub fn has_ac_markers(&self, text: &str) -> bool {
        self.markers.is_match(text)
    }

    /// Runs the pipeline over one input.
    ///
    /// Never fails: an input with nothing to extract yields an empty
    /// sequence, which is the expected way of signalling that no
    /// acceptance criteria could be derived.
    #[must_use]
    pub fn run(&self, input: &ExtractionInput) -> Vec<Criterion> {
        let mut criteria = if self.has_ac_markers(input.text()) {
            self.gwt.extract(input)
        } else {
            self.heuristic.extract(input)
        };

        criteria.extend(self.explicit.extract(input));
        criteria
    }

    /// Renders a work item's parts and runs the pipeline over them.
    ///
    /// This is the single entry point collaborators use; see
    /// [`extract_criteria`] for the free-function form with default
    /// rules.
    #[must_use]
    pub fn extract(
        &self,
        document: Option<&DocNode>,
        explicit_list: Option<&[String]>,
        key: &ItemKey,
    ) -> Vec<Criterion> {
        let text = document
            .map(|root| render::render_with_depth(root, self.max_render_depth))
            .unwrap_or_default();

        let mut input = ExtractionInput::new(text, key.clone());
        if let Some(list) = explicit_list {
            input = input.with_explicit(list.to_vec());
        }

        let criteria = self.run(&input);
        tracing::debug!("extracted {} criteria for {key}", criteria.len());
        criteria
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts acceptance criteria from a work item's description document
/// and/or its explicitly stored criterion list, using the default rules.
///
/// Both sources are optional; with neither present the result is empty.
#[must_use]
pub fn extract_criteria(
    document: Option<&DocNode>,
    explicit_list: Option<&[String]>,
    key: &ItemKey,
) -> Vec<Criterion> {
    Pipeline::new().extract(document, explicit_list, key)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn key() -> ItemKey {
        "PROJ-9".parse().unwrap()
    }

    fn gwt_paragraph(text: &str) -> DocNode {
        DocNode::paragraph(vec![DocNode::text(text)])
    }

    #[test]
    fn empty_input_yields_empty_sequence() {
        assert!(extract_criteria(None, None, &key()).is_empty());
    }

    #[test]
    fn gwt_round_trip_through_document() {
        let doc = gwt_paragraph("GIVEN a user WHEN they click submit THEN an error shows");

        let criteria = extract_criteria(Some(&doc), None, &key());

        assert_eq!(criteria.len(), 1);
        assert_eq!(
            criteria[0].criterion(),
            "GIVEN a user\nWHEN they click submit\nTHEN an error shows"
        );
        assert_eq!(
            criteria[0].test_cases(),
            &[
                "Test: they click submit".to_string(),
                "Expected: an error shows".to_string()
            ]
        );
    }

    #[test]
    fn heuristic_fallback_without_markers() {
        let doc = DocNode::other(vec![
            DocNode::bullet_list(vec![
                DocNode::list_item(vec![DocNode::text("Users may log in freely")]),
                DocNode::list_item(vec![DocNode::text("Users may log out freely")]),
            ]),
            gwt_paragraph("This is a note."),
        ]);

        let criteria = extract_criteria(Some(&doc), None, &key());

        assert_eq!(criteria.len(), 2);
        assert_eq!(criteria[0].criterion(), "Users may log in freely");
        assert_eq!(criteria[1].criterion(), "Users may log out freely");
    }

    #[test]
    fn marker_presence_routes_to_gwt_even_without_blocks() {
        // The token gate is on presence, not on block success: an "AC"
        // mention suppresses the heuristic scan entirely.
        let doc = DocNode::other(vec![
            gwt_paragraph("The AC are listed below."),
            DocNode::bullet_list(vec![DocNode::list_item(vec![DocNode::text(
                "Users should log in quickly",
            )])]),
        ]);

        let criteria = extract_criteria(Some(&doc), None, &key());

        assert!(criteria.is_empty());
    }

    #[test]
    fn acceptance_criteria_phrase_counts_as_marker() {
        let pipeline = Pipeline::new();
        assert!(pipeline.has_ac_markers("Acceptance criteria follow"));
        assert!(pipeline.has_ac_markers("acceptance criterion: speed"));
        assert!(pipeline.has_ac_markers("given x when y then z"));
        assert!(!pipeline.has_ac_markers("nothing to see here"));
        // "ac" must stand alone as a token.
        assert!(!pipeline.has_ac_markers("practical concerns only"));
    }

    #[test]
    fn explicit_list_is_additive() {
        let doc = gwt_paragraph("GIVEN a WHEN b THEN c");
        let explicit = vec![
            "Exports include headers".to_string(),
            "Sessions expire".to_string(),
        ];

        let criteria = extract_criteria(Some(&doc), Some(&explicit), &key());

        assert_eq!(criteria.len(), 3);
        assert_eq!(criteria[0].id(), "AC-1");
        assert_eq!(criteria[1].id(), "PROJ-9-AC-1");
        assert_eq!(criteria[2].id(), "PROJ-9-AC-2");
    }

    #[test]
    fn explicit_list_alone_is_extracted() {
        let explicit = vec!["The only criterion".to_string()];

        let criteria = extract_criteria(None, Some(&explicit), &key());

        assert_eq!(criteria.len(), 1);
        assert_eq!(criteria[0].id(), "PROJ-9-AC-1");
    }

    #[test]
    fn ids_are_unique_within_a_run() {
        let doc = DocNode::other(vec![
            gwt_paragraph("GIVEN a WHEN b THEN c"),
            gwt_paragraph("GIVEN d WHEN e THEN f"),
        ]);
        let explicit = vec!["One more criterion".to_string()];

        let criteria = extract_criteria(Some(&doc), Some(&explicit), &key());

        let ids: HashSet<_> = criteria.iter().map(Criterion::id).collect();
        assert_eq!(ids.len(), criteria.len());
    }

    #[test]
    fn all_criteria_are_non_empty() {
        let doc = DocNode::other(vec![
            gwt_paragraph("GIVEN a WHEN b THEN c"),
            gwt_paragraph("GIVEN partial block only"),
        ]);

        for criterion in extract_criteria(Some(&doc), None, &key()) {
            assert!(!criterion.criterion().trim().is_empty());
        }
    }

    #[test]
    fn configured_pipeline_uses_its_rules() {
        let config: Config = toml::from_str("_version = \"1\"\nmin_line_len = 100\n").unwrap();
        let pipeline = Pipeline::from_config(&config);
        let doc = DocNode::bullet_list(vec![DocNode::list_item(vec![DocNode::text(
            "Users may log in freely",
        )])]);

        // The raised threshold rejects what the defaults would accept.
        assert!(pipeline.extract(Some(&doc), None, &key()).is_empty());
        assert!(!extract_criteria(Some(&doc), None, &key()).is_empty());
    }
}
