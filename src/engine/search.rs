use std::collections::HashSet;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::profile::NodeProfile;
use super::sim::SimGraph;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Fuzzy filter over node labels and ids, cached per graph revision.
#[derive(Debug, Default)]
pub(super) struct SearchFilter {
    query: String,
    revision: u64,
    matches: HashSet<usize>,
}

impl SearchFilter {
    pub(super) fn query(&self) -> &str {
        &self.query
    }

    pub(super) fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    pub(super) fn matches(&self, index: usize) -> bool {
        self.matches.contains(&index)
    }

    pub(super) fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub(super) fn update(
        &mut self,
        query: &str,
        graph: &SimGraph,
        profile: &dyn NodeProfile,
        revision: u64,
    ) {
        let query = query.trim();
        if query == self.query && revision == self.revision {
            return;
        }

        self.query = query.to_string();
        self.revision = revision;
        self.matches.clear();
        if query.is_empty() {
            return;
        }

        let matcher = SkimMatcherV2::default();
        self.matches.extend(graph.nodes().iter().enumerate().filter_map(|(index, sim)| {
            let label = profile.label(&sim.node);
            let hit = fuzzy_match_score(&matcher, &label, query).is_some()
                || fuzzy_match_score(&matcher, &sim.node.id, query).is_some();
            hit.then_some(index)
        }));
    }
}
