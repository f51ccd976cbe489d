//! View-side filtering of which matches participate in highlighting.

use shared_types::{MatchType, SimilarityMatch};

/// Filter applied before the overlap sweep. Never alters offsets, only
/// which matches participate; summary numbers ignore it entirely.
#[derive(Debug, Clone, Default)]
pub struct MatchFilter {
    /// Keep only these match types; `None` keeps all of them.
    pub match_types: Option<Vec<MatchType>>,
    /// Inclusive lower bound on the similarity score.
    pub min_similarity: f64,
}

impl MatchFilter {
    pub fn keeps(&self, m: &SimilarityMatch) -> bool {
        let type_ok = self
            .match_types
            .as_ref()
            .map_or(true, |types| types.contains(&m.match_type));
        type_ok && m.similarity_score >= self.min_similarity
    }
}
