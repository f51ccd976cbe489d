//! Headline projection of a completed analysis.

use serde::Serialize;
use shared_types::AnalysisResult;

/// The numbers shown above the annotated text. Computed from the full,
/// unfiltered match set; view filters never change these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub overall_similarity: f64,
    pub ai_generated_probability: f64,
    pub total_matches: usize,
}

pub fn summarize(result: &AnalysisResult) -> AnalysisSummary {
    AnalysisSummary {
        overall_similarity: result.overall_similarity,
        ai_generated_probability: result.ai_generated_probability,
        total_matches: result.matches.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{MatchSpan, MatchType, SimilarityMatch};

    #[test]
    fn test_summary_counts_every_match() {
        let result = AnalysisResult {
            document_id: "doc-1".to_string(),
            overall_similarity: 0.42,
            ai_generated_probability: 0.17,
            matches: vec![
                SimilarityMatch {
                    match_type: MatchType::Exact,
                    similarity_score: 0.9,
                    source_text: String::new(),
                    source_url: None,
                    source_title: None,
                    span: MatchSpan::Offsets { start: 0, end: 4 },
                },
                SimilarityMatch {
                    match_type: MatchType::Semantic,
                    similarity_score: 0.1,
                    source_text: String::new(),
                    source_url: None,
                    source_title: None,
                    span: MatchSpan::Literal {
                        matched_text: "x".to_string(),
                    },
                },
            ],
        };
        let summary = summarize(&result);
        assert_eq!(summary.total_matches, 2);
        assert_eq!(summary.overall_similarity, 0.42);
        assert_eq!(summary.ai_generated_probability, 0.17);
    }
}
