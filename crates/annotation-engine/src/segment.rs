//! Render segments and the severity buckets attached to highlighted ones.

use serde::Serialize;
use shared_types::MatchType;

use crate::span::ResolvedMatch;

/// Similarity score at or above which a highlight is `high` severity.
pub const HIGH_SEVERITY_THRESHOLD: f64 = 0.85;
/// Similarity score at or above which a highlight is `medium` severity.
pub const MEDIUM_SEVERITY_THRESHOLD: f64 = 0.75;

/// Presentation bucket derived from the similarity score. Never stored;
/// recomputed whenever segments are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_SEVERITY_THRESHOLD {
            Severity::High
        } else if score >= MEDIUM_SEVERITY_THRESHOLD {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

/// One contiguous slice of the document text, plain or highlighted.
///
/// Ephemeral: rebuilt on every render request. Concatenating `text` over a
/// full segment sequence reconstructs the document content exactly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSegment {
    pub text: String,
    pub highlighted: bool,
    pub match_type: Option<MatchType>,
    pub similarity_score: Option<f64>,
    pub severity: Option<Severity>,
    pub tooltip: Option<String>,
}

impl RenderSegment {
    pub(crate) fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            highlighted: false,
            match_type: None,
            similarity_score: None,
            severity: None,
            tooltip: None,
        }
    }

    pub(crate) fn highlight(text: &str, origin: &ResolvedMatch) -> Self {
        Self {
            text: text.to_string(),
            highlighted: true,
            match_type: Some(origin.match_type),
            similarity_score: Some(origin.similarity_score),
            severity: Some(Severity::from_score(origin.similarity_score)),
            tooltip: Some(tooltip_for(origin)),
        }
    }
}

fn tooltip_for(origin: &ResolvedMatch) -> String {
    let mut tip = format!("Similarity: {:.1}%", origin.similarity_score * 100.0);
    if let Some(source) = origin
        .source_title
        .as_deref()
        .or(origin.source_url.as_deref())
    {
        tip.push_str("\nSource: ");
        tip.push_str(source);
    }
    tip
}
