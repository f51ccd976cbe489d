use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document as stored by the upload service.
///
/// Immutable once uploaded; the annotation side only ever reads `content`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub filename: String,
    /// Extracted text of the document, UTF-8.
    pub content: String,
    pub file_type: String,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

/// How a similarity match was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Semantic,
    Paraphrase,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Semantic => "semantic",
            MatchType::Paraphrase => "paraphrase",
        }
    }
}

/// Where a match lives in the analyzed document: either explicit byte
/// offsets into `Document.content`, or a literal substring the client
/// locates itself (every case-insensitive occurrence counts as one
/// match instance).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchSpan {
    Offsets { start: usize, end: usize },
    Literal { matched_text: String },
}

/// One reported similarity between a span of the analyzed document and an
/// external source. Produced server-side; the client only reads these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityMatch {
    pub match_type: MatchType,
    /// In `[0, 1]`.
    pub similarity_score: f64,
    /// Text on the source side of the match.
    pub source_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_title: Option<String>,
    pub span: MatchSpan,
}

/// Payload of a finished analysis. Created once the job completes and
/// immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub document_id: String,
    pub overall_similarity: f64,
    pub ai_generated_probability: f64,
    pub matches: Vec<SimilarityMatch>,
}

/// Server-side lifecycle of an analysis job. `completed` and `failed` are
/// terminal; the other two keep the client polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}
