//! Turns a document's text plus a set of similarity matches into an
//! ordered, non-overlapping sequence of render segments.
//!
//! The engine is pure: it never mutates its inputs, holds no state between
//! calls, and is cheap enough to re-run on every filter change. The one
//! property that must never break: concatenating the emitted segments'
//! text reproduces the document content byte for byte.

pub mod filter;
pub mod merge;
pub mod segment;
pub mod span;
pub mod summary;


pub use filter::MatchFilter;
pub use merge::merge_segments;
pub use segment::{RenderSegment, Severity};
pub use span::{resolve_spans, ResolvedMatch};
pub use summary::{summarize, AnalysisSummary};

use shared_types::{AnalysisResult, SimilarityMatch};

/// AnnotationEngine entry point
pub struct AnnotationEngine;

impl AnnotationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Produce the segment sequence for one document body under the given
    /// view filter.
    pub fn annotate(
        &self,
        content: &str,
        matches: &[SimilarityMatch],
        filter: &MatchFilter,
    ) -> Vec<RenderSegment> {
        merge::merge_segments(content, matches, filter)
    }

    /// Headline numbers for a completed analysis; always computed from the
    /// unfiltered match set.
    pub fn summarize(&self, result: &AnalysisResult) -> AnalysisSummary {
        summary::summarize(result)
    }
}

impl Default for AnnotationEngine {
    fn default() -> Self {
        Self::new()
    }
}
