//! Span resolution: pin every match to concrete byte offsets in the
//! document text.
//!
//! Explicit offsets are validated and used as-is. Literal matches are
//! located with one case-insensitive multi-pattern automaton over the
//! whole body; every occurrence becomes its own match instance. A
//! malformed span is skipped with a warning and never aborts the render.

use aho_corasick::AhoCorasickBuilder;
use shared_types::{MatchSpan, MatchType, SimilarityMatch};
use tracing::warn;

/// A match pinned to concrete byte offsets in the document text.
#[derive(Debug, Clone)]
pub struct ResolvedMatch {
    pub start: usize,
    pub end: usize,
    pub match_type: MatchType,
    pub similarity_score: f64,
    pub source_url: Option<String>,
    pub source_title: Option<String>,
}

impl ResolvedMatch {
    fn new(start: usize, end: usize, origin: &SimilarityMatch) -> Self {
        Self {
            start,
            end,
            match_type: origin.match_type,
            similarity_score: origin.similarity_score,
            source_url: origin.source_url.clone(),
            source_title: origin.source_title.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Resolve every match to offsets into `content`.
///
/// The output is unordered; [`crate::merge::merge_segments`] applies the
/// priority order before the sweep.
pub fn resolve_spans<'a, I>(content: &str, matches: I) -> Vec<ResolvedMatch>
where
    I: IntoIterator<Item = &'a SimilarityMatch>,
{
    let mut resolved = Vec::new();
    let mut literals: Vec<(&'a str, &'a SimilarityMatch)> = Vec::new();

    for m in matches {
        match &m.span {
            MatchSpan::Offsets { start, end } => match validate_offsets(content, *start, *end) {
                Ok(()) => resolved.push(ResolvedMatch::new(*start, *end, m)),
                Err(reason) => {
                    warn!(start = *start, end = *end, reason, "skipping malformed match span");
                }
            },
            MatchSpan::Literal { matched_text } => {
                if matched_text.is_empty() {
                    warn!("skipping match with empty literal text");
                } else {
                    literals.push((matched_text.as_str(), m));
                }
            }
        }
    }

    if !literals.is_empty() {
        // One automaton over all literal patterns; overlapping iteration so
        // no occurrence is lost before the overlap sweep gets to rank them.
        let build = AhoCorasickBuilder::new()
            .ascii_case_insensitive(true)
            .build(literals.iter().map(|(pattern, _)| *pattern));
        match build {
            Ok(automaton) => {
                for hit in automaton.find_overlapping_iter(content) {
                    let (_, origin) = literals[hit.pattern().as_usize()];
                    resolved.push(ResolvedMatch::new(hit.start(), hit.end(), origin));
                }
            }
            Err(err) => warn!(error = %err, "failed to build literal search automaton"),
        }
    }

    resolved
}

fn validate_offsets(content: &str, start: usize, end: usize) -> Result<(), &'static str> {
    if start > end {
        return Err("start is past end");
    }
    if end > content.len() {
        return Err("end is past the end of the document");
    }
    if !content.is_char_boundary(start) || !content.is_char_boundary(end) {
        return Err("offset is not a char boundary");
    }
    Ok(())
}
