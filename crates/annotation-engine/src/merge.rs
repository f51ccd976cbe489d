//! The overlap sweep: order resolved matches and walk the document once,
//! emitting alternating plain and highlighted segments.

use std::cmp::Ordering;

use shared_types::SimilarityMatch;

use crate::filter::MatchFilter;
use crate::segment::RenderSegment;
use crate::span::{resolve_spans, ResolvedMatch};

/// Priority order for overlap resolution: earliest start first, then the
/// longest span, then the highest similarity. Total, so ties between
/// identical spans are resolved by input order and the output is
/// deterministic.
fn priority_order(a: &ResolvedMatch, b: &ResolvedMatch) -> Ordering {
    a.start
        .cmp(&b.start)
        .then_with(|| b.len().cmp(&a.len()))
        .then_with(|| b.similarity_score.total_cmp(&a.similarity_score))
}

/// Build the full segment sequence for `content`.
///
/// Matches failing the filter never participate. A match that would
/// overlap an already-emitted highlight is dropped whole; overlap is
/// resolved at match granularity, never by splitting a span, so a
/// highlight always carries the metadata of exactly one match.
pub fn merge_segments(
    content: &str,
    matches: &[SimilarityMatch],
    filter: &MatchFilter,
) -> Vec<RenderSegment> {
    let mut resolved = resolve_spans(content, matches.iter().filter(|m| filter.keeps(m)));
    resolved.sort_by(priority_order);

    let mut segments = Vec::new();
    let mut last_index = 0;
    for m in &resolved {
        if m.is_empty() {
            // A zero-width span highlights nothing.
            continue;
        }
        if m.start < last_index {
            continue;
        }
        if m.start > last_index {
            segments.push(RenderSegment::plain(&content[last_index..m.start]));
        }
        segments.push(RenderSegment::highlight(&content[m.start..m.end], m));
        last_index = m.end;
    }
    if last_index < content.len() {
        segments.push(RenderSegment::plain(&content[last_index..]));
    }
    segments
}
