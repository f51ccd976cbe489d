//! Pure mapping from render segments to visual output.
//!
//! Nothing here inspects match offsets; by the time a segment sequence
//! arrives, overlap and ordering are already settled. Both emitters
//! preserve the document text exactly (ANSI escapes and HTML markup wrap
//! the text, they never replace it).

use clap::ValueEnum;
use colored::Colorize;

use annotation_engine::{AnalysisSummary, RenderSegment, Severity};
use shared_types::{Document, JobStatus, SimilarityMatch};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Ansi,
    Html,
}

/// Annotated document body for the terminal; severity picks the
/// background color.
pub fn to_ansi(segments: &[RenderSegment]) -> String {
    segments
        .iter()
        .map(|seg| {
            if !seg.highlighted {
                return seg.text.clone();
            }
            match seg.severity {
                Some(Severity::High) => seg.text.as_str().black().on_red().to_string(),
                Some(Severity::Medium) => seg.text.as_str().black().on_yellow().to_string(),
                _ => seg.text.as_str().black().on_bright_yellow().to_string(),
            }
        })
        .collect()
}

pub fn summary_ansi(summary: &AnalysisSummary, document: &Document) -> String {
    format!(
        "{}\n  similarity: {}\n  ai probability: {:.1}%\n  matches: {}",
        document.filename.bold(),
        similarity_ansi(summary.overall_similarity),
        summary.ai_generated_probability * 100.0,
        summary.total_matches,
    )
}

fn similarity_ansi(score: f64) -> String {
    let pct = format!("{:.1}%", score * 100.0);
    match Severity::from_score(score) {
        Severity::High => pct.red().bold().to_string(),
        Severity::Medium => pct.yellow().to_string(),
        Severity::Low => pct.green().to_string(),
    }
}

pub fn status_ansi(status: JobStatus) -> String {
    match status {
        JobStatus::Completed => "completed".green().to_string(),
        JobStatus::Failed => "failed".red().to_string(),
        JobStatus::Processing => "processing".yellow().to_string(),
        JobStatus::Pending => "pending".yellow().to_string(),
    }
}

/// The per-match source list shown under the annotated body.
pub fn sources_ansi(matches: &[SimilarityMatch]) -> String {
    if matches.is_empty() {
        return "no matches reported".dimmed().to_string();
    }
    let mut out = String::new();
    for (idx, m) in matches.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&format!(
            "{:>3}. [{}] {} \"{}\"",
            idx + 1,
            m.match_type.as_str(),
            similarity_ansi(m.similarity_score),
            truncate(&m.source_text, 100),
        ));
        if let Some(source) = m.source_title.as_deref().or(m.source_url.as_deref()) {
            out.push_str(&format!("\n     {source}"));
        }
    }
    out
}

/// Standalone HTML report. Segment text is escaped before it goes inside
/// a `<mark>`, so document content can never smuggle markup in.
pub fn to_html(
    document: &Document,
    summary: &AnalysisSummary,
    segments: &[RenderSegment],
) -> String {
    let mut body = String::new();
    for seg in segments {
        if seg.highlighted {
            let class = seg.severity.map(|s| s.as_str()).unwrap_or("low");
            let title = escape_html(seg.tooltip.as_deref().unwrap_or(""));
            body.push_str(&format!(
                r#"<mark class="match-{class}" title="{title}">{}</mark>"#,
                escape_html(&seg.text)
            ));
        } else {
            body.push_str(&escape_html(&seg.text));
        }
    }

    format!(
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n<h1>{title}</h1>\n\
         <p>similarity {similarity:.1}% &middot; ai probability {ai:.1}% &middot; {matches} matches</p>\n\
         <pre>{body}</pre>\n</body>\n</html>",
        title = escape_html(&document.filename),
        similarity = summary.overall_similarity * 100.0,
        ai = summary.ai_generated_probability * 100.0,
        matches = summary.total_matches,
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}
