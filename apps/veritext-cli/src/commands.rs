//! Command bodies: each maps one subcommand to client calls and rendered
//! output.

use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

use analysis_client::{ApiClient, JobTracker, PollPolicy, TrackerState};
use annotation_engine::{AnnotationEngine, MatchFilter};
use shared_types::{AnalysisResult, JobStatus, LoginRequest, RegisterRequest};

use crate::render::{self, OutputFormat};

pub async fn login(client: &ApiClient, email: String, password: String) -> Result<()> {
    let auth = client.login(&LoginRequest { email, password }).await?;
    info!(user = %auth.user.username, "logged in");
    info!("export VERITEXT_TOKEN=<token> to reuse this session");
    println!("{}", auth.token);
    Ok(())
}

pub async fn register(
    client: &ApiClient,
    email: String,
    username: String,
    password: String,
) -> Result<()> {
    let auth = client
        .register(&RegisterRequest {
            email,
            username,
            password,
        })
        .await?;
    info!(user = %auth.user.username, "account created");
    println!("{}", auth.token);
    Ok(())
}

pub async fn upload(client: &ApiClient, path: &Path) -> Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload.txt");

    let document = client.upload_document(filename, bytes).await?;
    info!(id = %document.id, bytes = document.size_bytes, "document uploaded");
    println!("{}", document.id);
    Ok(())
}

pub async fn analyze(client: &ApiClient, document_id: &str, policy: PollPolicy) -> Result<()> {
    let started = client.start_analysis(document_id).await?;
    info!(analysis_id = %started.analysis_id, "analysis started");

    let tracker = JobTracker::start(client.clone(), started.analysis_id.as_str(), policy);
    let mut rx = tracker.subscribe();
    loop {
        let state = rx.borrow().clone();
        if state.is_terminal() {
            break;
        }
        if let TrackerState::Polling { polls } = state {
            if polls > 0 {
                info!(polls, "analysis still running");
            }
        }
        if rx.changed().await.is_err() {
            break;
        }
    }

    match tracker.wait().await {
        TrackerState::Completed(result) => {
            print_report(client, &result, &MatchFilter::default(), OutputFormat::Ansi).await
        }
        TrackerState::Failed(err) => bail!("analysis failed: {err}"),
        TrackerState::Cancelled => bail!("analysis was cancelled"),
        other => bail!("tracker stopped in a non-terminal state: {other:?}"),
    }
}

pub async fn report(
    client: &ApiClient,
    analysis_id: &str,
    filter: &MatchFilter,
    format: OutputFormat,
) -> Result<()> {
    let status = client.analysis_status(analysis_id).await?;
    match status.status {
        JobStatus::Completed => {
            let result = status
                .result
                .context("status response reported completion but carried no result")?;
            print_report(client, &result, filter, format).await
        }
        JobStatus::Failed => bail!(
            "analysis failed: {}",
            status
                .error_message
                .unwrap_or_else(|| "unknown reason".to_string())
        ),
        other => {
            info!(status = ?other, "analysis still running; try again shortly");
            Ok(())
        }
    }
}

pub async fn list(client: &ApiClient, page: u32, per_page: u32) -> Result<()> {
    let listing = client.list_analyses(page, per_page).await?;
    if listing.analyses.is_empty() {
        println!("no analyses on page {}", listing.current_page);
        return Ok(());
    }
    for entry in &listing.analyses {
        println!(
            "{}  {}  {:>5.1}%  {}",
            entry.created_at.format("%Y-%m-%d %H:%M"),
            render::status_ansi(entry.status),
            entry.overall_similarity * 100.0,
            entry.analysis_id,
        );
    }
    println!(
        "page {} of {} ({} total)",
        listing.current_page, listing.pages, listing.total
    );
    Ok(())
}

async fn print_report(
    client: &ApiClient,
    result: &AnalysisResult,
    filter: &MatchFilter,
    format: OutputFormat,
) -> Result<()> {
    let engine = AnnotationEngine::new();
    let summary = engine.summarize(result);
    let document = client.get_document(&result.document_id).await?;
    let segments = engine.annotate(&document.content, &result.matches, filter);

    match format {
        OutputFormat::Ansi => {
            println!("{}", render::summary_ansi(&summary, &document));
            println!();
            println!("{}", render::to_ansi(&segments));
            println!();
            println!("{}", render::sources_ansi(&result.matches));
        }
        OutputFormat::Html => {
            println!("{}", render::to_html(&document, &summary, &segments));
        }
    }
    Ok(())
}
