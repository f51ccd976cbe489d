//! VeriText command-line client
//!
//! A thin presentation layer over the analysis service:
//!
//! - account login / registration
//! - document upload
//! - starting an analysis and polling it to completion
//! - rendering a completed analysis (ANSI terminal or HTML)
//!
//! All match handling lives in `annotation-engine` and all service I/O in
//! `analysis-client`; this binary only maps their outputs to text.

use std::path::PathBuf;
use std::time::Duration;

use analysis_client::{ApiClient, PollPolicy, SessionContext};
use annotation_engine::MatchFilter;
use clap::{Parser, Subcommand, ValueEnum};
use shared_types::MatchType;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod render;

use render::OutputFormat;

/// Command-line arguments for the VeriText client
#[derive(Parser, Debug)]
#[command(name = "veritext")]
#[command(about = "Client for the VeriText plagiarism analysis service")]
struct Cli {
    /// Base URL of the analysis service
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    api_url: String,

    /// Bearer token; falls back to the VERITEXT_TOKEN environment variable
    #[arg(long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and print a bearer token for later invocations
    Login { email: String, password: String },

    /// Create an account and print its bearer token
    Register {
        email: String,
        username: String,
        password: String,
    },

    /// Upload a document and print its id
    Upload { file: PathBuf },

    /// Start an analysis for a document and poll it to completion
    Analyze {
        document_id: String,

        /// Seconds between status fetches
        #[arg(long, default_value_t = 2)]
        interval: u64,

        /// Give up after this many seconds
        #[arg(long, default_value_t = 300)]
        timeout: u64,
    },

    /// Render a completed analysis
    Report {
        analysis_id: String,

        /// Drop matches below this similarity
        #[arg(long, default_value_t = 0.0)]
        min_similarity: f64,

        /// Keep only these match types (repeatable; default keeps all)
        #[arg(long = "match-type", value_enum)]
        match_types: Vec<MatchTypeArg>,

        #[arg(long, value_enum, default_value = "ansi")]
        format: OutputFormat,
    },

    /// List past analyses
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 10)]
        per_page: u32,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MatchTypeArg {
    Exact,
    Semantic,
    Paraphrase,
}

impl From<MatchTypeArg> for MatchType {
    fn from(arg: MatchTypeArg) -> Self {
        match arg {
            MatchTypeArg::Exact => MatchType::Exact,
            MatchTypeArg::Semantic => MatchType::Semantic,
            MatchTypeArg::Paraphrase => MatchType::Paraphrase,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let session = SessionContext::new();
    let token = cli
        .token
        .clone()
        .or_else(|| std::env::var("VERITEXT_TOKEN").ok());
    if let Some(token) = token {
        session.acquire(token);
    }
    let client = ApiClient::new(&cli.api_url, session)?;

    match cli.command {
        Command::Login { email, password } => commands::login(&client, email, password).await,
        Command::Register {
            email,
            username,
            password,
        } => commands::register(&client, email, username, password).await,
        Command::Upload { file } => commands::upload(&client, &file).await,
        Command::Analyze {
            document_id,
            interval,
            timeout,
        } => {
            let policy = PollPolicy {
                interval: Duration::from_secs(interval),
                max_duration: Duration::from_secs(timeout),
            };
            commands::analyze(&client, &document_id, policy).await
        }
        Command::Report {
            analysis_id,
            min_similarity,
            match_types,
            format,
        } => {
            let filter = MatchFilter {
                match_types: if match_types.is_empty() {
                    None
                } else {
                    Some(match_types.into_iter().map(MatchType::from).collect())
                },
                min_similarity,
            };
            commands::report(&client, &analysis_id, &filter, format).await
        }
        Command::List { page, per_page } => commands::list(&client, page, per_page).await,
    }
}
