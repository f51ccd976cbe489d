//! In-process mock of the analysis service.
//!
//! The status endpoint replays a script: each fetch consumes one step,
//! and the final step repeats forever, so a tracker can keep polling a
//! terminal answer without the mock running dry.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;

use shared_types::{
    AnalysisPage, AnalysisResult, AnalysisStatusResponse, ApiErrorBody, AuthResponse, Document,
    JobStatus, LoginRequest, MatchSpan, MatchType, RegisterRequest, SimilarityMatch,
    StartAnalysisRequest, StartAnalysisResponse, UserProfile,
};

pub const TEST_TOKEN: &str = "test-token";
pub const DOCUMENT_CONTENT: &str = "The quick brown fox";

/// One scripted reply from the status endpoint.
#[derive(Clone)]
pub enum Step {
    Status(AnalysisStatusResponse),
    Error(u16),
}

pub fn processing(analysis_id: &str) -> Step {
    Step::Status(AnalysisStatusResponse {
        analysis_id: analysis_id.to_string(),
        status: JobStatus::Processing,
        result: None,
        error_message: None,
    })
}

pub fn completed(analysis_id: &str, result: AnalysisResult) -> Step {
    Step::Status(AnalysisStatusResponse {
        analysis_id: analysis_id.to_string(),
        status: JobStatus::Completed,
        result: Some(result),
        error_message: None,
    })
}

pub fn completed_without_result(analysis_id: &str) -> Step {
    Step::Status(AnalysisStatusResponse {
        analysis_id: analysis_id.to_string(),
        status: JobStatus::Completed,
        result: None,
        error_message: None,
    })
}

pub fn failed(analysis_id: &str, reason: &str) -> Step {
    Step::Status(AnalysisStatusResponse {
        analysis_id: analysis_id.to_string(),
        status: JobStatus::Failed,
        result: None,
        error_message: Some(reason.to_string()),
    })
}

pub fn server_error() -> Step {
    Step::Error(500)
}

pub fn sample_result(document_id: &str) -> AnalysisResult {
    AnalysisResult {
        document_id: document_id.to_string(),
        overall_similarity: 0.42,
        ai_generated_probability: 0.1,
        matches: vec![SimilarityMatch {
            match_type: MatchType::Exact,
            similarity_score: 0.9,
            source_text: "quick".to_string(),
            source_url: Some("https://example.com/source".to_string()),
            source_title: None,
            span: MatchSpan::Offsets { start: 4, end: 9 },
        }],
    }
}

#[derive(Clone)]
pub struct MockService {
    status_hits: Arc<AtomicUsize>,
    script: Arc<Mutex<VecDeque<Step>>>,
    delay: Duration,
    require_auth: bool,
}

impl MockService {
    pub fn new(script: Vec<Step>) -> Self {
        Self {
            status_hits: Arc::new(AtomicUsize::new(0)),
            script: Arc::new(Mutex::new(script.into_iter().collect())),
            delay: Duration::ZERO,
            require_auth: false,
        }
    }

    /// Delay every status reply, for cancel-while-in-flight tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Reject calls without the test bearer token.
    pub fn with_auth(mut self) -> Self {
        self.require_auth = true;
        self
    }

    /// Number of status fetches the service has seen.
    pub fn status_hits(&self) -> usize {
        self.status_hits.load(Ordering::SeqCst)
    }

    /// Bind a local port, serve in the background, return the base URL.
    pub async fn spawn(&self) -> String {
        let router = Router::new()
            .route("/api/auth/register", post(register_handler))
            .route("/api/auth/login", post(login_handler))
            .route("/api/documents", post(upload_handler))
            .route("/api/documents/:id", get(document_handler))
            .route("/api/analysis/start", post(start_handler))
            .route("/api/analysis/status/:id", get(status_handler))
            .route("/api/analysis/list", get(list_handler))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock service");
        let addr = listener.local_addr().expect("mock service addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        format!("http://{addr}")
    }

    fn check_auth(&self, headers: &HeaderMap) -> Result<(), Response> {
        if !self.require_auth {
            return Ok(());
        }
        let expected = format!("Bearer {TEST_TOKEN}");
        let presented = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if presented == expected {
            Ok(())
        } else {
            Err(error_response(401, "missing or invalid token"))
        }
    }
}

fn error_response(status: u16, message: &str) -> Response {
    let code = StatusCode::from_u16(status).expect("valid status code");
    (
        code,
        Json(ApiErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

async fn register_handler(Json(request): Json<RegisterRequest>) -> Response {
    if request.email == "taken@example.com" {
        return error_response(409, "email already registered");
    }
    (
        StatusCode::CREATED,
        Json(AuthResponse {
            token: TEST_TOKEN.to_string(),
            user: UserProfile {
                id: uuid::Uuid::new_v4().to_string(),
                email: request.email,
                username: request.username,
            },
        }),
    )
        .into_response()
}

async fn login_handler(Json(request): Json<LoginRequest>) -> Response {
    if request.password == "wrong" {
        return error_response(401, "invalid credentials");
    }
    Json(AuthResponse {
        token: TEST_TOKEN.to_string(),
        user: UserProfile {
            id: "user-1".to_string(),
            email: request.email,
            username: "tester".to_string(),
        },
    })
    .into_response()
}

async fn upload_handler(
    State(svc): State<MockService>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if let Err(denied) = svc.check_auth(&headers) {
        return denied;
    }
    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let filename = field.file_name().unwrap_or("upload.txt").to_string();
        let bytes = field.bytes().await.expect("field bytes");
        let document = Document {
            id: uuid::Uuid::new_v4().to_string(),
            filename,
            content: String::from_utf8_lossy(&bytes).into_owned(),
            file_type: "txt".to_string(),
            size_bytes: bytes.len() as u64,
            created_at: Utc::now(),
        };
        return (StatusCode::CREATED, Json(document)).into_response();
    }
    error_response(400, "no file field")
}

async fn document_handler(
    State(svc): State<MockService>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(denied) = svc.check_auth(&headers) {
        return denied;
    }
    Json(Document {
        id,
        filename: "essay.txt".to_string(),
        content: DOCUMENT_CONTENT.to_string(),
        file_type: "txt".to_string(),
        size_bytes: DOCUMENT_CONTENT.len() as u64,
        created_at: Utc::now(),
    })
    .into_response()
}

async fn start_handler(
    State(svc): State<MockService>,
    headers: HeaderMap,
    Json(_request): Json<StartAnalysisRequest>,
) -> Response {
    if let Err(denied) = svc.check_auth(&headers) {
        return denied;
    }
    (
        StatusCode::CREATED,
        Json(StartAnalysisResponse {
            analysis_id: uuid::Uuid::new_v4().to_string(),
            status: JobStatus::Pending,
        }),
    )
        .into_response()
}

async fn status_handler(
    State(svc): State<MockService>,
    headers: HeaderMap,
    Path(_id): Path<String>,
) -> Response {
    svc.status_hits.fetch_add(1, Ordering::SeqCst);
    if let Err(denied) = svc.check_auth(&headers) {
        return denied;
    }
    if !svc.delay.is_zero() {
        tokio::time::sleep(svc.delay).await;
    }
    let step = {
        let mut script = svc.script.lock().expect("script lock");
        if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        }
    };
    match step {
        Some(Step::Status(body)) => Json(body).into_response(),
        Some(Step::Error(code)) => error_response(code, "scripted failure"),
        None => error_response(404, "analysis not found"),
    }
}

#[derive(Deserialize)]
struct ListParams {
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_per_page")]
    per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    10
}

async fn list_handler(
    State(svc): State<MockService>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Response {
    if let Err(denied) = svc.check_auth(&headers) {
        return denied;
    }
    Json(AnalysisPage {
        analyses: vec![],
        total: 0,
        pages: 0,
        current_page: params.page,
    })
    .into_response()
}
