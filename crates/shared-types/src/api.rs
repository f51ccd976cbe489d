//! Wire envelopes for the analysis service REST API.
//!
//! Job state always travels in the explicit `status` field of
//! [`AnalysisStatusResponse`]; HTTP status codes carry transport meaning
//! only and never encode whether a job is still running.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AnalysisResult, JobStatus};

/// Body of `GET /api/analysis/status/{id}`.
///
/// `result` is present exactly when `status` is `completed`;
/// `error_message` accompanies `failed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisStatusResponse {
    pub analysis_id: String,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Body of `POST /api/analysis/start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartAnalysisRequest {
    pub document_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartAnalysisResponse {
    pub analysis_id: String,
    pub status: JobStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub username: String,
}

/// Returned by both `register` and `login`; the token goes into the
/// session context for every later call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// One row of the paginated analysis history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisListEntry {
    pub analysis_id: String,
    pub document_id: String,
    pub status: JobStatus,
    pub overall_similarity: f64,
    pub created_at: DateTime<Utc>,
}

/// Body of `GET /api/analysis/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisPage {
    pub analyses: Vec<AnalysisListEntry>,
    pub total: u64,
    pub pages: u32,
    pub current_page: u32,
}

/// Error body every non-2xx response carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}
