//! HTTP client for the analysis service REST API.
//!
//! Endpoints:
//! - auth: register, login
//! - documents: upload, fetch
//! - analysis: start, status, paginated history
//!
//! Every non-2xx response is mapped into [`ClientError`]; a 401
//! additionally clears the session context so the caller lands on the
//! session-expired path exactly once.

use std::time::Duration;

use reqwest::{multipart, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use shared_types::{
    AnalysisPage, AnalysisStatusResponse, ApiErrorBody, AuthResponse, Document, LoginRequest,
    RegisterRequest, StartAnalysisRequest, StartAnalysisResponse,
};

use crate::error::ClientError;
use crate::session::SessionContext;

/// Per-request timeout; status polls are small payloads, uploads get
/// their own larger allowance.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Cheap to clone; clones share the connection pool and the session
/// context.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SessionContext,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: SessionContext) -> Result<Self, ClientError> {
        let base_url: String = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        let http = Client::builder()
            .user_agent(concat!("veritext/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// `POST /api/auth/register`: create an account and install its
    /// token into the session context.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        let response = self
            .http
            .post(self.url("/api/auth/register"))
            .json(request)
            .send()
            .await?;
        let auth: AuthResponse = self.read(response).await?;
        self.session.acquire(&auth.token);
        Ok(auth)
    }

    /// `POST /api/auth/login`: authenticate and install the token into
    /// the session context.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ClientError> {
        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(request)
            .send()
            .await?;
        let auth: AuthResponse = self.read(response).await?;
        self.session.acquire(&auth.token);
        Ok(auth)
    }

    /// Forget the session token. Purely client-side.
    pub fn logout(&self) {
        self.session.clear();
    }

    /// `POST /api/documents`: multipart upload of one document.
    pub async fn upload_document(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<Document, ClientError> {
        let part = multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = multipart::Form::new().part("file", part);
        let response = self
            .authed(self.http.post(self.url("/api/documents")))
            .timeout(UPLOAD_TIMEOUT)
            .multipart(form)
            .send()
            .await?;
        self.read(response).await
    }

    /// `GET /api/documents/{id}`.
    pub async fn get_document(&self, document_id: &str) -> Result<Document, ClientError> {
        let response = self
            .authed(
                self.http
                    .get(self.url(&format!("/api/documents/{document_id}"))),
            )
            .send()
            .await?;
        self.read(response).await
    }

    /// `POST /api/analysis/start`.
    pub async fn start_analysis(
        &self,
        document_id: &str,
    ) -> Result<StartAnalysisResponse, ClientError> {
        let request = StartAnalysisRequest {
            document_id: document_id.to_string(),
        };
        let response = self
            .authed(self.http.post(self.url("/api/analysis/start")))
            .json(&request)
            .send()
            .await?;
        self.read(response).await
    }

    /// `GET /api/analysis/status/{id}`: one status fetch; the job
    /// tracker owns the scheduling.
    pub async fn analysis_status(
        &self,
        analysis_id: &str,
    ) -> Result<AnalysisStatusResponse, ClientError> {
        debug!(analysis_id, "fetching analysis status");
        let response = self
            .authed(
                self.http
                    .get(self.url(&format!("/api/analysis/status/{analysis_id}"))),
            )
            .send()
            .await?;
        self.read(response).await
    }

    /// `GET /api/analysis/list`: paginated history.
    pub async fn list_analyses(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<AnalysisPage, ClientError> {
        let response = self
            .authed(self.http.get(self.url("/api/analysis/list")))
            .query(&[("page", page), ("per_page", per_page)])
            .send()
            .await?;
        self.read(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.bearer() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Map a response to a value or a [`ClientError`]. Clears the session
    /// on 401 so the caller's next move is a fresh login.
    async fn read<T: DeserializeOwned>(&self, response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.session.clear();
            return Err(ClientError::SessionExpired);
        }
        if !status.is_success() {
            let message = match response.json::<ApiErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            };
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }
}
