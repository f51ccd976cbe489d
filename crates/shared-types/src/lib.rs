pub mod api;
pub mod types;

pub use api::{
    AnalysisListEntry, AnalysisPage, AnalysisStatusResponse, ApiErrorBody, AuthResponse,
    LoginRequest, RegisterRequest, StartAnalysisRequest, StartAnalysisResponse, UserProfile,
};
pub use types::{AnalysisResult, Document, JobStatus, MatchSpan, MatchType, SimilarityMatch};
