//! Async boundary to the analysis service.
//!
//! Three pieces, layered:
//!
//! - [`SessionContext`]: the bearer token threaded into every
//!   authenticated call; acquired on login, cleared on logout or the
//!   first 401.
//! - [`ApiClient`]: a thin, cloneable wrapper over `reqwest` speaking
//!   the service's REST contract.
//! - [`JobTracker`]: drives one analysis job to a terminal state by
//!   polling its status endpoint, with cooperative cancellation and a
//!   bounded total polling duration.
//!
//! The tracker knows nothing about rendering and the annotation engine
//! knows nothing about the tracker; they meet only in the caller's hands.

pub mod api;
pub mod error;
pub mod session;
pub mod tracker;

pub use api::ApiClient;
pub use error::ClientError;
pub use session::SessionContext;
pub use tracker::{JobTracker, PollPolicy, TrackerState};
