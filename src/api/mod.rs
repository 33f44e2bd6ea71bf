//! Triage HTTP API.
//!
//! Exposes the triage engine as JSON endpoints for the clinician-facing
//! app. `triage_api_router()` returns a `Router` that can be mounted on
//! any axum server; `start_triage_api_server()` runs one.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::triage_api_router;
pub use server::{start_triage_api_server, TriageApiServer, TriageApiSession};
pub use types::ApiContext;
