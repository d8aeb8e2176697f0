//! crxup API library
//!
//! HTTP handlers, middleware wiring and application setup for the update server.

mod api_doc;
mod handlers;
mod utils;

pub mod error;
pub mod setup;
pub mod state;

pub use api_doc::get_openapi_spec;
pub use error::{ErrorResponse, HttpAppError};
pub use handlers::upload::UploadResponse;
pub use state::AppState;
