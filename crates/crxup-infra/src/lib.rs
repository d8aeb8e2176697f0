//! crxup infrastructure library
//!
//! Shared HTTP middleware (request ID, security headers) and tracing initialization.

pub mod middleware;
pub mod telemetry;

// Re-export commonly used types
pub use middleware::{
    get_request_id, request_id_middleware, security_headers_middleware, RequestId,
    SecurityHeaders,
};
pub use telemetry::init_telemetry;
