//! HTTP middleware
//!
//! Authentication middleware lives in [`crate::auth::middleware`]; this
//! module holds the cross-cutting layers.

pub mod security_headers;

pub use security_headers::security_headers_middleware;
