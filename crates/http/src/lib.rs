//! Voltbay HTTP client
//!
//! Typed wrappers over the marketplace REST API plus the authenticated
//! request path: bearer injection, a single-flight token refresh shared
//! by all concurrent callers, one transparent replay per request, and a
//! debounced session-expiry signal on irrecoverable failure.

pub mod client;
pub mod types;

pub use client::error::ClientError;
pub use client::{VoltbayClient, VoltbayClientBuilder};
