//! omniselect-http — serve select options from a JSON HTTP endpoint.

pub mod client;
pub mod error;
pub mod source;

pub use client::RateLimitedClient;
pub use error::{HttpError, Result};
pub use source::HttpOptionProvider;
