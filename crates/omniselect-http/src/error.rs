use omniselect_core::ProviderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error from {0}: {1}")]
    Api(String, String),

    #[error("rate limit from {0}, retry after {1}s")]
    RateLimit(String, u64),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, HttpError>;

impl From<HttpError> for ProviderError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Http(_) | HttpError::RateLimit(..) => {
                ProviderError::Unavailable(err.to_string())
            }
            HttpError::Api(..) | HttpError::Parse(_) => ProviderError::Failed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_is_unavailable() {
        let err: ProviderError = HttpError::RateLimit("example.org".to_string(), 30).into();
        assert_eq!(
            err,
            ProviderError::Unavailable("rate limit from example.org, retry after 30s".to_string())
        );
    }

    #[test]
    fn test_api_error_is_failure() {
        let err: ProviderError = HttpError::Api("u".to_string(), "HTTP 500: oops".to_string()).into();
        assert!(matches!(err, ProviderError::Failed(msg) if msg.contains("HTTP 500")));
    }
}
