use crate::logging::LogLevel;
use crate::network::FetchError;

#[derive(Debug, Clone)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Chooses how loudly a failed source fetch is reported.
    pub fn classify_fetch_error(&self, error: &FetchError) -> LogLevel {
        match error {
            // Non-critical: rate limiting, shutdown
            FetchError::Http { status, .. } if *status == 429 => LogLevel::Debug,
            FetchError::Cancelled => LogLevel::Debug,
            FetchError::NotConfigured => LogLevel::Debug,

            // Temporary provider issues
            FetchError::Http { status, .. } if (500..=599).contains(status) => LogLevel::Warn,
            FetchError::Timeout(_) => LogLevel::Warn,
            FetchError::Network(_) => LogLevel::Warn,

            // Critical: auth, moved endpoints, changed response formats
            FetchError::Http { status, .. } if *status == 401 || *status == 403 => {
                LogLevel::Error
            }
            FetchError::Http { status, .. } if *status == 404 => LogLevel::Error,
            FetchError::Decode(_) => LogLevel::Error,
            FetchError::Shape(_) => LogLevel::Error,

            _ => LogLevel::Warn,
        }
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn http(status: u16) -> FetchError {
        FetchError::Http {
            status,
            message: String::new(),
        }
    }

    #[test]
    fn test_classify_fetch_errors() {
        let classifier = ErrorClassifier::new();
        assert_eq!(classifier.classify_fetch_error(&http(429)), LogLevel::Debug);
        assert_eq!(classifier.classify_fetch_error(&http(502)), LogLevel::Warn);
        assert_eq!(classifier.classify_fetch_error(&http(403)), LogLevel::Error);
        assert_eq!(classifier.classify_fetch_error(&http(404)), LogLevel::Error);
        assert_eq!(classifier.classify_fetch_error(&http(418)), LogLevel::Warn);
        assert_eq!(
            classifier.classify_fetch_error(&FetchError::Timeout(Duration::from_secs(10))),
            LogLevel::Warn
        );
        assert_eq!(
            classifier.classify_fetch_error(&FetchError::shape("no rows")),
            LogLevel::Error
        );
        assert_eq!(
            classifier.classify_fetch_error(&FetchError::Cancelled),
            LogLevel::Debug
        );
    }
}
