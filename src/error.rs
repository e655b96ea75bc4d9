// Crossfade error types
//
// Every failure in the sequencer is recoverable: the primary guarantee is
// that the page always becomes interactive, so callers log these and
// proceed without the optional effect instead of aborting.

use std::fmt;

/// Errors that can occur while sequencing loads and transitions
#[derive(Debug)]
pub enum SequencerError {
    /// A bounded wait elapsed before the awaited work settled
    Timeout {
        operation: String,
        duration_ms: u64,
    },

    /// An anchor element never appeared within the retry cap
    AnchorNotFound(String),

    /// The host router rejected or failed a navigation
    Router(String),

    /// A destination could not be parsed as a URL
    InvalidDestination(String),
}

impl fmt::Display for SequencerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout {
                operation,
                duration_ms,
            } => {
                write!(f, "Timeout after {}ms waiting for: {}", duration_ms, operation)
            }
            Self::AnchorNotFound(anchor) => {
                write!(f, "Anchor '#{}' never appeared; scrolled without it", anchor)
            }
            Self::Router(msg) => write!(f, "Router failed: {}", msg),
            Self::InvalidDestination(dest) => {
                write!(f, "Destination is not a valid URL: '{}'", dest)
            }
        }
    }
}

impl std::error::Error for SequencerError {}

impl From<url::ParseError> for SequencerError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidDestination(err.to_string())
    }
}

/// Result type for sequencer operations
pub type SequencerResult<T> = Result<T, SequencerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SequencerError::Timeout {
            operation: "tracked promises".to_string(),
            duration_ms: 10_000,
        };
        assert!(err.to_string().contains("10000ms"));
        assert!(err.to_string().contains("tracked promises"));

        let err = SequencerError::AnchorNotFound("pricing".to_string());
        assert!(err.to_string().contains("#pricing"));
    }

    #[test]
    fn test_url_error_conversion() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err: SequencerError = parse_err.into();
        assert!(matches!(err, SequencerError::InvalidDestination(_)));
    }
}
