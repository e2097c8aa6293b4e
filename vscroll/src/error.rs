use rowdom::DomError;
use thiserror::Error;

/// Errors returned by [`VirtualScroller`](crate::VirtualScroller) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScrollerError {
    /// A construction argument was rejected.
    #[error("invalid configuration: `{field}` {reason}")]
    InvalidConfiguration {
        /// The offending setting.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// The scroller was used after `destroy`.
    #[error("scroller has been destroyed")]
    Destroyed,

    /// The element tree rejected an operation.
    #[error(transparent)]
    Dom(#[from] DomError),
}

impl ScrollerError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}

/// Error returned by a row builder when a row cannot be produced.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RowError {
    /// Error message
    pub message: String,
}

impl RowError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for RowError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<DomError> for RowError {
    fn from(err: DomError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<String> for RowError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for RowError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
