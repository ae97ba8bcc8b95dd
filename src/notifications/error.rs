//! Notification System Error Types

use thiserror::Error;

/// Result type for notification operations
pub type NotificationResult<T> = Result<T, NotificationError>;

/// Errors that can occur in the notification system
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NotificationError {
    /// A producer supplied a field the store refuses to record
    #[error("Invalid notification field '{field}': {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    /// A string did not name a member of one of the closed enums
    #[error("Unknown {kind} '{value}'")]
    UnknownVariant {
        kind: &'static str,
        value: String,
    },

    /// A subscriber returned an error while handling a feed update
    #[error("Subscriber '{subscriber_id}' failed to handle update: {error}")]
    DeliveryFailed {
        subscriber_id: String,
        error: String,
    },

    /// Feed configuration rejected by validation
    #[error("Invalid feed configuration: {0}")]
    InvalidConfig(String),

    /// Operation timed out
    #[error("Operation '{operation}' timed out after {duration_ms}ms")]
    Timeout {
        operation: String,
        duration_ms: u64,
    },

    /// Generic error
    #[error("Notification error: {0}")]
    Generic(String),
}

impl NotificationError {
    /// Create an invalid field error
    pub fn invalid_field<S: Into<String>>(field: &'static str, reason: S) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Create an unknown variant error
    pub fn unknown_variant<S: Into<String>>(kind: &'static str, value: S) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.into(),
        }
    }

    /// Create a delivery failed error
    pub fn delivery_failed<S: Into<String>, E: Into<String>>(subscriber_id: S, error: E) -> Self {
        Self::DeliveryFailed {
            subscriber_id: subscriber_id.into(),
            error: error.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(operation: S, duration_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration_ms,
        }
    }

    /// Create a generic error
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }
}
