//! Error type shared by the gateway and every operation built on it.

use controlroom_util::http::status_error_message;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlRoomError {
    /// The remote answered with a status outside {200, 201}.
    #[error("{operation} failed with HTTP {status}: {body}")]
    Remote { operation: String, status: u16, body: String },

    #[error("{operation} could not reach Control Room: {message}")]
    Transport { operation: String, message: String },

    #[error("{operation} returned an unreadable response: {message}")]
    Decode { operation: String, message: String },

    #[error("invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("configuration error: {message}")]
    Config { message: String },
}

impl ControlRoomError {
    pub fn remote(operation: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Remote {
            operation: operation.into(),
            status,
            body: body.into(),
        }
    }

    pub fn transport(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn decode(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// HTTP status of a remote failure, if this error came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Remediation hint for well-known remote statuses.
    pub fn hint(&self) -> Option<String> {
        self.status().and_then(status_error_message)
    }
}
