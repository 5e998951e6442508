//! Error types for s3edit-core

use thiserror::Error;

/// Result type alias using s3edit-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// The remote operation that produced a non-success status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    Put,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Get => write!(f, "GET"),
            Operation::Put => write!(f, "PUT"),
        }
    }
}

/// Core error types for s3edit
#[derive(Error, Debug)]
pub enum Error {
    /// Requested profile has no section in the credentials file
    #[error("Unknown profile: {profile}")]
    UnknownProfile { profile: String },

    /// No usable access key or secret key after resolution
    #[error("Missing credentials: {message}")]
    MissingCredentials { message: String },

    /// Invalid bucket or object path
    #[error("Invalid object location: {message}")]
    InvalidLocation { message: String },

    /// Remote returned a non-success status; the body carries the
    /// provider's error payload
    #[error("{operation} returned HTTP {status}")]
    RemoteStatus {
        operation: Operation,
        status: u16,
        body: String,
    },

    /// Connection-level failure (DNS, TCP, TLS, timeout)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// External editor failed to launch or exited non-zero
    #[error("Editor session failed: {message}")]
    Editor { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an unknown profile error
    pub fn unknown_profile(profile: impl Into<String>) -> Self {
        Self::UnknownProfile {
            profile: profile.into(),
        }
    }

    /// Create a missing credentials error
    pub fn missing_credentials(message: impl Into<String>) -> Self {
        Self::MissingCredentials {
            message: message.into(),
        }
    }

    /// Create an invalid location error
    pub fn invalid_location(message: impl Into<String>) -> Self {
        Self::InvalidLocation {
            message: message.into(),
        }
    }

    /// Create a remote status error
    pub fn remote_status(operation: Operation, status: u16, body: impl Into<String>) -> Self {
        Self::RemoteStatus {
            operation,
            status,
            body: body.into(),
        }
    }

    /// Create an editor session error
    pub fn editor(message: impl Into<String>) -> Self {
        Self::Editor {
            message: message.into(),
        }
    }
}
