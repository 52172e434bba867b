/// Shared error type used across all LabGate crates.
///
/// The three per-call failure kinds (`Validation`, `Remote`, `Connectivity`)
/// are mutually exclusive; the remaining variants occur only outside the
/// dispatch path (bootstrap, serialization plumbing).
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Caller-side contract violation, raised before any network call.
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    /// The remote API replied with a non-success status.
    #[error("{status}: {message}")]
    Remote { status: u16, message: String },

    /// The transport could not complete the exchange at all
    /// (DNS, connection refused, timeout, TLS).
    #[error("{0}")]
    Connectivity(String),

    #[error("config: {0}")]
    Config(String),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a validation failure naming `field`.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The offending field, when this is a validation failure.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
