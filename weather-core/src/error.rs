use thiserror::Error;

/// Shown when the service cannot be reached at all.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error: Could not connect to the server";

/// Fallback for a failed lookup whose body carries no usable `detail`.
pub const LOOKUP_FALLBACK_MESSAGE: &str = "Failed to retrieve weather data.";

/// Fallback for a failed `POST /weather` whose body carries no usable `detail`.
pub const CREATE_FALLBACK_MESSAGE: &str = "Failed to create weather request.";

/// Failure of a single call to the weather service.
///
/// The `Display` text is what the view shows to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No response could be obtained (connect, DNS, reset, unreadable body).
    #[error("Network error: Could not connect to the server")]
    Transport { reason: String },

    /// The service answered with a non-success status or an unusable body.
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

impl LookupError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        LookupError::Transport { reason: err.to_string() }
    }
}

/// Precondition failures of the lookup form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("An identifier is required before submitting.")]
    EmptyIdentifier,
}
