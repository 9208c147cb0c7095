//! Error types for the fcm-notify library
//!
//! Non-200 HTTP statuses are not errors here; they are surfaced as
//! [`SendOutcome::Rejected`](crate::response::SendOutcome) values so callers
//! can inspect the raw reply. Everything in this module is either a
//! construction-time validation failure or a transport/parse failure of a
//! single request.

use thiserror::Error;

/// Errors produced by message construction and request dispatch
#[derive(Error, Debug)]
pub enum FcmError {
    /// A caller-supplied value failed construction-time validation
    #[error("Invalid argument '{argument}': {reason}")]
    InvalidArgument {
        argument: String,
        reason: String,
    },

    /// The blocking HTTP client could not be built
    #[error("Failed to build HTTP client")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    /// A request failed at the transport level (DNS, connect, TLS, timeout)
    #[error("HTTP request failed: POST {url}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A status-200 reply carried a body that is not the expected JSON shape
    #[error("Failed to parse FCM reply body")]
    ResponseParse {
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using FcmError
pub type FcmResult<T> = Result<T, FcmError>;

impl FcmError {
    /// Create a new InvalidArgument error
    pub fn invalid_argument(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    /// Create a new Http error for a failed POST
    pub fn http(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            url: url.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_display_names_the_argument() {
        let err = FcmError::invalid_argument("notification", "must be a JSON object");
        assert_eq!(
            err.to_string(),
            "Invalid argument 'notification': must be a JSON object"
        );
    }
}
