// SPDX-FileCopyrightText: 2026 bilicomments Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared by every bilicomments crate.

use thiserror::Error;

/// The primary error type used across the fetch pipeline and the tool front-end.
#[derive(Debug, Error)]
pub enum BiliError {
    /// Caller-supplied arguments were rejected before any network call.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors (bad header values, client construction).
    #[error("configuration error: {0}")]
    Config(String),

    /// A single transport-level failure (connect, DNS, 5xx, socket timeout).
    ///
    /// This is what an operation inside the retry executor fails with; it is
    /// never surfaced to the caller directly once retries are exhausted.
    #[error("{message}")]
    Network {
        message: String,
        timed_out: bool,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The platform answered with a non-zero envelope code.
    #[error("Bilibili API error ({code}): {message}")]
    Api { code: i64, message: String },

    /// Retries exhausted and the last failure was a timeout.
    #[error("{label}: request timed out, please try again later")]
    Timeout { label: String },

    /// Retries exhausted with a generic network failure.
    #[error("{label}: {message}")]
    RequestFailed { label: String, message: String },

    /// Signing keys could not be obtained or were malformed.
    #[error("signing error: {0}")]
    Signing(String),

    /// A response body did not match the expected wire shape.
    #[error("malformed response: {0}")]
    Decode(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BiliError {
    /// Builds a [`BiliError::Network`] from any transport error.
    pub fn network(
        message: impl Into<String>,
        timed_out: bool,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: message.into(),
            timed_out,
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error is timeout-classified.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Network {
                timed_out: true,
                ..
            } | Self::Timeout { .. }
        )
    }

    /// Whether this error belongs to the "invalid input" class.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Known platform codes with a local human-readable message.
const API_ERROR_MESSAGES: &[(i64, &str)] = &[
    (-101, "not logged in or the cookie has expired"),
    (-403, "insufficient permissions"),
    (-404, "content does not exist or has been deleted"),
    (-500, "internal server error, please try again later"),
    (65531, "endpoint is offline or the parameters are wrong"),
];

/// Returns the local message for a known platform code, or `fallback` verbatim.
pub fn api_error_message(code: i64, fallback: &str) -> String {
    API_ERROR_MESSAGES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, msg)| (*msg).to_string())
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_are_mapped() {
        assert_eq!(
            api_error_message(-101, "default"),
            "not logged in or the cookie has expired"
        );
        assert_eq!(api_error_message(-403, "default"), "insufficient permissions");
        assert_eq!(
            api_error_message(-404, "default"),
            "content does not exist or has been deleted"
        );
    }

    #[test]
    fn unknown_code_passes_platform_message_through() {
        assert_eq!(api_error_message(999, "something odd"), "something odd");
    }

    #[test]
    fn timeout_classification() {
        let timed_out = BiliError::Network {
            message: "deadline".into(),
            timed_out: true,
            source: None,
        };
        let reset = BiliError::Network {
            message: "connection reset".into(),
            timed_out: false,
            source: None,
        };
        assert!(timed_out.is_timeout());
        assert!(!reset.is_timeout());
        assert!(!BiliError::Internal("x".into()).is_timeout());
    }

    #[test]
    fn exhausted_messages_carry_label() {
        let err = BiliError::RequestFailed {
            label: "fetching comments failed".into(),
            message: "connection reset".into(),
        };
        assert_eq!(err.to_string(), "fetching comments failed: connection reset");

        let err = BiliError::Timeout {
            label: "fetching comments failed".into(),
        };
        assert_eq!(err.to_string(), "fetching comments failed: request timed out, please try again later");
    }
}
