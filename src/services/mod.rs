//! Application services orchestrating the form, the session and the network.
use std::collections::BTreeMap;

use crate::domain::ValidationErrorSet;

pub mod form;
pub mod session;
pub mod submission;

/// Convenience alias for submission results.
pub type SubmissionResult<T> = Result<T, SubmissionError>;

/// Errors surfaced while sending a listing.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("missing credential")]
    MissingCredential,
    #[error("failed to build request payload")]
    Payload(#[source] reqwest::Error),
    #[error("failed to reach listing service")]
    Transport(#[source] reqwest::Error),
    #[error("listing service responded with status {status}")]
    Rejected { status: u16 },
    #[error("unexpected response")]
    UnexpectedResponse,
}

/// Reasons the form declined to start a submission.
#[derive(Debug, thiserror::Error)]
pub enum SubmitRefused {
    #[error("a submission is already in flight")]
    InFlight,
    #[error("invalid form input: {0}")]
    Invalid(ValidationErrorSet),
}

/// Errors surfaced by the login exchange.
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("invalid form input")]
    Validation(BTreeMap<String, String>),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("failed to reach identity provider")]
    Transport(#[source] reqwest::Error),
    #[error("session already established")]
    AlreadyAuthenticated,
}
