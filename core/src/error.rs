//! Error types for the Verify API client.
//!
//! # Design
//! Two layers of failure exist and they never mix. `UspsError` is the
//! code/description pair the service attaches to a single address; it is
//! returned *inside* the result list so sibling addresses still come back.
//! `VerifyError` covers everything that invalidates the whole call —
//! validation before the network, transport problems, and structural or
//! service-level faults in the response — and is returned as the call's
//! `Err`. Callers therefore distinguish the two by position, not by
//! inspecting error contents.

use std::fmt;

/// An error the service reported, as a code/description pair.
///
/// Appears embedded in a result list when only one address failed, and inside
/// [`VerifyError::Service`] when the whole request was rejected (for example
/// an authorization failure).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UspsError {
    pub code: String,
    pub description: String,
}

impl UspsError {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for UspsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.description)
    }
}

impl std::error::Error for UspsError {}

/// Errors that abort a verify call as a whole.
///
/// When any of these is returned the caller never sees a partial result
/// list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// More addresses were supplied than the service accepts per request.
    /// Raised before any network access: the service would silently truncate
    /// instead of erroring, which would corrupt positional correspondence.
    TooManyAddresses { count: usize },

    /// The request or response document could not be encoded/decoded as XML.
    Xml(String),

    /// The transport collaborator failed to complete the exchange.
    Transport(String),

    /// The server answered with a non-200 status.
    Http { status: u16, body: String },

    /// The service rejected the whole request, e.g. an authorization
    /// failure.
    Service(UspsError),

    /// A well-formed response carried neither address nor error information.
    NoResults,

    /// A result element's positional ID did not match its position, so the
    /// response cannot be correlated with the request.
    OutOfOrder { index: usize, id: String },

    /// The response carried a different number of results than addresses
    /// were requested.
    CountMismatch { requested: usize, returned: usize },
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyError::TooManyAddresses { count } => {
                write!(
                    f,
                    "only {} addresses are allowed per request, got {count}",
                    crate::request::ADDRESS_MAX
                )
            }
            VerifyError::Xml(msg) => write!(f, "invalid XML: {msg}"),
            VerifyError::Transport(msg) => write!(f, "transport failed: {msg}"),
            VerifyError::Http { status, body } => write!(f, "HTTP {status}: {body}"),
            VerifyError::Service(err) => write!(f, "service error: {err}"),
            VerifyError::NoResults => {
                write!(f, "could not find any address or error information")
            }
            VerifyError::OutOfOrder { index, id } => write!(
                f,
                "addresses were not returned in the order they were requested \
                 (expected ID {index}, got {id:?})"
            ),
            VerifyError::CountMismatch {
                requested,
                returned,
            } => write!(
                f,
                "requested {requested} addresses but the response contained {returned}"
            ),
        }
    }
}

impl std::error::Error for VerifyError {}
