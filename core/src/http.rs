//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! The Verify API is a single GET endpoint with the whole request document
//! carried in the query string, so a request is nothing but a URL and a
//! response is a status plus a body. The core builds `HttpRequest` values and
//! parses `HttpResponse` values without touching the network; the `Transport`
//! trait is the seam where a caller (or the bundled `verify` convenience
//! path) plugs in the actual exchange.
//!
//! All fields use owned types so values can be moved across threads or
//! stored without lifetime concerns.

use std::fmt;

/// An HTTP request described as plain data.
///
/// The Verify API takes everything in the URL: there is no method choice, no
/// headers, and no body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
}

/// An HTTP response described as plain data.
///
/// Constructed by the transport after executing an `HttpRequest`, then
/// passed to `UspsClient::parse_verify` for decoding.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Failure reported by a [`Transport`] implementation.
///
/// Deliberately opaque: the core maps it into
/// [`VerifyError::Transport`](crate::error::VerifyError) without inspecting
/// it, so implementations can stringify whatever their HTTP stack reports.
#[derive(Debug, Clone)]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for TransportError {}

/// The blocking network collaborator.
///
/// Invoked exactly once per verify call. Implementations should return the
/// response as-is, including non-200 statuses; status interpretation belongs
/// to the core.
pub trait Transport {
    fn fetch(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}
