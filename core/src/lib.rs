//! Synchronous client core for the USPS Verify address-verification API.
//!
//! # Overview
//! Builds the XML request document for a batch of up to five addresses,
//! and parses the XML response back into one result per address — the
//! verified record, or the error the service reported for that address.
//! The HTTP round-trip itself happens behind the [`Transport`] trait
//! (host-does-IO pattern), keeping the core deterministic and testable.
//!
//! # Design
//! - `UspsClient` is stateless — it holds only the endpoint and `USERID`.
//! - The operation is split into `build_verify` (produces request) and
//!   `parse_verify` (consumes response), so the I/O boundary is explicit;
//!   `verify` composes the two around a single `Transport::fetch`.
//! - Per-address failures come back *inside* the result list as
//!   [`UspsError`] values; everything that invalidates the whole call is a
//!   [`VerifyError`]. A caller never sees partial results for a failed call.
//! - Each `<Address>` element is tagged with its input index, and the parser
//!   refuses responses whose IDs do not line up with those indices.

pub mod client;
pub mod error;
pub mod http;
pub mod request;
pub mod response;
pub mod types;

pub use client::{UspsClient, API_URL};
pub use error::{UspsError, VerifyError};
pub use http::{HttpRequest, HttpResponse, Transport, TransportError};
pub use request::{build_verify_request, ADDRESS_MAX};
pub use response::parse_verify_response;
pub use types::{AddressRequest, AddressResult, ResolvedAddress};
