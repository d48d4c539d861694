//! Stateless request builder and response parser for the Verify API.
//!
//! # Design
//! `UspsClient` holds only the service endpoint and the caller's `USERID`
//! credential and carries no mutable state between calls. The verify
//! operation is split into a `build_verify` method that produces an
//! `HttpRequest` and a `parse_verify` method that consumes an
//! `HttpResponse`; the [`Transport`] collaborator executes the single HTTP
//! round-trip in between. `verify` composes all three for callers that do
//! not need the pieces separately.

use crate::error::VerifyError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::request::build_verify_request;
use crate::response::parse_verify_response;
use crate::types::{AddressRequest, AddressResult};

/// Production endpoint of the shipping API.
pub const API_URL: &str = "https://production.shippingapis.com/ShippingAPI.dll";

/// Synchronous, stateless client for the Verify API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. Cloning is cheap and clones share nothing.
#[derive(Debug, Clone)]
pub struct UspsClient {
    api_url: String,
    user_id: String,
}

impl UspsClient {
    /// Client against the production endpoint.
    pub fn new(user_id: &str) -> Self {
        Self::with_api_url(API_URL, user_id)
    }

    /// Client against a non-default endpoint, e.g. a local test server.
    pub fn with_api_url(api_url: &str, user_id: &str) -> Self {
        Self {
            api_url: api_url.to_string(),
            user_id: user_id.to_string(),
        }
    }

    /// Build the GET request for verifying `addresses`.
    ///
    /// The request document travels URL-encoded in the `XML` query
    /// parameter; there is no request body.
    pub fn build_verify(&self, addresses: &[AddressRequest]) -> Result<HttpRequest, VerifyError> {
        let xml = build_verify_request(&self.user_id, addresses)?;
        let params = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("API", "Verify")
            .append_pair("XML", &xml)
            .finish();
        Ok(HttpRequest {
            url: format!("{}?{}", self.api_url, params),
        })
    }

    /// Decode a verify response for a request that carried `requested`
    /// addresses.
    pub fn parse_verify(
        &self,
        response: HttpResponse,
        requested: usize,
    ) -> Result<Vec<AddressResult>, VerifyError> {
        if response.status != 200 {
            return Err(VerifyError::Http {
                status: response.status,
                body: response.body,
            });
        }
        parse_verify_response(&response.body, requested)
    }

    /// Verify a batch of addresses in one exchange.
    ///
    /// Returns one result per input address, in input order: the verified
    /// record, or the error the service reported for that address. Failures
    /// that invalidate the whole call are returned as `Err` and never mix
    /// with partial results.
    ///
    /// An empty input short-circuits to an empty list without touching the
    /// transport. Otherwise `transport` is invoked exactly once.
    pub fn verify<T, I>(
        &self,
        transport: &T,
        addresses: I,
    ) -> Result<Vec<AddressResult>, VerifyError>
    where
        T: Transport + ?Sized,
        I: IntoIterator<Item = AddressRequest>,
    {
        let addresses: Vec<AddressRequest> = addresses.into_iter().collect();
        if addresses.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(count = addresses.len(), "building verify request");
        let request = self.build_verify(&addresses)?;
        let response = transport
            .fetch(&request)
            .map_err(|e| VerifyError::Transport(e.message))?;
        tracing::debug!(
            status = response.status,
            bytes = response.body.len(),
            "verify response received"
        );
        self.parse_verify(response, addresses.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UspsError;
    use crate::http::TransportError;
    use std::cell::RefCell;

    /// Transport stub that answers with a canned response and records the
    /// URLs it was asked to fetch.
    struct StubTransport {
        response: Result<HttpResponse, TransportError>,
        fetched: RefCell<Vec<String>>,
    }

    impl StubTransport {
        fn ok(status: u16, body: &str) -> Self {
            Self {
                response: Ok(HttpResponse {
                    status,
                    body: body.to_string(),
                }),
                fetched: RefCell::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                response: Err(TransportError::new(message)),
                fetched: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for StubTransport {
        fn fetch(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.fetched.borrow_mut().push(request.url.clone());
            self.response.clone()
        }
    }

    /// Transport that must never be reached.
    struct UnreachableTransport;

    impl Transport for UnreachableTransport {
        fn fetch(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            panic!("transport must not be invoked");
        }
    }

    fn greenbelt() -> AddressRequest {
        let mut addr = AddressRequest::new("6406 Ivy Lane", "Greenbelt");
        addr.state = Some("MD".to_string());
        addr.zip_code = Some("20770".to_string());
        addr
    }

    #[test]
    fn build_verify_url_matches_the_wire_format() {
        let client = UspsClient::new("foo_id");
        let req = client.build_verify(&[greenbelt()]).unwrap();
        assert_eq!(
            req.url,
            "https://production.shippingapis.com/ShippingAPI.dll?API=Verify&XML=%3CAddressValidateRequest+USERID%3D%22foo_id%22%3E%3CAddress+ID%3D%220%22%3E%3CAddress1%2F%3E%3CAddress2%3E6406+Ivy+Lane%3C%2FAddress2%3E%3CCity%3EGreenbelt%3C%2FCity%3E%3CState%3EMD%3C%2FState%3E%3CZip5%3E20770%3C%2FZip5%3E%3CZip4%3E%3C%2FZip4%3E%3C%2FAddress%3E%3C%2FAddressValidateRequest%3E"
        );
    }

    #[test]
    fn verify_round_trip_with_stub_transport() {
        let client = UspsClient::with_api_url("http://localhost:9999/ShippingAPI.dll", "foo_id");
        let transport = StubTransport::ok(
            200,
            r#"<?xml version="1.0"?><AddressValidateResponse><Address ID="0"><Address2>6406 IVY LN</Address2><City>GREENBELT</City><State>MD</State><Zip5>20770</Zip5><Zip4>1441</Zip4></Address></AddressValidateResponse>"#,
        );
        let results = client.verify(&transport, vec![greenbelt()]).unwrap();
        assert_eq!(results.len(), 1);
        let record = results[0].as_ref().unwrap();
        assert_eq!(record.get("address"), Some("6406 IVY LN"));
        assert_eq!(record.get("zip4"), Some("1441"));
        assert_eq!(transport.fetched.borrow().len(), 1);
    }

    #[test]
    fn empty_input_skips_the_transport() {
        let client = UspsClient::new("foo_id");
        let results = client.verify(&UnreachableTransport, Vec::new()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn too_many_addresses_fail_before_the_transport() {
        let client = UspsClient::new("foo_id");
        let addresses = vec![greenbelt(); 6];
        let err = client.verify(&UnreachableTransport, addresses).unwrap_err();
        assert_eq!(err, VerifyError::TooManyAddresses { count: 6 });
    }

    #[test]
    fn transport_failure_surfaces_as_verify_error() {
        let client = UspsClient::new("foo_id");
        let transport = StubTransport::failing("connection refused");
        let err = client.verify(&transport, vec![greenbelt()]).unwrap_err();
        assert_eq!(err, VerifyError::Transport("connection refused".to_string()));
    }

    #[test]
    fn non_200_status_surfaces_as_http_error() {
        let client = UspsClient::new("foo_id");
        let transport = StubTransport::ok(503, "unavailable");
        let err = client.verify(&transport, vec![greenbelt()]).unwrap_err();
        assert_eq!(
            err,
            VerifyError::Http {
                status: 503,
                body: "unavailable".to_string()
            }
        );
    }

    #[test]
    fn per_address_error_does_not_fail_the_call() {
        let client = UspsClient::new("foo_id");
        let transport = StubTransport::ok(
            200,
            r#"<?xml version="1.0"?><AddressValidateResponse><Address ID="0"><Error><Number>-2147219401</Number><Description>Address Not Found.</Description></Error></Address></AddressValidateResponse>"#,
        );
        let results = client.verify(&transport, vec![greenbelt()]).unwrap();
        assert_eq!(
            results,
            vec![Err(UspsError::new("-2147219401", "Address Not Found."))]
        );
    }

    #[test]
    fn root_error_fails_the_call() {
        let client = UspsClient::new("foo_id");
        let transport = StubTransport::ok(
            200,
            "<Error><Number>80040b1a</Number><Description>Authorization failure.</Description></Error>",
        );
        let err = client.verify(&transport, vec![greenbelt()]).unwrap_err();
        assert_eq!(
            err,
            VerifyError::Service(UspsError::new("80040b1a", "Authorization failure."))
        );
    }
}
