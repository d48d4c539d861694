//! In-memory stand-in for the shipping API's Verify endpoint.
//!
//! Serves `GET /ShippingAPI.dll` the way the real service does: the request
//! document arrives URL-encoded in the `XML` query parameter and the answer
//! is always `200 OK` with an XML body, errors included. Addresses are
//! "verified" against a small canned directory keyed by street line; known
//! streets come back canonicalized and uppercased, unknown ones produce the
//! service's `Address Not Found.` error nested in their result slot.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use quick_xml::escape::escape;
use tokio::net::TcpListener;

/// A canonical directory entry, already in the uppercase form the real
/// service returns.
pub struct CannedRecord {
    pub address: &'static str,
    pub city: &'static str,
    pub state: &'static str,
    pub zip5: &'static str,
    pub zip4: &'static str,
}

/// Street line (lowercased) to canonical record.
const DIRECTORY: &[(&str, CannedRecord)] = &[
    (
        "6406 ivy lane",
        CannedRecord {
            address: "6406 IVY LN",
            city: "GREENBELT",
            state: "MD",
            zip5: "20770",
            zip4: "1441",
        },
    ),
    (
        "8 wildwood drive",
        CannedRecord {
            address: "8 WILDWOOD DR",
            city: "OLD LYME",
            state: "CT",
            zip5: "06371",
            zip4: "1844",
        },
    ),
    (
        "90 presidential plaza",
        CannedRecord {
            address: "90 PRESIDENTIAL PLZ",
            city: "SYRACUSE",
            state: "NY",
            zip5: "13202",
            zip4: "2237",
        },
    ),
];

pub fn lookup(street: &str) -> Option<&'static CannedRecord> {
    let street = street.trim().to_ascii_lowercase();
    DIRECTORY
        .iter()
        .find(|(key, _)| *key == street)
        .map(|(_, record)| record)
}

pub fn app(expected_user_id: &str) -> Router {
    let user_id: Arc<str> = Arc::from(expected_user_id);
    Router::new()
        .route("/ShippingAPI.dll", get(shipping_api))
        .with_state(user_id)
}

pub async fn run(listener: TcpListener, expected_user_id: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(expected_user_id)).await
}

async fn shipping_api(
    State(user_id): State<Arc<str>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let body = handle_verify(&user_id, &params);
    ([(header::CONTENT_TYPE, "text/xml")], body)
}

fn handle_verify(expected_user_id: &str, params: &HashMap<String, String>) -> String {
    if params.get("API").map(String::as_str) != Some("Verify") {
        return error_document("80040b1b", "API is not implemented by this server.");
    }
    let Some(xml) = params.get("XML") else {
        return error_document("80040b19", "XML Syntax Error: request document missing.");
    };
    let request = match parse_verify_request(xml) {
        Ok(request) => request,
        Err(_) => {
            return error_document(
                "80040b19",
                "XML Syntax Error: request document could not be parsed.",
            )
        }
    };
    if request.user_id != expected_user_id {
        return error_document(
            "80040b1a",
            "Authorization failure.  Perhaps username and/or password is incorrect.",
        );
    }

    tracing::info!(
        addresses = request.addresses.len(),
        "serving verify request"
    );
    respond_to(&request.addresses)
}

struct VerifyRequest {
    user_id: String,
    addresses: Vec<RequestedAddress>,
}

struct RequestedAddress {
    id: String,
    street: String,
}

fn parse_verify_request(xml: &str) -> Result<VerifyRequest, roxmltree::Error> {
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();
    let user_id = root.attribute("USERID").unwrap_or("").to_string();
    let addresses = root
        .children()
        .filter(|n| n.has_tag_name("Address"))
        .map(|node| RequestedAddress {
            id: node.attribute("ID").unwrap_or("").to_string(),
            street: node
                .children()
                .find(|n| n.has_tag_name("Address2"))
                .and_then(|n| n.text())
                .unwrap_or("")
                .to_string(),
        })
        .collect();
    Ok(VerifyRequest { user_id, addresses })
}

/// The root-level `<Error>` document the real service sends for request- and
/// auth-level failures.
fn error_document(number: &str, description: &str) -> String {
    format!(
        "<Error><Number>{}</Number><Description>{}</Description></Error>",
        escape(number),
        escape(description),
    )
}

fn respond_to(addresses: &[RequestedAddress]) -> String {
    let mut body = String::from("<?xml version=\"1.0\"?><AddressValidateResponse>");
    for requested in addresses {
        body.push_str(&format!("<Address ID=\"{}\">", escape(&requested.id)));
        match lookup(&requested.street) {
            Some(record) => {
                body.push_str(&format!(
                    "<Address2>{}</Address2><City>{}</City><State>{}</State>\
                     <Zip5>{}</Zip5><Zip4>{}</Zip4>",
                    escape(record.address),
                    escape(record.city),
                    escape(record.state),
                    escape(record.zip5),
                    escape(record.zip4),
                ));
            }
            None => {
                body.push_str(
                    "<Error><Number>-2147219401</Number>\
                     <Description>Address Not Found.</Description></Error>",
                );
            }
        }
        body.push_str("</Address>");
    }
    body.push_str("</AddressValidateResponse>");
    body
}
