//! Response document interpreter for the Verify API.
//!
//! # Design
//! Errors in a response live at two levels and are kept strictly apart. A
//! root-level `<Error>` invalidates the whole call and surfaces as
//! [`VerifyError::Service`]. An `<Error>` nested inside an `<Address>`
//! element concerns that address alone and lands *inside* the result list,
//! so sibling addresses still decode normally.
//!
//! The positional `ID` attribute is a correlation check, not data: every
//! successful element must carry the index it was requested at. If any does
//! not, correspondence with the input cannot be established and the whole
//! call fails rather than returning misaligned records.

use roxmltree::{Document, Node};

use crate::error::{UspsError, VerifyError};
use crate::types::{AddressResult, ResolvedAddress};

/// Decode a Verify response document into one result per requested address.
///
/// `requested` is the number of addresses the request carried; the response
/// must account for every one of them, in order.
pub fn parse_verify_response(
    xml: &str,
    requested: usize,
) -> Result<Vec<AddressResult>, VerifyError> {
    let doc = Document::parse(xml).map_err(|e| VerifyError::Xml(e.to_string()))?;
    let root = doc.root_element();

    // Root-level error, e.g. an authorization failure.
    if let Some(err) = decode_error(root) {
        return Err(VerifyError::Service(err));
    }

    let elements: Vec<Node> = root
        .children()
        .filter(|n| n.has_tag_name("Address"))
        .collect();
    if elements.is_empty() {
        return Err(VerifyError::NoResults);
    }
    if elements.len() != requested {
        return Err(VerifyError::CountMismatch {
            requested,
            returned: elements.len(),
        });
    }

    let mut results = Vec::with_capacity(elements.len());
    for (i, element) in elements.iter().enumerate() {
        if let Some(err) = embedded_error(*element) {
            results.push(Err(err));
            continue;
        }
        let id = element.attribute("ID").unwrap_or("");
        if id != i.to_string() {
            return Err(VerifyError::OutOfOrder {
                index: i,
                id: id.to_string(),
            });
        }
        results.push(Ok(decode_address(*element)));
    }

    Ok(results)
}

/// Decode `node` as an `<Error>` element, if it is one.
fn decode_error(node: Node) -> Option<UspsError> {
    if !node.has_tag_name("Error") {
        return None;
    }
    let code = child_text(node, "Number");
    let description = child_text(node, "Description");
    Some(UspsError::new(code.trim(), description.trim()))
}

/// The `<Error>` nested inside an `<Address>` element, if any.
fn embedded_error(node: Node) -> Option<UspsError> {
    node.children()
        .find(|n| n.has_tag_name("Error"))
        .and_then(decode_error)
}

fn decode_address(node: Node) -> ResolvedAddress {
    let mut address = ResolvedAddress::new();
    for child in node.children().filter(|n| n.is_element()) {
        // children are yielded in document order
        let name = normalize_field_name(child.tag_name().name());
        address.push(name, child.text().unwrap_or("").to_string());
    }
    address
}

/// Map response tag names onto the request field vocabulary.
fn normalize_field_name(tag: &str) -> String {
    let name = tag.to_ascii_lowercase();
    match name.as_str() {
        "address2" => "address".to_string(),
        "address1" => "address_extended".to_string(),
        "firmname" => "firm_name".to_string(),
        _ => name,
    }
}

fn child_text<'a>(node: Node<'a, '_>, tag: &str) -> &'a str {
    node.children()
        .find(|n| n.has_tag_name(tag))
        .and_then(|n| n.text())
        .unwrap_or("")
}
