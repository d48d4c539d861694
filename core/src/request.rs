//! Request document builder for the Verify API.
//!
//! # Design
//! The wire schema fixes the child order of every `<Address>` element:
//! optional firm name, extended line, primary line, city, state, optional
//! urbanization, zip5, zip4. The remote service also silently truncates
//! requests with more than [`ADDRESS_MAX`] addresses instead of rejecting
//! them, so the cap is enforced here, before anything touches the network.
//!
//! Absent fields come in two flavors, both dictated by the schema:
//! `FirmName` and `Urbanization` are omitted entirely, while `Address1`,
//! `State`, `Zip5` and `Zip4` are always present and become self-closing
//! empty elements.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::VerifyError;
use crate::types::AddressRequest;

/// Maximum number of addresses the service accepts per request.
pub const ADDRESS_MAX: usize = 5;

/// Serialize `addresses` into an `<AddressValidateRequest>` document.
///
/// Each `<Address>` element carries an `ID` attribute equal to its index in
/// `addresses`; the response interpreter later uses those IDs to check that
/// the service preserved request order.
pub fn build_verify_request(
    user_id: &str,
    addresses: &[AddressRequest],
) -> Result<String, VerifyError> {
    if addresses.len() > ADDRESS_MAX {
        return Err(VerifyError::TooManyAddresses {
            count: addresses.len(),
        });
    }

    let mut writer = Writer::new(Vec::new());
    let mut root = BytesStart::new("AddressValidateRequest");
    root.push_attribute(("USERID", user_id));
    write(&mut writer, Event::Start(root))?;

    for (i, addr) in addresses.iter().enumerate() {
        let id = i.to_string();
        let mut element = BytesStart::new("Address");
        element.push_attribute(("ID", id.as_str()));
        write(&mut writer, Event::Start(element))?;

        if let Some(firm_name) = addr.firm_name.as_deref() {
            write_field(&mut writer, "FirmName", Some(firm_name))?;
        }
        write_field(&mut writer, "Address1", addr.address_extended.as_deref())?;
        write_field(&mut writer, "Address2", Some(&addr.address))?;
        write_field(&mut writer, "City", Some(&addr.city))?;
        write_field(&mut writer, "State", addr.state.as_deref())?;
        if let Some(urbanization) = addr.urbanization.as_deref() {
            write_field(&mut writer, "Urbanization", Some(urbanization))?;
        }

        let (zip5, zip4) = match addr.zip_code.as_deref() {
            Some(zip_code) => {
                let (zip5, zip4) = split_zip(zip_code);
                (Some(zip5), Some(zip4))
            }
            None => (None, None),
        };
        write_field(&mut writer, "Zip5", zip5)?;
        write_field(&mut writer, "Zip4", zip4)?;

        write(&mut writer, Event::End(BytesEnd::new("Address")))?;
    }

    write(
        &mut writer,
        Event::End(BytesEnd::new("AddressValidateRequest")),
    )?;
    String::from_utf8(writer.into_inner()).map_err(|e| VerifyError::Xml(e.to_string()))
}

/// Split a zip code into its zip5/zip4 parts.
///
/// Everything past the fifth character is zip4, with one leading `-`
/// stripped, so `20770`, `207701441` and `20770-1441` all normalize the same
/// way.
fn split_zip(zip_code: &str) -> (&str, &str) {
    if zip_code.len() <= 5 {
        return (zip_code, "");
    }
    let (zip5, rest) = zip_code.split_at(5);
    (zip5, rest.strip_prefix('-').unwrap_or(rest))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), VerifyError> {
    writer
        .write_event(event)
        .map_err(|e| VerifyError::Xml(e.to_string()))
}

/// Emit `<tag>text</tag>` when a value is present (even an empty one) and a
/// self-closing `<tag/>` when it is absent.
fn write_field(
    writer: &mut Writer<Vec<u8>>,
    tag: &str,
    text: Option<&str>,
) -> Result<(), VerifyError> {
    match text {
        Some(text) => {
            write(writer, Event::Start(BytesStart::new(tag)))?;
            write(writer, Event::Text(BytesText::new(text)))?;
            write(writer, Event::End(BytesEnd::new(tag)))
        }
        None => write(writer, Event::Empty(BytesStart::new(tag))),
    }
}
