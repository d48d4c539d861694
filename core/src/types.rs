//! Domain types for the Verify API.
//!
//! # Design
//! `AddressRequest` mirrors the fields the Verify API accepts. The two fields
//! the service requires are plain `String`s; everything else is `Option` so
//! an absent field never has to be spelled as an empty sentinel value.
//! `ResolvedAddress` keeps its fields as an ordered `(name, value)` list
//! because the service defines the field order of its responses and callers
//! observe it when iterating.

use serde::{Deserialize, Serialize};

use crate::error::UspsError;

/// One address submitted for verification.
///
/// `address` is the primary street line and `city` the city name; both are
/// required by the service. The remaining fields are optional and are sent
/// only when present (or as empty elements, depending on the wire schema).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRequest {
    /// Primary street line (wire tag `Address2`).
    pub address: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Zip code in any of the forms `20770`, `207701441`, `20770-1441`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    /// Secondary line such as a suite or apartment (wire tag `Address1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_extended: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firm_name: Option<String>,
    /// Puerto Rico urbanization name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urbanization: Option<String>,
}

impl AddressRequest {
    /// Create a request with the two required fields; optional fields start
    /// out absent and can be filled in directly.
    pub fn new(address: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            city: city.into(),
            state: None,
            zip_code: None,
            address_extended: None,
            firm_name: None,
            urbanization: None,
        }
    }
}

/// A verified address as returned by the service.
///
/// Fields are kept in the order the response document listed them, with tag
/// names normalized to the same vocabulary `AddressRequest` uses
/// (`Address2` → `address`, `Address1` → `address_extended`,
/// `FirmName` → `firm_name`, everything else lower-cased).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedAddress {
    fields: Vec<(String, String)>,
}

impl ResolvedAddress {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn from_pairs(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Value of the first field with the given normalized name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Fields in the order the response document listed them.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn push(&mut self, name: String, value: String) {
        self.fields.push((name, value));
    }
}

/// Outcome for one submitted address: the verified record, or the error the
/// service reported for that address alone.
///
/// Whole-call failures use [`VerifyError`](crate::error::VerifyError) instead
/// and never appear inside a result list.
pub type AddressResult = Result<ResolvedAddress, UspsError>;
