//! Core data models for vehicle registration lookups
//!
//! This module contains the fixed label list, the field mapping produced by the
//! extractor, the cached result payload and the lookup error taxonomy.

pub mod fetch;
pub mod vehicle;

pub use fetch::{Fetcher, HttpFetcher};
pub use vehicle::{VehicleClient, VehicleLookup};

use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

/// Field labels sought on a registration record page, in output order
pub const LABELS: [&str; 22] = [
    "Owner Name",
    "Father's Name",
    "Owner Serial No",
    "Model Name",
    "Maker Model",
    "Vehicle Class",
    "Fuel Type",
    "Fuel Norms",
    "Registration Date",
    "Insurance Company",
    "Insurance No",
    "Insurance Expiry",
    "Insurance Upto",
    "Fitness Upto",
    "Tax Upto",
    "PUC No",
    "PUC Upto",
    "Financier Name",
    "Registered RTO",
    "Address",
    "City Name",
    "Phone",
];

/// Errors that end a lookup without a result
///
/// Neither variant is ever cached: they mean "upstream trouble, retry later",
/// as opposed to a completed lookup that found nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Transport failure, timeout or non-success status from upstream
    #[error("Network error: {0}")]
    Fetch(String),

    /// Upstream body could not be turned into a document
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Extracted value per label, kept in label order
///
/// Every label is present; labels that could not be resolved map to `None`.
/// Serializes as a JSON object with `null` for missing values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    fields: Vec<(&'static str, Option<String>)>,
}

impl FieldMap {
    /// Creates a map with every label in `labels` set to `None`
    pub fn empty(labels: &[&'static str]) -> Self {
        Self {
            fields: labels.iter().map(|label| (*label, None)).collect(),
        }
    }

    /// Sets the value for `label`, appending it if the label is not yet present
    pub fn insert(&mut self, label: &'static str, value: Option<String>) {
        match self.fields.iter_mut().find(|(l, _)| *l == label) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((label, value)),
        }
    }

    /// Returns the extracted value for `label`, if any
    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(l, _)| *l == label)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Iterates over `(label, value)` pairs in label order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<&str>)> + '_ {
        self.fields.iter().map(|(l, v)| (*l, v.as_deref()))
    }

    /// Number of labels in the map
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the map has no labels at all
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether at least one label resolved to a value
    pub fn any_found(&self) -> bool {
        self.fields.iter().any(|(_, v)| v.is_some())
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (label, value) in &self.fields {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// Outcome of a completed lookup; the unit stored in the cache
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ResultPayload {
    /// True iff at least one label resolved
    pub found: bool,
    /// Value per label
    pub data: FieldMap,
}

impl ResultPayload {
    /// Wraps a field map, deriving `found` from its contents
    pub fn from_fields(data: FieldMap) -> Self {
        Self {
            found: data.any_found(),
            data,
        }
    }
}
