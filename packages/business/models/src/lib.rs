#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Business record types for the LA active-business dataset.
//!
//! The upstream Socrata dataset is not under our control, so a record is
//! kept as the order-preserving JSON object the source published. The two
//! columns the aggregates read are exposed through accessors, and the
//! object is serialized back exactly as it was decoded (field order and
//! `null`s included), which lets the API hand out a record untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Column holding the registered business name.
pub const BUSINESS_NAME: &str = "business_name";

/// Column holding the date a location opened.
pub const LOCATION_START_DATE: &str = "location_start_date";

/// One row of the active-business dataset.
///
/// A business with several locations appears once per location, so the
/// business name is not unique across a [`Dataset`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusinessRecord {
    fields: Map<String, Value>,
}

impl BusinessRecord {
    /// Creates a record with only a business name set.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(BUSINESS_NAME.to_string(), Value::String(name.into()));
        Self { fields }
    }

    /// Sets the location start date, keeping the column's position if it
    /// is already present.
    #[must_use]
    pub fn with_start_date(mut self, date: impl Into<String>) -> Self {
        self.fields
            .insert(LOCATION_START_DATE.to_string(), Value::String(date.into()));
        self
    }

    /// Returns the business name if the column holds a string.
    #[must_use]
    pub fn business_name(&self) -> Option<&str> {
        self.fields.get(BUSINESS_NAME).and_then(Value::as_str)
    }

    /// Returns the grouping key for this record.
    ///
    /// Records without a string name all share the empty-string key.
    #[must_use]
    pub fn name_key(&self) -> &str {
        self.business_name().unwrap_or_default()
    }

    /// Returns the start date if it is a non-empty string.
    #[must_use]
    pub fn start_date(&self) -> Option<&str> {
        self.fields
            .get(LOCATION_START_DATE)
            .and_then(Value::as_str)
            .filter(|date| !date.is_empty())
    }

    /// Returns any column by name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    /// Returns every column, in source order.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl From<Map<String, Value>> for BusinessRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// The full collection of business records for one fetch or cache read,
/// in source order.
pub type Dataset = Vec<BusinessRecord>;
