//! Enum-keyed validation errors.
//!
//! Each error names its section explicitly instead of relying on key-name
//! matching, so section rollups cannot drift when field keys change.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Logical subdivision of the record used for error grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SectionId {
    Customer,
    Days,
    Flights,
    Hotels,
    Activities,
    Payment,
    Company,
}

impl SectionId {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "customer" => Some(SectionId::Customer),
            "days" => Some(SectionId::Days),
            "flights" => Some(SectionId::Flights),
            "hotels" => Some(SectionId::Hotels),
            "activities" => Some(SectionId::Activities),
            "payment" => Some(SectionId::Payment),
            "company" => Some(SectionId::Company),
            _ => None,
        }
    }
}

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ValidationError {
    pub section: SectionId,
    /// Stable field key for inline display, e.g. `hotel0CheckOut`.
    pub key: String,
    pub message: String,
}

/// Ordered collection of validation failures for a record or a section.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, section: SectionId, key: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationError {
            section,
            key: key.into(),
            message: message.into(),
        });
    }

    /// Push the rule outcome if it failed.
    pub fn check(
        &mut self,
        section: SectionId,
        key: impl Into<String>,
        outcome: Option<String>,
    ) {
        if let Some(message) = outcome {
            self.push(section, key, message);
        }
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.key == key)
            .map(|error| error.message.as_str())
    }

    pub fn has_section_errors(&self, section: SectionId) -> bool {
        self.errors.iter().any(|error| error.section == section)
    }

    pub fn section_errors(&self, section: SectionId) -> Vec<&ValidationError> {
        self.errors
            .iter()
            .filter(|error| error.section == section)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}
