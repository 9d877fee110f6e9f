//! Field and cross-field validation for the itinerary draft.

pub mod report;
pub mod rules;
pub mod sections;
pub mod status;

pub use report::{SectionId, ValidationError, ValidationReport};
pub use sections::{validate_form, validate_section};
pub use status::{form_status, FormStatus, SectionStatus};
