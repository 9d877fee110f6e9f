//! Itinerary domain: the draft aggregate, derived-value calculators and the
//! command-driven mutation engine.

pub mod calc;
pub mod command;
pub mod engine;
pub mod model;

pub use command::{DayPeriod, FormCommand, ListSection, ScalarSection};
pub use engine::ItinerarySession;
pub use model::ItineraryRecord;
