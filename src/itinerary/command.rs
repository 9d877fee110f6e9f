//! Form mutation commands.
//!
//! Every edit to the draft flows through [`FormCommand`] and a single
//! `ItinerarySession::apply` entry point, so side effects (derived values,
//! renumbering, the dirty flag) live in exactly one place.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Top-level record sections holding scalar fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ScalarSection {
    Customer,
    Payment,
    Visa,
    Company,
}

/// Ordered collections owned by the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ListSection {
    Days,
    Flights,
    Hotels,
    Activities,
    ImportantNotes,
    ScopeOfService,
    InclusionSummary,
}

/// One of the three per-day activity lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum DayPeriod {
    Morning,
    Afternoon,
    Evening,
}

/// A single atomic edit to the itinerary draft.
///
/// Out-of-range indices and unknown field names are silent no-ops; the
/// engine never fails on a malformed edit, it just leaves the record alone.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum FormCommand {
    /// Replace one scalar field of a top-level section. Writing
    /// `payment.totalAmount` recomputes the derived third installment.
    SetField {
        section: ScalarSection,
        field: String,
        value: Value,
    },
    /// Replace one field of one collection element. Hotel check-in/check-out
    /// writes recompute that stay's nights; flight IATA codes are normalized.
    SetItemField {
        section: ListSection,
        index: usize,
        field: String,
        value: Value,
    },
    /// Replace one field of one payment installment. Amount writes on the
    /// first two installments recompute the derived third; the third amount
    /// itself is never directly writable.
    SetInstallmentField {
        index: usize,
        field: String,
        value: Value,
    },
    /// Append an item (or a blank default) to a collection. For days the
    /// stored day number is forced to `len + 1` regardless of the payload.
    AppendItem {
        section: ListSection,
        #[serde(default)]
        item: Option<Value>,
    },
    /// Remove a collection element. Removal is unconditional here; minimum
    /// cardinality policy is enforced by the caller. Days are renumbered
    /// 1..N afterwards.
    RemoveItem { section: ListSection, index: usize },
    /// Overwrite one entry of a day's morning/afternoon/evening list.
    SetDayActivity {
        day: usize,
        period: DayPeriod,
        index: usize,
        value: String,
    },
    /// Append a blank entry to a period list; no-op at 10 entries.
    AddDayActivity { day: usize, period: DayPeriod },
    /// Remove one entry from a period list; no-op at 1 remaining entry.
    RemoveDayActivity {
        day: usize,
        period: DayPeriod,
        index: usize,
    },
    /// Replace the record with a fresh seeded default and clear the dirty
    /// flag.
    Reset,
}
