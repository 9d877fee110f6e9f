//! Typed document model handed to the renderer.
//!
//! Pure data: pages in order, sections in order within each page, rows in
//! order within each table. Presentation attributes that the renderer
//! depends on (row shading, fallback text) are computed here so rendering
//! stays a projection.

use serde::Serialize;
use utoipa::ToSchema;

/// The assembled export artifact.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDocument {
    /// Suggested download name, e.g. `Rahul_Singapore_Itinerary.pdf`.
    pub file_name: String,
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub number: u32,
    pub sections: Vec<PageSection>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PageSection {
    Header {
        logo: String,
        tagline: String,
    },
    Hero {
        greeting: String,
        headline: String,
        duration: String,
    },
    TripFacts {
        facts: Vec<TripFact>,
    },
    DayCard(DayCard),
    FlightSummary {
        rows: Vec<FlightRow>,
        note: String,
    },
    HotelBookings {
        rows: Vec<HotelRow>,
        disclaimers: Vec<String>,
    },
    ActivityTable {
        rows: Vec<ActivityRow>,
    },
    PaymentPlan {
        total_line: String,
        tcs: String,
        installments: Vec<InstallmentRow>,
    },
    VisaDetails {
        visa_type: String,
        validity: String,
        processing_date: String,
    },
    CallToAction {
        slogan: String,
        button: String,
    },
    Footer(Footer),
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripFact {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayCard {
    /// `Day {n}: {title}`.
    pub title: String,
    /// `Date: {date}`.
    pub date_line: String,
    /// Periods with at least one non-blank activity, in
    /// morning/afternoon/evening order.
    pub periods: Vec<PeriodBlock>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodBlock {
    pub label: String,
    pub activities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlightRow {
    pub date: String,
    /// `Fly {airline} ({number}) From {from} ({code}) To {to} ({code})`.
    pub description: String,
    pub shaded: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HotelRow {
    pub city: String,
    pub check_in: String,
    pub check_out: String,
    pub nights: u32,
    pub name: String,
    pub shaded: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRow {
    pub city: String,
    pub name: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub time: String,
    pub shaded: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentRow {
    /// `Installment {n}`.
    pub label: String,
    /// INR-formatted amount, or the literal `Remaining`.
    pub amount: String,
    pub due_date: String,
    pub shaded: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Footer {
    pub company_name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub cin: String,
    pub logo: String,
    pub tagline: String,
}
