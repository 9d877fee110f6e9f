//! The itinerary draft aggregate and its seeded default.
//!
//! Field names on the wire are camelCase and match the draft JSON format
//! exactly, so previously saved drafts load without migration.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Validation limits shared by the mutation and validation engines.
pub const MIN_NAME_LENGTH: usize = 2;
pub const MAX_TITLE_LENGTH: usize = 100;
pub const MAX_HOTEL_NAME_LENGTH: usize = 100;
pub const MIN_DAYS: u32 = 1;
pub const MAX_DAYS: u32 = 30;
pub const MIN_NIGHTS: u32 = 0;
pub const MAX_NIGHTS: u32 = 29;
pub const MIN_TRAVELERS: u32 = 1;
pub const MAX_TRAVELERS: u32 = 50;
pub const IATA_CODE_LENGTH: usize = 3;
pub const MIN_ACTIVITIES_PER_PERIOD: usize = 1;
pub const MAX_ACTIVITIES_PER_PERIOD: usize = 10;
/// Filled activities below this count produce the advisory validation error.
pub const MIN_TOTAL_ACTIVITIES: usize = 7;
/// Filled activities below this count keep the section incomplete.
/// Intentionally stricter than [`MIN_TOTAL_ACTIVITIES`].
pub const COMPLETE_TOTAL_ACTIVITIES: usize = 15;
/// Activities list may shrink only while it holds more rows than this.
pub const MIN_ACTIVITY_ROWS: usize = 3;
/// Day cards placed on the first document page; the rest flow to page two.
pub const PAGE_ONE_DAY_CAPACITY: usize = 2;
/// Activity table rows on page three; named rows beyond this are dropped.
pub const MAX_ACTIVITY_TABLE_ROWS: usize = 15;

pub const DEFAULT_INSTALLMENT_DUE_DATES: [&str; 3] = [
    "Initial Payment",
    "Post Visa Approval",
    "20 Days Before Departure",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerInfo {
    #[schema(example = "Rahul")]
    pub name: String,
    #[schema(example = "Singapore")]
    pub destination: String,
    #[schema(example = "Singapore Family Getaway")]
    pub title: String,
    pub days: u32,
    pub nights: u32,
    pub departure_from: String,
    #[schema(example = "01/12/2024")]
    pub departure_date: String,
    #[schema(example = "05/12/2024")]
    pub arrival_date: String,
    pub travelers: u32,
}

/// Processed image payload attached to a day.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayImage {
    pub file_name: String,
    #[schema(example = "image/jpeg")]
    pub mime_type: String,
    pub size_bytes: usize,
    /// Base64-encoded image content.
    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DayPlan {
    /// 1-based, always equal to the day's position in the list.
    pub day_number: u32,
    #[schema(example = "01/12/2024")]
    pub date: String,
    pub title: String,
    pub image: Option<DayImage>,
    pub image_preview: String,
    pub morning: Vec<String>,
    pub afternoon: Vec<String>,
    pub evening: Vec<String>,
}

impl Default for DayPlan {
    fn default() -> Self {
        Self {
            day_number: 1,
            date: String::new(),
            title: String::new(),
            image: None,
            image_preview: String::new(),
            morning: vec![String::new()],
            afternoon: vec![String::new()],
            evening: vec![String::new()],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FlightSegment {
    #[schema(example = "01/12/2024")]
    pub date: String,
    #[schema(example = "Air India")]
    pub airline: String,
    #[schema(example = "AI 342")]
    pub flight_number: String,
    pub from: String,
    /// 3 uppercase letters, normalized on every write.
    #[schema(example = "DEL")]
    pub from_code: String,
    pub to: String,
    #[schema(example = "SIN")]
    pub to_code: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct HotelStay {
    pub city: String,
    #[schema(example = "10/01/2025")]
    pub check_in: String,
    #[schema(example = "13/01/2025")]
    pub check_out: String,
    /// Derived from the check-in/check-out pair, never hand-edited.
    pub nights: u32,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ActivityType {
    #[serde(rename = "Nature/Sightseeing")]
    NatureSightseeing,
    #[serde(rename = "Airlines Standard")]
    AirlinesStandard,
    Adventure,
    Cultural,
    Other,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::NatureSightseeing => "Nature/Sightseeing",
            ActivityType::AirlinesStandard => "Airlines Standard",
            ActivityType::Adventure => "Adventure",
            ActivityType::Cultural => "Cultural",
            ActivityType::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Nature/Sightseeing" => Some(ActivityType::NatureSightseeing),
            "Airlines Standard" => Some(ActivityType::AirlinesStandard),
            "Adventure" => Some(ActivityType::Adventure),
            "Cultural" => Some(ActivityType::Cultural),
            "Other" => Some(ActivityType::Other),
            _ => None,
        }
    }
}

/// Older drafts store an empty string where no type was picked.
fn de_activity_type<'de, D>(deserializer: D) -> Result<Option<ActivityType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(ActivityType::parse))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityEntry {
    pub city: String,
    pub name: String,
    #[serde(rename = "type", deserialize_with = "de_activity_type")]
    pub activity_type: Option<ActivityType>,
    #[schema(example = "2-3 Hours")]
    pub time: String,
}

impl ActivityEntry {
    /// A row counts as filled when any of its fields carries content.
    pub fn is_filled(&self) -> bool {
        !self.city.is_empty()
            || !self.name.is_empty()
            || self.activity_type.is_some()
            || !self.time.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TcsStatus {
    #[serde(rename = "Not Collected")]
    NotCollected,
    Collected,
}

impl TcsStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TcsStatus::NotCollected => "Not Collected",
            TcsStatus::Collected => "Collected",
        }
    }
}

impl Default for TcsStatus {
    fn default() -> Self {
        TcsStatus::NotCollected
    }
}

/// Installment amount: a number, or the literal marker `"Remaining"` once
/// the derived remainder is not positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum InstallmentAmount {
    Amount(f64),
    Remaining(RemainingMarker),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RemainingMarker {
    Remaining,
}

impl InstallmentAmount {
    pub fn remaining() -> Self {
        InstallmentAmount::Remaining(RemainingMarker::Remaining)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            InstallmentAmount::Amount(n) => Some(*n),
            InstallmentAmount::Remaining(_) => None,
        }
    }

    /// Numeric value used in remainder arithmetic; the marker counts as 0.
    pub fn numeric_or_zero(&self) -> f64 {
        self.as_number().unwrap_or(0.0)
    }
}

impl Default for InstallmentAmount {
    fn default() -> Self {
        InstallmentAmount::Amount(0.0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Installment {
    pub amount: InstallmentAmount,
    #[schema(example = "Initial Payment")]
    pub due_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentPlan {
    pub total_amount: f64,
    pub pax: u32,
    pub tcs: TcsStatus,
    /// Always 3 entries; the third amount is derived.
    pub installments: Vec<Installment>,
}

impl Default for PaymentPlan {
    fn default() -> Self {
        Self {
            total_amount: 0.0,
            pax: 0,
            tcs: TcsStatus::NotCollected,
            installments: DEFAULT_INSTALLMENT_DUE_DATES
                .iter()
                .enumerate()
                .map(|(index, due_date)| Installment {
                    amount: if index < 2 {
                        InstallmentAmount::Amount(0.0)
                    } else {
                        InstallmentAmount::remaining()
                    },
                    due_date: (*due_date).to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct VisaInfo {
    #[serde(rename = "type")]
    pub visa_type: String,
    pub validity: String,
    pub processing_date: String,
}

impl VisaInfo {
    pub fn is_empty(&self) -> bool {
        self.visa_type.is_empty() && self.validity.is_empty() && self.processing_date.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub cin: String,
}

impl Default for CompanyInfo {
    fn default() -> Self {
        Self {
            name: "Vigovia Tech Pvt. Ltd".to_string(),
            address: "Registered Office: H4-109 Cimalai Hills, Links Business Park, Karnataka, India"
                .to_string(),
            phone: "+91-9504061112".to_string(),
            email: "Utkarsh@Vigovia.Com".to_string(),
            cin: "U79110KA2024PTC191896".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct NoteRow {
    #[schema(example = "Airlines Standard Policy")]
    pub point: String,
    pub details: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceRow {
    #[schema(example = "Flight Tickets And Hotel Vouchers")]
    pub service: String,
    pub details: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct InclusionRow {
    #[schema(example = "Flight")]
    pub category: String,
    pub count: u32,
    pub details: String,
    pub status: String,
}

/// The full trip-planning aggregate. Sole mutable state of a session;
/// every sub-collection is owned here and defaults to a usable value.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ItineraryRecord {
    pub customer: CustomerInfo,
    pub days: Vec<DayPlan>,
    pub flights: Vec<FlightSegment>,
    pub hotels: Vec<HotelStay>,
    pub activities: Vec<ActivityEntry>,
    pub payment: PaymentPlan,
    pub visa: VisaInfo,
    pub company: CompanyInfo,
    pub important_notes: Vec<NoteRow>,
    pub scope_of_service: Vec<ServiceRow>,
    pub inclusion_summary: Vec<InclusionRow>,
}

impl Default for ItineraryRecord {
    fn default() -> Self {
        Self::seeded()
    }
}

impl ItineraryRecord {
    /// The record every session starts from: one blank day, one blank
    /// flight, one blank hotel, 7 blank activity slots, 3 installments with
    /// their fixed due-date labels and one seeded row per notes list.
    pub fn seeded() -> Self {
        Self {
            customer: CustomerInfo::default(),
            days: vec![DayPlan::default()],
            flights: vec![FlightSegment::default()],
            hotels: vec![HotelStay::default()],
            activities: (0..MIN_TOTAL_ACTIVITIES)
                .map(|_| ActivityEntry::default())
                .collect(),
            payment: PaymentPlan::default(),
            visa: VisaInfo::default(),
            company: CompanyInfo::default(),
            important_notes: vec![NoteRow {
                point: "Airlines Standard Policy".to_string(),
                details: "In Case Of Visa Rejection, Visa Fees Or Any Other Non-Cancellable Component Cannot Be Reimbursed At Any Cost".to_string(),
            }],
            scope_of_service: vec![ServiceRow {
                service: "Flight Tickets And Hotel Vouchers".to_string(),
                details: "Delivered 3 Days Post Full Payment".to_string(),
            }],
            inclusion_summary: vec![InclusionRow::default()],
        }
    }
}
