//! Section completion and overall form status.
//!
//! Completion is a different question from validity: a section is complete
//! when its key fields are filled in, regardless of whether those values
//! pass validation. The activities section is complete at 15 rows with a
//! city and name, while its validity advisory fires below 7 filled rows;
//! both thresholds are load-bearing.

use serde::Serialize;
use utoipa::ToSchema;

use super::report::{SectionId, ValidationReport};
use super::sections::validate_form;
use crate::itinerary::model::{ItineraryRecord, COMPLETE_TOTAL_ACTIVITIES};

/// Status sections are coarser than error sections: payment rolls up the
/// payment and company errors together.
pub const STATUS_SECTIONS: [&str; 6] = [
    "customer", "days", "flights", "hotels", "activities", "payment",
];

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionStatus {
    pub is_valid: bool,
    pub is_complete: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormStatus {
    pub is_valid: bool,
    pub is_complete: bool,
    pub completion_percentage: u32,
    pub validation_percentage: u32,
    pub total_errors: usize,
    pub customer: SectionStatus,
    pub days: SectionStatus,
    pub flights: SectionStatus,
    pub hotels: SectionStatus,
    pub activities: SectionStatus,
    pub payment: SectionStatus,
}

impl FormStatus {
    fn sections(&self) -> [SectionStatus; 6] {
        [
            self.customer,
            self.days,
            self.flights,
            self.hotels,
            self.activities,
            self.payment,
        ]
    }
}

fn customer_complete(record: &ItineraryRecord) -> bool {
    let c = &record.customer;
    !c.name.is_empty()
        && !c.destination.is_empty()
        && !c.title.is_empty()
        && !c.departure_date.is_empty()
        && !c.arrival_date.is_empty()
        && c.travelers > 0
}

fn days_complete(record: &ItineraryRecord) -> bool {
    !record.days.is_empty()
        && record
            .days
            .iter()
            .all(|day| !day.date.is_empty() && !day.title.is_empty() && day.image.is_some())
}

fn flights_complete(record: &ItineraryRecord) -> bool {
    record
        .flights
        .iter()
        .any(|flight| !flight.airline.is_empty() && !flight.flight_number.is_empty())
}

fn hotels_complete(record: &ItineraryRecord) -> bool {
    record
        .hotels
        .iter()
        .any(|hotel| !hotel.name.is_empty() && !hotel.city.is_empty())
}

fn activities_complete(record: &ItineraryRecord) -> bool {
    record
        .activities
        .iter()
        .filter(|activity| !activity.city.is_empty() && !activity.name.is_empty())
        .count()
        >= COMPLETE_TOTAL_ACTIVITIES
}

fn payment_complete(record: &ItineraryRecord) -> bool {
    record.payment.total_amount > 0.0
        && record.payment.pax > 0
        && !record.company.name.is_empty()
        && !record.company.email.is_empty()
}

/// Compute the full status rollup from a fresh whole-form validation pass.
pub fn form_status(record: &ItineraryRecord) -> FormStatus {
    let report = validate_form(record);
    form_status_from_report(record, &report)
}

pub fn form_status_from_report(record: &ItineraryRecord, report: &ValidationReport) -> FormStatus {
    let customer = SectionStatus {
        is_valid: !report.has_section_errors(SectionId::Customer),
        is_complete: customer_complete(record),
    };
    let days = SectionStatus {
        is_valid: !report.has_section_errors(SectionId::Days),
        is_complete: days_complete(record),
    };
    let flights = SectionStatus {
        is_valid: !report.has_section_errors(SectionId::Flights),
        is_complete: flights_complete(record),
    };
    let hotels = SectionStatus {
        is_valid: !report.has_section_errors(SectionId::Hotels),
        is_complete: hotels_complete(record),
    };
    let activities = SectionStatus {
        is_valid: !report.has_section_errors(SectionId::Activities),
        is_complete: activities_complete(record),
    };
    let payment = SectionStatus {
        is_valid: !report.has_section_errors(SectionId::Payment)
            && !report.has_section_errors(SectionId::Company),
        is_complete: payment_complete(record),
    };

    let mut status = FormStatus {
        is_valid: report.is_empty(),
        is_complete: false,
        completion_percentage: 0,
        validation_percentage: 0,
        total_errors: report.len(),
        customer,
        days,
        flights,
        hotels,
        activities,
        payment,
    };

    let sections = status.sections();
    let completed = sections.iter().filter(|s| s.is_complete).count();
    let valid = sections.iter().filter(|s| s.is_valid).count();
    status.is_complete = completed == sections.len();
    status.completion_percentage = percentage(completed, sections.len());
    status.validation_percentage = percentage(valid, sections.len());

    status
}

fn percentage(part: usize, whole: usize) -> u32 {
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itinerary::model::{ActivityEntry, ActivityType, ItineraryRecord};

    fn filled_activity(city: &str, name: &str) -> ActivityEntry {
        ActivityEntry {
            city: city.to_string(),
            name: name.to_string(),
            activity_type: Some(ActivityType::Adventure),
            time: "2-3 Hours".to_string(),
        }
    }

    #[test]
    fn test_seeded_record_is_incomplete() {
        let status = form_status(&ItineraryRecord::seeded());
        assert!(!status.is_complete);
        assert_eq!(status.completion_percentage, 0);
        assert!(status.total_errors > 0);
    }

    #[test]
    fn test_activities_complete_needs_fifteen_rows() {
        let mut record = ItineraryRecord::seeded();
        record.activities = (0..14)
            .map(|i| filled_activity("Singapore", &format!("Stop {i}")))
            .collect();
        assert!(!form_status(&record).activities.is_complete);

        record.activities.push(filled_activity("Singapore", "Stop 14"));
        assert!(form_status(&record).activities.is_complete);
    }

    #[test]
    fn test_activities_valid_and_complete_thresholds_differ() {
        let mut record = ItineraryRecord::seeded();
        // 7 fully filled rows: enough to silence the advisory, far short of
        // the completion bar
        record.activities = (0..7)
            .map(|i| filled_activity("Singapore", &format!("Stop {i}")))
            .collect();
        let status = form_status(&record);
        assert!(status.activities.is_valid);
        assert!(!status.activities.is_complete);
    }

    #[test]
    fn test_six_filled_activities_trip_the_advisory() {
        let mut record = ItineraryRecord::seeded();
        record.activities = (0..6)
            .map(|i| filled_activity("Singapore", &format!("Stop {i}")))
            .collect();
        let report = validate_form(&record);
        assert_eq!(
            report.get("activities"),
            Some("At least 7 activities recommended")
        );
        assert!(!form_status(&record).activities.is_valid);
    }

    #[test]
    fn test_payment_status_rolls_up_company_errors() {
        let mut record = ItineraryRecord::seeded();
        record.payment.total_amount = 100000.0;
        record.payment.pax = 2;
        record.company.email = "not-an-email".to_string();
        let status = form_status(&record);
        assert!(!status.payment.is_valid);
        // completion only asks whether the fields are filled
        assert!(status.payment.is_complete);
    }

    #[test]
    fn test_percentages_round() {
        // 1 of 6 complete sections is 16.67, rounded to 17
        assert_eq!(percentage(1, 6), 17);
        assert_eq!(percentage(3, 6), 50);
        assert_eq!(percentage(6, 6), 100);
    }
}
