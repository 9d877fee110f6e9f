//! Export gate and job state.
//!
//! The pre-export check is a coarser, fail-fast pass distinct from field
//! validation: it stops at the first violation and reports exactly one
//! actionable message. Only a record that clears the gate is assembled.

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::itinerary::calc::parse_display_date;
use crate::itinerary::model::ItineraryRecord;

use super::assembler::assemble;
use super::model::ItineraryDocument;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExportError {
    #[error("{0}")]
    Blocked(String),
}

/// Tri-state export job exposed to the caller. `Done` keeps the assembled
/// document until the next export replaces it.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ExportStatus {
    Idle,
    Pending,
    Done { document: ItineraryDocument },
    Error { message: String },
}

impl Default for ExportStatus {
    fn default() -> Self {
        ExportStatus::Idle
    }
}

fn date_order_ok(earlier: &str, later: &str) -> bool {
    match (parse_display_date(earlier), parse_display_date(later)) {
        (Some(a), Some(b)) => b > a,
        // missing or malformed dates pass; field validation owns those
        _ => true,
    }
}

/// Run the ordered pre-checks. Returns the first violation only.
pub fn check_export(record: &ItineraryRecord) -> Result<(), ExportError> {
    let blocked = |message: String| Err(ExportError::Blocked(message));

    if record.customer.name.is_empty() || record.customer.destination.is_empty() {
        return blocked("Please fill in customer name and destination".to_string());
    }

    if record.days.is_empty() || record.days[0].title.is_empty() {
        return blocked("Please add at least one day with a title".to_string());
    }

    if record.company.name.is_empty() || record.company.email.is_empty() {
        return blocked("Please fill in company details".to_string());
    }

    if !date_order_ok(&record.customer.departure_date, &record.customer.arrival_date) {
        return blocked("Arrival date must be after departure date".to_string());
    }

    for (index, hotel) in record.hotels.iter().enumerate() {
        if !date_order_ok(&hotel.check_in, &hotel.check_out) {
            return blocked(format!(
                "Hotel {}: Check-out date must be after check-in date",
                index + 1
            ));
        }
    }

    let mut dated: Vec<_> = record
        .days
        .iter()
        .filter_map(|day| parse_display_date(&day.date).map(|date| (day.day_number, date)))
        .collect();
    dated.sort_by_key(|(number, _)| *number);
    for pair in dated.windows(2) {
        let (previous_number, previous_date) = pair[0];
        let (current_number, current_date) = pair[1];
        if current_date <= previous_date {
            return blocked(format!(
                "Day {current_number} date should be after Day {previous_number} date"
            ));
        }
    }

    Ok(())
}

/// Gate then assemble. No partial document is ever produced.
pub fn export_document(record: &ItineraryRecord) -> Result<ItineraryDocument, ExportError> {
    check_export(record)?;
    Ok(assemble(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itinerary::model::{DayPlan, HotelStay};

    fn exportable_record() -> ItineraryRecord {
        let mut record = ItineraryRecord::seeded();
        record.customer.name = "Rahul".to_string();
        record.customer.destination = "Singapore".to_string();
        record.customer.departure_date = "01/12/2024".to_string();
        record.customer.arrival_date = "05/12/2024".to_string();
        record.days[0].title = "Arrival".to_string();
        record.days[0].date = "01/12/2024".to_string();
        record
    }

    #[test]
    fn test_gate_passes_minimal_record() {
        assert!(check_export(&exportable_record()).is_ok());
    }

    #[test]
    fn test_gate_reports_first_violation_only() {
        let mut record = exportable_record();
        // two violations at once: missing customer data and bad trip dates
        record.customer.name = String::new();
        record.customer.arrival_date = "01/12/2024".to_string();

        let err = check_export(&record).unwrap_err();
        assert_eq!(
            err,
            ExportError::Blocked("Please fill in customer name and destination".to_string())
        );
    }

    #[test]
    fn test_gate_requires_titled_first_day() {
        let mut record = exportable_record();
        record.days[0].title = String::new();
        let err = check_export(&record).unwrap_err();
        assert_eq!(
            err,
            ExportError::Blocked("Please add at least one day with a title".to_string())
        );
    }

    #[test]
    fn test_gate_checks_trip_date_order() {
        let mut record = exportable_record();
        record.customer.arrival_date = "01/12/2024".to_string();
        let err = check_export(&record).unwrap_err();
        assert_eq!(
            err,
            ExportError::Blocked("Arrival date must be after departure date".to_string())
        );
    }

    #[test]
    fn test_gate_names_the_offending_hotel() {
        let mut record = exportable_record();
        record.hotels.push(HotelStay {
            city: "Singapore".to_string(),
            check_in: "10/01/2025".to_string(),
            check_out: "10/01/2025".to_string(),
            nights: 0,
            name: "Marina Bay Sands".to_string(),
        });
        let err = check_export(&record).unwrap_err();
        assert_eq!(
            err,
            ExportError::Blocked(
                "Hotel 2: Check-out date must be after check-in date".to_string()
            )
        );
    }

    #[test]
    fn test_gate_checks_day_sequence_by_day_number() {
        let mut record = exportable_record();
        record.days.push(DayPlan {
            day_number: 2,
            title: "Sentosa".to_string(),
            date: "01/12/2024".to_string(),
            ..DayPlan::default()
        });
        let err = check_export(&record).unwrap_err();
        assert_eq!(
            err,
            ExportError::Blocked("Day 2 date should be after Day 1 date".to_string())
        );
    }

    #[test]
    fn test_export_produces_document_after_gate() {
        let document = export_document(&exportable_record()).unwrap();
        assert_eq!(document.pages.len(), 3);
        assert_eq!(document.file_name, "Rahul_Singapore_Itinerary.pdf");
    }
}
