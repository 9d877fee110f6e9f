//! Per-section validators and the whole-form aggregation.
//!
//! Semantics worth noting: flight and hotel lists fail as a whole when the
//! first row is blank, otherwise fully-blank rows are skipped; the
//! activities list carries a single advisory error below 7 filled rows; the
//! day-by-day date ordering check only runs at whole-form granularity.

use super::report::{SectionId, ValidationReport};
use super::rules;
use crate::itinerary::calc::{filled_activity_count, parse_display_date};
use crate::itinerary::model::{
    ActivityEntry, CompanyInfo, CustomerInfo, DayPlan, FlightSegment, HotelStay, ItineraryRecord,
    PaymentPlan, MAX_DAYS, MAX_HOTEL_NAME_LENGTH, MAX_NIGHTS, MAX_TITLE_LENGTH, MAX_TRAVELERS,
    MIN_DAYS, MIN_NAME_LENGTH, MIN_NIGHTS, MIN_TOTAL_ACTIVITIES, MIN_TRAVELERS,
};

pub fn validate_customer(customer: &CustomerInfo) -> ValidationReport {
    let mut report = ValidationReport::new();
    let section = SectionId::Customer;

    report.check(
        section,
        "customerName",
        rules::compose(&customer.name, &[&rules::required, &rules::min_length(MIN_NAME_LENGTH)]),
    );
    report.check(section, "destination", rules::required(&customer.destination));
    report.check(
        section,
        "title",
        rules::compose(
            &customer.title,
            &[&rules::required, &rules::max_length(MAX_TITLE_LENGTH)],
        ),
    );
    report.check(
        section,
        "days",
        rules::numeric_range(customer.days as f64, MIN_DAYS as f64, Some(MAX_DAYS as f64)),
    );
    report.check(
        section,
        "nights",
        rules::numeric_range(customer.nights as f64, MIN_NIGHTS as f64, Some(MAX_NIGHTS as f64)),
    );
    report.check(
        section,
        "travelers",
        rules::numeric_range(
            customer.travelers as f64,
            MIN_TRAVELERS as f64,
            Some(MAX_TRAVELERS as f64),
        ),
    );
    report.check(section, "departureFrom", rules::required(&customer.departure_from));
    report.check(
        section,
        "departureDate",
        rules::compose(&customer.departure_date, &[&rules::required, &rules::date]),
    );
    report.check(
        section,
        "arrivalDate",
        rules::compose(
            &customer.arrival_date,
            &[
                &rules::required,
                &rules::date,
                &rules::date_after(&customer.departure_date),
            ],
        ),
    );

    report
}

pub fn validate_days(days: &[DayPlan]) -> ValidationReport {
    let mut report = ValidationReport::new();
    let section = SectionId::Days;

    for (index, day) in days.iter().enumerate() {
        report.check(
            section,
            format!("day{index}Date"),
            rules::compose(&day.date, &[&rules::required, &rules::date]),
        );
        report.check(
            section,
            format!("day{index}Title"),
            rules::compose(
                &day.title,
                &[&rules::required, &rules::max_length(MAX_TITLE_LENGTH)],
            ),
        );
        if day.image.is_none() {
            report.push(section, format!("day{index}Image"), rules::REQUIRED_FIELD);
        }

        for (period, entries) in [
            ("morning", &day.morning),
            ("afternoon", &day.afternoon),
            ("evening", &day.evening),
        ] {
            let has_content = entries.iter().any(|entry| !entry.trim().is_empty());
            if !has_content {
                report.push(
                    section,
                    format!("day{index}{period}"),
                    "At least one activity is required",
                );
            }
        }
    }

    report
}

pub fn validate_flights(flights: &[FlightSegment]) -> ValidationReport {
    let mut report = ValidationReport::new();
    let section = SectionId::Flights;

    if flights.is_empty() || flights[0].airline.is_empty() {
        report.push(section, "flights", "At least one flight is required");
        return report;
    }

    for (index, flight) in flights.iter().enumerate() {
        // fully blank rows are skipped
        if flight.airline.is_empty() && flight.flight_number.is_empty() {
            continue;
        }

        report.check(section, format!("flight{index}Airline"), rules::required(&flight.airline));
        report.check(
            section,
            format!("flight{index}FlightNumber"),
            rules::required(&flight.flight_number),
        );
        report.check(section, format!("flight{index}From"), rules::required(&flight.from));
        report.check(
            section,
            format!("flight{index}FromCode"),
            rules::compose(&flight.from_code, &[&rules::required, &rules::iata_code]),
        );
        report.check(section, format!("flight{index}To"), rules::required(&flight.to));
        report.check(
            section,
            format!("flight{index}ToCode"),
            rules::compose(&flight.to_code, &[&rules::required, &rules::iata_code]),
        );
    }

    report
}

pub fn validate_hotels(hotels: &[HotelStay]) -> ValidationReport {
    let mut report = ValidationReport::new();
    let section = SectionId::Hotels;

    if hotels.is_empty() || hotels[0].name.is_empty() {
        report.push(section, "hotels", "At least one hotel is required");
        return report;
    }

    for (index, hotel) in hotels.iter().enumerate() {
        if hotel.name.is_empty() && hotel.city.is_empty() {
            continue;
        }

        report.check(section, format!("hotel{index}City"), rules::required(&hotel.city));
        report.check(
            section,
            format!("hotel{index}Name"),
            rules::compose(
                &hotel.name,
                &[&rules::required, &rules::max_length(MAX_HOTEL_NAME_LENGTH)],
            ),
        );
        report.check(
            section,
            format!("hotel{index}CheckIn"),
            rules::compose(&hotel.check_in, &[&rules::required, &rules::date]),
        );
        report.check(
            section,
            format!("hotel{index}CheckOut"),
            rules::compose(
                &hotel.check_out,
                &[
                    &rules::required,
                    &rules::date,
                    &rules::checkout_after_checkin(&hotel.check_in),
                ],
            ),
        );
    }

    report
}

pub fn validate_activities(activities: &[ActivityEntry]) -> ValidationReport {
    let mut report = ValidationReport::new();
    let section = SectionId::Activities;

    if filled_activity_count(activities) < MIN_TOTAL_ACTIVITIES {
        report.push(section, "activities", rules::MIN_ACTIVITIES);
    }

    for (index, activity) in activities.iter().enumerate() {
        // rows without city or name are skipped
        if activity.city.is_empty() && activity.name.is_empty() {
            continue;
        }

        report.check(section, format!("activity{index}City"), rules::required(&activity.city));
        report.check(section, format!("activity{index}Name"), rules::required(&activity.name));
        if activity.activity_type.is_none() {
            report.push(section, format!("activity{index}Type"), rules::REQUIRED_FIELD);
        }
        report.check(section, format!("activity{index}Time"), rules::required(&activity.time));
    }

    report
}

pub fn validate_payment(payment: &PaymentPlan) -> ValidationReport {
    let mut report = ValidationReport::new();
    let section = SectionId::Payment;

    report.check(
        section,
        "totalAmount",
        rules::numeric_range(payment.total_amount, 1.0, None),
    );
    report.check(section, "pax", rules::numeric_range(payment.pax as f64, 1.0, None));

    for (index, installment) in payment.installments.iter().enumerate() {
        // the "Remaining" marker is exempt from numeric checks
        if let Some(amount) = installment.amount.as_number() {
            report.check(
                section,
                format!("installment{index}Amount"),
                rules::numeric_range(amount, 0.0, None),
            );
        }
    }

    report
}

pub fn validate_company(company: &CompanyInfo) -> ValidationReport {
    let mut report = ValidationReport::new();
    let section = SectionId::Company;

    report.check(section, "companyName", rules::required(&company.name));
    report.check(section, "companyAddress", rules::required(&company.address));
    report.check(
        section,
        "companyPhone",
        rules::compose(&company.phone, &[&rules::required, &rules::phone]),
    );
    report.check(
        section,
        "companyEmail",
        rules::compose(&company.email, &[&rules::required, &rules::email]),
    );
    report.check(section, "companyCin", rules::required(&company.cin));

    report
}

/// Day dates must be strictly increasing when walked by day number.
/// Whole-form only; the per-section days validator does not run this.
fn validate_day_date_order(days: &[DayPlan]) -> ValidationReport {
    let mut report = ValidationReport::new();

    let mut dated: Vec<(&DayPlan, chrono::NaiveDate)> = days
        .iter()
        .filter_map(|day| parse_display_date(&day.date).map(|date| (day, date)))
        .collect();
    dated.sort_by_key(|(day, _)| day.day_number);

    for pair in dated.windows(2) {
        let (previous, previous_date) = pair[0];
        let (current, current_date) = pair[1];
        if current_date <= previous_date {
            report.push(
                SectionId::Days,
                format!("day{}DateOrder", current.day_number),
                format!(
                    "Day {} date should be after Day {} date",
                    current.day_number, previous.day_number
                ),
            );
        }
    }

    report
}

/// Validate one section in isolation.
pub fn validate_section(record: &ItineraryRecord, section: SectionId) -> ValidationReport {
    match section {
        SectionId::Customer => validate_customer(&record.customer),
        SectionId::Days => validate_days(&record.days),
        SectionId::Flights => validate_flights(&record.flights),
        SectionId::Hotels => validate_hotels(&record.hotels),
        SectionId::Activities => validate_activities(&record.activities),
        SectionId::Payment => validate_payment(&record.payment),
        SectionId::Company => validate_company(&record.company),
    }
}

/// Validate the whole record: every section plus the cross-day date
/// ordering rule.
pub fn validate_form(record: &ItineraryRecord) -> ValidationReport {
    let mut report = ValidationReport::new();
    report.merge(validate_customer(&record.customer));
    report.merge(validate_days(&record.days));
    report.merge(validate_day_date_order(&record.days));
    report.merge(validate_flights(&record.flights));
    report.merge(validate_hotels(&record.hotels));
    report.merge(validate_activities(&record.activities));
    report.merge(validate_payment(&record.payment));
    report.merge(validate_company(&record.company));
    report
}
