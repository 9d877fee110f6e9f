//! Deterministic record-to-document assembly.
//!
//! Pure transformation, no I/O. The template is fixed at three pages: the
//! first page carries at most two day cards, the remainder flows onto page
//! two as one unbounded block (no deeper re-pagination), and the activity
//! table on page three is capped at fifteen rows with the excess dropped.

use crate::itinerary::model::{
    CompanyInfo, DayPlan, ItineraryRecord, MAX_ACTIVITY_TABLE_ROWS, PAGE_ONE_DAY_CAPACITY,
};

use super::format::{document_file_name, group_inr, installment_display, or_na};
use super::model::{
    ActivityRow, DayCard, FlightRow, Footer, HotelRow, InstallmentRow, ItineraryDocument, Page,
    PageSection, PeriodBlock, TripFact,
};

const LOGO: &str = "vigovia";
const TAGLINE: &str = "PLAN.PACK.GO!";

const BAGGAGE_NOTE: &str =
    "Note: All Flights Include Meals, Seat Choice (Excluding XL), And 23Kg-25Kg Checked Baggage";

const HOTEL_DISCLAIMERS: [&str; 4] = [
    "1. All Hotels Are Tentative And Can Be Replaced With Similar",
    "2. Breakfast Included For All Hotel Stays",
    "3. All Hotels Will Be 3* And Above Category",
    "4. A maximum occupancy of 2 guests/room is allowed in most hotels",
];

/// Assemble the full three-page document from a record.
pub fn assemble(record: &ItineraryRecord) -> ItineraryDocument {
    ItineraryDocument {
        file_name: document_file_name(&record.customer.name, &record.customer.destination),
        pages: vec![page_one(record), page_two(record), page_three(record)],
    }
}

fn header() -> PageSection {
    PageSection::Header {
        logo: LOGO.to_string(),
        tagline: TAGLINE.to_string(),
    }
}

fn footer(company: &CompanyInfo) -> PageSection {
    PageSection::Footer(Footer {
        company_name: if company.name.is_empty() {
            "Vigovia Tech Pvt. Ltd".to_string()
        } else {
            company.name.clone()
        },
        address: or_na(&company.address),
        phone: or_na(&company.phone),
        email: or_na(&company.email),
        cin: or_na(&company.cin),
        logo: LOGO.to_string(),
        tagline: TAGLINE.to_string(),
    })
}

fn day_card(day: &DayPlan) -> PageSection {
    let title = if day.title.is_empty() {
        format!("Day {}: Untitled", day.day_number)
    } else {
        format!("Day {}: {}", day.day_number, day.title)
    };
    let date_line = if day.date.is_empty() {
        "Date: Not set".to_string()
    } else {
        format!("Date: {}", day.date)
    };

    let mut periods = Vec::new();
    for (label, entries) in [
        ("Morning", &day.morning),
        ("Afternoon", &day.afternoon),
        ("Evening", &day.evening),
    ] {
        let activities: Vec<String> = entries
            .iter()
            .filter(|entry| !entry.trim().is_empty())
            .cloned()
            .collect();
        if !activities.is_empty() {
            periods.push(PeriodBlock {
                label: label.to_string(),
                activities,
            });
        }
    }

    PageSection::DayCard(DayCard {
        title,
        date_line,
        periods,
    })
}

fn page_one(record: &ItineraryRecord) -> Page {
    let customer = &record.customer;
    let mut sections = vec![
        header(),
        PageSection::Hero {
            greeting: format!(
                "Hi, {}!",
                if customer.name.is_empty() { "Customer" } else { &customer.name }
            ),
            headline: format!(
                "{} Itinerary",
                if customer.destination.is_empty() {
                    "Destination"
                } else {
                    &customer.destination
                }
            ),
            duration: format!("{} Days {} Nights", customer.days, customer.nights),
        },
        PageSection::TripFacts {
            facts: vec![
                TripFact {
                    label: "Departure From".to_string(),
                    value: or_na(&customer.departure_from),
                },
                TripFact {
                    label: "Departure".to_string(),
                    value: or_na(&customer.departure_date),
                },
                TripFact {
                    label: "Arrival".to_string(),
                    value: or_na(&customer.arrival_date),
                },
                TripFact {
                    label: "Destination".to_string(),
                    value: or_na(&customer.destination),
                },
                TripFact {
                    label: "No. Of Travel.".to_string(),
                    value: customer.travelers.to_string(),
                },
            ],
        },
    ];

    sections.extend(record.days.iter().take(PAGE_ONE_DAY_CAPACITY).map(day_card));
    sections.push(footer(&record.company));

    Page {
        number: 1,
        sections,
    }
}

fn page_two(record: &ItineraryRecord) -> Page {
    let mut sections = vec![header()];

    sections.extend(record.days.iter().skip(PAGE_ONE_DAY_CAPACITY).map(day_card));

    let flight_rows: Vec<FlightRow> = record
        .flights
        .iter()
        .filter(|flight| !flight.airline.is_empty())
        .enumerate()
        .map(|(index, flight)| FlightRow {
            date: flight.date.clone(),
            description: format!(
                "Fly {} ({}) From {} ({}) To {} ({})",
                flight.airline,
                flight.flight_number,
                flight.from,
                flight.from_code,
                flight.to,
                flight.to_code
            ),
            shaded: index % 2 == 0,
        })
        .collect();
    if !flight_rows.is_empty() {
        sections.push(PageSection::FlightSummary {
            rows: flight_rows,
            note: BAGGAGE_NOTE.to_string(),
        });
    }

    let hotel_rows: Vec<HotelRow> = record
        .hotels
        .iter()
        .filter(|hotel| !hotel.name.is_empty())
        .enumerate()
        .map(|(index, hotel)| HotelRow {
            city: hotel.city.clone(),
            check_in: hotel.check_in.clone(),
            check_out: hotel.check_out.clone(),
            nights: hotel.nights,
            name: hotel.name.clone(),
            shaded: index % 2 == 0,
        })
        .collect();
    if !hotel_rows.is_empty() {
        sections.push(PageSection::HotelBookings {
            rows: hotel_rows,
            disclaimers: HOTEL_DISCLAIMERS.iter().map(|s| s.to_string()).collect(),
        });
    }

    sections.push(footer(&record.company));

    Page {
        number: 2,
        sections,
    }
}

fn page_three(record: &ItineraryRecord) -> Page {
    let mut sections = vec![header()];

    let activity_rows: Vec<ActivityRow> = record
        .activities
        .iter()
        .filter(|activity| !activity.name.is_empty())
        .take(MAX_ACTIVITY_TABLE_ROWS)
        .enumerate()
        .map(|(index, activity)| ActivityRow {
            city: activity.city.clone(),
            name: activity.name.clone(),
            activity_type: activity
                .activity_type
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
            time: activity.time.clone(),
            shaded: index % 2 == 0,
        })
        .collect();
    if !activity_rows.is_empty() {
        sections.push(PageSection::ActivityTable {
            rows: activity_rows,
        });
    }

    if record.payment.total_amount > 0.0 {
        let installments: Vec<InstallmentRow> = record
            .payment
            .installments
            .iter()
            .enumerate()
            .map(|(index, installment)| InstallmentRow {
                label: format!("Installment {}", index + 1),
                amount: installment_display(&installment.amount),
                due_date: installment.due_date.clone(),
                shaded: index % 2 == 0,
            })
            .collect();

        sections.push(PageSection::PaymentPlan {
            total_line: format!(
                "₹ {} For {} Pax (Inclusive Of GST)",
                group_inr(record.payment.total_amount),
                record.payment.pax
            ),
            tcs: record.payment.tcs.as_str().to_string(),
            installments,
        });
    }

    if !record.visa.is_empty() {
        sections.push(PageSection::VisaDetails {
            visa_type: or_na(&record.visa.visa_type),
            validity: or_na(&record.visa.validity),
            processing_date: or_na(&record.visa.processing_date),
        });
    }

    sections.push(PageSection::CallToAction {
        slogan: TAGLINE.to_string(),
        button: "Book Now".to_string(),
    });
    sections.push(footer(&record.company));

    Page {
        number: 3,
        sections,
    }
}
