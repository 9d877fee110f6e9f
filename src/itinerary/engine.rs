//! The mutation engine: applies [`FormCommand`]s to an [`ItineraryRecord`],
//! running derived-value recomputation synchronously inside the same step.

use log::debug;
use serde_json::Value;

use super::calc::{installment_remainder, nights_between};
use super::command::{DayPeriod, FormCommand, ListSection, ScalarSection};
use super::model::{
    ActivityEntry, ActivityType, CompanyInfo, CustomerInfo, DayImage, DayPlan, FlightSegment,
    HotelStay, InclusionRow, InstallmentAmount, ItineraryRecord, NoteRow, PaymentPlan, ServiceRow,
    TcsStatus, VisaInfo, IATA_CODE_LENGTH, MAX_ACTIVITIES_PER_PERIOD, MIN_ACTIVITIES_PER_PERIOD,
};

/// One drafting session: the record plus its dirty flag and a revision
/// counter that feeds the autosave debounce.
#[derive(Debug, Clone)]
pub struct ItinerarySession {
    pub record: ItineraryRecord,
    dirty: bool,
    revision: u64,
}

impl Default for ItinerarySession {
    fn default() -> Self {
        Self::new(ItineraryRecord::seeded())
    }
}

impl ItinerarySession {
    pub fn new(record: ItineraryRecord) -> Self {
        Self {
            record,
            dirty: false,
            revision: 0,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// For record changes made outside the command path (image uploads).
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }

    /// Apply one command. Every command except `Reset` marks the session
    /// dirty, even when it lands as a defensive no-op.
    pub fn apply(&mut self, command: FormCommand) {
        self.revision += 1;
        match command {
            FormCommand::SetField {
                section,
                field,
                value,
            } => {
                self.set_field(section, &field, value);
                self.dirty = true;
            }
            FormCommand::SetItemField {
                section,
                index,
                field,
                value,
            } => {
                self.set_item_field(section, index, &field, value);
                self.dirty = true;
            }
            FormCommand::SetInstallmentField {
                index,
                field,
                value,
            } => {
                self.set_installment_field(index, &field, value);
                self.dirty = true;
            }
            FormCommand::AppendItem { section, item } => {
                self.append_item(section, item);
                self.dirty = true;
            }
            FormCommand::RemoveItem { section, index } => {
                self.remove_item(section, index);
                self.dirty = true;
            }
            FormCommand::SetDayActivity {
                day,
                period,
                index,
                value,
            } => {
                if let Some(list) = self.period_mut(day, period) {
                    if let Some(slot) = list.get_mut(index) {
                        *slot = value;
                    }
                }
                self.dirty = true;
            }
            FormCommand::AddDayActivity { day, period } => {
                if let Some(list) = self.period_mut(day, period) {
                    if list.len() < MAX_ACTIVITIES_PER_PERIOD {
                        list.push(String::new());
                    }
                }
                self.dirty = true;
            }
            FormCommand::RemoveDayActivity { day, period, index } => {
                if let Some(list) = self.period_mut(day, period) {
                    if list.len() > MIN_ACTIVITIES_PER_PERIOD && index < list.len() {
                        list.remove(index);
                    }
                }
                self.dirty = true;
            }
            FormCommand::Reset => {
                self.record = ItineraryRecord::seeded();
                self.dirty = false;
            }
        }
    }

    /// Replace the whole record (restore or import). Clears the dirty flag.
    pub fn load(&mut self, record: ItineraryRecord) {
        self.record = record;
        self.dirty = false;
        self.revision += 1;
    }

    /// Pretty-printed JSON snapshot of the record (2-space indent).
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.record).unwrap_or_else(|_| "{}".to_string())
    }

    /// Parse and replace the record from JSON. Returns false (record
    /// untouched) on malformed input; never panics.
    pub fn load_from_json(&mut self, json: &str) -> bool {
        match serde_json::from_str::<ItineraryRecord>(json) {
            Ok(record) => {
                self.load(record);
                true
            }
            Err(err) => {
                debug!("rejected itinerary JSON import: {err}");
                false
            }
        }
    }

    fn set_field(&mut self, section: ScalarSection, field: &str, value: Value) {
        match section {
            ScalarSection::Customer => apply_customer_field(&mut self.record.customer, field, value),
            ScalarSection::Payment => {
                apply_payment_field(&mut self.record.payment, field, value);
            }
            ScalarSection::Visa => apply_visa_field(&mut self.record.visa, field, value),
            ScalarSection::Company => apply_company_field(&mut self.record.company, field, value),
        }
    }

    fn set_item_field(&mut self, section: ListSection, index: usize, field: &str, value: Value) {
        match section {
            ListSection::Days => {
                if let Some(day) = self.record.days.get_mut(index) {
                    apply_day_field(day, field, value);
                }
            }
            ListSection::Flights => {
                if let Some(flight) = self.record.flights.get_mut(index) {
                    apply_flight_field(flight, field, value);
                }
            }
            ListSection::Hotels => {
                if let Some(hotel) = self.record.hotels.get_mut(index) {
                    apply_hotel_field(hotel, field, value);
                }
            }
            ListSection::Activities => {
                if let Some(activity) = self.record.activities.get_mut(index) {
                    apply_activity_field(activity, field, value);
                }
            }
            ListSection::ImportantNotes => {
                if let Some(note) = self.record.important_notes.get_mut(index) {
                    match field {
                        "point" => assign_string(&mut note.point, value),
                        "details" => assign_string(&mut note.details, value),
                        _ => {}
                    }
                }
            }
            ListSection::ScopeOfService => {
                if let Some(row) = self.record.scope_of_service.get_mut(index) {
                    match field {
                        "service" => assign_string(&mut row.service, value),
                        "details" => assign_string(&mut row.details, value),
                        _ => {}
                    }
                }
            }
            ListSection::InclusionSummary => {
                if let Some(row) = self.record.inclusion_summary.get_mut(index) {
                    match field {
                        "category" => assign_string(&mut row.category, value),
                        "count" => assign_u32(&mut row.count, value),
                        "details" => assign_string(&mut row.details, value),
                        "status" => assign_string(&mut row.status, value),
                        _ => {}
                    }
                }
            }
        }
    }

    fn set_installment_field(&mut self, index: usize, field: &str, value: Value) {
        let payment = &mut self.record.payment;
        let Some(installment) = payment.installments.get_mut(index) else {
            return;
        };
        match field {
            // The third amount is derived, never directly editable.
            "amount" if index < 2 => {
                if let Some(amount) = coerce_f64(&value) {
                    installment.amount = InstallmentAmount::Amount(amount);
                    recompute_remainder(payment);
                }
            }
            "dueDate" => assign_string(&mut installment.due_date, value),
            _ => {}
        }
    }

    fn append_item(&mut self, section: ListSection, item: Option<Value>) {
        fn parse_or_default<T: Default + serde::de::DeserializeOwned>(item: Option<Value>) -> T {
            item.and_then(|value| serde_json::from_value(value).ok())
                .unwrap_or_default()
        }

        match section {
            ListSection::Days => {
                let mut day: DayPlan = parse_or_default(item);
                // Position wins over whatever the caller supplied.
                day.day_number = self.record.days.len() as u32 + 1;
                self.record.days.push(day);
            }
            ListSection::Flights => self.record.flights.push(parse_or_default::<FlightSegment>(item)),
            ListSection::Hotels => self.record.hotels.push(parse_or_default::<HotelStay>(item)),
            ListSection::Activities => self
                .record
                .activities
                .push(parse_or_default::<ActivityEntry>(item)),
            ListSection::ImportantNotes => self
                .record
                .important_notes
                .push(parse_or_default::<NoteRow>(item)),
            ListSection::ScopeOfService => self
                .record
                .scope_of_service
                .push(parse_or_default::<ServiceRow>(item)),
            ListSection::InclusionSummary => self
                .record
                .inclusion_summary
                .push(parse_or_default::<InclusionRow>(item)),
        }
    }

    fn remove_item(&mut self, section: ListSection, index: usize) {
        fn remove_at<T>(list: &mut Vec<T>, index: usize) {
            if index < list.len() {
                list.remove(index);
            }
        }

        match section {
            ListSection::Days => {
                remove_at(&mut self.record.days, index);
                renumber_days(&mut self.record.days);
            }
            ListSection::Flights => remove_at(&mut self.record.flights, index),
            ListSection::Hotels => remove_at(&mut self.record.hotels, index),
            ListSection::Activities => remove_at(&mut self.record.activities, index),
            ListSection::ImportantNotes => remove_at(&mut self.record.important_notes, index),
            ListSection::ScopeOfService => remove_at(&mut self.record.scope_of_service, index),
            ListSection::InclusionSummary => remove_at(&mut self.record.inclusion_summary, index),
        }
    }

    fn period_mut(&mut self, day: usize, period: DayPeriod) -> Option<&mut Vec<String>> {
        let day = self.record.days.get_mut(day)?;
        Some(match period {
            DayPeriod::Morning => &mut day.morning,
            DayPeriod::Afternoon => &mut day.afternoon,
            DayPeriod::Evening => &mut day.evening,
        })
    }
}

fn renumber_days(days: &mut [DayPlan]) {
    for (index, day) in days.iter_mut().enumerate() {
        day.day_number = index as u32 + 1;
    }
}

/// `installments[2].amount = totalAmount - inst0 - inst1` while positive,
/// otherwise the `Remaining` marker.
fn recompute_remainder(payment: &mut PaymentPlan) {
    let first = payment
        .installments
        .first()
        .map(|i| i.amount.numeric_or_zero())
        .unwrap_or(0.0);
    let second = payment
        .installments
        .get(1)
        .map(|i| i.amount.numeric_or_zero())
        .unwrap_or(0.0);
    if let Some(third) = payment.installments.get_mut(2) {
        third.amount = installment_remainder(payment.total_amount, first, second);
    }
}

/// Uppercase and truncate to 3 chars, applied on every IATA code write.
fn normalize_iata(value: &str) -> String {
    value.to_uppercase().chars().take(IATA_CODE_LENGTH).collect()
}

fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn coerce_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().map(|n| n as u32),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn assign_string(target: &mut String, value: Value) {
    if let Some(s) = coerce_string(&value) {
        *target = s;
    }
}

fn assign_u32(target: &mut u32, value: Value) {
    if let Some(n) = coerce_u32(&value) {
        *target = n;
    }
}

fn assign_f64(target: &mut f64, value: Value) {
    if let Some(n) = coerce_f64(&value) {
        *target = n;
    }
}

fn apply_customer_field(customer: &mut CustomerInfo, field: &str, value: Value) {
    match field {
        "name" => assign_string(&mut customer.name, value),
        "destination" => assign_string(&mut customer.destination, value),
        "title" => assign_string(&mut customer.title, value),
        "days" => assign_u32(&mut customer.days, value),
        "nights" => assign_u32(&mut customer.nights, value),
        "departureFrom" => assign_string(&mut customer.departure_from, value),
        "departureDate" => assign_string(&mut customer.departure_date, value),
        "arrivalDate" => assign_string(&mut customer.arrival_date, value),
        "travelers" => assign_u32(&mut customer.travelers, value),
        _ => debug!("ignored unknown customer field {field:?}"),
    }
}

fn apply_payment_field(payment: &mut PaymentPlan, field: &str, value: Value) {
    match field {
        "totalAmount" => {
            assign_f64(&mut payment.total_amount, value);
            recompute_remainder(payment);
        }
        "pax" => assign_u32(&mut payment.pax, value),
        "tcs" => {
            if let Some(tcs) = value
                .as_str()
                .and_then(|s| serde_json::from_value::<TcsStatus>(Value::String(s.to_string())).ok())
            {
                payment.tcs = tcs;
            }
        }
        _ => debug!("ignored unknown payment field {field:?}"),
    }
}

fn apply_visa_field(visa: &mut VisaInfo, field: &str, value: Value) {
    match field {
        "type" => assign_string(&mut visa.visa_type, value),
        "validity" => assign_string(&mut visa.validity, value),
        "processingDate" => assign_string(&mut visa.processing_date, value),
        _ => debug!("ignored unknown visa field {field:?}"),
    }
}

fn apply_company_field(company: &mut CompanyInfo, field: &str, value: Value) {
    match field {
        "name" => assign_string(&mut company.name, value),
        "address" => assign_string(&mut company.address, value),
        "phone" => assign_string(&mut company.phone, value),
        "email" => assign_string(&mut company.email, value),
        "cin" => assign_string(&mut company.cin, value),
        _ => debug!("ignored unknown company field {field:?}"),
    }
}

fn apply_day_field(day: &mut DayPlan, field: &str, value: Value) {
    match field {
        "date" => assign_string(&mut day.date, value),
        "title" => assign_string(&mut day.title, value),
        "imagePreview" => assign_string(&mut day.image_preview, value),
        "image" => {
            day.image = serde_json::from_value::<Option<DayImage>>(value).ok().flatten();
        }
        // dayNumber is derived from position, never written directly
        _ => {}
    }
}

fn apply_flight_field(flight: &mut FlightSegment, field: &str, value: Value) {
    match field {
        "date" => assign_string(&mut flight.date, value),
        "airline" => assign_string(&mut flight.airline, value),
        "flightNumber" => assign_string(&mut flight.flight_number, value),
        "from" => assign_string(&mut flight.from, value),
        "to" => assign_string(&mut flight.to, value),
        "fromCode" => {
            if let Some(code) = coerce_string(&value) {
                flight.from_code = normalize_iata(&code);
            }
        }
        "toCode" => {
            if let Some(code) = coerce_string(&value) {
                flight.to_code = normalize_iata(&code);
            }
        }
        _ => {}
    }
}

fn apply_hotel_field(hotel: &mut HotelStay, field: &str, value: Value) {
    match field {
        "city" => assign_string(&mut hotel.city, value),
        "name" => assign_string(&mut hotel.name, value),
        "checkIn" => {
            assign_string(&mut hotel.check_in, value);
            hotel.nights = nights_between(&hotel.check_in, &hotel.check_out);
        }
        "checkOut" => {
            assign_string(&mut hotel.check_out, value);
            hotel.nights = nights_between(&hotel.check_in, &hotel.check_out);
        }
        // nights is derived, never written directly
        _ => {}
    }
}

fn apply_activity_field(activity: &mut ActivityEntry, field: &str, value: Value) {
    match field {
        "city" => assign_string(&mut activity.city, value),
        "name" => assign_string(&mut activity.name, value),
        "time" => assign_string(&mut activity.time, value),
        "type" => {
            activity.activity_type = value.as_str().and_then(ActivityType::parse);
        }
        _ => {}
    }
}
