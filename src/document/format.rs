//! Display formatting for the assembled document.

use crate::itinerary::model::InstallmentAmount;

/// Indian digit grouping: last three digits, then pairs. Fractions are
/// rounded away, matching the zero-fraction INR display.
pub fn group_inr(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{}", rounded.abs() as u64);

    let mut grouped = String::new();
    let len = digits.len();
    for (i, ch) in digits.chars().enumerate() {
        let remaining = len - i;
        if i > 0 && (remaining == 3 || (remaining > 3 && (remaining - 3) % 2 == 0)) {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Installment cell text: `₹{grouped}` for numbers, the marker text
/// untouched otherwise.
pub fn installment_display(amount: &InstallmentAmount) -> String {
    match amount.as_number() {
        Some(value) => format!("₹{}", group_inr(value)),
        None => "Remaining".to_string(),
    }
}

fn clean_component(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    let source = if trimmed.is_empty() { fallback } else { trimmed };
    source
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// `{CustomerName}_{Destination}_Itinerary.pdf`, non-alphanumerics
/// replaced with underscores.
pub fn document_file_name(customer_name: &str, destination: &str) -> String {
    format!(
        "{}_{}_Itinerary.pdf",
        clean_component(customer_name, "Customer"),
        clean_component(destination, "Destination")
    )
}

/// Blank leaf fields display as `N/A`.
pub fn or_na(value: &str) -> String {
    if value.is_empty() {
        "N/A".to_string()
    } else {
        value.to_string()
    }
}
