// Calendar date helpers for the trip dates.
// Dates travel as ISO-8601 strings (`YYYY-MM-DD`) through the answer store.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("invalid {field} {value:?}: expected YYYY-MM-DD")]
    Invalid { field: &'static str, value: String },
}

/// Parse an ISO-8601 calendar date. `field` only labels the error.
pub fn parse_iso_date(field: &'static str, value: &str) -> Result<NaiveDate, DateError> {
    value
        .trim()
        .parse::<NaiveDate>()
        .map_err(|_| DateError::Invalid {
            field,
            value: value.to_string(),
        })
}

/// Whole days from `arrival` to `departure`.
///
/// Negative when departure precedes arrival; order is not enforced.
pub fn days_between(arrival: NaiveDate, departure: NaiveDate) -> i64 {
    departure.signed_duration_since(arrival).num_days()
}

/// Parse both ISO strings and derive the trip length.
pub fn trip_length(arrival: &str, departure: &str) -> Result<i64, DateError> {
    let arrival = parse_iso_date("arrivalDate", arrival)?;
    let departure = parse_iso_date("departureDate", departure)?;
    Ok(days_between(arrival, departure))
}
