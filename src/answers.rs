use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const COUNTRY: &str = "country";
pub const CITY: &str = "city";
pub const ARRIVAL_DATE: &str = "arrivalDate";
pub const DEPARTURE_DATE: &str = "departureDate";
pub const NUMBER_OF_DAYS: &str = "numberOfDays";

/// Every answer collected across the wizard, keyed by answer name.
///
/// Keys written by other steps are kept as opaque JSON values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers(BTreeMap<String, Value>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String answer, or `""` when unset or not a string.
    pub fn text(&self, key: &str) -> &str {
        self.0.get(key).and_then(Value::as_str).unwrap_or_default()
    }

    pub fn country(&self) -> &str {
        self.text(COUNTRY)
    }

    pub fn city(&self) -> &str {
        self.text(CITY)
    }

    pub fn arrival_date(&self) -> &str {
        self.text(ARRIVAL_DATE)
    }

    pub fn departure_date(&self) -> &str {
        self.text(DEPARTURE_DATE)
    }

    pub fn number_of_days(&self) -> Option<i64> {
        self.0.get(NUMBER_OF_DAYS).and_then(Value::as_i64)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Shallow, additive overwrite: keys absent from `patch` are untouched.
    pub fn apply(&mut self, patch: AnswersPatch) {
        self.0.extend(patch.0);
    }
}

/// A partial set of answers to merge over the aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswersPatch(BTreeMap<String, Value>);

impl AnswersPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn country(self, country: &str) -> Self {
        self.set(COUNTRY, country)
    }

    pub fn city(self, city: &str) -> Self {
        self.set(CITY, city)
    }

    pub fn number_of_days(self, days: i64) -> Self {
        self.set(NUMBER_OF_DAYS, days)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
