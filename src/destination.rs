//! Destination step: country, city and trip dates.
//!
//! The controller keeps a working copy of its four answers, seeded from the
//! session's answer store when the step is entered. Date edits publish back to
//! the store immediately; country and city edits are only published alongside
//! the next date edit. `proceed` is gated on all four answers being present.
//!
//! Option lists are fetched on `tokio` tasks. They are spawned on the runtime
//! given to `with_runtime`, or else on the runtime current at the call site; with
//! neither, the fetch is skipped and logged.

use crate::answers::{AnswersPatch, ARRIVAL_DATE, CITY, COUNTRY, DEPARTURE_DATE};
use crate::dates;
use crate::errors::AppError;
use crate::navigation::{Route, StepHost};
use crate::provider::{CityProvider, CountryProvider};
use crate::store::WizardSession;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

pub const STEP_NUMBER: usize = 1;
pub const STEP_COUNT: usize = 7;

pub const QUESTION: &str = "Where and when do you plan to travel?";
pub const COUNTRY_PLACEHOLDER: &str = "Select a country";
pub const CITY_PLACEHOLDER: &str = "Select a city";
pub const ARRIVAL_PLACEHOLDER: &str = "Arrival Date";
pub const DEPARTURE_PLACEHOLDER: &str = "Departure Date";

/// The two date inputs on this step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateField {
    ArrivalDate,
    DepartureDate,
}

impl DateField {
    /// Answer key, also the input's field name.
    pub fn key(&self) -> &'static str {
        match self {
            DateField::ArrivalDate => ARRIVAL_DATE,
            DateField::DepartureDate => DEPARTURE_DATE,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            ARRIVAL_DATE => Some(DateField::ArrivalDate),
            DEPARTURE_DATE => Some(DateField::DepartureDate),
            _ => None,
        }
    }

    fn other(&self) -> Self {
        match self {
            DateField::ArrivalDate => DateField::DepartureDate,
            DateField::DepartureDate => DateField::ArrivalDate,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct DestinationForm {
    selected_country: String,
    selected_city: String,
    arrival_date: String,
    departure_date: String,
    number_of_days: i64,
}

impl DestinationForm {
    fn date(&self, field: DateField) -> &str {
        match field {
            DateField::ArrivalDate => &self.arrival_date,
            DateField::DepartureDate => &self.departure_date,
        }
    }

    fn date_mut(&mut self, field: DateField) -> &mut String {
        match field {
            DateField::ArrivalDate => &mut self.arrival_date,
            DateField::DepartureDate => &mut self.departure_date,
        }
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        [
            (COUNTRY, &self.selected_country),
            (CITY, &self.selected_city),
            (ARRIVAL_DATE, &self.arrival_date),
            (DEPARTURE_DATE, &self.departure_date),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(key, _)| key)
        .collect()
    }
}

/// Option lists written by the loader tasks.
#[derive(Debug, Default)]
struct OptionLists {
    countries: Vec<String>,
    cities: Vec<String>,
    // Bumped for every city request; only the latest may write `cities`.
    city_generation: u64,
}

fn lock(options: &Mutex<OptionLists>) -> MutexGuard<'_, OptionLists> {
    options.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Render-ready snapshot of the step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationView {
    pub progress: String,
    pub question: &'static str,
    pub country_options: Vec<String>,
    pub city_options: Vec<String>,
    pub selected_country: String,
    pub selected_city: String,
    pub arrival_date: String,
    pub departure_date: String,
    pub number_of_days: i64,
    pub arrival_label: String,
    pub departure_label: String,
}

pub struct DestinationStep {
    session: WizardSession,
    country_provider: Arc<dyn CountryProvider>,
    city_provider: Arc<dyn CityProvider>,
    host: Arc<dyn StepHost>,
    form: DestinationForm,
    options: Arc<Mutex<OptionLists>>,
    country_task: Option<JoinHandle<()>>,
    city_task: Option<JoinHandle<()>>,
    runtime: Option<Handle>,
    mounted: bool,
}

impl DestinationStep {
    /// Enter the step, seeding the working copy from the session's answers.
    ///
    /// The trip length starts at zero; it is only derived again once a date is edited.
    pub fn new(
        session: WizardSession,
        country_provider: Arc<dyn CountryProvider>,
        city_provider: Arc<dyn CityProvider>,
        host: Arc<dyn StepHost>,
    ) -> Self {
        let answers = session.answers().read();
        let form = DestinationForm {
            selected_country: answers.country().to_string(),
            selected_city: answers.city().to_string(),
            arrival_date: answers.arrival_date().to_string(),
            departure_date: answers.departure_date().to_string(),
            number_of_days: 0,
        };
        log::debug!("destination step seeded: {:?}", form);

        Self {
            session,
            country_provider,
            city_provider,
            host,
            form,
            options: Arc::new(Mutex::new(OptionLists::default())),
            country_task: None,
            city_task: None,
            runtime: None,
            mounted: false,
        }
    }

    /// Spawn loaders on `runtime`, so the handlers can be driven from a thread
    /// that is not inside a runtime.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    fn spawn<F>(&self, what: &str, task: F) -> Option<JoinHandle<()>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match self.runtime.clone().or_else(|| Handle::try_current().ok()) {
            Some(runtime) => Some(runtime.spawn(task)),
            None => {
                log::warn!("no async runtime available, skipping {}", what);
                None
            }
        }
    }

    /// Start loading countries, and cities for a resumed country selection.
    /// Only the first call that finds a runtime has any effect.
    pub fn mount(&mut self) {
        if self.mounted {
            log::debug!("destination step already mounted");
            return;
        }

        let provider = Arc::clone(&self.country_provider);
        let options = Arc::clone(&self.options);
        self.country_task = self.spawn("country list", async move {
            let countries = match provider.countries().await {
                Ok(countries) => countries,
                Err(err) => {
                    log::warn!("error fetching countries: {}", err);
                    Vec::new()
                }
            };
            lock(&options).countries = countries;
        });
        if self.country_task.is_none() {
            return;
        }
        self.mounted = true;

        self.reload_cities();
    }

    /// Select a country. Always clears the city; a different country reloads the city list.
    pub fn select_country(&mut self, country: &str) {
        let changed = self.form.selected_country != country;
        self.form.selected_country = country.to_string();
        self.form.selected_city.clear();

        if changed {
            self.reload_cities();
        }
    }

    pub fn select_city(&mut self, city: &str) {
        self.form.selected_city = city.to_string();
    }

    /// Issue a city request for the selected country, superseding any request
    /// still in flight.
    ///
    /// An empty country issues nothing and leaves the current city list in place.
    fn reload_cities(&mut self) {
        if self.form.selected_country.is_empty() {
            log::debug!("country cleared, keeping current city options");
            return;
        }

        if let Some(stale) = self.city_task.take() {
            stale.abort();
        }

        let generation = {
            let mut options = lock(&self.options);
            options.city_generation += 1;
            options.city_generation
        };

        let query = self.form.selected_country.to_lowercase();
        let provider = Arc::clone(&self.city_provider);
        let options = Arc::clone(&self.options);
        self.city_task = self.spawn("city list", async move {
            match provider.cities(&query).await {
                Ok(cities) => {
                    let mut options = lock(&options);
                    if options.city_generation == generation {
                        options.cities = cities;
                    } else {
                        log::debug!("discarding superseded city list for {}", query);
                    }
                }
                Err(err) => log::warn!("error fetching cities for {}: {}", query, err),
            }
        });
    }

    /// Apply a date edit and publish it.
    ///
    /// Non-empty values must be ISO dates; a rejected value changes nothing.
    /// The trip length is recomputed only when the other date is already set,
    /// otherwise the previous length is published again.
    pub fn change_date(&mut self, field: DateField, value: &str) -> Result<(), AppError> {
        let value = value.trim();
        if !value.is_empty() {
            dates::parse_iso_date(field.key(), value)?;
        }
        *self.form.date_mut(field) = value.to_string();

        if !value.is_empty() && !self.form.date(field.other()).is_empty() {
            match dates::trip_length(&self.form.arrival_date, &self.form.departure_date) {
                Ok(days) => self.form.number_of_days = days,
                Err(err) => log::warn!("keeping previous trip length: {}", err),
            }
        }

        self.session.answers().merge(
            AnswersPatch::new()
                .set(field.key(), value)
                .number_of_days(self.form.number_of_days)
                .country(&self.form.selected_country)
                .city(&self.form.selected_city),
        );
        log::debug!(
            "updated {} = {:?}, days = {}",
            field.key(),
            value,
            self.form.number_of_days
        );
        Ok(())
    }

    /// Date edit as delivered by a date input: `(field name, ISO date)`.
    pub fn handle_date_input(&mut self, name: &str, value: &str) -> Result<(), AppError> {
        let field = DateField::from_name(name)
            .ok_or_else(|| AppError::unknown(format!("unknown date field: {name}")))?;
        self.change_date(field, value)
    }

    /// "Next": requires country, city and both dates.
    ///
    /// On success the trip length is derived fresh from the dates, the dates and
    /// length are merged into the store, and the host is sent to the next page.
    /// On failure the host is alerted and nothing is written.
    pub fn proceed(&mut self) -> Result<Route, AppError> {
        let missing = self.form.missing_fields();
        if !missing.is_empty() {
            log::warn!("cannot proceed, missing fields: {:?}", missing);
            return Err(self.reject(AppError::missing_fields(&missing)));
        }

        let days = match dates::trip_length(&self.form.arrival_date, &self.form.departure_date) {
            Ok(days) => days,
            Err(err) => {
                log::warn!("cannot proceed: {}", err);
                return Err(self.reject(err.into()));
            }
        };
        self.form.number_of_days = days;

        self.session.answers().merge(
            AnswersPatch::new()
                .set(ARRIVAL_DATE, self.form.arrival_date.as_str())
                .set(DEPARTURE_DATE, self.form.departure_date.as_str())
                .number_of_days(days),
        );

        log::info!("destination step complete ({} days), navigating to {}", days, Route::Party);
        self.host.navigate(Route::Party);
        Ok(Route::Party)
    }

    /// "Back": no validation and no store write.
    pub fn back(&self) -> Route {
        log::info!("leaving destination step, navigating to {}", Route::Home);
        self.host.navigate(Route::Home);
        Route::Home
    }

    fn reject(&self, err: AppError) -> AppError {
        self.host.alert(&err.message);
        err
    }

    /// Wait for the loader tasks issued so far.
    pub async fn settle(&mut self) {
        for task in [self.country_task.take(), self.city_task.take()]
            .into_iter()
            .flatten()
        {
            if let Err(err) = task.await {
                if !err.is_cancelled() {
                    log::warn!("option loader task failed: {}", err);
                }
            }
        }
    }

    pub fn selected_country(&self) -> &str {
        &self.form.selected_country
    }

    pub fn selected_city(&self) -> &str {
        &self.form.selected_city
    }

    pub fn arrival_date(&self) -> &str {
        &self.form.arrival_date
    }

    pub fn departure_date(&self) -> &str {
        &self.form.departure_date
    }

    pub fn number_of_days(&self) -> i64 {
        self.form.number_of_days
    }

    pub fn country_options(&self) -> Vec<String> {
        lock(&self.options).countries.clone()
    }

    pub fn city_options(&self) -> Vec<String> {
        lock(&self.options).cities.clone()
    }

    pub fn view(&self) -> DestinationView {
        let (country_options, city_options) = {
            let options = lock(&self.options);
            (options.countries.clone(), options.cities.clone())
        };
        let label = |value: &str, placeholder: &str| {
            if value.is_empty() {
                placeholder.to_string()
            } else {
                value.to_string()
            }
        };

        DestinationView {
            progress: format!("{} of {}", STEP_NUMBER, STEP_COUNT),
            question: QUESTION,
            country_options,
            city_options,
            selected_country: self.form.selected_country.clone(),
            selected_city: self.form.selected_city.clone(),
            arrival_date: self.form.arrival_date.clone(),
            departure_date: self.form.departure_date.clone(),
            number_of_days: self.form.number_of_days,
            arrival_label: label(&self.form.arrival_date, ARRIVAL_PLACEHOLDER),
            departure_label: label(&self.form.departure_date, DEPARTURE_PLACEHOLDER),
        }
    }
}

impl Drop for DestinationStep {
    fn drop(&mut self) {
        for task in [self.country_task.take(), self.city_task.take()]
            .into_iter()
            .flatten()
        {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::Answers;
    use crate::provider::catalog::Catalog;
    use serde_json::json;

    #[derive(Default)]
    struct NullHost {
        alerts: Mutex<Vec<String>>,
        routes: Mutex<Vec<Route>>,
    }

    impl StepHost for NullHost {
        fn navigate(&self, route: Route) {
            self.routes.lock().unwrap().push(route);
        }

        fn alert(&self, message: &str) {
            self.alerts.lock().unwrap().push(message.to_string());
        }
    }

    fn step_with(answers: Answers) -> (DestinationStep, WizardSession, Arc<NullHost>) {
        let session = WizardSession::resume(answers);
        let catalog = Arc::new(Catalog::new().with_country("Italy", &["Rome"]));
        let host = Arc::new(NullHost::default());
        let step = DestinationStep::new(session.clone(), catalog.clone(), catalog, host.clone());
        (step, session, host)
    }

    #[test]
    fn seeds_from_store_with_zero_days() {
        let answers: Answers = serde_json::from_value(json!({
            "country": "Italy",
            "city": "Rome",
            "arrivalDate": "2025-06-01",
            "departureDate": "2025-06-10",
            "numberOfDays": 9
        }))
        .unwrap();
        let (step, _, _) = step_with(answers);

        assert_eq!(step.selected_country(), "Italy");
        assert_eq!(step.selected_city(), "Rome");
        assert_eq!(step.arrival_date(), "2025-06-01");
        assert_eq!(step.departure_date(), "2025-06-10");
        assert_eq!(step.number_of_days(), 0);
    }

    #[test]
    fn missing_answers_default_to_empty() {
        let (step, _, _) = step_with(Answers::new());
        assert_eq!(step.selected_country(), "");
        assert_eq!(step.arrival_date(), "");
    }

    #[test]
    fn city_change_does_not_touch_store() {
        let (mut step, session, _) = step_with(Answers::new());
        step.select_city("Rome");
        assert_eq!(step.selected_city(), "Rome");
        assert!(session.answers().read().is_empty());
    }

    #[test]
    fn date_field_names_round_trip() {
        for field in [DateField::ArrivalDate, DateField::DepartureDate] {
            assert_eq!(DateField::from_name(field.key()), Some(field));
        }
        assert_eq!(DateField::from_name("checkIn"), None);
    }

    #[test]
    fn unknown_date_input_is_rejected_without_write() {
        let (mut step, session, _) = step_with(Answers::new());
        let err = step.handle_date_input("checkIn", "2025-06-01").unwrap_err();
        assert_eq!(err.kind, crate::errors::ErrorKind::Unknown);
        assert!(session.answers().read().is_empty());
    }

    #[test]
    fn view_uses_placeholders_for_empty_dates() {
        let (mut step, _, _) = step_with(Answers::new());
        step.change_date(DateField::ArrivalDate, "2025-06-01").unwrap();

        let view = step.view();
        assert_eq!(view.progress, "1 of 7");
        assert_eq!(view.question, QUESTION);
        assert_eq!(view.arrival_label, "2025-06-01");
        assert_eq!(view.departure_label, DEPARTURE_PLACEHOLDER);
    }

    #[test]
    fn select_country_outside_runtime_skips_city_fetch() {
        let (mut step, _, _) = step_with(serde_json::from_value(json!({ "city": "Milan" })).unwrap());
        step.mount();
        step.select_country("Italy");

        assert_eq!(step.selected_country(), "Italy");
        assert_eq!(step.selected_city(), "");
        assert!(step.city_options().is_empty());
        assert!(step.country_options().is_empty());
    }

    #[test]
    fn injected_runtime_loads_options_from_sync_caller() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (step, _, _) = step_with(Answers::new());
        let mut step = step.with_runtime(runtime.handle().clone());

        step.mount();
        step.select_country("Italy");
        runtime.block_on(step.settle());

        assert_eq!(step.country_options(), vec!["Italy"]);
        assert_eq!(step.city_options(), vec!["Rome"]);
    }

    #[test]
    fn back_navigates_home_without_validation() {
        let (step, session, host) = step_with(Answers::new());
        assert_eq!(step.back(), Route::Home);
        assert_eq!(*host.routes.lock().unwrap(), vec![Route::Home]);
        assert!(host.alerts.lock().unwrap().is_empty());
        assert!(session.answers().read().is_empty());
    }
}
