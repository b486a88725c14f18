use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use trip_wizard_lib::provider::catalog::Catalog;
use trip_wizard_lib::provider::http::TravelApiClient;
use trip_wizard_lib::{
    CityProvider, CountryProvider, DateField, DestinationStep, Route, StepHost, WizardConfig,
    WizardSession,
};

/// Drive the destination step of the trip questionnaire from the command line.
#[derive(Debug, Parser)]
#[command(name = "trip-wizard", version)]
struct Cli {
    /// JSON config file (api base url and endpoint paths)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Serve countries and cities from a JSON catalog instead of the travel API
    #[arg(long)]
    catalog: Option<PathBuf>,

    #[arg(long)]
    country: Option<String>,

    #[arg(long)]
    city: Option<String>,

    /// Arrival date, YYYY-MM-DD
    #[arg(long)]
    arrival: Option<String>,

    /// Departure date, YYYY-MM-DD
    #[arg(long)]
    departure: Option<String>,

    /// Leave the step with "Back" instead of "Next"
    #[arg(long)]
    back: bool,
}

struct ConsoleHost;

impl StepHost for ConsoleHost {
    fn navigate(&self, route: Route) {
        println!("-> {}", route);
    }

    fn alert(&self, message: &str) {
        eprintln!("! {}", message);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let (countries, cities): (Arc<dyn CountryProvider>, Arc<dyn CityProvider>) =
        match &cli.catalog {
            Some(path) => {
                let catalog = Arc::new(
                    Catalog::load(path)
                        .with_context(|| format!("loading catalog {}", path.display()))?,
                );
                let countries: Arc<dyn CountryProvider> = catalog.clone();
                let cities: Arc<dyn CityProvider> = catalog;
                (countries, cities)
            }
            None => {
                let config = WizardConfig::load(cli.config.as_deref())?;
                let client = Arc::new(TravelApiClient::new(&config)?);
                let countries: Arc<dyn CountryProvider> = client.clone();
                let cities: Arc<dyn CityProvider> = client;
                (countries, cities)
            }
        };

    let session = WizardSession::new();
    let mut step = DestinationStep::new(session.clone(), countries, cities, Arc::new(ConsoleHost));
    step.mount();
    step.settle().await;
    println!("countries: {:?}", step.country_options());

    if let Some(country) = &cli.country {
        step.select_country(country);
        step.settle().await;
        println!("cities: {:?}", step.city_options());
    }
    if let Some(city) = &cli.city {
        step.select_city(city);
    }
    if let Some(arrival) = &cli.arrival {
        step.change_date(DateField::ArrivalDate, arrival)?;
    }
    if let Some(departure) = &cli.departure {
        step.change_date(DateField::DepartureDate, departure)?;
    }

    if cli.back {
        step.back();
    } else if let Err(err) = step.proceed() {
        log::warn!("destination step not complete: {}", err);
    }

    println!("{}", serde_json::to_string_pretty(&session.answers().read())?);
    Ok(())
}
