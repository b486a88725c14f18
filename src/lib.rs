// Travel-planning questionnaire core: shared answer store and the destination step.

pub mod answers;
pub mod config;
pub mod dates;
pub mod destination;
pub mod errors;
pub mod navigation;
pub mod provider;
pub mod store;

pub use answers::{Answers, AnswersPatch};
pub use config::WizardConfig;
pub use destination::{DateField, DestinationStep, DestinationView};
pub use errors::{AppError, ErrorKind};
pub use navigation::{Route, StepHost};
pub use provider::{CityProvider, CountryProvider, ProviderError};
pub use store::{AnswerStore, WizardSession};
