use serde::{Deserialize, Serialize};
use std::fmt;

/// Wizard pages reachable from the destination step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Home,
    Destination,
    Party,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Destination => "/destination",
            Route::Party => "/party",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Whatever hosts the wizard steps: a router plus a way to put a blocking
/// notice in front of the user.
pub trait StepHost: Send + Sync {
    /// Fire-and-forget request to show another page.
    fn navigate(&self, route: Route);

    /// Blocking notification. Returns once the user has dismissed it.
    fn alert(&self, message: &str);
}
