use crate::config::ConfigError;
use crate::dates::DateError;
use crate::provider::ProviderError;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unknown,
    Validation,
    InvalidDate,
    ProviderFetch,
    Config,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl AppError {
    pub fn unknown(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Unknown,
            message: message.into(),
            details: None,
            code: None,
        }
    }

    /// Proceed was attempted while required fields are still empty.
    pub fn missing_fields(fields: &[&str]) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: "Please fill in all fields.".to_string(),
            details: Some(fields.join(", ")),
            code: Some("missing_fields".to_string()),
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind == ErrorKind::Validation
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{} ({})", self.message, details),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for AppError {}

impl From<DateError> for AppError {
    fn from(err: DateError) -> Self {
        match err {
            DateError::Invalid { field, value } => Self {
                kind: ErrorKind::InvalidDate,
                message: format!("invalid date for {field}: {value:?}"),
                details: Some(value),
                code: Some("invalid_date".to_string()),
            },
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        let code = match &err {
            ProviderError::Request(_) => "provider_request_failed",
            ProviderError::Status(_) => "provider_bad_status",
            ProviderError::Malformed(_) => "provider_malformed_payload",
        };
        Self {
            kind: ErrorKind::ProviderFetch,
            message: err.to_string(),
            details: None,
            code: Some(code.to_string()),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self {
            kind: ErrorKind::Config,
            message: format!("configuration error: {err}"),
            details: None,
            code: Some("config_error".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_module_errors_to_kind() {
        let e: AppError = DateError::Invalid {
            field: "arrivalDate",
            value: "tomorrow".to_string(),
        }
        .into();
        assert_eq!(e.kind, ErrorKind::InvalidDate);
        assert_eq!(e.code.as_deref(), Some("invalid_date"));

        let e: AppError = ProviderError::Status(502).into();
        assert_eq!(e.kind, ErrorKind::ProviderFetch);
        assert_eq!(e.code.as_deref(), Some("provider_bad_status"));
    }

    #[test]
    fn missing_fields_lists_names_in_details() {
        let e = AppError::missing_fields(&["city", "departureDate"]);
        assert!(e.is_validation());
        assert_eq!(e.details.as_deref(), Some("city, departureDate"));
        assert_eq!(e.to_string(), "Please fill in all fields. (city, departureDate)");
    }

    #[test]
    fn serializes_without_empty_optionals() {
        let json = serde_json::to_value(AppError::unknown("boom")).expect("serialize");
        assert_eq!(json, serde_json::json!({ "kind": "unknown", "message": "boom" }));
    }
}
