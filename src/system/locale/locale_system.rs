use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Locale served without touching any loader
pub const DEFAULT_LOCALE: &str = "en";

// Base codes of the date-picker locale catalogue, sorted
pub const SUPPORTED_LOCALES: &[&str] = &[
    "ar", "at", "az", "be", "bg", "bn", "bs", "cat", "ckb", "cs", "cy", "da", "de", "en", "eo",
    "es", "et", "fa", "fi", "fo", "fr", "ga", "gr", "he", "hi", "hr", "hu", "hy", "id", "is",
    "it", "ja", "ka", "km", "ko", "kz", "lt", "lv", "mk", "mn", "ms", "my", "nl", "nn", "no",
    "pa", "pl", "pt", "ro", "ru", "si", "sk", "sl", "sq", "sr", "sv", "th", "tr", "uk", "uz",
    "vn", "zh",
];

/// Reduce a locale tag to its base code: "fr-CA" -> "fr", "DE-at" -> "de".
pub fn normalize_tag(tag: &str) -> String {
    match tag.split_once('-') {
        Some((lang, _)) => lang.to_lowercase(),
        None => tag.to_lowercase(),
    }
}

// Longest tag accepted from HTTP clients
pub const MAX_TAG_LEN: usize = 35;

/// ASCII alphanumeric subtags of 1 to 8 characters joined by '-', at most
/// `MAX_TAG_LEN` long. Says nothing about whether the locale is supported.
pub fn is_well_formed(tag: &str) -> bool {
    !tag.is_empty()
        && tag.len() <= MAX_TAG_LEN
        && tag.split('-').all(|subtag| {
            (1..=8).contains(&subtag.len()) && subtag.bytes().all(|b| b.is_ascii_alphanumeric())
        })
}

pub fn validate_tag(tag: &str) -> Result<(), LocaleError> {
    if is_well_formed(tag) {
        Ok(())
    } else {
        Err(LocaleError::InvalidTag(tag.chars().take(MAX_TAG_LEN).collect()))
    }
}

pub fn is_supported(tag: &str) -> bool {
    let base = normalize_tag(tag);
    SUPPORTED_LOCALES.binary_search(&base.as_str()).is_ok()
}

/// Calendar data for one locale (month names, weekday names, first day of
/// week, ...). The layout belongs to the date-picker; this crate only moves
/// it around and checks that it is not empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocaleConfig(Value);

impl LocaleConfig {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The bundled English configuration used for "en" and every fallback.
    pub fn english() -> Self {
        Self(json!({
            "weekdays": {
                "shorthand": ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
                "longhand": [
                    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"
                ]
            },
            "months": {
                "shorthand": [
                    "Jan", "Feb", "Mar", "Apr", "May", "Jun",
                    "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"
                ],
                "longhand": [
                    "January", "February", "March", "April", "May", "June",
                    "July", "August", "September", "October", "November", "December"
                ]
            },
            "daysInMonth": [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31],
            "firstDayOfWeek": 0,
            "rangeSeparator": " to ",
            "weekAbbreviation": "Wk",
            "scrollTitle": "Scroll to increment",
            "toggleTitle": "Click to toggle",
            "amPM": ["AM", "PM"],
            "yearAriaLabel": "Year",
            "monthAriaLabel": "Month",
            "hourAriaLabel": "Hour",
            "minuteAriaLabel": "Minute",
            "time_24hr": false
        }))
    }

    /// Falsy or hollow payloads: null, false, "", [] and {}.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null | Value::Bool(false) => true,
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(fields) => fields.is_empty(),
            _ => false,
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::english()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LocaleError {
    #[error("Malformed locale tag: {0}")]
    InvalidTag(String),
    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),
    #[error("No loader registered for locale: {0}")]
    NoLoader(String),
    #[error("Locale data is empty: {0}")]
    EmptyPayload(String),
    #[error("Locale load failed: {0}")]
    LoadFailed(String),
    #[error("Locale file error: {0}")]
    FileError(String),
}

impl IntoResponse for LocaleError {
    fn into_response(self) -> Response {
        let status = match self {
            LocaleError::InvalidTag(_) => StatusCode::BAD_REQUEST,
            LocaleError::UnsupportedLocale(_) => StatusCode::NOT_FOUND,
            LocaleError::NoLoader(_)
            | LocaleError::EmptyPayload(_)
            | LocaleError::LoadFailed(_)
            | LocaleError::FileError(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(json!({
            "error": "LOCALE_ERROR",
            "message": self.to_string(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));

        (status, body).into_response()
    }
}
