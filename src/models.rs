//! Weather record types returned by a lookup

use serde::{Deserialize, Serialize};

/// Weekday and condition, found together or not at all
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Outlook {
    /// Weekday token, e.g. `周三`
    pub weekday: String,
    /// Condition token, e.g. `多云转晴`
    pub weather: String,
}

/// Fields extracted from a provider page, before the city is attached
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct WeatherFragment {
    /// Date and hour, e.g. `10月5日14时`; empty when not found
    pub date: String,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub outlook: Option<Outlook>,
    /// Temperature range, e.g. `20/28°C`; empty when not found
    pub temperature: String,
}

/// Result of a weather lookup for one area
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WeatherRecord {
    /// Area name as requested
    pub city: String,
    #[serde(flatten)]
    pub fragment: WeatherFragment,
}

impl WeatherRecord {
    #[must_use]
    pub fn new(city: impl Into<String>, fragment: WeatherFragment) -> Self {
        Self {
            city: city.into(),
            fragment,
        }
    }

    #[must_use]
    pub fn weekday(&self) -> Option<&str> {
        self.fragment.outlook.as_ref().map(|o| o.weekday.as_str())
    }

    #[must_use]
    pub fn weather(&self) -> Option<&str> {
        self.fragment.outlook.as_ref().map(|o| o.weather.as_str())
    }
}
