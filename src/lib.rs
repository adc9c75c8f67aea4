//! Area weather lookup
//!
//! Resolves an area name to a provider area code, fetches the provider's
//! daily weather page and extracts date, weekday, condition and
//! temperature range from it. Served over HTTP at `/weather`.

pub mod api;
pub mod areas;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod lookup;
pub mod models;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use areas::AreaCodeTable;
pub use config::AppConfig;
pub use error::{ConfigError, LookupError};
pub use extract::{extract_fragment, extract_from_value};
pub use fetch::{DocumentFetcher, HttpDocumentFetcher};
pub use lookup::WeatherLookupService;
pub use models::{Outlook, WeatherFragment, WeatherRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
