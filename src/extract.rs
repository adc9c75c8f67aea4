//! Field extraction from provider pages
//!
//! The provider embeds a one-line summary of the day in the `value`
//! attribute of a hidden input:
//!
//! ```html
//! <input type="hidden" id="hidden_title" value="10月5日14时 周三 多云转晴 20/28°C" />
//! ```
//!
//! Each field is matched independently, so a page missing one of them
//! still yields the others.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, instrument};

use crate::error::LookupError;
use crate::models::{Outlook, WeatherFragment};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

static SUMMARY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#hidden_title").expect("summary selector should be valid"));

/// `10月5日14时`
static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<date>[0-9]+月[0-9]+日[0-9]+时)").expect("date pattern should be valid")
});

/// `周三 多云转晴`; whitespace and word classes are ASCII-only
static OUTLOOK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<weekday>周.)[\t\n\f\r ]*(?P<weather>[\p{Han}0-9A-Za-z_]+转?[\p{Han}0-9A-Za-z_]*)",
    )
    .expect("outlook pattern should be valid")
});

/// `20/28°C`
static TEMPERATURE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<temperature>[0-9]+/[0-9]+°C)").expect("temperature pattern should be valid")
});

/// Parse a fetched page and extract the weather fields from its summary.
///
/// Undecodable bytes are replaced rather than rejected and the HTML parser
/// recovers from malformed markup, so error pages in any encoding yield an
/// empty fragment. A page without the summary element does too.
#[instrument(level = "debug", skip(document), fields(len = document.len()))]
pub fn extract_fragment(document: &[u8]) -> Result<WeatherFragment, LookupError> {
    let text = String::from_utf8_lossy(document.strip_prefix(UTF8_BOM).unwrap_or(document));

    let html = Html::parse_document(&text);
    let summary = html
        .select(&SUMMARY_SELECTOR)
        .next()
        .and_then(|element| element.value().attr("value"))
        .unwrap_or_default();

    debug!("Summary value: {:?}", summary);
    Ok(extract_from_value(summary))
}

/// Extract the fields from a summary string
#[must_use]
pub fn extract_from_value(summary: &str) -> WeatherFragment {
    WeatherFragment {
        date: first_group(&DATE_PATTERN, summary, "date"),
        outlook: extract_outlook(summary),
        temperature: first_group(&TEMPERATURE_PATTERN, summary, "temperature"),
    }
}

fn first_group(pattern: &Regex, haystack: &str, group: &str) -> String {
    pattern
        .captures(haystack)
        .and_then(|caps| caps.name(group))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn extract_outlook(summary: &str) -> Option<Outlook> {
    let caps = OUTLOOK_PATTERN.captures(summary)?;
    let weekday = caps.name("weekday")?;
    let weather = caps.name("weather")?;

    Some(Outlook {
        weekday: weekday.as_str().to_string(),
        weather: weather.as_str().to_string(),
    })
}
