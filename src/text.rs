//! Plain-text helpers: tag stripping, display dates and reading time.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use scraper::Html;

/// Month names for the `es-MX` long date format.
const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Default reading speed used by [`reading_time`].
pub const WORDS_PER_MINUTE: usize = 200;

/// Remove all markup from `html`, decode entities and trim the result.
///
/// ```
/// use wp_content::strip_html;
///
/// assert_eq!(strip_html("<p>Caf&eacute; <b>con</b> leche</p>\n"), "Café con leche");
/// ```
pub fn strip_html(html: &str) -> String {
    Html::parse_fragment(html)
        .root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_string()
}

/// Format an ISO-8601 date as a long Spanish (Mexico) date,
/// e.g. `2024-03-15T10:30:00` becomes `15 de marzo de 2024`.
///
/// The calendar date is taken as written, ignoring any offset. Unparseable
/// input is returned unchanged.
pub fn format_date(iso: &str) -> String {
    match parse_date(iso) {
        Some(date) => format!(
            "{} de {} de {}",
            date.day(),
            MONTHS_ES[date.month0() as usize],
            date.year()
        ),
        None => {
            tracing::warn!("Unparseable post date: {iso:?}");
            iso.to_string()
        }
    }
}

fn parse_date(iso: &str) -> Option<NaiveDate> {
    let iso = iso.trim();
    DateTime::parse_from_rfc3339(iso)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(iso, "%Y-%m-%d"))
        .ok()
}

/// Estimated reading time in whole minutes, never less than one.
pub fn reading_time(html: &str, words_per_minute: usize) -> usize {
    let words = strip_html(html).split_whitespace().count();
    words.div_ceil(words_per_minute.max(1)).max(1)
}
