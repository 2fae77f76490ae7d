use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(concat!(
            r"\b(?:",
            r"(?P<y1>\d{4})-(?P<m1>\d{1,2})-(?P<d1>\d{1,2})",
            r"|(?P<y2>\d{4})/(?P<m2>\d{1,2})/(?P<d2>\d{1,2})",
            r"|(?P<d3>\d{1,2})/(?P<m3>\d{1,2})/(?P<y3>\d{4})",
            r"|(?P<d4>\d{1,2})-(?P<m4>\d{1,2})-(?P<y4>\d{4})",
            r"|(?P<d5>\d{1,2})\.(?P<m5>\d{1,2})\.(?P<y5>\d{4})",
            r")\b",
        ))
        .expect("date pattern is valid")
    })
}

const FORMS: [[&str; 3]; 5] = [
    ["y1", "m1", "d1"],
    ["y2", "m2", "d2"],
    ["y3", "m3", "d3"],
    ["y4", "m4", "d4"],
    ["y5", "m5", "d5"],
];

/// First calendar date written in `text`.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `DD/MM/YYYY`, `DD-MM-YYYY` and
/// `DD.MM.YYYY`, each with one separator throughout. Candidates that are
/// not real dates (`31/02/2024`) are skipped.
pub fn parse_date_in(text: &str) -> Option<NaiveDate> {
    date_pattern().captures_iter(text).find_map(|caps| {
        let [y, m, d] = FORMS.iter().find_map(|[y, m, d]| {
            Some([caps.name(y)?, caps.name(m)?, caps.name(d)?])
        })?;
        NaiveDate::from_ymd_opt(
            y.as_str().parse().ok()?,
            m.as_str().parse().ok()?,
            d.as_str().parse().ok()?,
        )
    })
}

/// Midnight UTC of `date`.
pub fn to_timestamp(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

pub fn format_for_display(date: &DateTime<Utc>) -> String {
    date.format("%d %b %Y").to_string()
}
