use once_cell::sync::Lazy;
use regex::Regex;

/// Sentinel used wherever a categorical value is missing.
pub const UNKNOWN: &str = "Unknown";

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid digit regex"));
static TRAILING_UNIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\D+$").expect("valid unit regex"));

/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// A cell is missing when it is null or blank after cleaning.
pub fn present(raw: Option<&str>) -> Option<String> {
    raw.map(clean_str).filter(|s| !s.is_empty())
}

/// First entry of a comma separated country list, or `Unknown`.
pub fn main_country(country: Option<&str>) -> String {
    let list = present(country).unwrap_or_else(|| UNKNOWN.to_string());
    let first = list.split(',').next().unwrap_or("").trim();
    if first.is_empty() {
        UNKNOWN.to_string()
    } else {
        first.to_string()
    }
}

/// Split `"90 min"` into `(Some(90.0), Some("min"))`.
///
/// The value is the first run of digits; the unit is the trailing run of
/// non-digits, trimmed. Either side is `None` when absent.
pub fn split_duration(duration: Option<&str>) -> (Option<f64>, Option<String>) {
    let Some(text) = present(duration) else {
        return (None, None);
    };
    let value = DIGITS
        .find(&text)
        .and_then(|m| m.as_str().parse::<f64>().ok());
    let unit = TRAILING_UNIT
        .find(&text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|u| !u.is_empty());
    (value, unit)
}

/// Genre names of a `listed_in` cell, one per comma separated segment.
pub fn split_genres(listed_in: &str) -> impl Iterator<Item = &str> {
    listed_in
        .split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
}

/// Coerce a `release_year` cell. Accepts `"2019"` and `"2019.0"`.
pub fn parse_year(raw: &str) -> Option<i64> {
    let s = clean_str(raw);
    if let Ok(y) = s.parse::<i64>() {
        return Some(y);
    }
    let f = s.parse::<f64>().ok()?;
    // i64::MAX as f64 rounds up to 2^63, which is out of range
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
