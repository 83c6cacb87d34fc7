use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::dataset::utils::clean_str;

const DATE_FORMATS: &[&str] = &[
    "%B %d, %Y", // September 25, 2021
    "%b %d, %Y", // Sep 25, 2021
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%b-%y", // 25-Sep-21
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a `date_added` cell. Blank or unrecognised text yields `None`.
pub fn parse_added_date(raw: &str) -> Option<NaiveDate> {
    let s = clean_str(raw);
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(&s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Days since the Unix epoch, the Arrow `Date32` representation.
pub fn to_date32(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch is a valid date");
    (date - epoch).num_days() as i32
}

pub fn month_of(date: NaiveDate) -> i32 {
    date.month() as i32
}
