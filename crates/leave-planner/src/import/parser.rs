use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug, Deserialize)]
pub(crate) struct RequestRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) id: Option<String>,
    pub(crate) user_id: String,
    pub(crate) leave_type: String,
    pub(crate) start_date: String,
    pub(crate) end_date: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) half_day_start: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) half_day_end: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) reason: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LeaveTypeRow {
    pub(crate) id: String,
    pub(crate) name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) color: Option<String>,
    pub(crate) deductible: String,
}

pub(crate) fn parse_rows<R, T>(reader: R) -> Result<Vec<T>, csv::Error>
where
    R: Read,
    T: for<'de> Deserialize<'de>,
{
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize::<T>()
        .collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// RFC 3339 timestamps, or a bare date taken as midnight UTC.
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    parse_date(trimmed)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}
