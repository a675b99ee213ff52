//! Data values that value constraints compare against.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::description::DescriptionError;
use crate::property::ValueType;

pub const NS_MAIN: i32 = 0;
pub const NS_CATEGORY: i32 = 14;
pub const NS_PROPERTY: i32 = 102;
pub const NS_CONCEPT: i32 = 108;

// ============================================================================
// Pages
// ============================================================================

/// Reference to a wiki page (entity, category, property or concept page).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PageRef {
    pub title: String,
    #[serde(default)]
    pub namespace: i32,
}

impl PageRef {
    pub fn new(title: impl Into<String>, namespace: i32) -> Self {
        Self {
            title: title.into(),
            namespace,
        }
    }

    pub fn main(title: impl Into<String>) -> Self {
        Self::new(title, NS_MAIN)
    }

    pub fn category(title: impl Into<String>) -> Self {
        Self::new(title, NS_CATEGORY)
    }

    pub fn concept(title: impl Into<String>) -> Self {
        Self::new(title, NS_CONCEPT)
    }

    /// The text pages are ordered by (display form of the title).
    pub fn sort_key(&self) -> String {
        self.title.replace('_', " ")
    }

    /// Title with its namespace prefix, e.g. `Category:Foo`.
    pub fn prefixed_text(&self) -> String {
        match namespace_prefix(self.namespace) {
            Some(prefix) => format!("{prefix}:{}", self.title),
            None => self.title.clone(),
        }
    }
}

/// Canonical name of the namespaces the query language refers to by name.
pub fn namespace_prefix(namespace: i32) -> Option<&'static str> {
    match namespace {
        NS_CATEGORY => Some("Category"),
        NS_PROPERTY => Some("Property"),
        NS_CONCEPT => Some("Concept"),
        _ => None,
    }
}

// ============================================================================
// Time
// ============================================================================

/// Julian day of 0000-12-31 at midnight, so that day 1 of the common era
/// (`0001-01-01`) lands on `1721425.5`.
const JULIAN_DAY_OF_CE_EPOCH: f64 = 1_721_424.5;

/// A calendar date (proleptic Gregorian).
///
/// Time values carry a second, comparison-friendly encoding: the Julian day
/// number at midnight. Range comparisons and equality matching in the store
/// use that number rather than the display form.
///
/// Encoded as `{"year": .., "month": .., "day": ..}`; impossible dates are
/// rejected when decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "CalendarDate", into = "CalendarDate")]
pub struct TimeValue(NaiveDate);

impl TimeValue {
    /// `None` unless `year-month-day` is a real date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Julian day at 00:00 of this date (`2000-01-01` is `2451544.5`).
    pub fn julian_day(&self) -> f64 {
        f64::from(self.0.num_days_from_ce()) + JULIAN_DAY_OF_CE_EPOCH
    }

    /// `YYYY-MM-DD` (negative years keep their sign).
    pub fn iso_date(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl From<NaiveDate> for TimeValue {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

#[derive(Serialize, Deserialize)]
struct CalendarDate {
    year: i32,
    month: u32,
    day: u32,
}

impl TryFrom<CalendarDate> for TimeValue {
    type Error = DescriptionError;

    fn try_from(parts: CalendarDate) -> Result<Self, Self::Error> {
        Self::from_ymd(parts.year, parts.month, parts.day).ok_or(DescriptionError::InvalidDate {
            year: parts.year,
            month: parts.month,
            day: parts.day,
        })
    }
}

impl From<TimeValue> for CalendarDate {
    fn from(time: TimeValue) -> Self {
        Self {
            year: time.0.year(),
            month: time.0.month(),
            day: time.0.day(),
        }
    }
}

// ============================================================================
// Data values
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DataValue {
    Page(PageRef),
    Number(f64),
    Text(String),
    Uri(String),
    Boolean(bool),
    Time(TimeValue),
    GeoCoord { lat: f64, lon: f64 },
    Concept(PageRef),
}

impl DataValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            DataValue::Page(_) => ValueType::Page,
            DataValue::Number(_) => ValueType::Number,
            DataValue::Text(_) => ValueType::Text,
            DataValue::Uri(_) => ValueType::Uri,
            DataValue::Boolean(_) => ValueType::Boolean,
            DataValue::Time(_) => ValueType::Time,
            DataValue::GeoCoord { .. } => ValueType::GeoCoord,
            DataValue::Concept(_) => ValueType::Concept,
        }
    }

    pub fn as_page(&self) -> Option<&PageRef> {
        match self {
            DataValue::Page(page) => Some(page),
            _ => None,
        }
    }

    /// Text form as written in a query (`[[Population::12]]`).
    pub fn display(&self) -> String {
        match self {
            DataValue::Page(page) | DataValue::Concept(page) => page.prefixed_text(),
            DataValue::Number(n) => n.to_string(),
            DataValue::Text(s) | DataValue::Uri(s) => s.clone(),
            DataValue::Boolean(b) => b.to_string(),
            DataValue::Time(t) => t.iso_date(),
            DataValue::GeoCoord { lat, lon } => format!("{lat}, {lon}"),
        }
    }
}

impl From<PageRef> for DataValue {
    fn from(page: PageRef) -> Self {
        DataValue::Page(page)
    }
}

impl From<TimeValue> for DataValue {
    fn from(time: TimeValue) -> Self {
        DataValue::Time(time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> TimeValue {
        TimeValue::from_ymd(year, month, day).unwrap()
    }

    #[test]
    fn test_julian_day_known_dates() {
        assert_eq!(date(2000, 1, 1).julian_day(), 2451544.5);
        assert_eq!(date(2020, 1, 1).julian_day(), 2458849.5);
        assert_eq!(date(1970, 1, 1).julian_day(), 2440587.5);
        assert_eq!(date(1, 1, 1).julian_day(), 1721425.5);
    }

    #[test]
    fn test_julian_day_is_monotonic_across_month_boundaries() {
        let feb_end = date(2024, 2, 29).julian_day();
        let mar_start = date(2024, 3, 1).julian_day();
        assert_eq!(mar_start - feb_end, 1.0);
    }

    #[test]
    fn test_impossible_dates_are_rejected() {
        assert!(TimeValue::from_ymd(2021, 2, 30).is_none());
        assert!(TimeValue::from_ymd(2021, 13, 1).is_none());
        assert!(TimeValue::from_ymd(2023, 2, 29).is_none());
        assert!(TimeValue::from_ymd(2024, 2, 29).is_some());

        let err = serde_json::from_str::<TimeValue>(r#"{"year":2021,"month":0,"day":99}"#)
            .unwrap_err();
        assert!(err.to_string().contains("2021-0-99"));
    }

    #[test]
    fn test_time_json_shape() {
        let json = serde_json::to_value(date(2020, 3, 7)).unwrap();
        assert_eq!(json, serde_json::json!({"year": 2020, "month": 3, "day": 7}));
        let decoded: TimeValue = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, date(2020, 3, 7));
    }

    #[test]
    fn test_iso_date() {
        assert_eq!(date(2020, 3, 7).iso_date(), "2020-03-07");
        assert_eq!(date(-44, 3, 15).iso_date(), "-0044-03-15");
    }

    #[test]
    fn test_page_sort_key_and_prefix() {
        let page = PageRef::category("Living_people");
        assert_eq!(page.sort_key(), "Living people");
        assert_eq!(page.prefixed_text(), "Category:Living_people");
        assert_eq!(PageRef::main("Berlin").prefixed_text(), "Berlin");
    }

    #[test]
    fn test_data_value_json_shape() {
        let value = DataValue::Page(PageRef::main("Berlin"));
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "page", "value": {"title": "Berlin", "namespace": 0}})
        );

        let geo: DataValue =
            serde_json::from_str(r#"{"type":"geo_coord","value":{"lat":52.5,"lon":13.4}}"#).unwrap();
        assert_eq!(geo.value_type(), ValueType::GeoCoord);
    }
}
