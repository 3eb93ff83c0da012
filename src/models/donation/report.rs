use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::store::{RecordStore, TimeBounds};

use super::display::{handover_label, list_time, location_text};
use super::types::{DonationPolicy, DonationRecord, KIND};

pub const CSV_HEADER: [&str; 5] = ["Date", "HandoverType", "ClothingType", "CrisisRegion", "Address/Location"];

/// Query string of the admin list and the CSV export.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportQuery {
    pub from: String,
    pub to: String,
    /// Present (any value) to request the CSV export.
    pub export: Option<String>,
}

/// Calendar-day filter; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Parse `YYYY-MM-DD` values; anything else leaves that side open.
    pub fn parse(from: &str, to: &str) -> Self {
        Self { from: parse_day(from), to: parse_day(to) }
    }

    /// `from` starts at 00:00:00, `to` ends at 23:59:59, both inclusive.
    pub fn bounds(&self) -> TimeBounds {
        TimeBounds {
            from: self.from.and_then(|d| d.and_hms_opt(0, 0, 0)),
            to: self.to.and_then(|d| d.and_hms_opt(23, 59, 59)),
        }
    }

    pub fn from_param(&self) -> String {
        self.from.map(|d| d.to_string()).unwrap_or_default()
    }

    pub fn to_param(&self) -> String {
        self.to.map(|d| d.to_string()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(day) => Some(day),
        Err(_) => {
            log::warn!("Ignoring malformed date filter '{raw}'");
            None
        }
    }
}

/// Stored donations created inside `range`, newest first.
pub async fn list_records<S: RecordStore>(store: &S, range: &DateRange) -> Result<Vec<DonationRecord>, AppError> {
    let stored = store.query_by_kind(KIND, range.bounds()).await?;
    Ok(stored
        .iter()
        .filter_map(|s| {
            let record = DonationRecord::from_stored(s);
            if record.is_none() {
                log::warn!("Skipping donation {} with unreadable fields", s.id);
            }
            record
        })
        .collect())
}

/// One admin table / CSV row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub id: i64,
    pub title: String,
    pub date: String,
    pub handover: String,
    pub clothing_type: String,
    pub crisis_region: String,
    pub location: String,
}

impl ReportRow {
    pub fn from_record(record: &DonationRecord, policy: &DonationPolicy) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            date: list_time(record.created_at),
            handover: handover_label(record).to_string(),
            clothing_type: record.clothing_type.label().to_string(),
            crisis_region: record.crisis_region.clone(),
            location: location_text(record, &policy.org_postal_code),
        }
    }

    fn csv_fields(&self) -> [&str; 5] {
        [
            self.date.as_str(),
            self.handover.as_str(),
            self.clothing_type.as_str(),
            self.crisis_region.as_str(),
            self.location.as_str(),
        ]
    }
}

pub fn report_rows(records: &[DonationRecord], policy: &DonationPolicy) -> Vec<ReportRow> {
    records.iter().map(|r| ReportRow::from_record(r, policy)).collect()
}

/// Quote a CSV field when it contains a separator, quote or line break.
pub fn escape_csv(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn csv_line(fields: &[&str]) -> String {
    let mut line = fields.iter().map(|f| escape_csv(f)).collect::<Vec<_>>().join(",");
    line.push('\n');
    line
}

/// CSV document with header row and one line per record, in the given order.
pub fn export_csv(records: &[DonationRecord], policy: &DonationPolicy) -> String {
    let mut csv = csv_line(&CSV_HEADER);
    for row in report_rows(records, policy) {
        csv.push_str(&csv_line(&row.csv_fields()));
    }
    csv
}

/// Attachment name for an export made at `now`.
pub fn export_filename(now: NaiveDateTime) -> String {
    format!("donations-{}.csv", now.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_range_anchors_whole_days() {
        let range = DateRange::parse("2024-01-01", "2024-01-31");
        let bounds = range.bounds();
        assert_eq!(bounds.from.unwrap().to_string(), "2024-01-01 00:00:00");
        assert_eq!(bounds.to.unwrap().to_string(), "2024-01-31 23:59:59");
    }

    #[test]
    fn malformed_dates_leave_range_open() {
        let range = DateRange::parse("01/02/2024", "'; DROP TABLE entities; --");
        assert!(range.is_empty());
        assert_eq!(range.bounds(), TimeBounds::default());
        assert_eq!(range.from_param(), "");
    }

    #[test]
    fn escape_csv_quotes_only_when_needed() {
        assert_eq!(escape_csv("Shoes"), "Shoes");
        assert_eq!(escape_csv("Main St 1, 12345 Town"), "\"Main St 1, 12345 Town\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn export_of_nothing_is_just_the_header() {
        let policy = DonationPolicy::new(Default::default(), vec![]);
        assert_eq!(
            export_csv(&[], &policy),
            "Date,HandoverType,ClothingType,CrisisRegion,Address/Location\n"
        );
    }

    #[test]
    fn filename_uses_current_date() {
        let now = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap().and_hms_opt(14, 3, 0).unwrap();
        assert_eq!(export_filename(now), "donations-2026-10-19.csv");
    }
}
