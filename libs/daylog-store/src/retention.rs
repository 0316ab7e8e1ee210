use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone};

use crate::key::BucketKey;

/// The trailing `days` calendar days, today included, that count as live.
///
/// Recomputed on every call: membership shifts as the reference instant
/// crosses midnight.
#[derive(Debug, Clone)]
pub struct RetentionWindow {
    key: BucketKey,
    days: u32,
}

impl RetentionWindow {
    pub fn new(key: BucketKey, days: u32) -> Self {
        Self { key, days }
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    /// Most recent first. Steps back in exact 24h increments from `now` and
    /// takes the calendar date in `now`'s zone, so a zone with a DST shift can
    /// land on the same date twice.
    pub fn live_dates<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<NaiveDate> {
        (0..self.days)
            .map(|i| (now.clone() - TimeDelta::days(i64::from(i))).date_naive())
            .collect()
    }

    pub fn live_identifiers<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<String> {
        self.live_dates(now)
            .iter()
            .map(|date| self.key.identifier_for(date))
            .collect()
    }

    pub fn contains<Tz: TimeZone>(&self, identifier: &str, now: &DateTime<Tz>) -> bool {
        self.live_identifiers(now).iter().any(|id| id == identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IdFormat;
    use chrono::Utc;

    fn window(days: u32) -> RetentionWindow {
        RetentionWindow::new(BucketKey::new("data", ".db", IdFormat::Legacy), days)
    }

    #[test]
    fn yields_exactly_n_days_counting_back_from_today() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        assert_eq!(
            window(3).live_identifiers(&now),
            ["2026_9_19", "2026_9_18", "2026_9_17"]
        );
    }

    #[test]
    fn crosses_month_and_year_boundaries() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            window(3).live_identifiers(&now),
            ["2026_0_1", "2025_11_31", "2025_11_30"]
        );
    }

    #[test]
    fn window_length_matches_configuration() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 59).unwrap();
        for days in [1, 7, 30, 366] {
            let ids = window(days).live_identifiers(&now);
            assert_eq!(ids.len(), days as usize);
            let mut unique = ids.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), ids.len());
        }
    }

    #[test]
    fn contains_tracks_reference_instant() {
        let w = window(2);
        let monday = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let wednesday = Utc.with_ymd_and_hms(2026, 10, 21, 12, 0, 0).unwrap();
        assert!(w.contains("2026_9_18", &monday));
        assert!(!w.contains("2026_9_18", &wednesday));
    }
}
