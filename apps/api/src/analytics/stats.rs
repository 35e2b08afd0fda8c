//! Dashboard aggregates over a user's reply events.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Days shown in the activity chart, ending today.
pub const ACTIVITY_DAYS: i64 = 7;
pub const TOP_SERVICES_LIMIT: i64 = 5;

const WEEK_DAYS: i64 = 7;
const MONTH_DAYS: i64 = 30;

/// Lower bounds of the counting windows, all at UTC midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsWindows {
    pub today_start: DateTime<Utc>,
    pub week_start: DateTime<Utc>,
    pub month_start: DateTime<Utc>,
    pub activity_start: DateTime<Utc>,
}

impl StatsWindows {
    pub fn at(now: DateTime<Utc>) -> Result<Self> {
        let midnight = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .context("midnight is not representable for the current date")?;
        let today_start = Utc.from_utc_datetime(&midnight);

        Ok(Self {
            today_start,
            week_start: today_start - Duration::days(WEEK_DAYS),
            month_start: today_start - Duration::days(MONTH_DAYS),
            activity_start: today_start - Duration::days(ACTIVITY_DAYS - 1),
        })
    }

    pub fn today(&self) -> NaiveDate {
        self.today_start.date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow)]
pub struct ReplyTotals {
    pub total: i64,
    pub today: i64,
    pub week: i64,
    pub month: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyActivity {
    pub date: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceShare {
    pub service: String,
    pub count: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_replies: i64,
    pub today_replies: i64,
    pub week_replies: i64,
    pub month_replies: i64,
    pub daily_activity: Vec<DailyActivity>,
    pub top_services: Vec<ServiceShare>,
}

/// One entry per day ending at `today`, oldest first. Days with no rows count zero.
pub fn daily_activity(today: NaiveDate, per_day: &[(NaiveDate, i64)]) -> Vec<DailyActivity> {
    (0..ACTIVITY_DAYS)
        .rev()
        .map(|offset| {
            let day = today - Duration::days(offset);
            let count = per_day
                .iter()
                .find(|(d, _)| *d == day)
                .map(|(_, count)| *count)
                .unwrap_or(0);
            DailyActivity {
                date: day.format("%Y-%m-%d").to_string(),
                count,
            }
        })
        .collect()
}

/// Attaches each service's share of `total`, rounded to one decimal place.
pub fn top_services(per_service: Vec<(String, i64)>, total: i64) -> Vec<ServiceShare> {
    per_service
        .into_iter()
        .map(|(service, count)| {
            let percentage = if total > 0 {
                (count as f64 / total as f64 * 1000.0).round() / 10.0
            } else {
                0.0
            };
            ServiceShare {
                service,
                count,
                percentage,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_windows_start_at_utc_midnight() {
        let windows = StatsWindows::at(at("2025-03-10T15:42:07Z")).unwrap();

        assert_eq!(windows.today_start, at("2025-03-10T00:00:00Z"));
        assert_eq!(windows.week_start, at("2025-03-03T00:00:00Z"));
        assert_eq!(windows.month_start, at("2025-02-08T00:00:00Z"));
        assert_eq!(windows.activity_start, at("2025-03-04T00:00:00Z"));
        assert_eq!(windows.today(), date("2025-03-10"));
    }

    #[test]
    fn test_daily_activity_fills_gaps_oldest_first() {
        let today = date("2025-03-10");
        let activity = daily_activity(
            today,
            &[(date("2025-03-10"), 4), (date("2025-03-07"), 2)],
        );

        assert_eq!(activity.len(), 7);
        assert_eq!(activity[0].date, "2025-03-04");
        assert_eq!(activity[3], DailyActivity { date: "2025-03-07".to_string(), count: 2 });
        assert_eq!(activity[5].count, 0);
        assert_eq!(activity[6], DailyActivity { date: "2025-03-10".to_string(), count: 4 });
    }

    #[test]
    fn test_daily_activity_ignores_days_outside_window() {
        let activity = daily_activity(date("2025-03-10"), &[(date("2025-02-01"), 9)]);
        assert!(activity.iter().all(|day| day.count == 0));
    }

    #[test]
    fn test_top_services_percentage_rounded() {
        let shares = top_services(
            vec![("x".to_string(), 2), ("linkedin".to_string(), 1)],
            3,
        );

        assert_eq!(shares[0].service, "x");
        assert_eq!(shares[0].percentage, 66.7);
        assert_eq!(shares[1].percentage, 33.3);
    }

    #[test]
    fn test_top_services_with_zero_total() {
        let shares = top_services(vec![("x".to_string(), 0)], 0);
        assert_eq!(shares[0].percentage, 0.0);
    }
}
