use std::collections::BTreeMap;

use chrono::Datelike as _;
use model::{
    attendance::EventAttendance,
    ids::DayId,
    statistics::training::{TrainingAnalysis, WeekTrend},
    window::DateWindow,
};

const TREND_DAYS: u32 = 84;
const TREND_WEEKS: usize = 12;

fn rounded_mean(counts: &[u32]) -> u32 {
    if counts.is_empty() {
        return 0;
    }
    let sum = counts.iter().map(|c| f64::from(*c)).sum::<f64>();
    (sum / counts.len() as f64).round() as u32
}

fn counts_since(dated: &[(DayId, u32)], from: DayId) -> Vec<u32> {
    dated
        .iter()
        .filter(|(day, _)| *day >= from)
        .map(|(_, count)| *count)
        .collect()
}

/// Headcount averages and the weekly trend up to `today`.
pub fn training_analysis(records: &[EventAttendance], today: DayId) -> TrainingAnalysis {
    let dated = records
        .iter()
        .filter_map(|record| record.day().map(|day| (day, record.present.len() as u32)))
        .collect::<Vec<_>>();

    let since = |days| DateWindow::ending_at(today, days).start();
    let trend_start = since(TREND_DAYS);
    let mut weeks = BTreeMap::<(i32, u32), Vec<u32>>::new();
    for (day, count) in &dated {
        if *day < trend_start {
            continue;
        }
        let week = day.date().iso_week();
        weeks
            .entry((week.year(), week.week()))
            .or_default()
            .push(*count);
    }
    let skip = weeks.len().saturating_sub(TREND_WEEKS);
    let weekly_trend = weeks
        .into_iter()
        .skip(skip)
        .map(|((year, week), counts)| WeekTrend {
            year,
            week,
            avg_count: rounded_mean(&counts),
        })
        .collect();

    TrainingAnalysis {
        avg_week: rounded_mean(&counts_since(&dated, since(7))),
        avg_month: rounded_mean(&counts_since(&dated, since(30))),
        total_trainings: records.len() as u32,
        weekly_trend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::tests::{day, record};

    #[test]
    fn test_empty() {
        assert_eq!(
            training_analysis(&[], day("2024-03-20")),
            TrainingAnalysis::default()
        );
    }

    #[test]
    fn test_averages() {
        let records = vec![
            record("2024-03-20", &["a", "b", "c"]),
            record("2024-03-15", &["a", "b"]),
            record("2024-03-01", &["a"]),
            record("2024-01-01", &["a", "b", "c", "d"]),
        ];
        let analysis = training_analysis(&records, day("2024-03-20"));
        // 3 and 2 in the last week, plus 1 within the month.
        assert_eq!(analysis.avg_week, 3);
        assert_eq!(analysis.avg_month, 2);
        assert_eq!(analysis.total_trainings, 4);
    }

    #[test]
    fn test_weekly_trend_by_iso_week() {
        let records = vec![
            record("2024-03-18", &["a", "b", "c"]),
            record("2024-03-17", &["a"]),
            record("2024-03-11", &["a", "b", "c", "d"]),
            record("2024-03-12", &["a", "b"]),
            record("2023-12-01", &["a"]),
        ];
        let analysis = training_analysis(&records, day("2024-03-20"));
        let trend = analysis
            .weekly_trend
            .iter()
            .map(|w| (w.label(), w.avg_count))
            .collect::<Vec<_>>();
        assert_eq!(
            trend,
            vec![("W 11".to_owned(), 2), ("W 12".to_owned(), 3)]
        );
    }

    #[test]
    fn test_trend_keeps_last_twelve_weeks() {
        let today = day("2024-03-20");
        let records = (0..TREND_DAYS)
            .map(|offset| record(&today.add_days(-i64::from(offset)).to_string(), &["a"]))
            .collect::<Vec<_>>();
        let analysis = training_analysis(&records, today);
        assert_eq!(analysis.weekly_trend.len(), TREND_WEEKS);
        let last = analysis.weekly_trend.last().unwrap();
        assert_eq!((last.year, last.week), (2024, 12));
        assert!(analysis.weekly_trend.iter().all(|w| w.avg_count == 1));
    }
}
