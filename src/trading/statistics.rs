use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::core::checklist::ChecklistEvaluator;
use crate::models::outcome::TradeResult;
use crate::models::record::DailyRecord;
use crate::models::statistics::{
    percent, round2, Breakdown, Statistics, WinTally, CORRELATION_LABELS, WEEKDAY_LABELS,
};
use crate::trading::trades::record_trades;

/// Everything the statistics view shows, derived in one go.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsReport {
    pub statistics: Statistics,
    pub weekday: Breakdown,
    pub correlation: Breakdown,
}

impl StatisticsReport {
    pub fn print(&self, instrument: &str) {
        let s = &self.statistics;
        println!("\n{}", "=".repeat(60));
        println!("  EDGECORE STATISTICS  {}", instrument);
        println!("{}", "=".repeat(60));
        println!();
        println!("  DAYS");
        println!("  ───────────────────────────────────");
        println!("  Recorded:    {}", s.total_days);
        println!("  With entry:  {}", s.days_with_entry);
        println!("  No entry:    {}", s.days_no_entry);
        println!(
            "  Checklist:   {} complete ({}%)",
            s.checklist_complete_count, s.checklist_complete_percentage
        );
        println!();
        println!("  TRADES");
        println!("  ───────────────────────────────────");
        println!("  Total:       {}", s.total_trades);
        println!("  W / L:       {} / {}", s.total_wins, s.total_losses);
        println!("  Win Rate:    {}%", s.win_rate);
        println!("  Points:      {:+.2}", s.total_points);
        println!("  Avg/Trade:   {:+.2}", s.avg_points_per_trade);
        println!();
        println!("  WIN RATE BY WEEKDAY");
        println!("  ───────────────────────────────────");
        for (label, rate) in self.weekday.labels.iter().zip(&self.weekday.data) {
            println!("  {:<12} {:>3}%", label, rate);
        }
        println!();
        println!("  CHECKLIST CORRELATION");
        println!("  ───────────────────────────────────");
        for (label, rate) in self.correlation.labels.iter().zip(&self.correlation.data) {
            println!("  {:<16} {:>3}%", label, rate);
        }
        println!("{}", "=".repeat(60));
    }
}

/// Pure projection from a user's day records to their statistics. Nothing is
/// cached between calls; every call rescans the whole history.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticsAggregator {
    evaluator: ChecklistEvaluator,
}

impl StatisticsAggregator {
    pub fn new(evaluator: ChecklistEvaluator) -> Self {
        Self { evaluator }
    }

    pub fn report(&self, days: &BTreeMap<String, DailyRecord>) -> StatisticsReport {
        StatisticsReport {
            statistics: self.compute(days),
            weekday: self.weekday_win_rates(days),
            correlation: self.checklist_correlation(days),
        }
    }

    pub fn compute(&self, days: &BTreeMap<String, DailyRecord>) -> Statistics {
        let mut days_with_entry = 0;
        let mut checklist_complete_count = 0;
        let mut wins = 0;
        let mut losses = 0;
        let mut total_points = 0.0;

        for day in days.values() {
            if self.evaluator.is_complete(&day.checklist) {
                checklist_complete_count += 1;
            }
            if !day.has_trade() {
                continue;
            }
            days_with_entry += 1;

            for trade in record_trades(day) {
                match trade.result {
                    Some(TradeResult::Win) => wins += 1,
                    Some(TradeResult::Loss) => losses += 1,
                    None => continue,
                }
                total_points += trade.points.unwrap_or(0.0);
            }
        }

        let total_days = days.len();
        let total_trades = wins + losses;
        let avg_points_per_trade = if total_trades > 0 {
            round2(total_points / total_trades as f64)
        } else {
            0.0
        };

        Statistics {
            total_days,
            days_with_entry,
            days_no_entry: total_days - days_with_entry,
            total_wins: wins,
            total_losses: losses,
            total_trades,
            win_rate: percent(wins, total_trades),
            total_points: round2(total_points),
            avg_points_per_trade,
            checklist_complete_count,
            checklist_complete_percentage: percent(checklist_complete_count, total_days),
        }
    }

    /// Win rate per weekday (Sunday first). Every trade on a day counts
    /// toward that day's bucket, decided or not.
    pub fn weekday_win_rates(&self, days: &BTreeMap<String, DailyRecord>) -> Breakdown {
        let mut buckets = [WinTally::default(); 7];

        for (key, day) in days.iter().filter(|(_, d)| d.has_trade()) {
            let Some(weekday) = weekday_of(key) else {
                debug!("Skipping weekday bucket for unparseable date key {}", key);
                continue;
            };
            let bucket = &mut buckets[weekday];
            for trade in record_trades(day) {
                bucket.record(trade.result == Some(TradeResult::Win));
            }
        }

        Breakdown {
            labels: WEEKDAY_LABELS.to_vec(),
            data: buckets.iter().map(WinTally::win_rate).collect(),
        }
    }

    /// Win rate on fully-completed checklist days versus the rest.
    pub fn checklist_correlation(&self, days: &BTreeMap<String, DailyRecord>) -> Breakdown {
        let mut complete = WinTally::default();
        let mut partial = WinTally::default();

        for day in days.values().filter(|d| d.has_trade()) {
            let bucket = if self.evaluator.is_complete(&day.checklist) {
                &mut complete
            } else {
                &mut partial
            };
            for trade in record_trades(day) {
                bucket.record(trade.result == Some(TradeResult::Win));
            }
        }

        Breakdown {
            labels: CORRELATION_LABELS.to_vec(),
            data: vec![complete.win_rate(), partial.win_rate()],
        }
    }
}

/// Day of week (0 = Sunday) of a `YYYY-MM-DD` key, read as the calendar date
/// it names. Keys are already trading-zone dates, so no offset is applied.
pub fn weekday_of(date_key: &str) -> Option<usize> {
    NaiveDate::parse_from_str(date_key, "%Y-%m-%d")
        .ok()
        .map(|d| d.weekday().num_days_from_sunday() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradeResult::{Loss, Win};
    use crate::test_helpers::{legacy_day, multi_day, no_entry_day};

    fn history(records: Vec<DailyRecord>) -> BTreeMap<String, DailyRecord> {
        records.into_iter().map(|r| (r.date.clone(), r)).collect()
    }

    #[test]
    fn ten_days_four_entries() {
        let days = history(vec![
            multi_day("2024-03-04", &[(Some(Win), Some(10.0))], true),
            multi_day("2024-03-05", &[(Some(Win), Some(5.5))], false),
            legacy_day("2024-02-06", Some(Win), Some(4.0), true),
            legacy_day("2024-02-07", Some(Loss), Some(-6.0), false),
            no_entry_day("2024-03-01"),
            no_entry_day("2024-03-02"),
            no_entry_day("2024-03-03"),
            no_entry_day("2024-03-06"),
            no_entry_day("2024-03-07"),
            no_entry_day("2024-03-08"),
        ]);
        let stats = StatisticsAggregator::default().compute(&days);
        assert_eq!(stats.total_days, 10);
        assert_eq!(stats.days_with_entry, 4);
        assert_eq!(stats.days_no_entry, 6);
        assert_eq!(stats.total_trades, 4);
        assert_eq!(stats.total_wins, 3);
        assert_eq!(stats.total_losses, 1);
        assert_eq!(stats.win_rate, 75);
        assert!((stats.total_points - 13.5).abs() < 1e-9);
        assert!((stats.avg_points_per_trade - 3.38).abs() < 1e-9);
        assert_eq!(stats.checklist_complete_count, 2);
        assert_eq!(stats.checklist_complete_percentage, 20);
    }

    #[test]
    fn pending_trades_do_not_count_as_decided() {
        let days = history(vec![multi_day(
            "2024-03-04",
            &[(Some(Win), Some(2.0)), (None, None), (Some(Loss), None)],
            false,
        )]);
        let stats = StatisticsAggregator::default().compute(&days);
        assert_eq!(stats.days_with_entry, 1);
        assert_eq!(stats.total_trades, 2);
        assert_eq!(stats.win_rate, 50);
        assert!((stats.total_points - 2.0).abs() < 1e-9);
        assert!((stats.avg_points_per_trade - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_history_is_all_zero() {
        let report = StatisticsAggregator::default().report(&BTreeMap::new());
        assert_eq!(report.statistics, Statistics::default());
        assert_eq!(report.weekday.data, vec![0; 7]);
        assert_eq!(report.correlation.data, vec![0, 0]);
    }

    #[test]
    fn same_weekday_win_and_loss_is_fifty() {
        // 2024-03-04 and 2024-03-11 are both Mondays.
        let days = history(vec![
            multi_day("2024-03-04", &[(Some(Win), Some(1.0))], false),
            legacy_day("2024-03-11", Some(Loss), Some(-1.0), false),
        ]);
        let weekday = StatisticsAggregator::default().weekday_win_rates(&days);
        assert_eq!(weekday.labels, WEEKDAY_LABELS.to_vec());
        assert_eq!(weekday.data, vec![0, 50, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn weekday_uses_calendar_date_of_key() {
        assert_eq!(weekday_of("2024-03-03"), Some(0));
        assert_eq!(weekday_of("2024-03-09"), Some(6));
        assert_eq!(weekday_of("not-a-date"), None);
    }

    #[test]
    fn correlation_buckets_are_independent() {
        let days = history(vec![
            multi_day("2024-03-04", &[(Some(Win), None)], true),
            multi_day("2024-03-05", &[(Some(Win), None)], true),
            multi_day("2024-03-06", &[(Some(Loss), None)], true),
            legacy_day("2024-03-07", Some(Loss), None, false),
            no_entry_day("2024-03-08"),
        ]);
        let corr = StatisticsAggregator::default().checklist_correlation(&days);
        assert_eq!(corr.labels, CORRELATION_LABELS.to_vec());
        assert_eq!(corr.data, vec![67, 0]);
    }

    #[test]
    fn correlation_with_one_empty_bucket() {
        let days = history(vec![multi_day("2024-03-04", &[(Some(Win), None)], false)]);
        let corr = StatisticsAggregator::default().checklist_correlation(&days);
        assert_eq!(corr.data, vec![0, 100]);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let days = history(vec![
            multi_day("2024-03-04", &[(Some(Win), Some(3.25)), (Some(Loss), Some(-1.0))], true),
            legacy_day("2024-02-06", Some(Win), Some(4.0), false),
            no_entry_day("2024-03-01"),
        ]);
        let agg = StatisticsAggregator::default();
        assert_eq!(agg.report(&days), agg.report(&days));
    }
}
