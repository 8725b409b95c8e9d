use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::str::FromStr;

use crate::core::checklist::ChecklistEvaluator;
use crate::models::record::{DailyRecord, TradeEntry, UserHistory};
use crate::trading::trades::record_trades;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryPeriod {
    #[default]
    All,
    LastDays(u32),
}

impl FromStr for HistoryPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(HistoryPeriod::All),
            n => n
                .parse()
                .map(HistoryPeriod::LastDays)
                .map_err(|_| format!("expected a day count or 'all', got {n}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryFilter {
    #[default]
    All,
    WithEntry,
    NoEntry,
}

impl FromStr for EntryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(EntryFilter::All),
            "entry" | "with-entry" => Ok(EntryFilter::WithEntry),
            "noentry" | "no-entry" => Ok(EntryFilter::NoEntry),
            other => Err(format!("unknown entry filter: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryFilter {
    pub period: HistoryPeriod,
    pub kind: EntryFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryItem {
    pub date: String,
    pub completion: u32,
    pub trades: Vec<TradeEntry>,
    pub record: DailyRecord,
}

/// Newest-first view of a history. `today` anchors the period cutoff.
pub fn query(
    history: &UserHistory,
    filter: &HistoryFilter,
    today: Option<NaiveDate>,
    evaluator: &ChecklistEvaluator,
) -> Vec<HistoryItem> {
    let cutoff = match (filter.period, today) {
        (HistoryPeriod::LastDays(n), Some(today)) => Some(today - Duration::days(i64::from(n))),
        _ => None,
    };

    history
        .trades
        .iter()
        .rev()
        .filter(|(date, _)| match cutoff {
            Some(cutoff) => NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok_and(|d| d >= cutoff),
            None => true,
        })
        .filter(|(_, record)| match filter.kind {
            EntryFilter::All => true,
            EntryFilter::WithEntry => record.had_entry == Some(true),
            EntryFilter::NoEntry => record.had_entry != Some(true),
        })
        .map(|(date, record)| HistoryItem {
            date: date.clone(),
            completion: evaluator.completion_percentage(&record.checklist),
            trades: record_trades(record),
            record: record.clone(),
        })
        .collect()
}
