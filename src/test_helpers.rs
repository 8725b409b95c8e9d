use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::America::New_York;
use std::path::PathBuf;

use crate::config::{Config, SessionTime};
use crate::models::record::{Checklist, DailyRecord, LegacyTrade, MultiTrade, TradeEntry, TradePayload};
use crate::models::schema::STEPS;
use crate::models::TradeResult;

/// A Config suitable for testing: New York window 09:30-10:15, temp data dir.
pub fn default_test_config() -> Config {
    Config {
        instrument: "NASDAQ (NQ)".to_string(),
        timezone: New_York,
        window: SessionTime {
            start: (9, 30),
            end: (10, 15),
        },
        data_dir: std::env::temp_dir().join("edgecore_test"),
        auth_url: String::new(),
        auth_api_key: String::new(),
        auth_jwt_secret: String::new(),
        auth_email: String::new(),
        auth_password: String::new(),
        default_user: String::new(),
        log_level: "ERROR".to_string(),
    }
}

/// Unique temp dir per test so file-backed stores don't leak state.
pub fn temp_data_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("edgecore_{}_{}", tag, std::process::id()))
}

/// UTC instant for a New York wall-clock time.
pub fn utc_for_et(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    New_York
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

/// Every schema item checked.
pub fn full_checklist() -> Checklist {
    STEPS
        .iter()
        .filter(|s| s.items > 0)
        .map(|s| (s.id.to_string(), vec![true; s.items]))
        .collect()
}

pub fn no_entry_day(date: &str) -> DailyRecord {
    let mut rec = DailyRecord::empty(date);
    rec.had_entry = Some(false);
    rec
}

pub fn multi_day(date: &str, results: &[(Option<TradeResult>, Option<f64>)], complete: bool) -> DailyRecord {
    let mut rec = DailyRecord::empty(date);
    if complete {
        rec.checklist = full_checklist();
    }
    rec.had_entry = Some(true);
    let mut multi = MultiTrade::with_count(None, results.len() as u8);
    for (trade, &(result, points)) in multi.trades.iter_mut().zip(results) {
        *trade = TradeEntry {
            result,
            points,
            ..TradeEntry::default()
        };
    }
    rec.trade_data = Some(TradePayload::Multi(multi));
    rec
}

pub fn legacy_day(date: &str, result: Option<TradeResult>, points: Option<f64>, complete: bool) -> DailyRecord {
    let mut rec = DailyRecord::empty(date);
    if complete {
        rec.checklist = full_checklist();
    }
    rec.had_entry = Some(true);
    rec.schema_version = None;
    rec.trade_data = Some(TradePayload::Legacy(LegacyTrade {
        fvg_count: Some(2),
        notes: Some(String::new()),
        result,
        points,
    }));
    rec
}
