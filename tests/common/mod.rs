use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::America::New_York;
use std::path::PathBuf;

use edgecore_journal::config::{Config, SessionTime};
use edgecore_journal::models::record::{Checklist, DailyRecord, MultiTrade, TradePayload};
use edgecore_journal::models::schema::STEPS;

/// New York window 09:30-10:15 writing into its own temp dir.
pub fn test_config(tag: &str) -> Config {
    Config {
        instrument: "NASDAQ (NQ)".to_string(),
        timezone: New_York,
        window: SessionTime {
            start: (9, 30),
            end: (10, 15),
        },
        data_dir: temp_dir(tag),
        auth_url: String::new(),
        auth_api_key: String::new(),
        auth_jwt_secret: String::new(),
        auth_email: String::new(),
        auth_password: String::new(),
        default_user: String::new(),
        log_level: "ERROR".to_string(),
    }
}

pub fn temp_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("edgecore_integ_{}_{}", tag, std::process::id()))
}

/// UTC instant for a New York wall-clock time.
pub fn et(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    New_York
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

pub fn full_checklist() -> Checklist {
    STEPS
        .iter()
        .filter(|s| s.items > 0)
        .map(|s| (s.id.to_string(), vec![true; s.items]))
        .collect()
}

/// A form submission with `count` pending trades.
pub fn entry_form(count: u8, complete: bool) -> DailyRecord {
    let mut rec = DailyRecord::empty("");
    if complete {
        rec.checklist = full_checklist();
    }
    rec.had_entry = Some(true);
    rec.trade_data = Some(TradePayload::Multi(MultiTrade::with_count(None, count)));
    rec
}

pub fn no_entry_form(reason: &str) -> DailyRecord {
    let mut rec = DailyRecord::empty("");
    rec.had_entry = Some(false);
    rec.no_entry_reasons.insert(reason.to_string());
    rec
}
