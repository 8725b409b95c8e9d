use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::config::{Config, SessionTime};

/// Wall-clock breakdown in the trading time zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradingTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub date_key: String,
    pub time_string: String,
}

impl TradingTime {
    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour * 60 + self.minute
    }

    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockReading {
    pub time: TradingTime,
    pub window_open: bool,
}

/// Answers "what day is it on the trading desk" and "is the execution
/// window open right now".
#[derive(Debug, Clone)]
pub struct TradingClock {
    pub timezone: Tz,
    pub window: SessionTime,
}

impl TradingClock {
    pub fn new(cfg: &Config) -> Self {
        Self {
            timezone: cfg.timezone,
            window: cfg.window,
        }
    }

    pub fn read(&self, utc_now: Option<DateTime<Utc>>) -> ClockReading {
        let time = self.trading_time(utc_now);
        let window_open = self.is_window_open_at(&time);
        ClockReading { time, window_open }
    }

    pub fn trading_time(&self, utc_now: Option<DateTime<Utc>>) -> TradingTime {
        let utc_now = utc_now.unwrap_or_else(Utc::now);
        let local = utc_now.with_timezone(&self.timezone);

        TradingTime {
            year: local.year(),
            month: local.month(),
            day: local.day(),
            hour: local.hour(),
            minute: local.minute(),
            second: local.second(),
            date_key: local.format("%Y-%m-%d").to_string(),
            time_string: local.format("%H:%M").to_string(),
        }
    }

    pub fn date_key(&self, utc_now: Option<DateTime<Utc>>) -> String {
        self.trading_time(utc_now).date_key
    }

    pub fn is_window_open(&self, utc_now: Option<DateTime<Utc>>) -> bool {
        self.is_window_open_at(&self.trading_time(utc_now))
    }

    // Both bounds inclusive.
    fn is_window_open_at(&self, time: &TradingTime) -> bool {
        let current = time.minutes_since_midnight();
        current >= self.window.start_minutes() && current <= self.window.end_minutes()
    }
}
