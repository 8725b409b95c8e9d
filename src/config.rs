use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTime {
    pub start: (u32, u32),
    pub end: (u32, u32),
}

impl SessionTime {
    pub fn start_minutes(&self) -> u32 {
        self.start.0 * 60 + self.start.1
    }

    pub fn end_minutes(&self) -> u32 {
        self.end.0 * 60 + self.end.1
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Trading window
    pub instrument: String,
    pub timezone: Tz,
    pub window: SessionTime,

    // Storage
    pub data_dir: PathBuf,

    // Identity
    pub auth_url: String,
    pub auth_api_key: String,
    pub auth_jwt_secret: String,
    pub auth_email: String,
    pub auth_password: String,
    pub default_user: String,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        let timezone = env("TRADING_TIMEZONE", "America/New_York")
            .parse::<Tz>()
            .unwrap_or(DEFAULT_TIMEZONE);

        let window = SessionTime {
            start: parse_hhmm(&env("WINDOW_START", "09:30")).unwrap_or((9, 30)),
            end: parse_hhmm(&env("WINDOW_END", "10:15")).unwrap_or((10, 15)),
        };

        Config {
            instrument: env("INSTRUMENT", "NASDAQ (NQ)"),
            timezone,
            window,
            data_dir: PathBuf::from(env("DATA_DIR", "data")),
            auth_url: env("AUTH_URL", ""),
            auth_api_key: env("AUTH_API_KEY", ""),
            auth_jwt_secret: env("AUTH_JWT_SECRET", ""),
            auth_email: env("EDGECORE_EMAIL", ""),
            auth_password: env("EDGECORE_PASSWORD", ""),
            default_user: env("EDGECORE_USER", ""),
            log_level: env("LOG_LEVEL", "info"),
        }
    }

    /// An `AUTH_URL` selects the hosted provider; the API key is optional.
    pub fn uses_hosted_auth(&self) -> bool {
        !self.auth_url.is_empty()
    }
}

/// Parses `HH:MM` into an (hour, minute) pair.
pub fn parse_hhmm(s: &str) -> Option<(u32, u32)> {
    let (h, m) = s.trim().split_once(':')?;
    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_window_bounds() {
        assert_eq!(parse_hhmm("09:30"), Some((9, 30)));
        assert_eq!(parse_hhmm(" 10:15 "), Some((10, 15)));
        assert_eq!(parse_hhmm("24:00"), None);
        assert_eq!(parse_hhmm("9h30"), None);
    }

    #[test]
    fn auth_url_alone_selects_hosted_auth() {
        let mut cfg = crate::test_helpers::default_test_config();
        assert!(!cfg.uses_hosted_auth());
        cfg.auth_url = "https://auth.example.com".into();
        assert!(cfg.uses_hosted_auth());
        cfg.auth_api_key = "anon".into();
        assert!(cfg.uses_hosted_auth());
    }

    #[test]
    fn session_time_in_minutes() {
        let w = SessionTime {
            start: (9, 30),
            end: (10, 15),
        };
        assert_eq!(w.start_minutes(), 570);
        assert_eq!(w.end_minutes(), 615);
    }
}
