use serde::{Deserialize, Serialize};

pub const WEEKDAY_LABELS: [&str; 7] = ["Dom", "Lun", "Mar", "Mié", "Jue", "Vie", "Sáb"];
pub const CORRELATION_LABELS: [&str; 2] = ["Checklist 100%", "Checklist <100%"];

/// Summary counters projected from a user's full history.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Statistics {
    pub total_days: usize,
    pub days_with_entry: usize,
    pub days_no_entry: usize,
    pub total_wins: usize,
    pub total_losses: usize,
    pub total_trades: usize,
    pub win_rate: u32,
    pub total_points: f64,
    pub avg_points_per_trade: f64,
    pub checklist_complete_count: usize,
    pub checklist_complete_percentage: u32,
}

/// Labelled win-rate series, ready for a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub labels: Vec<&'static str>,
    pub data: Vec<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WinTally {
    pub trades: usize,
    pub wins: usize,
}

impl WinTally {
    pub fn record(&mut self, won: bool) {
        self.trades += 1;
        if won {
            self.wins += 1;
        }
    }

    pub fn win_rate(&self) -> u32 {
        percent(self.wins, self.trades)
    }
}

/// `round(100 * part / whole)`, or 0 when `whole` is 0.
pub fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
