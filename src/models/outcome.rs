use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeResult {
    Win,
    Loss,
}

impl fmt::Display for TradeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeResult::Win => write!(f, "WIN"),
            TradeResult::Loss => write!(f, "LOSS"),
        }
    }
}

impl TradeResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeResult::Win => "win",
            TradeResult::Loss => "loss",
        }
    }
}

impl FromStr for TradeResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "win" | "w" => Ok(TradeResult::Win),
            "loss" | "l" => Ok(TradeResult::Loss),
            other => Err(format!("unknown trade result: {other}")),
        }
    }
}

/// Setup variant the trade was entered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EntryModel {
    #[default]
    M1,
    M3,
    #[serde(rename = "Continuación")]
    Continuation,
}

impl fmt::Display for EntryModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EntryModel {
    pub const ALL: [EntryModel; 3] = [EntryModel::M1, EntryModel::M3, EntryModel::Continuation];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryModel::M1 => "M1",
            EntryModel::M3 => "M3",
            EntryModel::Continuation => "Continuación",
        }
    }
}
