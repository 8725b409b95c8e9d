use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::outcome::{EntryModel, TradeResult};
use crate::models::schema::{SCHEMA_VERSION, STEPS};
use crate::models::statistics::Statistics;

pub const MAX_TRADES_PER_DAY: u8 = 3;

/// Per-step boolean answers, keyed by step id.
pub type Checklist = BTreeMap<String, Vec<bool>>;

/// One individual trade inside a multi-trade day. Fields missing from stored
/// data fall back to a blank M1 trade with one FVG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TradeEntry {
    pub model: EntryModel,
    pub fvg_count: u8,
    pub notes: String,
    pub result: Option<TradeResult>,
    pub points: Option<f64>,
}

impl Default for TradeEntry {
    fn default() -> Self {
        Self {
            model: EntryModel::M1,
            fvg_count: 1,
            notes: String::new(),
            result: None,
            points: None,
        }
    }
}

/// The single-trade shape written before multi-trade support existed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTrade {
    #[serde(default)]
    pub fvg_count: Option<u8>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub result: Option<TradeResult>,
    #[serde(default)]
    pub points: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiTrade {
    #[serde(default)]
    pub trade_count: u8,
    pub trades: Vec<TradeEntry>,
    #[serde(default)]
    pub notes: String,
}

impl MultiTrade {
    /// Resizes to `count` trades (clamped to 1..=3), keeping existing entries
    /// and filling new slots with blank trades.
    pub fn with_count(current: Option<&MultiTrade>, count: u8) -> Self {
        let count = count.clamp(1, MAX_TRADES_PER_DAY);
        let existing = current.map(|m| m.trades.as_slice()).unwrap_or(&[]);
        let trades = (0..count as usize)
            .map(|i| existing.get(i).cloned().unwrap_or_default())
            .collect();
        Self {
            trade_count: count,
            trades,
            notes: current.map(|m| m.notes.clone()).unwrap_or_default(),
        }
    }
}

/// A day's trade payload. Historical records keep whatever shape they were
/// written with; payloads that match neither shape are carried verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum TradePayload {
    Legacy(LegacyTrade),
    Multi(MultiTrade),
    Unrecognized(Value),
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
enum TaggedPayload {
    Legacy(LegacyTrade),
    Multi(MultiTrade),
}

impl From<Value> for TradePayload {
    fn from(value: Value) -> Self {
        let parsed = if value.get("shape").is_some() {
            serde_json::from_value::<TaggedPayload>(value.clone())
                .ok()
                .map(|tagged| match tagged {
                    TaggedPayload::Legacy(l) => TradePayload::Legacy(l),
                    TaggedPayload::Multi(m) => TradePayload::Multi(m),
                })
        } else if value.get("trades").is_some_and(Value::is_array) {
            serde_json::from_value::<MultiTrade>(value.clone())
                .ok()
                .map(|mut multi| {
                    if multi.trade_count == 0 {
                        multi.trade_count = multi.trades.len() as u8;
                    }
                    TradePayload::Multi(multi)
                })
        } else if value.get("fvgCount").is_some() {
            serde_json::from_value::<LegacyTrade>(value.clone())
                .ok()
                .map(TradePayload::Legacy)
        } else {
            None
        };

        parsed.unwrap_or(TradePayload::Unrecognized(value))
    }
}

impl From<TradePayload> for Value {
    fn from(payload: TradePayload) -> Self {
        let tagged = match payload {
            TradePayload::Legacy(l) => TaggedPayload::Legacy(l),
            TradePayload::Multi(m) => TaggedPayload::Multi(m),
            TradePayload::Unrecognized(raw) => return raw,
        };
        serde_json::to_value(tagged).unwrap_or(Value::Null)
    }
}

impl Serialize for TradePayload {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Value::from(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TradePayload {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(TradePayload::from)
    }
}

impl TradePayload {
    pub fn as_multi(&self) -> Option<&MultiTrade> {
        match self {
            TradePayload::Multi(m) => Some(m),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_checklist")]
    pub checklist: Checklist,
    #[serde(default)]
    pub had_entry: Option<bool>,
    #[serde(default)]
    pub trade_data: Option<TradePayload>,
    #[serde(default)]
    pub no_entry_reasons: BTreeSet<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,
}

/// Reads stored answers where only a literal `true` counts as checked.
/// Holes (`null`), stray values and non-list steps read as unchecked.
fn lenient_checklist<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<Checklist, D::Error> {
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .map(|(step, items)| {
            let items: Vec<bool> = match items {
                Value::Array(items) => items.iter().map(|v| v.as_bool() == Some(true)).collect(),
                _ => Vec::new(),
            };
            (step, items)
        })
        .collect())
}

impl DailyRecord {
    /// A blank record for `date` with every step's items unchecked.
    pub fn empty(date: &str) -> Self {
        let checklist = STEPS
            .iter()
            .filter(|step| step.items > 0)
            .map(|step| (step.id.to_string(), vec![false; step.items]))
            .collect();
        Self {
            date: date.to_string(),
            checklist,
            had_entry: None,
            trade_data: None,
            no_entry_reasons: BTreeSet::new(),
            notes: String::new(),
            saved_at: None,
            schema_version: Some(SCHEMA_VERSION),
        }
    }

    pub fn set_item(&mut self, step_id: &str, index: usize, checked: bool) {
        let items = self.checklist.entry(step_id.to_string()).or_default();
        if items.len() <= index {
            items.resize(index + 1, false);
        }
        items[index] = checked;
    }

    /// True when a trade was taken and its details were filled in.
    pub fn has_trade(&self) -> bool {
        self.had_entry == Some(true) && self.trade_data.is_some()
    }
}

/// Everything one user has recorded, keyed by `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserHistory {
    #[serde(default)]
    pub trades: BTreeMap<String, DailyRecord>,
    #[serde(default)]
    pub statistics: Statistics,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_untagged_legacy_payload() {
        let raw = json!({"fvgCount": 2, "notes": "x", "result": "win", "points": 5});
        let payload: TradePayload = serde_json::from_value(raw).unwrap();
        match payload {
            TradePayload::Legacy(l) => {
                assert_eq!(l.fvg_count, Some(2));
                assert_eq!(l.result, Some(TradeResult::Win));
                assert_eq!(l.points, Some(5.0));
            }
            other => panic!("expected legacy, got {:?}", other),
        }
    }

    #[test]
    fn reads_untagged_multi_payload() {
        let raw = json!({
            "tradeCount": 1,
            "trades": [{"model": "M3", "fvgCount": 3, "notes": "", "result": null, "points": null}],
            "notes": "day"
        });
        let payload: TradePayload = serde_json::from_value(raw).unwrap();
        let multi = payload.as_multi().expect("multi");
        assert_eq!(multi.trades[0].model, EntryModel::M3);
        assert_eq!(multi.notes, "day");
    }

    #[test]
    fn legacy_stays_legacy_after_round_trip() {
        let payload = TradePayload::Legacy(LegacyTrade {
            fvg_count: Some(1),
            notes: None,
            result: Some(TradeResult::Loss),
            points: Some(-3.5),
        });
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["shape"], "legacy");
        let back: TradePayload = serde_json::from_value(value).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn unknown_shape_is_preserved() {
        let raw = json!({"something": "else"});
        let payload: TradePayload = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(payload, TradePayload::Unrecognized(raw.clone()));
        assert_eq!(serde_json::to_value(&payload).unwrap(), raw);
    }

    #[test]
    fn bad_legacy_result_degrades_to_unrecognized() {
        let raw = json!({"fvgCount": 1, "result": "breakeven"});
        let payload: TradePayload = serde_json::from_value(raw).unwrap();
        assert!(matches!(payload, TradePayload::Unrecognized(_)));
    }

    #[test]
    fn record_without_had_entry_reads_as_unset() {
        let raw = json!({"date": "2024-03-04", "checklist": {"h1": [true]}, "tradeData": null});
        let rec: DailyRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(rec.had_entry, None);
        assert!(rec.trade_data.is_none());
        assert!(rec.schema_version.is_none());
    }

    #[test]
    fn empty_record_fills_schema() {
        let rec = DailyRecord::empty("2024-03-04");
        assert_eq!(rec.checklist["diario"], vec![false; 4]);
        assert!(!rec.checklist.contains_key("registro"));
        assert_eq!(rec.schema_version, Some(SCHEMA_VERSION));
    }

    #[test]
    fn multi_trade_missing_fvg_count_keeps_every_trade() {
        let raw = json!({
            "tradeCount": 2,
            "trades": [
                {"model": "M3", "fvgCount": 1, "notes": "", "result": "win", "points": 4},
                {"model": "M1", "notes": "", "result": "loss", "points": -2}
            ],
            "notes": ""
        });
        let payload: TradePayload = serde_json::from_value(raw).unwrap();
        let multi = payload.as_multi().expect("multi");
        assert_eq!(multi.trades.len(), 2);
        assert_eq!(multi.trades[0].result, Some(TradeResult::Win));
        assert_eq!(multi.trades[1].fvg_count, 1);
        assert_eq!(multi.trades[1].result, Some(TradeResult::Loss));
    }

    #[test]
    fn multi_trade_without_trade_count_uses_list_length() {
        let raw = json!({
            "trades": [{"model": "M1", "fvgCount": 2, "notes": "", "result": "win", "points": 3}],
            "notes": ""
        });
        let payload: TradePayload = serde_json::from_value(raw).unwrap();
        let multi = payload.as_multi().expect("multi");
        assert_eq!(multi.trade_count, 1);
        assert_eq!(multi.trades[0].fvg_count, 2);
    }

    #[test]
    fn trade_with_only_a_result_gets_defaults() {
        let entry: TradeEntry = serde_json::from_value(json!({"result": "win"})).unwrap();
        assert_eq!(
            entry,
            TradeEntry {
                result: Some(TradeResult::Win),
                ..TradeEntry::default()
            }
        );
    }

    #[test]
    fn checklist_holes_read_as_unchecked() {
        let raw = json!({
            "date": "2024-03-04",
            "checklist": {"h1": [true, true, null, true], "h4": null, "diario": [1, "yes", true]}
        });
        let rec: DailyRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(rec.checklist["h1"], vec![true, true, false, true]);
        assert_eq!(rec.checklist["h4"], Vec::<bool>::new());
        assert_eq!(rec.checklist["diario"], vec![false, false, true]);
    }

    #[test]
    fn submitted_record_may_omit_date() {
        let rec: DailyRecord = serde_json::from_value(json!({"hadEntry": false})).unwrap();
        assert_eq!(rec.date, "");
        assert_eq!(rec.had_entry, Some(false));
        assert!(rec.checklist.is_empty());
    }

    #[test]
    fn with_count_keeps_existing_trades() {
        let mut first = MultiTrade::with_count(None, 1);
        first.trades[0].model = EntryModel::M3;
        first.notes = "keep".into();
        let grown = MultiTrade::with_count(Some(&first), 3);
        assert_eq!(grown.trade_count, 3);
        assert_eq!(grown.trades.len(), 3);
        assert_eq!(grown.trades[0].model, EntryModel::M3);
        assert_eq!(grown.trades[2], TradeEntry::default());
        assert_eq!(grown.notes, "keep");

        let clamped = MultiTrade::with_count(Some(&grown), 7);
        assert_eq!(clamped.trade_count, 3);
    }
}
