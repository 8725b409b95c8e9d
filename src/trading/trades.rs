use crate::models::outcome::EntryModel;
use crate::models::record::{DailyRecord, LegacyTrade, TradeEntry, TradePayload};

/// FVG count used when a legacy record left it blank or zero.
const DEFAULT_FVG_COUNT: u8 = 1;

/// Flattens a day's trade payload into individual trades, whichever shape
/// the record was stored in.
pub fn normalize_trades(had_entry: Option<bool>, trade_data: Option<&TradePayload>) -> Vec<TradeEntry> {
    if had_entry != Some(true) {
        return Vec::new();
    }
    match trade_data {
        Some(TradePayload::Multi(multi)) => multi.trades.clone(),
        Some(TradePayload::Legacy(legacy)) => vec![legacy_entry(legacy)],
        Some(TradePayload::Unrecognized(_)) | None => Vec::new(),
    }
}

pub fn record_trades(record: &DailyRecord) -> Vec<TradeEntry> {
    normalize_trades(record.had_entry, record.trade_data.as_ref())
}

pub fn legacy_entry(legacy: &LegacyTrade) -> TradeEntry {
    let fvg_count = match legacy.fvg_count {
        Some(n) if n > 0 => n.min(3),
        _ => DEFAULT_FVG_COUNT,
    };
    TradeEntry {
        model: EntryModel::M1,
        fvg_count,
        notes: legacy.notes.clone().unwrap_or_default(),
        result: legacy.result,
        points: legacy.points,
    }
}
