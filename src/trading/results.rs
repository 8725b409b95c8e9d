use crate::models::outcome::TradeResult;
use crate::models::record::{DailyRecord, TradePayload};

/// Sets one trade's verdict and resets its points to 0. Legacy records are
/// edited in place and only have trade 0. Returns false, leaving the record
/// untouched, when the trade doesn't exist.
pub fn apply_result(record: &mut DailyRecord, index: usize, verdict: TradeResult) -> bool {
    match record.trade_data.as_mut() {
        Some(TradePayload::Multi(multi)) => match multi.trades.get_mut(index) {
            Some(trade) => {
                trade.result = Some(verdict);
                trade.points = Some(0.0);
                true
            }
            None => false,
        },
        Some(TradePayload::Legacy(legacy)) if index == 0 => {
            legacy.result = Some(verdict);
            legacy.points = Some(0.0);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradeResult::{Loss, Win};
    use crate::test_helpers::{legacy_day, multi_day, no_entry_day};

    #[test]
    fn marks_selected_multi_trade_only() {
        let mut day = multi_day("2024-03-04", &[(None, None), (Some(Win), Some(4.0))], true);
        assert!(apply_result(&mut day, 0, Loss));
        let multi = day.trade_data.as_ref().and_then(TradePayload::as_multi).unwrap();
        assert_eq!(multi.trades[0].result, Some(Loss));
        assert_eq!(multi.trades[0].points, Some(0.0));
        assert_eq!(multi.trades[1].result, Some(Win));
        assert_eq!(multi.trades[1].points, Some(4.0));
    }

    #[test]
    fn legacy_is_updated_in_place() {
        let mut day = legacy_day("2024-02-06", None, Some(9.0), false);
        assert!(apply_result(&mut day, 0, Win));
        match &day.trade_data {
            Some(TradePayload::Legacy(l)) => {
                assert_eq!(l.result, Some(Win));
                assert_eq!(l.points, Some(0.0));
                assert_eq!(l.fvg_count, Some(2));
            }
            other => panic!("legacy shape lost: {:?}", other),
        }
    }

    #[test]
    fn missing_trade_is_a_no_op() {
        let mut day = multi_day("2024-03-04", &[(None, None)], false);
        let before = day.clone();
        assert!(!apply_result(&mut day, 3, Win));
        assert_eq!(day, before);

        let mut legacy = legacy_day("2024-02-06", None, None, false);
        assert!(!apply_result(&mut legacy, 1, Win));

        let mut empty = no_entry_day("2024-03-01");
        assert!(!apply_result(&mut empty, 0, Win));
    }
}
