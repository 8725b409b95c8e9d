pub mod history;

pub use history::{EntryFilter, HistoryFilter, HistoryItem, HistoryPeriod};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};

use crate::auth::Identity;
use crate::core::checklist::ChecklistEvaluator;
use crate::core::clock::TradingClock;
use crate::models::outcome::TradeResult;
use crate::models::record::{DailyRecord, TradePayload, UserHistory};
use crate::models::schema::{OBSOLETE_REGISTRO_STEP, SCHEMA_VERSION};
use crate::models::statistics::Statistics;
use crate::storage::{RecordStore, StorageError};
use crate::trading::migration::{migrate_history, MigrationReport};
use crate::trading::results::apply_result;
use crate::trading::statistics::{StatisticsAggregator, StatisticsReport};
use crate::trading::trades::record_trades;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("indicate whether there was an entry today (yes or no)")]
    EntryDecisionMissing,
    #[error("fill in the trade details")]
    TradeDetailsMissing,
    #[error("select how many trades were executed")]
    TradeCountMissing,
    #[error("no signed-in user")]
    NoIdentity,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl JournalError {
    /// Whether the user can fix this by completing the form.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            JournalError::EntryDecisionMissing
                | JournalError::TradeDetailsMissing
                | JournalError::TradeCountMissing
        )
    }
}

/// Journal access requires a signed-in user.
pub fn require_identity(identity: Option<Identity>) -> Result<Identity, JournalError> {
    identity.ok_or(JournalError::NoIdentity)
}

/// Checks a day's answers before they are saved.
pub fn validate_record(record: &DailyRecord) -> Result<(), JournalError> {
    match record.had_entry {
        None => Err(JournalError::EntryDecisionMissing),
        Some(false) => Ok(()),
        Some(true) => match &record.trade_data {
            Some(TradePayload::Multi(multi)) if multi.trades.is_empty() => {
                Err(JournalError::TradeCountMissing)
            }
            Some(TradePayload::Multi(_)) => Ok(()),
            _ => Err(JournalError::TradeDetailsMissing),
        },
    }
}

/// The daily checklist journal for one store. Every write recomputes the
/// user's statistics from their whole history before persisting.
pub struct Journal<S: RecordStore> {
    store: S,
    clock: TradingClock,
    evaluator: ChecklistEvaluator,
    aggregator: StatisticsAggregator,
}

impl<S: RecordStore> Journal<S> {
    pub fn new(store: S, clock: TradingClock) -> Self {
        let evaluator = ChecklistEvaluator::default();
        Self {
            store,
            clock,
            evaluator,
            aggregator: StatisticsAggregator::new(evaluator),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &TradingClock {
        &self.clock
    }

    pub fn load(&self, user: &Identity) -> Result<UserHistory, JournalError> {
        Ok(self.store.get(&user.user_id)?.unwrap_or_default())
    }

    /// Today's saved record, or a blank one if nothing was saved yet.
    pub fn today(&self, user: &Identity, utc_now: Option<DateTime<Utc>>) -> Result<DailyRecord, JournalError> {
        let key = self.clock.date_key(utc_now);
        let history = self.load(user)?;
        Ok(history
            .trades
            .get(&key)
            .cloned()
            .unwrap_or_else(|| DailyRecord::empty(&key)))
    }

    /// Validates and stores `record` as today's entry, replacing any earlier
    /// save for the same date.
    pub fn save_today(
        &mut self,
        user: &Identity,
        mut record: DailyRecord,
        utc_now: Option<DateTime<Utc>>,
    ) -> Result<Statistics, JournalError> {
        validate_record(&record)?;

        let utc_now = utc_now.unwrap_or_else(Utc::now);
        let key = self.clock.date_key(Some(utc_now));

        if record.had_entry == Some(false) {
            record.trade_data = None;
        } else {
            record.no_entry_reasons.clear();
        }
        record.checklist.remove(OBSOLETE_REGISTRO_STEP);
        record.date = key.clone();
        record.saved_at = Some(utc_now.to_rfc3339());
        record.schema_version = Some(SCHEMA_VERSION);

        let mut history = self.load(user)?;
        let completion = self.evaluator.completion_percentage(&record.checklist);
        let trades = record_trades(&record).len();
        history.trades.insert(key.clone(), record);
        history.statistics = self.aggregator.compute(&history.trades);
        self.store.put(&user.user_id, &history)?;

        info!(
            "Saved {} for {}: checklist {}%, {} trade(s)",
            key,
            user.display_name(),
            completion,
            trades
        );
        Ok(history.statistics)
    }

    /// Marks trade `index` of `date` as won or lost. Returns false without
    /// writing anything when that day or trade does not exist.
    pub fn update_trade_result(
        &mut self,
        user: &Identity,
        date: &str,
        index: usize,
        verdict: TradeResult,
    ) -> Result<bool, JournalError> {
        let Some(mut history) = self.store.get(&user.user_id)? else {
            return Ok(false);
        };
        let applied = history
            .trades
            .get_mut(date)
            .is_some_and(|record| apply_result(record, index, verdict));
        if !applied {
            debug!("No trade {} on {} to mark as {}", index, date, verdict);
            return Ok(false);
        }

        history.statistics = self.aggregator.compute(&history.trades);
        self.store.put(&user.user_id, &history)?;
        info!("Trade {} on {} marked as {}", index + 1, date, verdict);
        Ok(true)
    }

    pub fn report(&self, user: &Identity) -> Result<StatisticsReport, JournalError> {
        let history = self.load(user)?;
        Ok(self.aggregator.report(&history.trades))
    }

    /// Runs the one-time history cleanup and persists it if anything changed.
    pub fn migrate(&mut self, user: &Identity) -> Result<MigrationReport, JournalError> {
        let Some(mut history) = self.store.get(&user.user_id)? else {
            return Ok(MigrationReport::default());
        };
        let report = migrate_history(&mut history);
        if report.changed() {
            history.statistics = self.aggregator.compute(&history.trades);
            self.store.put(&user.user_id, &history)?;
        }
        Ok(report)
    }

    pub fn history(
        &self,
        user: &Identity,
        filter: &HistoryFilter,
        utc_now: Option<DateTime<Utc>>,
    ) -> Result<Vec<HistoryItem>, JournalError> {
        let history = self.load(user)?;
        let today = self.clock.trading_time(utc_now).date();
        Ok(history::query(&history, filter, today, &self.evaluator))
    }
}
