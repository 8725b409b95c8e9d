pub mod outcome;
pub mod record;
pub mod schema;
pub mod statistics;

pub use outcome::{EntryModel, TradeResult};
pub use record::{Checklist, DailyRecord, LegacyTrade, MultiTrade, TradeEntry, TradePayload, UserHistory};
pub use schema::{StepConfig, STEPS};
pub use statistics::{Breakdown, Statistics};
