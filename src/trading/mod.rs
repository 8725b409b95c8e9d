pub mod migration;
pub mod results;
pub mod statistics;
pub mod trades;

pub use migration::{migrate_history, MigrationReport};
pub use results::apply_result;
pub use statistics::{StatisticsAggregator, StatisticsReport};
pub use trades::{normalize_trades, record_trades};
