use serde::Serialize;
use tracing::info;

use crate::models::record::UserHistory;
use crate::models::schema::OBSOLETE_REGISTRO_STEP;

/// Schema version assumed for records written before versions were stamped.
pub const UNSTAMPED_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub registro_removed: usize,
    pub versions_stamped: usize,
}

impl MigrationReport {
    pub fn changed(&self) -> bool {
        self.registro_removed > 0 || self.versions_stamped > 0
    }
}

/// One-time cleanup of stored history. Drops leftover `registro` answers
/// and stamps unversioned records. Safe to run repeatedly.
pub fn migrate_history(history: &mut UserHistory) -> MigrationReport {
    let mut report = MigrationReport::default();

    for (date, record) in history.trades.iter_mut() {
        if record.checklist.remove(OBSOLETE_REGISTRO_STEP).is_some() {
            report.registro_removed += 1;
        }
        if record.schema_version.is_none() {
            record.schema_version = Some(UNSTAMPED_SCHEMA_VERSION);
            report.versions_stamped += 1;
        }
        if record.date.is_empty() {
            record.date = date.clone();
        }
    }

    if report.changed() {
        info!(
            "History migrated: {} registro keys removed, {} records stamped",
            report.registro_removed, report.versions_stamped
        );
    }
    report
}
