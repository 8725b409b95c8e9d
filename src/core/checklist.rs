use crate::models::record::Checklist;
use crate::models::schema::{StepConfig, STEPS};
use crate::models::statistics::percent;

/// Scores stored checklist answers against a step schema. Stored keys the
/// schema does not know about are ignored.
#[derive(Debug, Clone, Copy)]
pub struct ChecklistEvaluator {
    steps: &'static [StepConfig],
}

impl Default for ChecklistEvaluator {
    fn default() -> Self {
        Self::new(STEPS)
    }
}

impl ChecklistEvaluator {
    pub fn new(steps: &'static [StepConfig]) -> Self {
        Self { steps }
    }

    fn scorable(&self) -> impl Iterator<Item = &'static StepConfig> {
        let steps: &'static [StepConfig] = self.steps;
        steps.iter().filter(|s| s.items > 0)
    }

    /// Number of `true` answers within the first `step.items` positions.
    fn checked(checklist: &Checklist, step: &StepConfig) -> usize {
        checklist
            .get(step.id)
            .map(|items| items.iter().take(step.items).filter(|&&v| v).count())
            .unwrap_or(0)
    }

    pub fn is_complete(&self, checklist: &Checklist) -> bool {
        self.scorable()
            .all(|step| Self::checked(checklist, step) == step.items)
    }

    pub fn completion_percentage(&self, checklist: &Checklist) -> u32 {
        let (done, total) = self.scorable().fold((0, 0), |(done, total), step| {
            (done + Self::checked(checklist, step), total + step.items)
        });
        percent(done, total)
    }
}
