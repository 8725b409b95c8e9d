pub mod checklist;
pub mod clock;

pub use checklist::ChecklistEvaluator;
pub use clock::{ClockReading, TradingClock, TradingTime};
