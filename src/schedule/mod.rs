//! SAC amortization schedule engine

mod state;
mod engine;
mod rows;
mod summary;
pub mod irr;

pub use state::ScheduleState;
pub use engine::{simulate, AmortizationEngine, ScheduleConfig};
pub use rows::{Schedule, ScheduleRow};
pub use summary::{summarize, CostComposition, ScheduleSummary, AVERAGE_DAYS_PER_MONTH};
pub use irr::effective_annual_cost;
