//! Loan scenario inputs and batch loading

mod data;
pub mod loader;

pub use data::{ExtraPaymentGoal, LoanScenario, PropertyPurchase, DEFAULT_MIN_DOWN_PAYMENT_SHARE};
pub use loader::{load_scenarios, load_scenarios_from_reader, ScenarioRecord};
