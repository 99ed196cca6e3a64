//! SAC Simulator - amortization schedules for Brazilian SAC mortgages
//!
//! This library provides:
//! - Month-by-month SAC schedules with insurance and admin fees
//! - Recurring extra payments aimed at a shorter term or smaller installments
//! - Summary totals, payoff date and effective annual cost
//! - Baseline vs with-extra comparisons and memoized batch runs
//! - CSV loading of scenarios and spreadsheet export of schedules

pub mod error;
pub mod loan;
pub mod charges;
pub mod schedule;
pub mod cache;
pub mod comparison;
pub mod export;

// Re-export commonly used types
pub use error::{LoadError, ScenarioError};
pub use loan::{ExtraPaymentGoal, LoanScenario, PropertyPurchase};
pub use charges::Charges;
pub use schedule::{simulate, summarize, AmortizationEngine, Schedule, ScheduleConfig, ScheduleRow, ScheduleSummary};
pub use cache::ScheduleCache;
pub use comparison::{ComparisonRunner, ScenarioComparison};
