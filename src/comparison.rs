//! Side-by-side comparison of a loan with and without extra payments
//!
//! The baseline and with-extra schedules share no state, so they run in
//! parallel; batches fan out over scenarios the same way.

use rayon::prelude::*;
use serde::Serialize;

use crate::loan::LoanScenario;
use crate::schedule::{AmortizationEngine, Schedule, ScheduleSummary};

/// Baseline and optional with-extra schedules for one scenario
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioComparison {
    pub scenario: LoanScenario,
    pub baseline: Schedule,
    /// None when the scenario has no extra payment
    pub with_extra: Option<Schedule>,
}

impl ScenarioComparison {
    pub fn baseline_summary(&self) -> ScheduleSummary {
        self.baseline.summary()
    }

    pub fn with_extra_summary(&self) -> Option<ScheduleSummary> {
        self.with_extra.as_ref().map(Schedule::summary)
    }

    /// Total paid saved by the extra payments
    pub fn savings(&self) -> Option<f64> {
        self.with_extra_summary()
            .map(|extra| self.baseline_summary().total_paid - extra.total_paid)
    }

    pub fn interest_saved(&self) -> Option<f64> {
        self.with_extra_summary()
            .map(|extra| self.baseline_summary().total_interest - extra.total_interest)
    }

    /// Installments removed from the schedule (negative if it got longer)
    pub fn months_saved(&self) -> Option<i64> {
        self.with_extra
            .as_ref()
            .map(|extra| self.baseline.len() as i64 - extra.len() as i64)
    }

    /// Flattened view for reports and APIs
    pub fn report(&self) -> ComparisonReport {
        ComparisonReport {
            baseline: self.baseline_summary(),
            with_extra: self.with_extra_summary(),
            savings: self.savings(),
            interest_saved: self.interest_saved(),
            months_saved: self.months_saved(),
            baseline_fully_amortized: self.baseline.is_fully_amortized(),
            with_extra_fully_amortized: self.with_extra.as_ref().map(Schedule::is_fully_amortized),
        }
    }
}

/// Serializable comparison figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub baseline: ScheduleSummary,
    pub with_extra: Option<ScheduleSummary>,
    pub savings: Option<f64>,
    pub interest_saved: Option<f64>,
    pub months_saved: Option<i64>,
    pub baseline_fully_amortized: bool,
    pub with_extra_fully_amortized: Option<bool>,
}

/// Runs baseline/with-extra comparisons with one engine
#[derive(Debug, Clone, Default)]
pub struct ComparisonRunner {
    engine: AmortizationEngine,
}

impl ComparisonRunner {
    pub fn new(engine: AmortizationEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &AmortizationEngine {
        &self.engine
    }

    /// Compare a scenario against its no-extra baseline
    pub fn compare(&self, scenario: &LoanScenario) -> ScenarioComparison {
        let baseline_scenario = scenario.without_extra();

        let (baseline, with_extra) = rayon::join(
            || self.engine.simulate(&baseline_scenario),
            || {
                scenario
                    .has_extra_payment()
                    .then(|| self.engine.simulate(scenario))
            },
        );

        ScenarioComparison {
            scenario: *scenario,
            baseline,
            with_extra,
        }
    }

    /// Compare many scenarios in parallel, preserving input order
    pub fn compare_batch(&self, scenarios: &[LoanScenario]) -> Vec<ScenarioComparison> {
        scenarios.par_iter().map(|s| self.compare(s)).collect()
    }
}
