//! SAC amortization engine for monthly installment schedules

use log::{debug, warn};

use super::rows::{Schedule, ScheduleRow};
use super::state::ScheduleState;
use crate::charges::Charges;
use crate::loan::{ExtraPaymentGoal, LoanScenario};

/// Configuration for a schedule run
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// A closing balance below this is treated as paid off
    pub balance_epsilon: f64,

    /// Iteration bound as a multiple of the contracted term
    pub safety_factor: u32,

    /// Explicit iteration bound, overrides `safety_factor` when set
    pub max_months: Option<u32>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            balance_epsilon: 0.01,
            safety_factor: 2,
            max_months: None,
        }
    }
}

impl ScheduleConfig {
    /// Iteration bound for a given contracted term
    ///
    /// A zero bound is raised to one month, so only an unsimulatable scenario
    /// yields an empty schedule.
    pub fn month_limit(&self, term_months: u32) -> u32 {
        self.max_months
            .unwrap_or_else(|| term_months.saturating_mul(self.safety_factor))
            .max(1)
    }
}

/// Main amortization engine
#[derive(Debug, Clone, Default)]
pub struct AmortizationEngine {
    charges: Charges,
    config: ScheduleConfig,
}

impl AmortizationEngine {
    /// Create a new engine with given charges and config
    pub fn new(charges: Charges, config: ScheduleConfig) -> Self {
        Self { charges, config }
    }

    pub fn charges(&self) -> &Charges {
        &self.charges
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Run the full schedule for a scenario
    ///
    /// Returns an empty schedule when the principal is not positive or the
    /// term is zero.
    pub fn simulate(&self, scenario: &LoanScenario) -> Schedule {
        let mut schedule = Schedule::new(scenario.monthly_rate());

        if !scenario.is_simulatable() {
            debug!(
                "scenario not simulatable (principal {}, term {})",
                scenario.principal(),
                scenario.term_months()
            );
            return schedule;
        }

        let mut state = ScheduleState::from_scenario(scenario);
        let limit = self.config.month_limit(scenario.term_months());

        while !state.is_paid_off() && state.month < limit {
            state.advance_month();
            let row = self.calculate_month(scenario, schedule.monthly_rate, &mut state);
            schedule.add_row(row);
        }

        schedule.reached_zero = state.is_paid_off();
        if !schedule.reached_zero {
            warn!(
                "balance {:.2} left after {} months (term {}): schedule stopped at the iteration bound",
                state.balance,
                state.month,
                scenario.term_months()
            );
        }

        debug!(
            "simulated {} months for principal {:.2} at {}% ({})",
            schedule.len(),
            scenario.principal(),
            scenario.annual_interest_rate(),
            scenario.extra_payment_goal()
        );

        schedule
    }

    /// Calculate one installment
    ///
    /// Interest and insurance use the opening balance. A closing balance below
    /// epsilon (including an overshoot) is folded into this month's principal
    /// so the balance closes at exactly zero.
    fn calculate_month(&self, scenario: &LoanScenario, monthly_rate: f64, state: &mut ScheduleState) -> ScheduleRow {
        let opening_balance = state.balance;

        let interest = opening_balance * monthly_rate;
        let insurance = self.charges.insurance_on(opening_balance);
        let admin_fee = self.charges.admin_fee;

        let mut principal_paid = self.scheduled_amortization(scenario, state);
        let mut total_installment = interest + principal_paid + insurance + admin_fee;

        let mut closing_balance = opening_balance - principal_paid;
        if closing_balance < self.config.balance_epsilon {
            principal_paid += closing_balance;
            total_installment += closing_balance;
            closing_balance = 0.0;
        }

        state.close_month(closing_balance);

        ScheduleRow {
            month: state.month,
            opening_balance,
            interest,
            principal_paid,
            insurance,
            admin_fee,
            total_installment,
            outstanding_balance: closing_balance,
        }
    }

    /// Amortization due before any clamping
    fn scheduled_amortization(&self, scenario: &LoanScenario, state: &ScheduleState) -> f64 {
        let extra = scenario.extra_monthly_payment();
        if extra <= 0.0 {
            return state.base_amortization;
        }

        match scenario.extra_payment_goal() {
            ExtraPaymentGoal::ShortenTerm => state.base_amortization + extra,
            ExtraPaymentGoal::ReduceInstallment => {
                state.balance / state.remaining_months.max(1) as f64 + extra
            }
        }
    }
}

/// Simulate with default charges and configuration
pub fn simulate(scenario: &LoanScenario) -> Vec<ScheduleRow> {
    AmortizationEngine::default().simulate(scenario).rows
}
