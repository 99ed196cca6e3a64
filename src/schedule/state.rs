//! Running state of a schedule between months

use crate::loan::LoanScenario;

/// Balance and term bookkeeping carried from one month to the next
#[derive(Debug, Clone)]
pub struct ScheduleState {
    /// Current month (1-indexed once advanced)
    pub month: u32,

    /// Outstanding balance at the start of the current month
    pub balance: f64,

    /// Installments left on the original term, including the current one
    pub remaining_months: u32,

    /// Constant SAC amortization
    pub base_amortization: f64,
}

impl ScheduleState {
    /// Initialize state before the first installment
    pub fn from_scenario(scenario: &LoanScenario) -> Self {
        Self {
            month: 0,
            balance: scenario.principal(),
            remaining_months: scenario.term_months(),
            base_amortization: scenario.base_amortization(),
        }
    }

    /// Move to the next installment
    pub fn advance_month(&mut self) {
        self.month += 1;
    }

    /// Record the closing balance and consume one month of the original term
    pub fn close_month(&mut self, closing_balance: f64) {
        self.balance = closing_balance;
        self.remaining_months = self.remaining_months.saturating_sub(1);
    }

    pub fn is_paid_off(&self) -> bool {
        self.balance <= 0.0
    }
}
