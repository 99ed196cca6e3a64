//! Schedule output structures

use serde::{Deserialize, Serialize};

use super::summary::{summarize, ScheduleSummary};

/// A single month of the amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Installment number (1-indexed)
    pub month: u32,

    /// Balance before this month's payment
    pub opening_balance: f64,

    /// Interest accrued on the opening balance
    pub interest: f64,

    /// Amortization applied this month (base plus any extra)
    pub principal_paid: f64,

    pub insurance: f64,
    pub admin_fee: f64,

    /// interest + principal_paid + insurance + admin_fee
    pub total_installment: f64,

    /// Balance after this month's payment, never negative
    pub outstanding_balance: f64,
}

impl ScheduleRow {
    /// Insurance plus admin fee
    pub fn fees(&self) -> f64 {
        self.insurance + self.admin_fee
    }
}

/// Complete schedule for one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Effective monthly rate used for interest
    pub monthly_rate: f64,

    /// Monthly rows in increasing month order
    pub rows: Vec<ScheduleRow>,

    /// False when the run stopped at the iteration bound with balance left
    pub reached_zero: bool,
}

impl Schedule {
    pub fn new(monthly_rate: f64) -> Self {
        Self {
            monthly_rate,
            rows: Vec::new(),
            reached_zero: false,
        }
    }

    /// Append the next month
    pub fn add_row(&mut self, row: ScheduleRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Empty means the scenario could not be simulated
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the balance was fully paid off.
    ///
    /// Callers should flag schedules where this is false instead of presenting
    /// them as complete.
    pub fn is_fully_amortized(&self) -> bool {
        !self.rows.is_empty() && self.reached_zero
    }

    pub fn summary(&self) -> ScheduleSummary {
        summarize(&self.rows)
    }

    /// Annual effective cost including insurance and fees
    pub fn effective_annual_cost(&self) -> Option<f64> {
        super::irr::effective_annual_cost(&self.rows)
    }
}
