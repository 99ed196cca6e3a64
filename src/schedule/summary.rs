//! Aggregate statistics over a schedule

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::rows::ScheduleRow;

/// Average month length in days, used for the implied payoff date
pub const AVERAGE_DAYS_PER_MONTH: f64 = 30.4375;

/// Summary statistics for a schedule
///
/// An empty schedule summarizes to all zeros with no first/last installment;
/// treat that as "no data".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Realized number of installments
    pub term_months: u32,
    pub total_paid: f64,
    pub total_interest: f64,
    pub total_principal: f64,
    pub total_insurance: f64,
    pub total_admin_fees: f64,
    pub first_installment: Option<f64>,
    pub last_installment: Option<f64>,
    pub final_balance: f64,
}

/// Summarize a row sequence
pub fn summarize(rows: &[ScheduleRow]) -> ScheduleSummary {
    ScheduleSummary {
        term_months: rows.len() as u32,
        total_paid: rows.iter().map(|r| r.total_installment).sum(),
        total_interest: rows.iter().map(|r| r.interest).sum(),
        total_principal: rows.iter().map(|r| r.principal_paid).sum(),
        total_insurance: rows.iter().map(|r| r.insurance).sum(),
        total_admin_fees: rows.iter().map(|r| r.admin_fee).sum(),
        first_installment: rows.first().map(|r| r.total_installment),
        last_installment: rows.last().map(|r| r.total_installment),
        final_balance: rows.last().map(|r| r.outstanding_balance).unwrap_or(0.0),
    }
}

impl ScheduleSummary {
    pub fn is_empty(&self) -> bool {
        self.term_months == 0
    }

    /// Insurance plus admin fees
    pub fn total_fees(&self) -> f64 {
        self.total_insurance + self.total_admin_fees
    }

    /// Date of the last installment for a loan starting on `start`
    ///
    /// Uses the average month length, so it can land a day or two away from
    /// the calendar month boundary.
    pub fn payoff_date(&self, start: NaiveDate) -> Option<NaiveDate> {
        if self.is_empty() {
            return None;
        }
        let days = (AVERAGE_DAYS_PER_MONTH * self.term_months as f64).floor() as i64;
        start.checked_add_signed(Duration::days(days))
    }

    /// Split of the total paid into principal, interest and fees
    pub fn composition(&self) -> CostComposition {
        CostComposition {
            principal: self.total_principal,
            interest: self.total_interest,
            fees: self.total_fees(),
        }
    }
}

/// Where the money went, as shown by the composition chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostComposition {
    pub principal: f64,
    pub interest: f64,
    pub fees: f64,
}

impl CostComposition {
    pub fn total(&self) -> f64 {
        self.principal + self.interest + self.fees
    }

    /// Percentage shares (principal, interest, fees); all zero for an empty total
    pub fn shares_pct(&self) -> (f64, f64, f64) {
        let total = self.total();
        if total <= 0.0 {
            return (0.0, 0.0, 0.0);
        }
        (
            self.principal / total * 100.0,
            self.interest / total * 100.0,
            self.fees / total * 100.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::LoanScenario;
    use crate::schedule::AmortizationEngine;
    use approx::assert_relative_eq;

    fn reference_rows() -> Vec<ScheduleRow> {
        let scenario = LoanScenario::new(500_000.0, 9.93, 360).unwrap();
        AmortizationEngine::default().simulate(&scenario).rows
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize(&[]);
        assert!(summary.is_empty());
        assert_eq!(summary, ScheduleSummary::default());
        assert_eq!(summary.first_installment, None);
        assert_eq!(summary.last_installment, None);
        assert_eq!(summary.payoff_date(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()), None);
        assert_eq!(summary.composition().shares_pct(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_reference_totals() {
        let rows = reference_rows();
        let summary = summarize(&rows);

        assert_eq!(summary.term_months, 360);
        assert_relative_eq!(summary.total_principal, 500_000.0, epsilon = 1e-6);
        assert_relative_eq!(summary.total_admin_fees, 360.0 * 25.0, epsilon = 1e-6);
        assert_relative_eq!(summary.total_paid, 1_259_940.62, epsilon = 0.01);
        assert_relative_eq!(
            summary.total_paid,
            summary.total_principal + summary.total_interest + summary.total_fees(),
            epsilon = 1e-6
        );
        assert_relative_eq!(summary.first_installment.unwrap(), 5574.22, epsilon = 0.01);
        assert_relative_eq!(summary.last_installment.unwrap(), 1425.45, epsilon = 0.01);
        assert_eq!(summary.final_balance, 0.0);
    }

    #[test]
    fn test_payoff_date() {
        let rows = reference_rows();
        let start = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let payoff = summarize(&rows).payoff_date(start).unwrap();

        // 360 * 30.4375 = 10957.5 days
        assert_eq!(payoff, start + Duration::days(10957));
        assert_eq!(payoff, NaiveDate::from_ymd_opt(2056, 1, 15).unwrap());
    }

    #[test]
    fn test_composition_shares() {
        let composition = summarize(&reference_rows()).composition();
        let (principal, interest, fees) = composition.shares_pct();

        assert_relative_eq!(principal + interest + fees, 100.0, epsilon = 1e-9);
        assert!(interest > principal);
        assert!(fees < 5.0);
    }
}
