//! Internal Rate of Return (IRR) calculation
//!
//! Used to derive the effective annual cost (CET) of a financing from its schedule

use super::rows::ScheduleRow;

const TOLERANCE: f64 = 1e-10;
const MAX_ITERATIONS: usize = 1000;

/// Calculate the Internal Rate of Return (IRR) for a series of cash flows
/// using the Newton-Raphson method, falling back to bisection.
///
/// # Arguments
/// * `cashflows` - Cash flows per period (positive = inflow, negative = outflow)
/// * `periods_per_year` - Number of periods per year (12 for monthly)
///
/// # Returns
/// * `Option<f64>` - Annual IRR as a decimal (e.g., 0.05 for 5%), or None if no solution found
pub fn calculate_irr(cashflows: &[f64], periods_per_year: u32) -> Option<f64> {
    if cashflows.is_empty() {
        return None;
    }

    if cashflows.iter().all(|&cf| cf.abs() < TOLERANCE) {
        return Some(0.0);
    }

    // An IRR needs at least one sign change
    let has_positive = cashflows.iter().any(|&cf| cf > TOLERANCE);
    let has_negative = cashflows.iter().any(|&cf| cf < -TOLERANCE);
    if !has_positive || !has_negative {
        return None;
    }

    let mut rate = 0.10 / periods_per_year as f64;

    for _ in 0..MAX_ITERATIONS {
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);

        if dnpv.abs() < 1e-20 {
            return calculate_irr_bisection(cashflows, periods_per_year);
        }

        let new_rate = (rate - npv / dnpv).clamp(-0.99, 10.0);

        if (new_rate - rate).abs() < TOLERANCE {
            return Some(annualize(new_rate, periods_per_year));
        }

        rate = new_rate;
    }

    calculate_irr_bisection(cashflows, periods_per_year)
}

fn annualize(periodic_rate: f64, periods_per_year: u32) -> f64 {
    (1.0 + periodic_rate).powi(periods_per_year as i32) - 1.0
}

/// NPV and its derivative with respect to rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        let discount = (1.0 + rate).powi(t as i32);
        npv += cf / discount;
        if t > 0 {
            dnpv -= (t as f64) * cf / (discount * (1.0 + rate));
        }
    }

    (npv, dnpv)
}

fn calculate_irr_bisection(cashflows: &[f64], periods_per_year: u32) -> Option<f64> {
    let mut low = -0.99_f64;
    let mut high = 10.0_f64;

    let mut npv_low = npv_at_rate(cashflows, low);
    if npv_low * npv_at_rate(cashflows, high) > 0.0 {
        return None;
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = npv_at_rate(cashflows, mid);

        if npv_mid.abs() < TOLERANCE || (high - low) / 2.0 < TOLERANCE {
            return Some(annualize(mid, periods_per_year));
        }

        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    None
}

fn npv_at_rate(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

/// Borrower cashflows: the amount financed at t=0, then each installment as an outflow
pub fn borrower_cashflows(rows: &[ScheduleRow]) -> Vec<f64> {
    let financed: f64 = rows.iter().map(|r| r.principal_paid).sum();
    std::iter::once(financed)
        .chain(rows.iter().map(|r| -r.total_installment))
        .collect()
}

/// Effective annual cost of the financing, insurance and fees included
pub fn effective_annual_cost(rows: &[ScheduleRow]) -> Option<f64> {
    if rows.is_empty() {
        return None;
    }
    calculate_irr(&borrower_cashflows(rows), 12)
}
