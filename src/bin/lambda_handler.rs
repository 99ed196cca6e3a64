//! AWS Lambda handler for SAC simulations
//!
//! Accepts a scenario as JSON and returns baseline and with-extra summaries,
//! the savings between them and, on request, the monthly rows.

use chrono::NaiveDate;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use sac_simulator::comparison::ComparisonReport;
use sac_simulator::loan::DEFAULT_MIN_DOWN_PAYMENT_SHARE;
use sac_simulator::{
    AmortizationEngine, Charges, ComparisonRunner, ExtraPaymentGoal, LoanScenario, PropertyPurchase,
    ScheduleConfig, ScheduleRow,
};
use serde::{Deserialize, Serialize};

/// Input for one simulation
#[derive(Debug, Deserialize)]
pub struct SimulationRequest {
    /// Property value; when set, principal = property_value - down_payment
    #[serde(default)]
    pub property_value: Option<f64>,

    #[serde(default)]
    pub down_payment: f64,

    /// Financed amount, used when no property value is given
    #[serde(default)]
    pub principal: Option<f64>,

    /// Annual interest rate in percent
    pub annual_rate: f64,

    pub term_months: u32,

    #[serde(default)]
    pub extra_monthly_payment: f64,

    #[serde(default)]
    pub extra_payment_goal: ExtraPaymentGoal,

    /// First installment date, used for payoff dates
    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    /// Override the default charges
    #[serde(default)]
    pub charges: Option<Charges>,

    /// Include monthly rows in the response
    #[serde(default)]
    pub include_rows: bool,
}

#[derive(Debug, Serialize)]
pub struct SimulationResponse {
    pub scenario: LoanScenario,
    pub monthly_rate: f64,
    pub baseline_payoff_date: Option<NaiveDate>,
    pub with_extra_payoff_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub report: ComparisonReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_rows: Option<Vec<ScheduleRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_extra_rows: Option<Vec<ScheduleRow>>,
    pub execution_time_ms: u64,
}

fn build_scenario(request: &SimulationRequest) -> Result<LoanScenario, Error> {
    let scenario = match (request.property_value, request.principal) {
        (Some(value), _) => {
            let purchase = PropertyPurchase::new(value, request.down_payment);
            purchase.validate(DEFAULT_MIN_DOWN_PAYMENT_SHARE)?;
            LoanScenario::new(purchase.financed_amount(), request.annual_rate, request.term_months)?
        }
        (None, Some(principal)) => LoanScenario::new(principal, request.annual_rate, request.term_months)?,
        (None, None) => return Err("either principal or property_value is required".into()),
    };
    Ok(scenario.with_extra_payment(request.extra_monthly_payment, request.extra_payment_goal)?)
}

async fn handler(event: LambdaEvent<SimulationRequest>) -> Result<SimulationResponse, Error> {
    let started = std::time::Instant::now();
    let request = event.payload;

    let scenario = build_scenario(&request)?;
    let charges = request.charges.unwrap_or_default();
    let runner = ComparisonRunner::new(AmortizationEngine::new(charges, ScheduleConfig::default()));
    let comparison = runner.compare(&scenario);

    let report = comparison.report();
    let baseline_payoff_date = request
        .start_date
        .and_then(|start| report.baseline.payoff_date(start));
    let with_extra_payoff_date = request
        .start_date
        .zip(report.with_extra.as_ref())
        .and_then(|(start, summary)| summary.payoff_date(start));

    log::info!(
        "simulated principal {:.2}: baseline {} months, with extra {:?} months",
        scenario.principal(),
        report.baseline.term_months,
        report.with_extra.as_ref().map(|s| s.term_months)
    );

    let (baseline_rows, with_extra_rows) = if request.include_rows {
        (
            Some(comparison.baseline.rows),
            comparison.with_extra.map(|s| s.rows),
        )
    } else {
        (None, None)
    };

    Ok(SimulationResponse {
        scenario,
        monthly_rate: scenario.monthly_rate(),
        baseline_payoff_date,
        with_extra_payoff_date,
        report,
        baseline_rows,
        with_extra_rows,
        execution_time_ms: started.elapsed().as_millis() as u64,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_runtime::Context;

    fn request(json: &str) -> SimulationRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_property_value_request() {
        let scenario = build_scenario(&request(
            r#"{"property_value": 625000, "down_payment": 125000, "annual_rate": 9.93, "term_months": 360,
                "extra_monthly_payment": 1000, "extra_payment_goal": "reduce_installment"}"#,
        ))
        .unwrap();

        assert_eq!(scenario.principal(), 500_000.0);
        assert_eq!(scenario.extra_payment_goal(), ExtraPaymentGoal::ReduceInstallment);
    }

    #[test]
    fn test_rejects_low_down_payment() {
        let result = build_scenario(&request(
            r#"{"property_value": 625000, "down_payment": 1000, "annual_rate": 9.93, "term_months": 360}"#,
        ));
        assert!(result.is_err());
    }

    #[test]
    fn test_requires_an_amount() {
        assert!(build_scenario(&request(r#"{"annual_rate": 9.93, "term_months": 360}"#)).is_err());
    }

    #[test]
    fn test_rejects_invalid_charges() {
        let result = serde_json::from_str::<SimulationRequest>(
            r#"{"principal": 500000, "annual_rate": 9.93, "term_months": 360,
                "charges": {"insurance_rate": 0.0004, "admin_fee": -5000}}"#,
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_handler_summary_only() {
        let payload = request(r#"{"principal": 500000, "annual_rate": 9.93, "term_months": 360}"#);
        let response = handler(LambdaEvent::new(payload, Context::default())).await.unwrap();

        assert_eq!(response.report.baseline.term_months, 360);
        assert!(response.report.with_extra.is_none());
        assert_eq!(response.baseline_payoff_date, None);
        assert_eq!(response.with_extra_payoff_date, None);
        assert!(response.baseline_rows.is_none());
        assert!(response.with_extra_rows.is_none());

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("baseline_rows").is_none());
        assert!(json.get("savings").is_some());
    }

    #[tokio::test]
    async fn test_handler_with_rows_and_dates() {
        let payload = request(
            r#"{"principal": 500000, "annual_rate": 9.93, "term_months": 360,
                "extra_monthly_payment": 1000, "start_date": "2026-01-15", "include_rows": true}"#,
        );
        let response = handler(LambdaEvent::new(payload, Context::default())).await.unwrap();

        assert_eq!(response.baseline_rows.as_ref().map(Vec::len), Some(360));
        assert_eq!(response.with_extra_rows.as_ref().map(Vec::len), Some(210));
        assert_eq!(response.report.months_saved, Some(150));
        assert_eq!(response.baseline_payoff_date, NaiveDate::from_ymd_opt(2056, 1, 15));
        assert!(response.with_extra_payoff_date < response.baseline_payoff_date);
    }
}
