//! Loan scenario and property purchase inputs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::charges::annual_to_monthly_rate;
use crate::error::ScenarioError;

/// Minimum down payment as a share of the property value
pub const DEFAULT_MIN_DOWN_PAYMENT_SHARE: f64 = 0.20;

/// What a recurring extra payment is meant to achieve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraPaymentGoal {
    /// Keep the base amortization and pay the loan off sooner
    #[default]
    ShortenTerm,
    /// Re-spread the balance over the original term so installments shrink
    ReduceInstallment,
}

impl ExtraPaymentGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtraPaymentGoal::ShortenTerm => "shorten_term",
            ExtraPaymentGoal::ReduceInstallment => "reduce_installment",
        }
    }
}

impl fmt::Display for ExtraPaymentGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtraPaymentGoal {
    type Err = ScenarioError;

    /// Accepts snake_case, CamelCase and the Portuguese shorthands ("prazo", "parcela")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "shorten_term" | "shortenterm" | "prazo" => Ok(ExtraPaymentGoal::ShortenTerm),
            "reduce_installment" | "reduceinstallment" | "parcela" => {
                Ok(ExtraPaymentGoal::ReduceInstallment)
            }
            _ => Err(ScenarioError::UnknownGoal(s.to_string())),
        }
    }
}

/// One financing scenario.
///
/// Immutable once built. A non-positive principal or a zero term is accepted
/// here and simulates to an empty schedule ("not yet configured"); invalid
/// extra-payment configuration is rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScenarioFields")]
pub struct LoanScenario {
    principal: f64,
    annual_interest_rate: f64,
    term_months: u32,
    extra_monthly_payment: f64,
    extra_payment_goal: ExtraPaymentGoal,
}

/// Raw deserialized fields, validated into a [`LoanScenario`]
#[derive(Debug, Deserialize)]
struct ScenarioFields {
    principal: f64,
    annual_interest_rate: f64,
    term_months: u32,
    #[serde(default)]
    extra_monthly_payment: f64,
    #[serde(default)]
    extra_payment_goal: ExtraPaymentGoal,
}

impl TryFrom<ScenarioFields> for LoanScenario {
    type Error = ScenarioError;

    fn try_from(fields: ScenarioFields) -> Result<Self, Self::Error> {
        LoanScenario::new(fields.principal, fields.annual_interest_rate, fields.term_months)?
            .with_extra_payment(fields.extra_monthly_payment, fields.extra_payment_goal)
    }
}

fn ensure_finite(field: &'static str, value: f64) -> Result<f64, ScenarioError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScenarioError::NonFinite { field, value })
    }
}

impl LoanScenario {
    /// Create a scenario without extra payments
    ///
    /// `annual_interest_rate` is a percentage (9.93 means 9.93% a year).
    pub fn new(principal: f64, annual_interest_rate: f64, term_months: u32) -> Result<Self, ScenarioError> {
        let principal = ensure_finite("principal", principal)?;
        let annual_interest_rate = ensure_finite("annual_interest_rate", annual_interest_rate)?;
        if annual_interest_rate < 0.0 {
            return Err(ScenarioError::NegativeRate(annual_interest_rate));
        }

        Ok(Self {
            principal,
            annual_interest_rate,
            term_months,
            extra_monthly_payment: 0.0,
            extra_payment_goal: ExtraPaymentGoal::default(),
        })
    }

    /// Attach a recurring extra payment
    pub fn with_extra_payment(mut self, amount: f64, goal: ExtraPaymentGoal) -> Result<Self, ScenarioError> {
        let amount = ensure_finite("extra_monthly_payment", amount)?;
        if amount < 0.0 {
            return Err(ScenarioError::NegativeExtraPayment(amount));
        }
        self.extra_monthly_payment = amount;
        self.extra_payment_goal = goal;
        Ok(self)
    }

    /// The same loan with the extra payment removed (the comparison baseline)
    pub fn without_extra(&self) -> Self {
        Self {
            extra_monthly_payment: 0.0,
            extra_payment_goal: ExtraPaymentGoal::ShortenTerm,
            ..*self
        }
    }

    pub fn principal(&self) -> f64 {
        self.principal
    }

    pub fn annual_interest_rate(&self) -> f64 {
        self.annual_interest_rate
    }

    pub fn term_months(&self) -> u32 {
        self.term_months
    }

    pub fn extra_monthly_payment(&self) -> f64 {
        self.extra_monthly_payment
    }

    pub fn extra_payment_goal(&self) -> ExtraPaymentGoal {
        self.extra_payment_goal
    }

    pub fn has_extra_payment(&self) -> bool {
        self.extra_monthly_payment > 0.0
    }

    /// Effective monthly rate as a decimal
    pub fn monthly_rate(&self) -> f64 {
        annual_to_monthly_rate(self.annual_interest_rate)
    }

    /// Constant SAC amortization: principal / term
    pub fn base_amortization(&self) -> f64 {
        if self.term_months == 0 {
            0.0
        } else {
            self.principal / self.term_months as f64
        }
    }

    /// Whether the engine can produce any rows for this scenario
    pub fn is_simulatable(&self) -> bool {
        self.principal > 0.0 && self.term_months > 0
    }
}

/// Property value and down payment as collected by a front end
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PropertyPurchase {
    pub property_value: f64,
    pub down_payment: f64,
}

impl PropertyPurchase {
    pub fn new(property_value: f64, down_payment: f64) -> Self {
        Self { property_value, down_payment }
    }

    /// Amount to be financed
    pub fn financed_amount(&self) -> f64 {
        self.property_value - self.down_payment
    }

    /// Smallest acceptable down payment for the given share
    pub fn minimum_down_payment(&self, min_share: f64) -> f64 {
        self.property_value * min_share
    }

    /// Enforce the down payment business rule.
    ///
    /// Only applies once a property value has been entered.
    pub fn validate(&self, min_share: f64) -> Result<(), ScenarioError> {
        ensure_finite("property_value", self.property_value)?;
        ensure_finite("down_payment", self.down_payment)?;

        if self.property_value <= 0.0 {
            return Ok(());
        }

        let minimum = self.minimum_down_payment(min_share);
        if self.down_payment < minimum {
            return Err(ScenarioError::DownPaymentBelowMinimum {
                down_payment: self.down_payment,
                minimum,
                share_pct: min_share * 100.0,
            });
        }
        if self.down_payment > self.property_value {
            return Err(ScenarioError::DownPaymentExceedsValue {
                down_payment: self.down_payment,
                property_value: self.property_value,
            });
        }
        Ok(())
    }

    /// Validate with the default 20% rule and build a scenario for the financed amount
    pub fn into_scenario(self, annual_interest_rate: f64, term_months: u32) -> Result<LoanScenario, ScenarioError> {
        self.validate(DEFAULT_MIN_DOWN_PAYMENT_SHARE)?;
        LoanScenario::new(self.financed_amount(), annual_interest_rate, term_months)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_negative_extra_rejected() {
        let scenario = LoanScenario::new(100_000.0, 10.0, 120).unwrap();
        let err = scenario
            .with_extra_payment(-50.0, ExtraPaymentGoal::ShortenTerm)
            .unwrap_err();
        assert_eq!(err, ScenarioError::NegativeExtraPayment(-50.0));
    }

    #[test]
    fn test_degenerate_inputs_are_accepted() {
        let zero = LoanScenario::new(0.0, 10.0, 120).unwrap();
        assert!(!zero.is_simulatable());

        let no_term = LoanScenario::new(100_000.0, 10.0, 0).unwrap();
        assert!(!no_term.is_simulatable());
        assert_eq!(no_term.base_amortization(), 0.0);
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(matches!(
            LoanScenario::new(f64::NAN, 10.0, 120),
            Err(ScenarioError::NonFinite { field: "principal", .. })
        ));
        assert!(matches!(
            LoanScenario::new(100_000.0, -1.0, 120),
            Err(ScenarioError::NegativeRate(_))
        ));
    }

    #[test]
    fn test_without_extra_keeps_loan_terms() {
        let scenario = LoanScenario::new(250_000.0, 11.5, 240)
            .unwrap()
            .with_extra_payment(800.0, ExtraPaymentGoal::ReduceInstallment)
            .unwrap();
        let baseline = scenario.without_extra();

        assert_eq!(baseline.principal(), 250_000.0);
        assert_eq!(baseline.term_months(), 240);
        assert!(!baseline.has_extra_payment());
        assert_eq!(baseline.extra_payment_goal(), ExtraPaymentGoal::ShortenTerm);
    }

    #[test]
    fn test_goal_parsing() {
        assert_eq!("prazo".parse::<ExtraPaymentGoal>().unwrap(), ExtraPaymentGoal::ShortenTerm);
        assert_eq!(
            "ReduceInstallment".parse::<ExtraPaymentGoal>().unwrap(),
            ExtraPaymentGoal::ReduceInstallment
        );
        assert_eq!(
            "reduce-installment".parse::<ExtraPaymentGoal>().unwrap(),
            ExtraPaymentGoal::ReduceInstallment
        );
        assert!("sooner".parse::<ExtraPaymentGoal>().is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: LoanScenario = serde_json::from_str(
            r#"{"principal": 300000, "annual_interest_rate": 9.5, "term_months": 360,
                "extra_monthly_payment": 500, "extra_payment_goal": "reduce_installment"}"#,
        )
        .unwrap();
        assert_eq!(ok.extra_payment_goal(), ExtraPaymentGoal::ReduceInstallment);

        let bad = serde_json::from_str::<LoanScenario>(
            r#"{"principal": 300000, "annual_interest_rate": 9.5, "term_months": 360,
                "extra_monthly_payment": -1}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_down_payment_rule() {
        let purchase = PropertyPurchase::new(625_000.0, 125_000.0);
        assert!(purchase.validate(DEFAULT_MIN_DOWN_PAYMENT_SHARE).is_ok());
        assert_relative_eq!(purchase.financed_amount(), 500_000.0);

        let low = PropertyPurchase::new(625_000.0, 100_000.0);
        assert!(matches!(
            low.validate(DEFAULT_MIN_DOWN_PAYMENT_SHARE),
            Err(ScenarioError::DownPaymentBelowMinimum { .. })
        ));

        let too_much = PropertyPurchase::new(100_000.0, 150_000.0);
        assert!(matches!(
            too_much.validate(DEFAULT_MIN_DOWN_PAYMENT_SHARE),
            Err(ScenarioError::DownPaymentExceedsValue { .. })
        ));

        // No property value entered yet
        assert!(PropertyPurchase::new(0.0, 0.0).validate(0.2).is_ok());
    }

    #[test]
    fn test_purchase_into_scenario() {
        let scenario = PropertyPurchase::new(625_000.0, 125_000.0)
            .into_scenario(9.93, 360)
            .unwrap();
        assert_relative_eq!(scenario.principal(), 500_000.0);
        assert_relative_eq!(scenario.base_amortization(), 500_000.0 / 360.0);
    }
}
