//! Ancillary charges (insurance, admin fee) and rate conversion

pub mod loader;

use crate::error::{LoadError, ScenarioError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default monthly insurance factor applied to the pre-payment balance
pub const DEFAULT_INSURANCE_RATE: f64 = 0.0004;

/// Default flat monthly administration fee
pub const DEFAULT_ADMIN_FEE: f64 = 25.0;

/// Convert a nominal annual percentage into an effective monthly rate
///
/// `(1 + annual/100)^(1/12) - 1`, so 12.0 gives roughly 0.009489.
pub fn annual_to_monthly_rate(annual_pct: f64) -> f64 {
    (1.0 + annual_pct / 100.0).powf(1.0 / 12.0) - 1.0
}

/// Monthly charges added to each installment on top of interest and amortization.
///
/// They never reduce the balance. Both values must be finite and non-negative;
/// deserialized charges go through the same check as [`Charges::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ChargeFields")]
pub struct Charges {
    /// Insurance as a fraction of the outstanding balance before payment
    pub insurance_rate: f64,

    /// Flat administration fee per installment
    pub admin_fee: f64,
}

impl Default for Charges {
    fn default() -> Self {
        Self {
            insurance_rate: DEFAULT_INSURANCE_RATE,
            admin_fee: DEFAULT_ADMIN_FEE,
        }
    }
}

/// Raw deserialized charges; missing fields keep the defaults
#[derive(Debug, Deserialize)]
struct ChargeFields {
    #[serde(default = "default_insurance_rate")]
    insurance_rate: f64,
    #[serde(default = "default_admin_fee")]
    admin_fee: f64,
}

fn default_insurance_rate() -> f64 {
    DEFAULT_INSURANCE_RATE
}

fn default_admin_fee() -> f64 {
    DEFAULT_ADMIN_FEE
}

impl TryFrom<ChargeFields> for Charges {
    type Error = ScenarioError;

    fn try_from(fields: ChargeFields) -> Result<Self, Self::Error> {
        Charges::new(fields.insurance_rate, fields.admin_fee)
    }
}

fn ensure_charge(field: &'static str, value: f64) -> Result<(), ScenarioError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ScenarioError::InvalidCharge { field, value })
    }
}

impl Charges {
    /// Create validated charges
    pub fn new(insurance_rate: f64, admin_fee: f64) -> Result<Self, ScenarioError> {
        let charges = Self {
            insurance_rate,
            admin_fee,
        };
        charges.validate()?;
        Ok(charges)
    }

    /// Reject NaN, infinite or negative values
    pub fn validate(&self) -> Result<(), ScenarioError> {
        ensure_charge("insurance_rate", self.insurance_rate)?;
        ensure_charge("admin_fee", self.admin_fee)
    }

    /// No insurance and no fee, leaving only interest and amortization
    pub fn none() -> Self {
        Self {
            insurance_rate: 0.0,
            admin_fee: 0.0,
        }
    }

    /// Load charges from a `Parameter,Value` CSV, keeping defaults for missing keys
    pub fn from_csv_path(path: &Path) -> Result<Self, LoadError> {
        loader::load_charges(path)
    }

    /// Insurance due for a month starting at `balance`
    pub fn insurance_on(&self, balance: f64) -> f64 {
        balance * self.insurance_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_monthly_rate_compounds_back_to_annual() {
        let monthly = annual_to_monthly_rate(9.93);
        assert_relative_eq!((1.0 + monthly).powi(12), 1.0993, epsilon = 1e-12);
        assert_relative_eq!(monthly, 0.007920671657939, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_rate() {
        assert_eq!(annual_to_monthly_rate(0.0), 0.0);
    }

    #[test]
    fn test_default_charges() {
        let charges = Charges::default();
        assert_relative_eq!(charges.insurance_on(500_000.0), 200.0);
        assert_eq!(charges.admin_fee, 25.0);
    }

    #[test]
    fn test_new_rejects_bad_values() {
        assert!(Charges::new(0.0, 0.0).is_ok());
        assert!(matches!(
            Charges::new(f64::NAN, 25.0),
            Err(ScenarioError::InvalidCharge { field: "insurance_rate", .. })
        ));
        assert!(matches!(
            Charges::new(0.0004, f64::INFINITY),
            Err(ScenarioError::InvalidCharge { field: "admin_fee", .. })
        ));
        assert_eq!(
            Charges::new(0.0004, -5_000.0),
            Err(ScenarioError::InvalidCharge { field: "admin_fee", value: -5_000.0 })
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let charges: Charges = serde_json::from_str(r#"{"admin_fee": 30.0}"#).unwrap();
        assert_eq!(charges.insurance_rate, DEFAULT_INSURANCE_RATE);
        assert_eq!(charges.admin_fee, 30.0);

        assert!(serde_json::from_str::<Charges>(r#"{"insurance_rate": -0.01}"#).is_err());
    }
}
