//! Error types for scenario construction and input loading

use thiserror::Error;

/// Rejections raised while building a [`crate::LoanScenario`] or a property purchase
#[derive(Debug, Error, PartialEq)]
pub enum ScenarioError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("extra monthly payment cannot be negative, got {0:.2}")]
    NegativeExtraPayment(f64),

    #[error("annual interest rate cannot be negative, got {0}%")]
    NegativeRate(f64),

    #[error("unknown extra payment goal: {0}")]
    UnknownGoal(String),

    #[error("down payment {down_payment:.2} is below the minimum {minimum:.2} ({share_pct:.0}% of the property value)")]
    DownPaymentBelowMinimum {
        down_payment: f64,
        minimum: f64,
        share_pct: f64,
    },

    #[error("{field} must be a finite, non-negative number, got {value}")]
    InvalidCharge { field: &'static str, value: f64 },

    #[error("down payment {down_payment:.2} exceeds the property value {property_value:.2}")]
    DownPaymentExceedsValue {
        down_payment: f64,
        property_value: f64,
    },
}

/// Failures while loading scenarios or charge configuration from CSV
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid scenario {id}: {source}")]
    Scenario {
        id: String,
        #[source]
        source: ScenarioError,
    },

    #[error("unknown charge parameter: {0}")]
    UnknownParameter(String),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("invalid charges: {0}")]
    Charges(#[source] ScenarioError),
}
