//! CSV-based charge loader
//!
//! Reads `Parameter,Value` pairs, e.g. data/charges.csv

use super::Charges;
use crate::error::LoadError;
use log::{debug, warn};
use std::fs::File;
use std::path::Path;

/// Default path to the charges file
pub const DEFAULT_CHARGES_PATH: &str = "data/charges.csv";

/// Load charges from a CSV file
pub fn load_charges(path: &Path) -> Result<Charges, LoadError> {
    let file = File::open(path)?;
    let charges = load_charges_from_reader(file)?;
    debug!("loaded charges from {}: {:?}", path.display(), charges);
    Ok(charges)
}

/// Load charges from any reader
pub fn load_charges_from_reader<R: std::io::Read>(reader: R) -> Result<Charges, LoadError> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut charges = Charges::default();

    for result in reader.records() {
        let record = result?;
        let key = record.get(0).unwrap_or_default().trim();
        let raw = record.get(1).unwrap_or_default().trim();
        let value: f64 = raw.parse().map_err(|_| LoadError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        })?;

        match key {
            "insurance_rate" => charges.insurance_rate = value,
            "admin_fee" => charges.admin_fee = value,
            other => return Err(LoadError::UnknownParameter(other.to_string())),
        }
    }

    charges.validate().map_err(LoadError::Charges)?;

    if charges.insurance_rate > 0.001 {
        // Monthly factor, not annual
        warn!("insurance_rate {} looks unusually high", charges.insurance_rate);
    }

    Ok(charges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScenarioError;

    #[test]
    fn test_load_default_charges() {
        let charges = load_charges(Path::new(DEFAULT_CHARGES_PATH)).expect("Failed to load charges");
        assert_eq!(charges, Charges::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let data = "Parameter,Value\ninsurance_rate,0.00044\n";
        let charges = load_charges_from_reader(data.as_bytes()).unwrap();
        assert_eq!(charges.insurance_rate, 0.00044);
        assert_eq!(charges.admin_fee, 25.0);
    }

    #[test]
    fn test_unknown_parameter() {
        let data = "Parameter,Value\nstamp_duty,100\n";
        assert!(matches!(
            load_charges_from_reader(data.as_bytes()),
            Err(LoadError::UnknownParameter(p)) if p == "stamp_duty"
        ));
    }

    #[test]
    fn test_unparseable_value() {
        let data = "Parameter,Value
admin_fee,twenty
";
        assert!(matches!(
            load_charges_from_reader(data.as_bytes()),
            Err(LoadError::InvalidValue { key, value }) if key == "admin_fee" && value == "twenty"
        ));
    }

    #[test]
    fn test_nan_insurance_rate_rejected() {
        let data = "Parameter,Value
insurance_rate,NaN
";
        assert!(matches!(
            load_charges_from_reader(data.as_bytes()),
            Err(LoadError::Charges(ScenarioError::InvalidCharge { field: "insurance_rate", .. }))
        ));
    }

    #[test]
    fn test_negative_admin_fee_rejected() {
        let data = "Parameter,Value
admin_fee,-5000
";
        assert!(matches!(
            load_charges_from_reader(data.as_bytes()),
            Err(LoadError::Charges(ScenarioError::InvalidCharge { field: "admin_fee", value })) if value == -5_000.0
        ));
    }
}
