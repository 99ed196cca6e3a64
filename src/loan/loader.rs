//! Load scenario batches from CSV

use super::{ExtraPaymentGoal, LoanScenario};
use crate::error::{LoadError, ScenarioError};
use csv::Reader;
use log::debug;
use std::path::Path;

/// Default location of the sample scenario batch
pub const DEFAULT_SCENARIOS_PATH: &str = "data/scenarios.csv";

/// Raw CSV row matching scenarios.csv columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "ScenarioID")]
    scenario_id: String,
    #[serde(rename = "Principal")]
    principal: f64,
    #[serde(rename = "AnnualRate")]
    annual_rate: f64,
    #[serde(rename = "TermMonths")]
    term_months: u32,
    #[serde(rename = "ExtraPayment")]
    extra_payment: Option<f64>,
    #[serde(rename = "Goal")]
    goal: Option<String>,
}

/// A scenario tagged with its identifier from the input file
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioRecord {
    pub id: String,
    pub scenario: LoanScenario,
}

impl CsvRow {
    fn into_record(self) -> Result<ScenarioRecord, LoadError> {
        let id = self.scenario_id;
        let invalid = |source: ScenarioError| LoadError::Scenario { id: id.clone(), source };

        let goal = match self.goal.as_deref().map(str::trim) {
            None | Some("") => ExtraPaymentGoal::default(),
            Some(raw) => raw.parse().map_err(invalid)?,
        };

        let scenario = LoanScenario::new(self.principal, self.annual_rate, self.term_months)
            .and_then(|s| s.with_extra_payment(self.extra_payment.unwrap_or(0.0), goal))
            .map_err(invalid)?;

        Ok(ScenarioRecord { id, scenario })
    }
}

/// Load all scenarios from a CSV file
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<ScenarioRecord>, LoadError> {
    let reader = Reader::from_path(path.as_ref())?;
    let records = read_records(reader)?;
    debug!("loaded {} scenarios from {}", records.len(), path.as_ref().display());
    Ok(records)
}

/// Load scenarios from any reader (e.g., string buffer, request body)
pub fn load_scenarios_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<ScenarioRecord>, LoadError> {
    read_records(Reader::from_reader(reader))
}

fn read_records<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<ScenarioRecord>, LoadError> {
    let mut records = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        records.push(row.into_record()?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_reader() {
        let data = "\
ScenarioID,Principal,AnnualRate,TermMonths,ExtraPayment,Goal
base,500000,9.93,360,,
prazo,500000,9.93,360,1000,prazo
parcela,500000,9.93,360,1000,reduce_installment
";
        let records = load_scenarios_from_reader(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].id, "base");
        assert!(!records[0].scenario.has_extra_payment());
        assert_eq!(records[1].scenario.extra_payment_goal(), ExtraPaymentGoal::ShortenTerm);
        assert_eq!(records[2].scenario.extra_payment_goal(), ExtraPaymentGoal::ReduceInstallment);
        assert_eq!(records[2].scenario.extra_monthly_payment(), 1000.0);
    }

    #[test]
    fn test_invalid_row_names_scenario() {
        let data = "\
ScenarioID,Principal,AnnualRate,TermMonths,ExtraPayment,Goal
bad,500000,9.93,360,-10,prazo
";
        let err = load_scenarios_from_reader(data.as_bytes()).unwrap_err();
        match err {
            LoadError::Scenario { id, source } => {
                assert_eq!(id, "bad");
                assert_eq!(source, ScenarioError::NegativeExtraPayment(-10.0));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_default_scenarios() {
        let records = load_scenarios(DEFAULT_SCENARIOS_PATH).expect("Failed to load scenarios");
        assert!(!records.is_empty());
        assert_eq!(records[0].id, "baseline-500k");
    }
}
