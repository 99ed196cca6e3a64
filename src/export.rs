//! Spreadsheet export and Brazilian currency formatting

use serde::Serialize;
use std::io::Write;

use crate::schedule::ScheduleRow;

/// Row layout used for schedule spreadsheets
#[derive(Debug, Serialize)]
struct RowRecord {
    #[serde(rename = "Month")]
    month: u32,
    #[serde(rename = "OpeningBalance")]
    opening_balance: f64,
    #[serde(rename = "Interest")]
    interest: f64,
    #[serde(rename = "Amortization")]
    amortization: f64,
    #[serde(rename = "Insurance")]
    insurance: f64,
    #[serde(rename = "AdminFee")]
    admin_fee: f64,
    #[serde(rename = "Fees")]
    fees: f64,
    #[serde(rename = "Installment")]
    installment: f64,
    #[serde(rename = "Balance")]
    balance: f64,
}

impl From<&ScheduleRow> for RowRecord {
    fn from(row: &ScheduleRow) -> Self {
        Self {
            month: row.month,
            opening_balance: row.opening_balance,
            interest: row.interest,
            amortization: row.principal_paid,
            insurance: row.insurance,
            admin_fee: row.admin_fee,
            fees: row.fees(),
            installment: row.total_installment,
            balance: row.outstanding_balance,
        }
    }
}

/// Write schedule rows as CSV with a header line
pub fn write_rows_csv<W: Write>(rows: &[ScheduleRow], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(RowRecord::from(row))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write any serializable records as CSV (headers from field names)
pub fn write_records_csv<W: Write, T: Serialize>(records: &[T], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Format as Brazilian Real, e.g. `R$ 1.234,56`
///
/// Zero and non-finite values render as `R$ 0,00`.
pub fn format_brl(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return "R$ 0,00".to_string();
    }

    let cents = (value.abs() * 100.0).round() as u64;
    let integer = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("R$ {sign}{grouped},{fraction:02}")
}
