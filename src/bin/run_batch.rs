//! Run a batch of scenarios from CSV
//!
//! Outputs one summary line per scenario (baseline and with-extra figures)

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use sac_simulator::charges::loader::DEFAULT_CHARGES_PATH;
use sac_simulator::export::write_records_csv;
use sac_simulator::loan::loader::DEFAULT_SCENARIOS_PATH;
use sac_simulator::loan::{load_scenarios, ScenarioRecord};
use sac_simulator::{AmortizationEngine, Charges, ComparisonRunner, ScenarioComparison, ScheduleConfig};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "run_batch", about = "Simulate every scenario in a CSV file")]
struct Args {
    /// Scenarios CSV (ScenarioID,Principal,AnnualRate,TermMonths,ExtraPayment,Goal)
    #[arg(long, default_value = DEFAULT_SCENARIOS_PATH)]
    input: PathBuf,

    /// Summary output CSV
    #[arg(long, default_value = "batch_summary.csv")]
    output: PathBuf,

    /// Charges CSV
    #[arg(long, default_value = DEFAULT_CHARGES_PATH)]
    charges: PathBuf,
}

/// One output line per scenario
#[derive(Debug, Serialize)]
struct SummaryLine {
    scenario_id: String,
    principal: f64,
    annual_rate: f64,
    term_months: u32,
    extra_payment: f64,
    goal: String,
    baseline_months: u32,
    baseline_total_paid: f64,
    baseline_total_interest: f64,
    baseline_first_installment: Option<f64>,
    extra_months: Option<u32>,
    extra_total_paid: Option<f64>,
    extra_total_interest: Option<f64>,
    extra_first_installment: Option<f64>,
    savings: Option<f64>,
    months_saved: Option<i64>,
    fully_amortized: bool,
}

impl SummaryLine {
    fn new(record: &ScenarioRecord, comparison: &ScenarioComparison) -> Self {
        let scenario = &record.scenario;
        let baseline = comparison.baseline_summary();
        let extra = comparison.with_extra_summary();

        Self {
            scenario_id: record.id.clone(),
            principal: scenario.principal(),
            annual_rate: scenario.annual_interest_rate(),
            term_months: scenario.term_months(),
            extra_payment: scenario.extra_monthly_payment(),
            goal: scenario.extra_payment_goal().to_string(),
            baseline_months: baseline.term_months,
            baseline_total_paid: baseline.total_paid,
            baseline_total_interest: baseline.total_interest,
            baseline_first_installment: baseline.first_installment,
            extra_months: extra.as_ref().map(|s| s.term_months),
            extra_total_paid: extra.as_ref().map(|s| s.total_paid),
            extra_total_interest: extra.as_ref().map(|s| s.total_interest),
            extra_first_installment: extra.as_ref().and_then(|s| s.first_installment),
            savings: comparison.savings(),
            months_saved: comparison.months_saved(),
            fully_amortized: comparison.baseline.is_fully_amortized()
                && comparison
                    .with_extra
                    .as_ref()
                    .map_or(true, |s| s.is_fully_amortized()),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    println!("Loading scenarios from {}...", args.input.display());
    let records = load_scenarios(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    println!("Loaded {} scenarios in {:?}", records.len(), start.elapsed());

    let charges = if args.charges.exists() {
        Charges::from_csv_path(&args.charges)?
    } else {
        log::warn!("{} not found, using default charges", args.charges.display());
        Charges::default()
    };

    let runner = ComparisonRunner::new(AmortizationEngine::new(charges, ScheduleConfig::default()));

    println!("Running simulations...");
    let sim_start = Instant::now();
    let lines: Vec<SummaryLine> = records
        .par_iter()
        .map(|record| SummaryLine::new(record, &runner.compare(&record.scenario)))
        .collect();
    println!("Simulations complete in {:?}", sim_start.elapsed());

    let incomplete = lines.iter().filter(|l| !l.fully_amortized).count();
    if incomplete > 0 {
        log::warn!("{} scenarios did not amortize to zero (empty or stopped at the bound)", incomplete);
    }

    let file = File::create(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    write_records_csv(&lines, BufWriter::new(file))?;
    println!("Output written to {}", args.output.display());

    let total_savings: f64 = lines.iter().filter_map(|l| l.savings).sum();
    println!("\nBatch Summary:");
    println!("  Scenarios:     {}", lines.len());
    println!("  With extra:    {}", lines.iter().filter(|l| l.extra_months.is_some()).count());
    println!("  Total savings: {:.2}", total_savings);
    println!("\nTotal time: {:?}", start.elapsed());

    Ok(())
}
