//! SAC Simulator CLI
//!
//! Simulates a SAC financing with and without a recurring extra payment and
//! prints both schedules side by side.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use sac_simulator::charges::loader::DEFAULT_CHARGES_PATH;
use sac_simulator::comparison::{ComparisonRunner, ScenarioComparison};
use sac_simulator::export::{format_brl, write_rows_csv};
use sac_simulator::{AmortizationEngine, Charges, ExtraPaymentGoal, LoanScenario, PropertyPurchase, Schedule, ScheduleConfig};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Simulate a SAC mortgage with optional monthly extra payments
#[derive(Debug, Parser)]
#[command(name = "sac-sim", version)]
struct Cli {
    /// Property value; the financed amount is value minus down payment
    #[arg(long, conflicts_with = "principal")]
    property_value: Option<f64>,

    /// Down payment (at least 20% of the property value)
    #[arg(long, requires = "property_value")]
    down_payment: Option<f64>,

    /// Financed amount, when no property value is given
    #[arg(long)]
    principal: Option<f64>,

    /// Annual interest rate in percent (e.g. 9.93)
    #[arg(long)]
    annual_rate: f64,

    /// Number of monthly installments
    #[arg(long)]
    term: u32,

    /// Recurring monthly extra payment
    #[arg(long, default_value_t = 0.0)]
    extra: f64,

    /// What the extra payment should achieve
    #[arg(long, value_enum, default_value_t = Goal::ShortenTerm)]
    goal: Goal,

    /// First installment date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Charges CSV (Parameter,Value)
    #[arg(long)]
    charges: Option<PathBuf>,

    /// Write the baseline schedule to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the with-extra schedule to this CSV file
    #[arg(long)]
    csv_extra: Option<PathBuf>,

    /// Print the comparison as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Number of schedule rows to print
    #[arg(long, default_value_t = 12)]
    rows: usize,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Goal {
    ShortenTerm,
    ReduceInstallment,
}

impl From<Goal> for ExtraPaymentGoal {
    fn from(goal: Goal) -> Self {
        match goal {
            Goal::ShortenTerm => ExtraPaymentGoal::ShortenTerm,
            Goal::ReduceInstallment => ExtraPaymentGoal::ReduceInstallment,
        }
    }
}

#[derive(Serialize)]
struct JsonOutput {
    scenario: LoanScenario,
    start_date: NaiveDate,
    baseline_payoff_date: Option<NaiveDate>,
    with_extra_payoff_date: Option<NaiveDate>,
    baseline_effective_annual_cost: Option<f64>,
    with_extra_effective_annual_cost: Option<f64>,
    #[serde(flatten)]
    report: sac_simulator::comparison::ComparisonReport,
}

fn build_scenario(cli: &Cli) -> Result<LoanScenario> {
    let scenario = match (cli.property_value, cli.principal) {
        (Some(value), _) => {
            let purchase = PropertyPurchase::new(value, cli.down_payment.unwrap_or(0.0));
            purchase
                .into_scenario(cli.annual_rate, cli.term)
                .context("invalid property purchase")?
        }
        (None, Some(principal)) => LoanScenario::new(principal, cli.annual_rate, cli.term)?,
        (None, None) => bail!("either --principal or --property-value is required"),
    };

    Ok(scenario.with_extra_payment(cli.extra, cli.goal.into())?)
}

fn load_charges(path: Option<&Path>) -> Result<Charges> {
    match path {
        Some(path) => Charges::from_csv_path(path)
            .with_context(|| format!("failed to load charges from {}", path.display())),
        None => {
            let default = Path::new(DEFAULT_CHARGES_PATH);
            if default.exists() {
                Ok(Charges::from_csv_path(default)?)
            } else {
                Ok(Charges::default())
            }
        }
    }
}

fn write_csv(path: &Path, schedule: &Schedule) -> Result<()> {
    let file = File::create(path).with_context(|| format!("unable to create {}", path.display()))?;
    write_rows_csv(&schedule.rows, BufWriter::new(file))?;
    println!("Schedule written to: {}", path.display());
    Ok(())
}

fn print_schedule(title: &str, schedule: &Schedule, start: NaiveDate, max_rows: usize) {
    println!("\n{}", title);
    println!("{}", "=".repeat(title.len()));

    if schedule.is_empty() {
        println!("  Nothing to simulate (principal and term must be positive)");
        return;
    }

    let summary = schedule.summary();
    println!("  Installments:        {}", summary.term_months);
    println!("  Total paid:          {}", format_brl(summary.total_paid));
    println!("  Total amortized:     {}", format_brl(summary.total_principal));
    println!("  Total interest:      {}", format_brl(summary.total_interest));
    println!("  Fees/insurance:      {}", format_brl(summary.total_fees()));
    if let (Some(first), Some(last)) = (summary.first_installment, summary.last_installment) {
        println!("  First installment:   {}", format_brl(first));
        println!("  Last installment:    {}", format_brl(last));
    }
    if let Some(date) = summary.payoff_date(start) {
        println!("  Last installment on: {}", date.format("%B %Y"));
    }
    if let Some(cost) = schedule.effective_annual_cost() {
        println!("  Effective cost (CET): {:.2}% a.a.", cost * 100.0);
    }
    let (principal_pct, interest_pct, fees_pct) = summary.composition().shares_pct();
    println!(
        "  Composition:         principal {:.1}% / interest {:.1}% / fees {:.1}%",
        principal_pct, interest_pct, fees_pct
    );
    if !schedule.is_fully_amortized() {
        println!(
            "  WARNING: balance did not reach zero within {} months",
            summary.term_months
        );
    }

    println!(
        "\n{:>5} {:>14} {:>12} {:>12} {:>10} {:>14}",
        "Month", "Installment", "Interest", "Amortization", "Fees", "Balance"
    );
    println!("{}", "-".repeat(72));
    for row in schedule.rows.iter().take(max_rows) {
        println!(
            "{:>5} {:>14.2} {:>12.2} {:>12.2} {:>10.2} {:>14.2}",
            row.month,
            row.total_installment,
            row.interest,
            row.principal_paid,
            row.fees(),
            row.outstanding_balance,
        );
    }
    if schedule.len() > max_rows {
        println!("... ({} more months)", schedule.len() - max_rows);
    }
}

fn print_comparison(comparison: &ScenarioComparison, start: NaiveDate, max_rows: usize) {
    let scenario = &comparison.scenario;
    println!("SAC Simulator v{}", env!("CARGO_PKG_VERSION"));
    println!("  Financed:      {}", format_brl(scenario.principal()));
    println!("  Interest rate: {:.2}% a.a. ({:.6} a.m.)", scenario.annual_interest_rate(), scenario.monthly_rate());
    println!("  Term:          {} months", scenario.term_months());
    println!("  Start:         {}", start.format("%B %Y"));

    print_schedule("Without extra payments", &comparison.baseline, start, max_rows);

    match &comparison.with_extra {
        Some(with_extra) => {
            let title = format!(
                "With {} extra per month ({})",
                format_brl(scenario.extra_monthly_payment()),
                scenario.extra_payment_goal()
            );
            print_schedule(&title, with_extra, start, max_rows);

            if let (Some(savings), Some(months)) = (comparison.savings(), comparison.months_saved()) {
                println!("\nSavings:          {}", format_brl(savings));
                println!("Months saved:     {}", months);
            }
        }
        None => println!("\nAdd --extra to compare against a schedule with extra payments."),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let scenario = build_scenario(&cli)?;
    let charges = load_charges(cli.charges.as_deref())?;
    let start = cli
        .start_date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    log::info!("simulating {:?} with {:?}", scenario, charges);

    let runner = ComparisonRunner::new(AmortizationEngine::new(charges, ScheduleConfig::default()));
    let comparison = runner.compare(&scenario);

    if cli.json {
        let baseline_summary = comparison.baseline_summary();
        let output = JsonOutput {
            scenario,
            start_date: start,
            baseline_payoff_date: baseline_summary.payoff_date(start),
            with_extra_payoff_date: comparison
                .with_extra_summary()
                .and_then(|s| s.payoff_date(start)),
            baseline_effective_annual_cost: comparison.baseline.effective_annual_cost(),
            with_extra_effective_annual_cost: comparison
                .with_extra
                .as_ref()
                .and_then(Schedule::effective_annual_cost),
            report: comparison.report(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_comparison(&comparison, start, cli.rows);
    }

    if let Some(path) = &cli.csv {
        write_csv(path, &comparison.baseline)?;
    }
    if let Some(path) = &cli.csv_extra {
        match &comparison.with_extra {
            Some(with_extra) => write_csv(path, with_extra)?,
            None => log::warn!("--csv-extra ignored: no extra payment configured"),
        }
    }

    Ok(())
}
