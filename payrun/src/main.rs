//! Deterministic invoice payment workflow runner.
//!
//! Runs a single invoice through validation, vendor screening, plan
//! proposal, immediate execution, and remainder scheduling, then prints
//! the audit trail. Flag defaults reproduce the canonical demo scenario
//! (a 250.00 USD invoice against an account holding 180.00).

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use payrun::clock::{Clock, SystemClock};
use payrun::config::{RunConfig, load_config};
use payrun::core::tools::propose_plan;
use payrun::exit_codes;
use payrun::logging;
use payrun::looping::{RunOutcome, RunStop, run_workflow};
use payrun::model::{Account, Invoice, PaymentPlan, WorkflowState, format_cents};

#[derive(Parser)]
#[command(
    name = "payrun",
    version,
    about = "Deterministic invoice payment workflow runner"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full workflow and print the audit trail.
    Run(RunArgs),
    /// Propose a payment plan without executing anything.
    Plan(PlanArgs),
}

#[derive(Args, Debug)]
struct EntityArgs {
    /// Invoice identifier.
    #[arg(long, default_value = "INV-1001")]
    invoice_id: String,

    /// Vendor identifier (ids ending in 'X' fail the KYC stub).
    #[arg(long, default_value = "ACME_CO")]
    vendor_id: String,

    /// Invoice amount in integer minor units (cents).
    #[arg(long, default_value_t = 25_000)]
    amount_cents: i64,

    /// ISO currency code.
    #[arg(long, default_value = "USD")]
    currency: String,

    /// Days from today until the invoice is due (may be negative).
    #[arg(long, default_value_t = 5)]
    due_in_days: i64,

    /// Free-text memo.
    #[arg(long, default_value = "Monthly hosting fee")]
    memo: String,

    /// Account identifier.
    #[arg(long, default_value = "OPERATING-USD")]
    account_id: String,

    /// Account balance in cents.
    #[arg(long, default_value_t = 18_000)]
    balance_cents: i64,

    /// Daily spending limit in cents.
    #[arg(long, default_value_t = 50_000)]
    daily_limit_cents: i64,

    /// Amount already spent today in cents.
    #[arg(long, default_value_t = 0)]
    spent_today_cents: i64,
}

impl EntityArgs {
    fn invoice(&self, clock: &dyn Clock) -> Invoice {
        Invoice {
            invoice_id: self.invoice_id.clone(),
            vendor_id: self.vendor_id.clone(),
            amount_cents: self.amount_cents,
            currency: self.currency.clone(),
            due_date: clock.today() + chrono::Duration::days(self.due_in_days),
            memo: self.memo.clone(),
        }
    }

    fn account(&self) -> Account {
        Account {
            account_id: self.account_id.clone(),
            balance_cents: self.balance_cents,
            daily_limit_cents: self.daily_limit_cents,
            spent_today_cents: self.spent_today_cents,
        }
    }
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    entities: EntityArgs,

    /// Optional TOML config path (attempt cap etc.).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit a JSON report instead of plain audit lines.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[command(flatten)]
    entities: EntityArgs,

    /// Emit the plan as JSON.
    #[arg(long)]
    json: bool,
}

/// Full run report for `--json` output.
#[derive(Serialize)]
struct RunReport<'a> {
    outcome: &'a RunOutcome,
    account: &'a Account,
    payment_plan: &'a Option<PaymentPlan>,
    executed_amount_cents: i64,
    scheduled: bool,
    errors: &'a [String],
    audit_log: Vec<String>,
}

fn main() {
    logging::init();
    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            exit_codes::INVALID
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => cmd_run(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn cmd_run(args: RunArgs) -> Result<i32> {
    let clock = SystemClock;
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => RunConfig::default(),
    };

    let mut state = WorkflowState::new(args.entities.invoice(&clock), args.entities.account());
    let outcome = run_workflow(&mut state, &clock, &config)?;

    if args.json {
        let report = RunReport {
            outcome: &outcome,
            account: &state.account,
            payment_plan: &state.payment_plan,
            executed_amount_cents: state.executed_amount_cents,
            scheduled: state.scheduled,
            errors: &state.errors,
            audit_log: state.audit.lines(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in state.audit.lines() {
            println!("{line}");
        }
    }

    Ok(stop_exit_code(&outcome.stop))
}

fn cmd_plan(args: PlanArgs) -> Result<i32> {
    let clock = SystemClock;
    let invoice = args.entities.invoice(&clock);
    let account = args.entities.account();
    let (report, plan) = propose_plan(&invoice, &account, clock.today());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        println!("{}", report.message);
        println!("immediate: {} {}", format_cents(plan.immediate_cents), plan.currency);
        match plan.scheduled_date {
            Some(date) => println!(
                "scheduled: {} {} on {date}",
                format_cents(plan.scheduled_cents),
                plan.currency
            ),
            None => println!("scheduled: nothing"),
        }
    }

    Ok(exit_codes::OK)
}

fn stop_exit_code(stop: &RunStop) -> i32 {
    match stop {
        RunStop::Complete => exit_codes::OK,
        RunStop::ValidationFailed | RunStop::KycFailed | RunStop::AmlFailed => {
            exit_codes::REJECTED
        }
        RunStop::ExecutionStalled { .. } => exit_codes::STALLED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_run_defaults_reproduce_the_demo() {
        let cli = Cli::parse_from(["payrun", "run"]);
        let Command::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.entities.invoice_id, "INV-1001");
        assert_eq!(args.entities.vendor_id, "ACME_CO");
        assert_eq!(args.entities.amount_cents, 25_000);
        assert_eq!(args.entities.balance_cents, 18_000);
        assert_eq!(args.entities.daily_limit_cents, 50_000);
        assert!(!args.json);
    }

    #[test]
    fn parse_plan_with_overrides() {
        let cli = Cli::parse_from([
            "payrun",
            "plan",
            "--amount-cents",
            "100",
            "--balance-cents",
            "0",
            "--json",
        ]);
        let Command::Plan(args) = cli.command else {
            panic!("expected plan command");
        };
        assert_eq!(args.entities.amount_cents, 100);
        assert_eq!(args.entities.balance_cents, 0);
        assert!(args.json);
    }

    #[test]
    fn stop_exit_codes_are_stable() {
        assert_eq!(stop_exit_code(&RunStop::Complete), exit_codes::OK);
        assert_eq!(stop_exit_code(&RunStop::ValidationFailed), exit_codes::REJECTED);
        assert_eq!(stop_exit_code(&RunStop::KycFailed), exit_codes::REJECTED);
        assert_eq!(stop_exit_code(&RunStop::AmlFailed), exit_codes::REJECTED);
        assert_eq!(
            stop_exit_code(&RunStop::ExecutionStalled { attempts: 3 }),
            exit_codes::STALLED
        );
    }
}
