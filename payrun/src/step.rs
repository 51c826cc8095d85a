//! One deterministic iteration of the payment workflow.
//!
//! Dispatches a planner-selected action: appends the Thought line, invokes
//! the handler, appends the Action and Observation lines, applies the
//! handler's effect to the state, then re-checks invariants.

use anyhow::{Result, anyhow};

use crate::clock::Clock;
use crate::core::invariants::validate_state;
use crate::core::tools;
use crate::core::types::{Action, ToolReport};
use crate::model::{WorkflowState, format_cents};

/// Result of dispatching one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Iteration number (1-indexed).
    pub step: u32,
    /// Action that was dispatched.
    pub action: Action,
    /// Whether the handler reported success.
    pub ok: bool,
    /// Handler message, as recorded in the observation line.
    pub message: String,
}

/// Execute one workflow iteration for an already-selected action.
///
/// Handler failures are returned as `ok == false`, never as `Err`; an
/// `Err` means a broken invariant or a plan-less dispatch, both of which
/// indicate a bug rather than a domain outcome.
pub fn run_step(
    state: &mut WorkflowState,
    clock: &dyn Clock,
    step: u32,
    action: Action,
) -> Result<StepOutcome> {
    state
        .audit
        .append(clock, format!("Thought {step}: Deciding to '{}'.", action.name()));

    let report = match action {
        Action::ValidateInvoice => dispatch_validate(state, clock, step),
        Action::RunKyc => dispatch_kyc(state, clock, step),
        Action::RunAml => dispatch_aml(state, clock, step),
        Action::ProposePlan => dispatch_propose(state, clock, step),
        Action::ExecuteImmediate => dispatch_execute(state, clock, step)?,
        Action::ScheduleRemainder => dispatch_schedule(state, clock, step)?,
    };

    let violations = validate_state(state);
    if !violations.is_empty() {
        return Err(anyhow!(
            "invariants violated after '{}': {}",
            action.name(),
            violations.join("; ")
        ));
    }

    Ok(StepOutcome {
        step,
        action,
        ok: report.ok,
        message: report.message,
    })
}

fn dispatch_validate(state: &mut WorkflowState, clock: &dyn Clock, step: u32) -> ToolReport {
    let report = tools::validate_invoice(&state.invoice, clock.today());
    state.audit.append(clock, format!("Action {step}: validate_invoice()"));
    state
        .audit
        .append(clock, format!("Observation {step}: {}", report.message));
    report
}

fn dispatch_kyc(state: &mut WorkflowState, clock: &dyn Clock, step: u32) -> ToolReport {
    let report = tools::run_kyc(&state.invoice.vendor_id);
    state.vendor_kyc_ok = Some(report.ok);
    let action_line = format!("Action {step}: run_kyc({})", state.invoice.vendor_id);
    state.audit.append(clock, action_line);
    state
        .audit
        .append(clock, format!("Observation {step}: {}", report.message));
    report
}

fn dispatch_aml(state: &mut WorkflowState, clock: &dyn Clock, step: u32) -> ToolReport {
    let report = tools::run_aml_screening(&state.invoice.vendor_id);
    state.vendor_aml_ok = Some(report.ok);
    let action_line = format!("Action {step}: run_aml({})", state.invoice.vendor_id);
    state.audit.append(clock, action_line);
    state
        .audit
        .append(clock, format!("Observation {step}: {}", report.message));
    report
}

fn dispatch_propose(state: &mut WorkflowState, clock: &dyn Clock, step: u32) -> ToolReport {
    let (report, plan) = tools::propose_plan(&state.invoice, &state.account, clock.today());
    state.payment_plan = Some(plan);
    state.audit.append(clock, format!("Action {step}: propose_plan()"));
    state
        .audit
        .append(clock, format!("Observation {step}: {}", report.message));
    report
}

fn dispatch_execute(
    state: &mut WorkflowState,
    clock: &dyn Clock,
    step: u32,
) -> Result<ToolReport> {
    let plan = state
        .payment_plan
        .as_ref()
        .ok_or_else(|| anyhow!("execute_immediate selected without a plan"))?;
    let amount_cents = plan.immediate_cents;
    let currency = plan.currency.clone();

    let (report, txn_id) = tools::execute_payment(&mut state.account, amount_cents, &currency);
    state.audit.append(
        clock,
        format!("Action {step}: execute_payment({} {currency})", format_cents(amount_cents)),
    );
    state.audit.append(
        clock,
        format!(
            "Observation {step}: {} (txn={})",
            report.message,
            txn_id.as_deref().unwrap_or("")
        ),
    );
    if report.ok {
        state.executed_amount_cents = amount_cents;
    }
    Ok(report)
}

fn dispatch_schedule(
    state: &mut WorkflowState,
    clock: &dyn Clock,
    step: u32,
) -> Result<ToolReport> {
    let plan = state
        .payment_plan
        .as_ref()
        .ok_or_else(|| anyhow!("schedule_remainder selected without a plan"))?;
    let amount_cents = plan.scheduled_cents;
    let currency = plan.currency.clone();
    let date = plan
        .scheduled_date
        .ok_or_else(|| anyhow!("schedule_remainder selected without a scheduled date"))?;

    let (report, schedule_id) = tools::schedule_payment(date, amount_cents, &currency);
    state.audit.append(
        clock,
        format!(
            "Action {step}: schedule_payment({} {currency} on {date})",
            format_cents(amount_cents)
        ),
    );
    state.audit.append(
        clock,
        format!("Observation {step}: {} (id={schedule_id})", report.message),
    );
    if report.ok {
        state.scheduled = true;
    }
    Ok(report)
}
