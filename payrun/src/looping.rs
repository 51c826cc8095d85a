//! Orchestrator loop for a full workflow run.

use anyhow::Result;
use serde::Serialize;

use crate::clock::Clock;
use crate::config::RunConfig;
use crate::core::planner::next_action;
use crate::core::types::Action;
use crate::model::WorkflowState;
use crate::step::{StepOutcome, run_step};

/// Reason the loop stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStop {
    /// Planner found nothing left to do.
    Complete,
    /// Invoice validation failed; nothing was screened or paid.
    ValidationFailed,
    /// Vendor failed the identity check.
    KycFailed,
    /// Vendor was flagged by AML screening.
    AmlFailed,
    /// Immediate execution kept failing and the attempt cap was reached.
    ExecutionStalled { attempts: u32 },
}

/// Summary of one workflow run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    /// Number of actions dispatched (the terminal thought is not a step).
    pub steps_executed: u32,
    pub stop: RunStop,
}

/// Run the workflow until the planner is done or a terminal condition
/// halts it.
///
/// Validation, KYC, and AML failures halt immediately. Plan proposal and
/// scheduling cannot fail. A failed immediate execution leaves state
/// unchanged, so the planner would re-select it forever; consecutive
/// failures are therefore capped by `config.max_execute_attempts`.
pub fn run_workflow(
    state: &mut WorkflowState,
    clock: &dyn Clock,
    config: &RunConfig,
) -> Result<RunOutcome> {
    let mut steps_executed = 0u32;
    let mut execute_failures = 0u32;

    loop {
        let step = steps_executed + 1;
        let Some(action) = next_action(state) else {
            state.audit.append(clock, format!("Thought {step}: Done."));
            return Ok(RunOutcome {
                steps_executed,
                stop: RunStop::Complete,
            });
        };
        tracing::debug!(step, action = %action, "dispatching");

        let outcome = run_step(state, clock, step, action)?;
        steps_executed += 1;

        if let Some(stop) = screening_stop(&outcome) {
            state.errors.push(outcome.message);
            return Ok(RunOutcome {
                steps_executed,
                stop,
            });
        }

        match (outcome.action, outcome.ok) {
            (Action::ExecuteImmediate, false) => {
                execute_failures += 1;
                if execute_failures >= config.max_execute_attempts {
                    let thought = steps_executed + 1;
                    state.audit.append(
                        clock,
                        format!(
                            "Thought {thought}: Execution stalled after {execute_failures} attempts; halting."
                        ),
                    );
                    state.errors.push(outcome.message);
                    return Ok(RunOutcome {
                        steps_executed,
                        stop: RunStop::ExecutionStalled {
                            attempts: execute_failures,
                        },
                    });
                }
            }
            (Action::ExecuteImmediate, true) => execute_failures = 0,
            _ => {}
        }
    }
}

/// Map a failed screening step to its terminal stop, if any.
fn screening_stop(outcome: &StepOutcome) -> Option<RunStop> {
    if outcome.ok {
        return None;
    }
    match outcome.action {
        Action::ValidateInvoice => Some(RunStop::ValidationFailed),
        Action::RunKyc => Some(RunStop::KycFailed),
        Action::RunAml => Some(RunStop::AmlFailed),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PaymentPlan;
    use crate::test_support::{FixedClock, account, invoice, invoice_with_vendor, state, today};
    use chrono::Duration;

    #[test]
    fn full_payment_run_completes_without_scheduling() {
        let clock = FixedClock::fixture();
        let mut st = state(invoice(25_000), account(40_000, 50_000));

        let outcome = run_workflow(&mut st, &clock, &RunConfig::default()).expect("run");

        assert_eq!(outcome.stop, RunStop::Complete);
        assert_eq!(outcome.steps_executed, 5);
        assert_eq!(st.executed_amount_cents, 25_000);
        assert!(!st.scheduled);
        assert_eq!(st.account.balance_cents, 15_000);
        // 5 triples + final Done thought.
        assert_eq!(st.audit.len(), 16);
        assert!(st.audit.contains("Thought 6: Done."));
    }

    #[test]
    fn kyc_failure_halts_before_screening_or_planning() {
        let clock = FixedClock::fixture();
        let mut st = state(invoice_with_vendor(25_000, "SHELLX"), account(40_000, 50_000));

        let outcome = run_workflow(&mut st, &clock, &RunConfig::default()).expect("run");

        assert_eq!(outcome.stop, RunStop::KycFailed);
        assert_eq!(outcome.steps_executed, 2);
        assert_eq!(st.vendor_aml_ok, None);
        assert!(st.payment_plan.is_none());
        assert_eq!(st.errors, vec!["KYC failed.".to_string()]);
    }

    #[test]
    fn aml_failure_halts_before_planning() {
        let clock = FixedClock::fixture();
        let mut st = state(invoice_with_vendor(25_000, "OFAC123"), account(40_000, 50_000));

        let outcome = run_workflow(&mut st, &clock, &RunConfig::default()).expect("run");

        assert_eq!(outcome.stop, RunStop::AmlFailed);
        assert!(st.payment_plan.is_none());
        assert_eq!(st.errors, vec!["AML screening flagged vendor.".to_string()]);
    }

    #[test]
    fn persistent_execution_failure_stalls_at_the_attempt_cap() {
        let clock = FixedClock::fixture();
        // Plan demands more than the account holds; crafted mid-run state.
        let mut st = state(invoice(25_000), account(1_000, 50_000));
        st.audit.append(
            &clock,
            "Observation 1: Invoice validated.".to_string(),
        );
        st.vendor_kyc_ok = Some(true);
        st.vendor_aml_ok = Some(true);
        st.payment_plan = Some(PaymentPlan {
            total_cents: 25_000,
            currency: "USD".to_string(),
            immediate_cents: 18_000,
            scheduled_cents: 7_000,
            scheduled_date: Some(today() + Duration::days(1)),
        });

        let outcome = run_workflow(&mut st, &clock, &RunConfig::default()).expect("run");

        assert_eq!(outcome.stop, RunStop::ExecutionStalled { attempts: 3 });
        assert_eq!(outcome.steps_executed, 3);
        assert_eq!(st.executed_amount_cents, 0);
        assert_eq!(st.account.balance_cents, 1_000);
        assert!(st.audit.contains("Execution stalled after 3 attempts; halting."));
        assert_eq!(
            st.errors,
            vec!["Execution failed: insufficient funds.".to_string()]
        );
    }

    #[test]
    fn loop_resumes_from_a_partial_snapshot() {
        let clock = FixedClock::fixture();
        // Snapshot taken after screening: the planner must pick up at
        // plan proposal without re-running earlier steps.
        let mut st = state(invoice(25_000), account(18_000, 50_000));
        st.audit.append(
            &clock,
            "Observation 1: Invoice validated.".to_string(),
        );
        st.vendor_kyc_ok = Some(true);
        st.vendor_aml_ok = Some(true);

        let outcome = run_workflow(&mut st, &clock, &RunConfig::default()).expect("run");

        assert_eq!(outcome.stop, RunStop::Complete);
        assert_eq!(outcome.steps_executed, 3);
        assert!(!st.audit.contains("run_kyc("));
        assert_eq!(st.executed_amount_cents, 18_000);
        assert!(st.scheduled);
    }
}
