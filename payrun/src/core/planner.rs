//! Deterministic next-action selection over workflow state.
//!
//! The planner holds no cursor: position in the workflow is re-derived
//! from the data on every call, so the loop is resumable from any partial
//! state snapshot and self-correcting if a handler's effect differs from
//! what was expected.

use crate::core::tools::MSG_INVOICE_VALIDATED;
use crate::core::types::Action;
use crate::model::WorkflowState;

type Guard = fn(&WorkflowState) -> bool;

/// Ordered rules; the first guard that holds selects the action.
const RULES: [(Guard, Action); 6] = [
    (needs_validation, Action::ValidateInvoice),
    (needs_kyc, Action::RunKyc),
    (needs_aml, Action::RunAml),
    (needs_plan, Action::ProposePlan),
    (needs_execution, Action::ExecuteImmediate),
    (needs_schedule, Action::ScheduleRemainder),
];

/// Select the next action, or `None` when the workflow is done.
pub fn next_action(state: &WorkflowState) -> Option<Action> {
    RULES
        .iter()
        .find(|(guard, _)| guard(state))
        .map(|&(_, action)| action)
}

/// No audit entry records a successful validation yet.
fn needs_validation(state: &WorkflowState) -> bool {
    !state.audit.contains(MSG_INVOICE_VALIDATED)
}

/// Validation succeeded and the identity check has not run.
fn needs_kyc(state: &WorkflowState) -> bool {
    !needs_validation(state) && state.vendor_kyc_ok.is_none()
}

/// Identity check passed and AML screening has not run.
fn needs_aml(state: &WorkflowState) -> bool {
    state.vendor_kyc_ok == Some(true) && state.vendor_aml_ok.is_none()
}

/// Screening passed and no plan has been proposed.
fn needs_plan(state: &WorkflowState) -> bool {
    state.vendor_aml_ok == Some(true) && state.payment_plan.is_none()
}

/// A plan exists and its immediate portion is not fully executed.
fn needs_execution(state: &WorkflowState) -> bool {
    state
        .payment_plan
        .as_ref()
        .is_some_and(|plan| state.executed_amount_cents < plan.immediate_cents)
}

/// Execution is caught up and a scheduled portion remains unbooked.
fn needs_schedule(state: &WorkflowState) -> bool {
    state.payment_plan.as_ref().is_some_and(|plan| {
        state.executed_amount_cents >= plan.immediate_cents
            && !state.scheduled
            && plan.scheduled_cents > 0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PaymentPlan;
    use crate::test_support::{FixedClock, account, invoice, state, today};
    use chrono::Duration;

    fn validated(st: &mut WorkflowState) {
        let clock = FixedClock::fixture();
        st.audit
            .append(&clock, format!("Observation 1: {MSG_INVOICE_VALIDATED}"));
    }

    fn split_plan() -> PaymentPlan {
        PaymentPlan {
            total_cents: 25_000,
            currency: "USD".to_string(),
            immediate_cents: 18_000,
            scheduled_cents: 7_000,
            scheduled_date: Some(today() + Duration::days(1)),
        }
    }

    #[test]
    fn fresh_state_selects_validation() {
        let st = state(invoice(25_000), account(18_000, 50_000));
        assert_eq!(next_action(&st), Some(Action::ValidateInvoice));
    }

    #[test]
    fn validated_state_selects_kyc() {
        let mut st = state(invoice(25_000), account(18_000, 50_000));
        validated(&mut st);
        assert_eq!(next_action(&st), Some(Action::RunKyc));
    }

    #[test]
    fn kyc_passed_selects_aml() {
        let mut st = state(invoice(25_000), account(18_000, 50_000));
        validated(&mut st);
        st.vendor_kyc_ok = Some(true);
        assert_eq!(next_action(&st), Some(Action::RunAml));
    }

    #[test]
    fn kyc_failed_selects_nothing_further() {
        let mut st = state(invoice(25_000), account(18_000, 50_000));
        validated(&mut st);
        st.vendor_kyc_ok = Some(false);
        // The loop halts on KYC failure; the planner itself has no rule left.
        assert_eq!(next_action(&st), None);
    }

    #[test]
    fn screened_state_selects_plan_proposal() {
        let mut st = state(invoice(25_000), account(18_000, 50_000));
        validated(&mut st);
        st.vendor_kyc_ok = Some(true);
        st.vendor_aml_ok = Some(true);
        assert_eq!(next_action(&st), Some(Action::ProposePlan));
    }

    #[test]
    fn planned_state_selects_execution_until_caught_up() {
        let mut st = state(invoice(25_000), account(18_000, 50_000));
        validated(&mut st);
        st.vendor_kyc_ok = Some(true);
        st.vendor_aml_ok = Some(true);
        st.payment_plan = Some(split_plan());
        assert_eq!(next_action(&st), Some(Action::ExecuteImmediate));

        // Re-selects the same action while the executed amount lags the plan.
        st.executed_amount_cents = 17_999;
        assert_eq!(next_action(&st), Some(Action::ExecuteImmediate));
    }

    #[test]
    fn executed_state_selects_scheduling_of_remainder() {
        let mut st = state(invoice(25_000), account(0, 50_000));
        validated(&mut st);
        st.vendor_kyc_ok = Some(true);
        st.vendor_aml_ok = Some(true);
        st.payment_plan = Some(split_plan());
        st.executed_amount_cents = 18_000;
        assert_eq!(next_action(&st), Some(Action::ScheduleRemainder));
    }

    #[test]
    fn full_now_plan_skips_scheduling() {
        let mut st = state(invoice(25_000), account(0, 50_000));
        validated(&mut st);
        st.vendor_kyc_ok = Some(true);
        st.vendor_aml_ok = Some(true);
        st.payment_plan = Some(PaymentPlan {
            total_cents: 25_000,
            currency: "USD".to_string(),
            immediate_cents: 25_000,
            scheduled_cents: 0,
            scheduled_date: None,
        });
        st.executed_amount_cents = 25_000;
        assert_eq!(next_action(&st), None);
    }

    #[test]
    fn completed_state_selects_nothing() {
        let mut st = state(invoice(25_000), account(0, 50_000));
        validated(&mut st);
        st.vendor_kyc_ok = Some(true);
        st.vendor_aml_ok = Some(true);
        st.payment_plan = Some(split_plan());
        st.executed_amount_cents = 18_000;
        st.scheduled = true;
        assert_eq!(next_action(&st), None);
    }
}
