//! Invariant checks over accounts, plans, and workflow state.
//!
//! Violations indicate a handler bug, not a domain failure, so checks
//! return messages instead of panicking and let the caller decide how to
//! fail.

use crate::model::{Account, PaymentPlan, WorkflowState};

/// Check account invariants: non-negative balance and spend, spend within
/// the daily limit.
pub fn validate_account(account: &Account) -> Vec<String> {
    let mut errors = Vec::new();
    if account.balance_cents < 0 {
        errors.push(format!(
            "account {}: balance must be >= 0 (got {})",
            account.account_id, account.balance_cents
        ));
    }
    if account.spent_today_cents < 0 {
        errors.push(format!(
            "account {}: spent_today must be >= 0 (got {})",
            account.account_id, account.spent_today_cents
        ));
    }
    if account.spent_today_cents > account.daily_limit_cents {
        errors.push(format!(
            "account {}: spent_today {} exceeds daily limit {}",
            account.account_id, account.spent_today_cents, account.daily_limit_cents
        ));
    }
    errors
}

/// Check plan invariants: portions are non-negative, sum to the total,
/// and a scheduled portion carries a date.
pub fn validate_plan(plan: &PaymentPlan) -> Vec<String> {
    let mut errors = Vec::new();
    if plan.immediate_cents < 0 {
        errors.push(format!("plan: immediate must be >= 0 (got {})", plan.immediate_cents));
    }
    if plan.scheduled_cents < 0 {
        errors.push(format!("plan: scheduled must be >= 0 (got {})", plan.scheduled_cents));
    }
    if plan.immediate_cents + plan.scheduled_cents != plan.total_cents {
        errors.push(format!(
            "plan: immediate {} + scheduled {} != total {}",
            plan.immediate_cents, plan.scheduled_cents, plan.total_cents
        ));
    }
    if plan.scheduled_cents > 0 && plan.scheduled_date.is_none() {
        errors.push("plan: scheduled portion has no scheduled date".to_string());
    }
    errors
}

/// Check the whole workflow state after a step.
pub fn validate_state(state: &WorkflowState) -> Vec<String> {
    let mut errors = validate_account(&state.account);
    if state.executed_amount_cents < 0 {
        errors.push(format!(
            "state: executed amount must be >= 0 (got {})",
            state.executed_amount_cents
        ));
    }
    if let Some(plan) = &state.payment_plan {
        errors.extend(validate_plan(plan));
        if plan.total_cents != state.invoice.amount_cents {
            errors.push(format!(
                "plan: total {} does not cover invoice amount {}",
                plan.total_cents, state.invoice.amount_cents
            ));
        }
        if state.executed_amount_cents > plan.immediate_cents {
            errors.push(format!(
                "state: executed {} exceeds plan immediate {}",
                state.executed_amount_cents, plan.immediate_cents
            ));
        }
    }
    errors
}
