//! Entity types threaded through one workflow run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::audit::AuditLog;

/// A request to pay a vendor a fixed amount by a due date.
///
/// Immutable once constructed. All amounts are integer minor currency
/// units (cents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: String,
    pub vendor_id: String,
    pub amount_cents: i64,
    /// ISO currency code (e.g. "USD").
    pub currency: String,
    pub due_date: NaiveDate,
    pub memo: String,
}

/// The paying entity's funding source with balance and per-day spend cap.
///
/// Mutated only by `execute_payment`; after any successful execution
/// `spent_today_cents <= daily_limit_cents` and `balance_cents >= 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: String,
    pub balance_cents: i64,
    pub daily_limit_cents: i64,
    pub spent_today_cents: i64,
}

impl Account {
    /// Daily-limit headroom left today, clamped at zero.
    pub fn remaining_daily_limit_cents(&self) -> i64 {
        (self.daily_limit_cents - self.spent_today_cents).max(0)
    }
}

/// Split of an invoice amount into an immediate and a scheduled portion.
///
/// Created once by plan proposal and never mutated;
/// `immediate_cents + scheduled_cents == total_cents` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPlan {
    pub total_cents: i64,
    pub currency: String,
    pub immediate_cents: i64,
    pub scheduled_cents: i64,
    pub scheduled_date: Option<NaiveDate>,
}

/// Mutable hub aggregating one invoice, one account, and workflow progress.
///
/// Constructed once per run and exclusively owned by one loop invocation;
/// every step handler reads and writes through it. The audit log is the
/// product output of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub invoice: Invoice,
    pub account: Account,
    /// Unset until the identity check runs.
    pub vendor_kyc_ok: Option<bool>,
    /// Unset until AML screening runs.
    pub vendor_aml_ok: Option<bool>,
    pub payment_plan: Option<PaymentPlan>,
    /// Immediate amount executed so far.
    pub executed_amount_cents: i64,
    /// Whether the scheduled remainder has been booked.
    pub scheduled: bool,
    /// Terminal failure messages, in the order they occurred.
    pub errors: Vec<String>,
    pub audit: AuditLog,
}

impl WorkflowState {
    pub fn new(invoice: Invoice, account: Account) -> Self {
        Self {
            invoice,
            account,
            vendor_kyc_ok: None,
            vendor_aml_ok: None,
            payment_plan: None,
            executed_amount_cents: 0,
            scheduled: false,
            errors: Vec::new(),
            audit: AuditLog::default(),
        }
    }
}

/// Render integer minor units as major units with two decimals ("180.00").
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    format!("{sign}{}.{:02}", cents / 100, cents % 100)
}
