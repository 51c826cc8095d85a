//! Step handlers ("tools") for the payment workflow.
//!
//! Each handler takes only the entities it needs and reports back through
//! [`ToolReport`], plus a typed payload where one is produced. External
//! checks (identity, AML) and payment rails are simulated by deterministic
//! rules; `execute_payment` is the only handler that mutates anything.

use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use crate::core::types::ToolReport;
use crate::model::{Account, Invoice, PaymentPlan, format_cents};

/// Currencies the workflow will pay out in.
pub const SUPPORTED_CURRENCIES: [&str; 3] = ["USD", "EUR", "GBP"];

/// Invoices due more than this many days ago are rejected.
pub const STALE_AFTER_DAYS: i64 = 30;

/// Success message of `validate_invoice`; the planner keys off its
/// presence in the audit log.
pub const MSG_INVOICE_VALIDATED: &str = "Invoice validated.";

/// Vendor ids ending with this marker fail the identity check stub.
const KYC_FAIL_SUFFIX: char = 'X';

/// Vendors flagged by the AML screening stub.
const AML_DENYLIST: [&str; 2] = ["OFAC123", "AML999"];

/// Check amount, currency, and staleness of an invoice.
pub fn validate_invoice(invoice: &Invoice, today: NaiveDate) -> ToolReport {
    if invoice.amount_cents <= 0 {
        return ToolReport::fail("Invalid invoice amount.");
    }
    if !SUPPORTED_CURRENCIES.contains(&invoice.currency.as_str()) {
        return ToolReport::fail(format!("Unsupported currency {}.", invoice.currency));
    }
    if invoice.due_date < today - Duration::days(STALE_AFTER_DAYS) {
        return ToolReport::fail("Invoice is too old.");
    }
    ToolReport::pass(MSG_INVOICE_VALIDATED)
}

/// Identity-check stand-in: fails iff the vendor id ends with `'X'`.
pub fn run_kyc(vendor_id: &str) -> ToolReport {
    if vendor_id.ends_with(KYC_FAIL_SUFFIX) {
        ToolReport::fail("KYC failed.")
    } else {
        ToolReport::pass("KYC passed.")
    }
}

/// AML-screening stand-in: fails iff the vendor id is denylisted.
pub fn run_aml_screening(vendor_id: &str) -> ToolReport {
    if AML_DENYLIST.contains(&vendor_id) {
        ToolReport::fail("AML screening flagged vendor.")
    } else {
        ToolReport::pass("AML screening passed.")
    }
}

/// Standalone balance predicate. Not selected by the planner; the same
/// bound is folded into `propose_plan`.
pub fn check_balance(account: &Account, amount_cents: i64) -> ToolReport {
    if account.balance_cents >= amount_cents {
        ToolReport::pass("Sufficient balance.")
    } else {
        ToolReport::fail("Insufficient balance.")
    }
}

/// Standalone daily-limit predicate. Not selected by the planner; the
/// same bound is folded into `propose_plan`.
pub fn check_daily_limit(account: &Account, amount_cents: i64) -> ToolReport {
    if account.spent_today_cents + amount_cents <= account.daily_limit_cents {
        ToolReport::pass("Within daily limit.")
    } else {
        ToolReport::fail("Exceeds daily limit.")
    }
}

/// Decide how much of the invoice to pay now versus schedule for tomorrow.
///
/// `immediate = min(invoice amount, balance, remaining daily limit)`.
/// Always succeeds and never mutates the account.
pub fn propose_plan(
    invoice: &Invoice,
    account: &Account,
    today: NaiveDate,
) -> (ToolReport, PaymentPlan) {
    let immediate = invoice
        .amount_cents
        .min(account.balance_cents)
        .min(account.remaining_daily_limit_cents());
    let tomorrow = today + Duration::days(1);

    if immediate <= 0 {
        let plan = PaymentPlan {
            total_cents: invoice.amount_cents,
            currency: invoice.currency.clone(),
            immediate_cents: 0,
            scheduled_cents: invoice.amount_cents,
            scheduled_date: Some(tomorrow),
        };
        return (ToolReport::pass("Proposed full scheduling for tomorrow."), plan);
    }

    let remainder = invoice.amount_cents - immediate;
    if remainder > 0 {
        let plan = PaymentPlan {
            total_cents: invoice.amount_cents,
            currency: invoice.currency.clone(),
            immediate_cents: immediate,
            scheduled_cents: remainder,
            scheduled_date: Some(tomorrow),
        };
        return (
            ToolReport::pass("Proposed split: partial now, remainder tomorrow."),
            plan,
        );
    }

    let plan = PaymentPlan {
        total_cents: invoice.amount_cents,
        currency: invoice.currency.clone(),
        immediate_cents: invoice.amount_cents,
        scheduled_cents: 0,
        scheduled_date: None,
    };
    (ToolReport::pass("Proposed full payment now."), plan)
}

/// Debit the account and return a fresh transaction id.
///
/// A non-positive amount is a no-op success (still carries an id). An
/// insufficient balance fails without touching the account.
pub fn execute_payment(
    account: &mut Account,
    amount_cents: i64,
    currency: &str,
) -> (ToolReport, Option<String>) {
    if amount_cents <= 0 {
        return (
            ToolReport::pass("Nothing to execute."),
            Some(Uuid::new_v4().to_string()),
        );
    }
    if account.balance_cents < amount_cents {
        return (ToolReport::fail("Execution failed: insufficient funds."), None);
    }

    account.balance_cents -= amount_cents;
    account.spent_today_cents += amount_cents;
    let report = ToolReport::pass(format!(
        "Executed {} {}.",
        format_cents(amount_cents),
        currency
    ));
    (report, Some(Uuid::new_v4().to_string()))
}

/// Book a future obligation and return a fresh schedule id.
///
/// Never mutates the account: a scheduled payment is not a debit.
/// A non-positive amount is a no-op success.
pub fn schedule_payment(date: NaiveDate, amount_cents: i64, currency: &str) -> (ToolReport, String) {
    if amount_cents <= 0 {
        return (ToolReport::pass("Nothing to schedule."), Uuid::new_v4().to_string());
    }

    let report = ToolReport::pass(format!(
        "Scheduled {} {} for {}.",
        format_cents(amount_cents),
        currency,
        date
    ));
    (report, format!("SCH-{}", Uuid::new_v4()))
}
