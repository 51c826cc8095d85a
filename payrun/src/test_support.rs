//! Test-only builders for entities and a pinned clock.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::clock::Clock;
use crate::model::{Account, Invoice, WorkflowState};

/// Deterministic reference date used by fixtures.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).expect("valid date")
}

/// Clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Noon UTC on the fixture date.
    pub fn fixture() -> Self {
        Self(
            Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0)
                .single()
                .expect("valid instant"),
        )
    }

    /// Noon UTC on an arbitrary date.
    pub fn on(date: NaiveDate) -> Self {
        Self(date.and_hms_opt(12, 0, 0).expect("valid time").and_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Invoice from a clean vendor, due five days after the fixture date.
pub fn invoice(amount_cents: i64) -> Invoice {
    invoice_with_vendor(amount_cents, "ACME_CO")
}

/// Invoice with an explicit vendor id (ids ending in 'X' fail KYC;
/// "OFAC123"/"AML999" fail AML).
pub fn invoice_with_vendor(amount_cents: i64, vendor_id: &str) -> Invoice {
    Invoice {
        invoice_id: "INV-1001".to_string(),
        vendor_id: vendor_id.to_string(),
        amount_cents,
        currency: "USD".to_string(),
        due_date: today() + Duration::days(5),
        memo: "Monthly hosting fee".to_string(),
    }
}

/// Account with the given balance and daily limit, nothing spent yet.
pub fn account(balance_cents: i64, daily_limit_cents: i64) -> Account {
    Account {
        account_id: "OPERATING-USD".to_string(),
        balance_cents,
        daily_limit_cents,
        spent_today_cents: 0,
    }
}

/// Fresh workflow state for an invoice/account pair.
pub fn state(invoice: Invoice, account: Account) -> WorkflowState {
    WorkflowState::new(invoice, account)
}
