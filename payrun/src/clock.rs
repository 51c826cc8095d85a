//! Injectable time source.
//!
//! Invoice validation, plan proposal, and audit timestamps all consult the
//! clock, so tests can pin "today" and reproduce a run exactly.

use chrono::{DateTime, NaiveDate, Utc};

/// Source of the current instant and date.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time. The only `Clock` used outside tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
