//! Stable exit codes for payrun CLI commands.

/// Command succeeded and the workflow completed.
pub const OK: i32 = 0;
/// Invalid usage, configuration, or an internal error.
pub const INVALID: i32 = 1;
/// Workflow rejected before payment (validation, KYC, or AML failure).
pub const REJECTED: i32 = 2;
/// Immediate execution stalled at the attempt cap.
pub const STALLED: i32 = 3;
