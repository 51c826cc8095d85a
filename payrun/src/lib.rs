//! Deterministic invoice payment workflow engine.
//!
//! Runs one invoice through validation, vendor screening (KYC/AML),
//! payment-plan proposal, immediate execution, and remainder scheduling.
//! The architecture enforces a strict separation:
//!
//! - **[`core`]**: pure, deterministic logic (step handlers, planner,
//!   invariant checks). No I/O, no clock access beyond passed-in dates.
//! - **Orchestration ([`step`], [`looping`])**: threads state, clock, and
//!   the audit trail through the core.
//!
//! The engine performs no I/O of its own: the audit trail is a value on
//! [`model::WorkflowState`], and wall-clock time enters only through the
//! [`clock::Clock`] trait, so runs are fully reproducible in tests.

pub mod audit;
pub mod clock;
pub mod config;
pub mod core;
pub mod exit_codes;
pub mod logging;
pub mod looping;
pub mod model;
pub mod step;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
