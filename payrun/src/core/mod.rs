//! Pure, deterministic workflow logic.
//!
//! Nothing in this module performs I/O or reads the clock; dates come in
//! as arguments and results come out as values, so every piece is
//! testable in isolation.

pub mod invariants;
pub mod planner;
pub mod tools;
pub mod types;
