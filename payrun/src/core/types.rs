//! Shared deterministic contracts for core logic.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Workflow actions the planner can select, in their forced order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ValidateInvoice,
    RunKyc,
    RunAml,
    ProposePlan,
    ExecuteImmediate,
    ScheduleRemainder,
}

impl Action {
    /// Stable name used in audit thought lines.
    pub fn name(self) -> &'static str {
        match self {
            Action::ValidateInvoice => "validate_invoice",
            Action::RunKyc => "run_kyc",
            Action::RunAml => "run_aml",
            Action::ProposePlan => "propose_plan",
            Action::ExecuteImmediate => "execute_immediate",
            Action::ScheduleRemainder => "schedule_remainder",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome reported by a step handler.
///
/// Domain failures are data (`ok == false`), never `Err`: no handler
/// panics or aborts the run on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolReport {
    pub ok: bool,
    pub message: String,
}

impl ToolReport {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}
