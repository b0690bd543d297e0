//! The per-request payload passed to request hooks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A unit of work handed to the worker by its pipeline.
///
/// The registry passes the same request unchanged to every request hook and
/// never inspects it; hooks are free to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionRequest {
    /// Pipeline-assigned instruction identifier.
    pub instruction_id: String,
    /// Instruction kind, e.g. `"process_bundle"`.
    #[serde(default)]
    pub kind: String,
    /// Instruction body, opaque to the harness.
    #[serde(default)]
    pub payload: Value,
    /// When the worker received the instruction.
    #[serde(default = "Utc::now")]
    pub received_at: DateTime<Utc>,
}

impl InstructionRequest {
    /// Creates a request with an empty payload received now.
    pub fn new(instruction_id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            instruction_id: instruction_id.into(),
            kind: kind.into(),
            payload: Value::Null,
            received_at: Utc::now(),
        }
    }

    /// Attaches a payload.
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }
}
