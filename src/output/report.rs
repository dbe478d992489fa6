//! Result of one command run, shared by every output format.

use serde::Serialize;

/// One satisfied request.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// What was asked for, e.g. `/24` or `ip`.
    pub request: String,
    /// The CIDR or bare address handed out.
    pub result: String,
}

/// Everything a command produced.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub allocations: Vec<Allocation>,
    /// Occupied blocks after the run, in insertion order.
    pub occupied: Vec<String>,
}

impl Report {
    pub fn push(&mut self, request: impl Into<String>, result: impl Into<String>) {
        self.allocations.push(Allocation {
            request: request.into(),
            result: result.into(),
        });
    }
}
