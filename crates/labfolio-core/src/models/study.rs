use serde::{Deserialize, Serialize};

use super::Program;

/// Study belonging to a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Study {
    pub name: String,
    pub code: String,
    /// External (collaborator) studies draw their codes from a separate sequence.
    #[serde(default)]
    pub external: bool,
    pub program: Program,
}

impl Study {
    pub fn new(name: impl Into<String>, code: impl Into<String>, program: Program) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            external: false,
            program,
        }
    }

    /// Mark the study as external.
    pub fn external(mut self) -> Self {
        self.external = true;
        self
    }
}
