use serde::{Deserialize, Serialize};

/// Research program: the root of the storage hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    /// Short code used as the prefix of generated study codes (e.g. "CPA").
    pub code: String,
}

impl Program {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}
