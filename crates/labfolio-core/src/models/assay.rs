use serde::{Deserialize, Serialize};

use super::Study;

/// Assay belonging to a study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assay {
    pub name: String,
    pub code: String,
    pub study: Study,
}

impl Assay {
    pub fn new(name: impl Into<String>, code: impl Into<String>, study: Study) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            study,
        }
    }
}
