//! Naming options
//!
//! Counters and padding used when generating study and assay codes. Supplied
//! once at startup and never mutated afterwards.

use serde::{Deserialize, Serialize};

const STUDY_CODE_COUNTER_START: u64 = 10001;
const STUDY_CODE_MIN_DIGITS: usize = 5;
const ASSAY_CODE_COUNTER_START: u64 = 1;
const ASSAY_CODE_MIN_DIGITS: usize = 3;
const EXTERNAL_STUDY_CODE_PREFIX: &str = "EX";
const EXTERNAL_STUDY_CODE_COUNTER_START: u64 = 1;
const EXTERNAL_STUDY_CODE_MIN_DIGITS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingOptions {
    pub study_code_counter_start: u64,
    pub study_code_min_digits: usize,
    pub assay_code_counter_start: u64,
    pub assay_code_min_digits: usize,
    pub external_study_code_prefix: String,
    pub external_study_code_counter_start: u64,
    pub external_study_code_min_digits: usize,
}

impl Default for NamingOptions {
    fn default() -> Self {
        Self {
            study_code_counter_start: STUDY_CODE_COUNTER_START,
            study_code_min_digits: STUDY_CODE_MIN_DIGITS,
            assay_code_counter_start: ASSAY_CODE_COUNTER_START,
            assay_code_min_digits: ASSAY_CODE_MIN_DIGITS,
            external_study_code_prefix: EXTERNAL_STUDY_CODE_PREFIX.to_string(),
            external_study_code_counter_start: EXTERNAL_STUDY_CODE_COUNTER_START,
            external_study_code_min_digits: EXTERNAL_STUDY_CODE_MIN_DIGITS,
        }
    }
}

impl NamingOptions {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.study_code_min_digits == 0 || self.assay_code_min_digits == 0 {
            return Err(anyhow::anyhow!(
                "Study and assay code digit counts must be at least 1"
            ));
        }
        if self.external_study_code_prefix.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "EXTERNAL_STUDY_CODE_PREFIX must not be empty"
            ));
        }
        Ok(())
    }
}
