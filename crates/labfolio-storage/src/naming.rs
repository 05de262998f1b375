//! Folder naming
//!
//! Deterministic folder names for programs, studies and assays, plus study and
//! assay code generation. The base names do no escaping; a backend that needs
//! stricter names injects its own sanitizer.

use labfolio_core::{Assay, NamingOptions, Program, Study};

/// Backend-specific post-processing applied to every folder name.
pub type Sanitizer = fn(&str) -> String;

fn identity(name: &str) -> String {
    name.to_string()
}

/// Strip everything outside alphanumerics, space, `-`, `_`, `(` and `)`, then
/// collapse whitespace.
///
/// Disallowed characters become separators, so `"A/B"` turns into `"A B"`
/// rather than `"AB"`.
pub fn sanitize_remote_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '(' | ')') {
                c
            } else {
                ' '
            }
        })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone)]
pub struct NamingService {
    options: NamingOptions,
    sanitizer: Sanitizer,
}

impl Default for NamingService {
    fn default() -> Self {
        Self::new(NamingOptions::default())
    }
}

impl NamingService {
    /// Naming service that uses the base names verbatim.
    pub fn new(options: NamingOptions) -> Self {
        Self {
            options,
            sanitizer: identity,
        }
    }

    pub fn with_sanitizer(options: NamingOptions, sanitizer: Sanitizer) -> Self {
        Self { options, sanitizer }
    }

    pub fn options(&self) -> &NamingOptions {
        &self.options
    }

    pub fn program_folder_name(&self, program: &Program) -> String {
        (self.sanitizer)(&program.name)
    }

    pub fn study_folder_name(&self, study: &Study) -> String {
        (self.sanitizer)(&format!("{} ({})", study.name, study.code))
    }

    pub fn assay_folder_name(&self, assay: &Assay) -> String {
        (self.sanitizer)(&format!("{} ({})", assay.name, assay.code))
    }

    /// Code for a new study in `program`, given how many codes the program already issued.
    pub fn study_code(&self, program: &Program, existing: u64) -> String {
        format!(
            "{}-{:0width$}",
            program.code,
            self.options.study_code_counter_start + existing,
            width = self.options.study_code_min_digits
        )
    }

    /// Code for a new external study, given how many external codes were already issued.
    pub fn external_study_code(&self, existing: u64) -> String {
        format!(
            "{}-{:0width$}",
            self.options.external_study_code_prefix,
            self.options.external_study_code_counter_start + existing,
            width = self.options.external_study_code_min_digits
        )
    }

    /// Code for a new assay in `study`, given how many assays the study already has.
    pub fn assay_code(&self, study: &Study, existing: u64) -> String {
        format!(
            "{}-{:0width$}",
            study.code,
            self.options.assay_code_counter_start + existing,
            width = self.options.assay_code_min_digits
        )
    }
}
