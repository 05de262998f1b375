//! Shared pieces of the `labfolio` command line.

use anyhow::Context;
use clap::{Args, ValueEnum};
use labfolio_core::{Assay, EntityRef, Program, Study};

/// Which entity a command applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntityKind {
    Program,
    Study,
    Assay,
}

/// Identity of the program/study/assay a command targets.
///
/// Only the flags needed for the requested level are required: a study needs
/// the program flags, an assay needs program and study flags.
#[derive(Debug, Clone, Default, Args)]
pub struct EntityArgs {
    /// Program name
    #[arg(long, global = true)]
    pub program: Option<String>,
    /// Program code (e.g. "CPA")
    #[arg(long, global = true)]
    pub program_code: Option<String>,
    /// Study name
    #[arg(long, global = true)]
    pub study: Option<String>,
    /// Study code (e.g. "CPA-10001")
    #[arg(long, global = true)]
    pub study_code: Option<String>,
    /// Mark the study as external
    #[arg(long, global = true)]
    pub external: bool,
    /// Assay name
    #[arg(long, global = true)]
    pub assay: Option<String>,
    /// Assay code (e.g. "CPA-10001-001")
    #[arg(long, global = true)]
    pub assay_code: Option<String>,
}

/// A resolved entity of any level
#[derive(Debug, Clone)]
pub enum Entity {
    Program(Program),
    Study(Study),
    Assay(Assay),
}

impl Entity {
    pub fn entity_ref(&self) -> EntityRef<'_> {
        match self {
            Entity::Program(program) => EntityRef::Program(program),
            Entity::Study(study) => EntityRef::Study(study),
            Entity::Assay(assay) => EntityRef::Assay(assay),
        }
    }
}

impl EntityArgs {
    pub fn program(&self) -> anyhow::Result<Program> {
        let name = self.program.as_deref().context("--program is required")?;
        let code = self.program_code.as_deref().unwrap_or_default();
        Ok(Program::new(name, code))
    }

    pub fn study(&self) -> anyhow::Result<Study> {
        let program = self.program()?;
        let name = self.study.as_deref().context("--study is required")?;
        let code = self.study_code.as_deref().context("--study-code is required")?;
        let study = Study::new(name, code, program);
        Ok(if self.external { study.external() } else { study })
    }

    pub fn assay(&self) -> anyhow::Result<Assay> {
        let study = self.study()?;
        let name = self.assay.as_deref().context("--assay is required")?;
        let code = self.assay_code.as_deref().context("--assay-code is required")?;
        Ok(Assay::new(name, code, study))
    }

    pub fn entity(&self, kind: EntityKind) -> anyhow::Result<Entity> {
        Ok(match kind {
            EntityKind::Program => Entity::Program(self.program()?),
            EntityKind::Study => Entity::Study(self.study()?),
            EntityKind::Assay => Entity::Assay(self.assay()?),
        })
    }
}

/// Initialize tracing for the CLI binary.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
