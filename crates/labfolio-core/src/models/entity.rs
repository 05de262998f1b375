use std::fmt::{Display, Formatter, Result as FmtResult};

use super::{Assay, Program, Study};

/// Borrowed handle to the entity that owns a storage folder.
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Program(&'a Program),
    Study(&'a Study),
    Assay(&'a Assay),
}

impl EntityRef<'_> {
    /// Entity kind, for logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            EntityRef::Program(_) => "program",
            EntityRef::Study(_) => "study",
            EntityRef::Assay(_) => "assay",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            EntityRef::Program(p) => &p.name,
            EntityRef::Study(s) => &s.name,
            EntityRef::Assay(a) => &a.name,
        }
    }
}

impl Display for EntityRef<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} '{}'", self.kind(), self.name())
    }
}

impl<'a> From<&'a Program> for EntityRef<'a> {
    fn from(program: &'a Program) -> Self {
        EntityRef::Program(program)
    }
}

impl<'a> From<&'a Study> for EntityRef<'a> {
    fn from(study: &'a Study) -> Self {
        EntityRef::Study(study)
    }
}

impl<'a> From<&'a Assay> for EntityRef<'a> {
    fn from(assay: &'a Assay) -> Self {
        EntityRef::Assay(assay)
    }
}
