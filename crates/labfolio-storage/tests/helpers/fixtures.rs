use labfolio_core::{Assay, Program, Study};

pub fn program() -> Program {
    Program::new("Clinical Program A", "CPA")
}

pub fn study() -> Study {
    Study::new("Study X", "CPA-12345", program())
}

pub fn external_study() -> Study {
    Study::new("Partner Tox Study", "EX-00001", program()).external()
}

pub fn assay() -> Assay {
    Assay::new("Binding Assay", "CPA-12345-001", study())
}
