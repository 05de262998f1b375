//! Entity identity models
//!
//! The storage core only reads these: names and codes drive folder naming,
//! parent references drive folder resolution. Persistence lives elsewhere.

mod assay;
mod entity;
mod program;
mod study;

// Re-export all models for convenient imports
pub use assay::*;
pub use entity::*;
pub use program::*;
pub use study::*;
