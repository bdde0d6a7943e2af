//! Query selection
//!
//! Turns repository names, host lists and IP ranges into the filter triples
//! the scanning platform accepts.

pub mod criteria;
pub mod resolver;

pub use criteria::{Criteria, Criterion, Selection, build_criteria};
pub use resolver::{Repository, RepositoryCatalog, Resolution, resolve};
