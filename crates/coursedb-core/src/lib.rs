//! coursedb-core
//!
//! Data model, error taxonomy, configuration, corpus loading and the document
//! modeler shared by the sparse, dense and hybrid crates.

pub mod config;
pub mod corpus;
pub mod documents;
pub mod error;
pub mod similarity;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
