//! # filecards-core
//!
//! Core crate for FileCards. Contains configuration schemas, typed
//! identifiers, sort/filter query types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other FileCards crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
