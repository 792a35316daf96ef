//! # nimbus-core
//!
//! Core crate for Nimbus Drive. Contains configuration schemas, typed
//! identifiers, pagination/sorting types, the durable key-value trait,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other Nimbus crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
