//! # nimbus-cli
//!
//! Terminal front end for Nimbus Drive: one-shot subcommands plus an
//! interactive shell that keeps its place in the folder tree between
//! lines. Every command runs against a wired [`Services`] bundle; the
//! binary decides which gateway backs it.
//!
//! [`Services`]: nimbus_service::Services

pub mod commands;
pub mod output;

pub use commands::{Cli, Commands};
pub use output::OutputFormat;
