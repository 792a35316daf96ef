//! # nimbus-client
//!
//! The remote data gateway. [`DriveGateway`] is the contract the rest of
//! the client consumes; [`HttpGateway`] speaks to the drive REST API with
//! reqwest and [`MemoryGateway`] is an in-process backend with the same
//! observable behaviour, used for offline runs and tests.
//!
//! Gateways hold no item state. The only thing they remember is the
//! bearer token attached to authenticated requests.

pub mod gateway;
pub mod http;
pub mod memory;

pub use gateway::{DriveGateway, FileUpload};
pub use http::HttpGateway;
pub use memory::MemoryGateway;
