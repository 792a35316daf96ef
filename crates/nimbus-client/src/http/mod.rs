//! reqwest-backed gateway for the drive REST API.

pub mod client;
pub mod envelope;

pub use client::HttpGateway;
pub use envelope::ApiEnvelope;
