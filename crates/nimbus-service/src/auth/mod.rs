//! Sign-in, registration and session restore.

pub mod service;

pub use service::AuthService;
