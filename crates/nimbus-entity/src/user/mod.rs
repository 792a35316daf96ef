//! User and authentication value objects.

pub mod credentials;
pub mod model;

pub use credentials::{LoginRequest, RegisterRequest};
pub use model::{AuthResponse, AuthSession, UserProfile};
