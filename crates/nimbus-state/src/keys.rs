//! Durable storage keys.
//!
//! Centralising key names keeps every reader and writer of the durable
//! store in agreement. The names match what earlier clients wrote, so an
//! existing state file keeps working.

/// Bearer token of the signed-in user (raw string).
pub const TOKEN: &str = "token";

/// Profile of the signed-in user (JSON object).
pub const USER: &str = "user";

/// Snapshot of all declared volumes (JSON array).
pub const VOLUMES: &str = "volumes";

/// Dark mode preference (`"true"` / `"false"`).
pub const DARK_MODE: &str = "darkMode";

/// Keys cleared when the user signs out.
pub const SESSION_KEYS: [&str; 2] = [TOKEN, USER];
