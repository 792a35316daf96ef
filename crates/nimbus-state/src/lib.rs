//! # nimbus-state
//!
//! Everything the client remembers between gateway calls:
//!
//! - **collection**: normalized id → entity maps with display order
//! - **navigation**: the breadcrumb engine and the locked-folder gate
//! - **listing**: sequence tickets that reject stale listing responses
//! - **volumes**: client-declared volumes mirrored to durable storage
//! - **ui**: view flags and preferences
//! - **persist**: durable key-value stores (JSON file or in-memory)
//!
//! [`DriveState`] bundles them; it is created once at startup from a
//! key-value store and dropped on shutdown.

pub mod collection;
pub mod drive;
pub mod keys;
pub mod listing;
pub mod navigation;
pub mod persist;
pub mod sort;
pub mod ui;
pub mod volumes;

pub use collection::Collection;
pub use drive::{DriveState, ListingCheckpoint, ListingFailure};
pub use listing::{ListingOutcome, ListingTicket, ListingTracker};
pub use navigation::{Breadcrumb, GateDecision, GateState, LockGate, NavigationState, Segment};
pub use ui::{ItemRef, UiState, ViewMode};
pub use volumes::VolumeStore;
