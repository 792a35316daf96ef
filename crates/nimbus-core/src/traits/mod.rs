//! Core traits defined in `nimbus-core` and implemented by other crates.

pub mod kv;

pub use kv::KeyValueStore;
