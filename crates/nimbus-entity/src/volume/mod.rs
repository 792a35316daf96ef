//! Client-local volume entities.

pub mod model;

pub use model::{NewVolume, Volume, VolumeColor};
