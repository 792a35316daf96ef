//! File domain entities.

pub mod model;
pub mod preview;

pub use model::File;
pub use preview::PreviewKind;
