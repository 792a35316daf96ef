//! File operations, uploads, search and previews.

pub mod preview;
pub mod search;
pub mod service;
pub mod upload;

pub use preview::{Preview, PreviewService};
pub use search::SearchService;
pub use service::FileService;
pub use upload::UploadService;
