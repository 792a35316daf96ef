//! Search, starred and recent file lists.

use tracing::debug;

use nimbus_core::error::AppError;
use nimbus_core::types::{Page, PageRequest};
use nimbus_entity::File;

use crate::context::ServiceContext;

/// Cross-folder file queries.
#[derive(Debug, Clone)]
pub struct SearchService {
    ctx: ServiceContext,
}

impl SearchService {
    /// Creates a new search service.
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Search file names. A blank query yields an empty page without a request.
    pub async fn search(&self, query: &str, page: u32) -> Result<Page<File>, AppError> {
        let query = query.trim();
        self.ctx.state.write().await.ui.search_query = query.to_string();
        let request = PageRequest::new(page, self.ctx.limits.search_page_size);
        if query.is_empty() {
            return Ok(Page::slice(Vec::new(), request));
        }
        let results = self.ctx.gateway.search_files(query, request).await?;
        debug!(query, total = results.total_elements, "Search finished");
        Ok(results)
    }

    /// Starred files across the drive.
    pub async fn starred(&self) -> Result<Vec<File>, AppError> {
        self.ctx.gateway.starred_files().await
    }

    /// Recently touched files.
    pub async fn recent(&self) -> Result<Vec<File>, AppError> {
        self.ctx.gateway.recent_files().await
    }
}
