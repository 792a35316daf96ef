//! Storage usage queries.

use tracing::warn;

use nimbus_core::error::{AppError, ErrorKind};
use nimbus_entity::{StorageBreakdown, StorageUsage};

use crate::context::ServiceContext;

/// Reports how much of the account quota is in use.
#[derive(Debug, Clone)]
pub struct StorageService {
    ctx: ServiceContext,
}

impl StorageService {
    /// Creates a new storage service.
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Usage as reported by the server.
    pub async fn usage(&self) -> Result<StorageUsage, AppError> {
        self.ctx.gateway.storage_usage().await
    }

    /// Per-category totals for the files in the current listing.
    pub async fn breakdown(&self) -> StorageBreakdown {
        StorageBreakdown::from_files(self.ctx.state.read().await.files.iter())
    }

    /// Bytes still free.
    ///
    /// Falls back to the configured default quota minus the files in view
    /// when the server cannot be reached.
    pub async fn available_bytes(&self) -> Result<u64, AppError> {
        match self.usage().await {
            Ok(usage) => Ok(usage.available()),
            Err(e) if matches!(e.kind, ErrorKind::Network | ErrorKind::Server) => {
                warn!(error = %e, "Storage usage unavailable, estimating from listed files");
                let used: u64 = self
                    .ctx
                    .state
                    .read()
                    .await
                    .files
                    .iter()
                    .map(|f| f.size)
                    .sum();
                Ok(StorageUsage::new(self.ctx.limits.default_quota_bytes, used).available())
            }
            Err(e) => Err(e),
        }
    }
}
