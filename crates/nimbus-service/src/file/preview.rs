//! File previews.

use bytes::Bytes;

use nimbus_core::error::AppError;
use nimbus_core::types::FileId;
use nimbus_entity::{File, PreviewKind};

use crate::context::ServiceContext;

/// A file opened for preview.
#[derive(Debug, Clone)]
pub struct Preview {
    /// The file's metadata.
    pub file: File,
    /// How it can be shown.
    pub kind: PreviewKind,
    /// Contents, fetched only for kinds shown inline.
    pub content: Option<Bytes>,
}

/// Opens and closes the preview pane.
#[derive(Debug, Clone)]
pub struct PreviewService {
    ctx: ServiceContext,
}

impl PreviewService {
    /// Creates a new preview service.
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Open a file for preview.
    pub async fn open(&self, id: &FileId) -> Result<Preview, AppError> {
        let cached = self.ctx.state.read().await.files.get(id).cloned();
        let file = match cached {
            Some(file) => file,
            None => self.ctx.gateway.get_file(id).await?,
        };
        let kind = file.preview_kind();
        let content = if kind.is_inline() {
            Some(self.ctx.gateway.download_file(id).await?)
        } else {
            None
        };
        self.ctx.state.write().await.ui.preview = Some(file.clone());
        Ok(Preview {
            file,
            kind,
            content,
        })
    }

    /// Close the preview pane.
    pub async fn close(&self) {
        self.ctx.state.write().await.ui.preview = None;
    }
}
