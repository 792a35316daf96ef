//! Moving through the folder tree.
//!
//! Opening a folder runs through the lock gate, moves the breadcrumb,
//! then fetches the folder's children. The listing is applied only if no
//! later navigation or refresh overtook it.

use futures::future::try_join;
use tracing::{debug, info, warn};

use nimbus_core::error::AppError;
use nimbus_core::types::FolderId;
use nimbus_entity::Folder;
use nimbus_state::{GateDecision, ListingCheckpoint, ListingFailure, ListingOutcome, ListingTicket};

use crate::context::ServiceContext;

/// Result of a navigation request.
#[derive(Debug, Clone, PartialEq)]
pub enum OpenOutcome {
    /// The folder is current and its children are in the store.
    Opened,
    /// The folder is locked; supply its passphrase or cancel.
    PassphraseRequired(Folder),
    /// A later navigation overtook this one; its listing was dropped.
    Stale,
}

/// Drives the breadcrumb engine, lock gate and listing tracker.
#[derive(Debug, Clone)]
pub struct NavigationService {
    ctx: ServiceContext,
}

impl NavigationService {
    /// Creates a new navigation service.
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Open `target` (`None` = drive root).
    pub async fn open(&self, target: Option<Folder>) -> Result<OpenOutcome, AppError> {
        {
            let mut guard = self.ctx.state.write().await;
            let state = &mut *guard;
            match &target {
                None => state.gate.cancel(),
                Some(folder) => {
                    if let GateDecision::PassphraseRequired(folder) =
                        state.gate.request(folder, state.navigation.path())
                    {
                        info!(folder_id = %folder.id, "Folder is locked, passphrase required");
                        return Ok(OpenOutcome::PassphraseRequired(folder));
                    }
                }
            }
        }
        self.enter(target).await
    }

    /// Open a folder known only by id (search results, starred lists).
    pub async fn open_by_id(&self, id: &FolderId) -> Result<OpenOutcome, AppError> {
        let folder = self.ctx.gateway.get_folder(id).await?;
        self.open(Some(folder)).await
    }

    /// Jump to a folder on the current breadcrumb path.
    pub async fn jump_to(&self, id: &FolderId) -> Result<OpenOutcome, AppError> {
        let target = {
            let state = self.ctx.state.read().await;
            state
                .navigation
                .path()
                .iter()
                .find(|f| &f.id == id)
                .cloned()
                .ok_or_else(|| AppError::not_found("Folder is not on the current path"))?
        };
        self.open(Some(target)).await
    }

    /// Go back to the drive root.
    pub async fn go_home(&self) -> Result<OpenOutcome, AppError> {
        self.open(None).await
    }

    /// Go to the previous breadcrumb entry.
    pub async fn go_up(&self) -> Result<OpenOutcome, AppError> {
        let parent = self.ctx.state.read().await.navigation.parent().cloned();
        self.open(parent).await
    }

    /// Verify the pending folder's passphrase and open it on success.
    ///
    /// A wrong passphrase is an `Authentication` error and leaves the
    /// prompt open. The passphrase is dropped after the call.
    pub async fn submit_passphrase(&self, passphrase: &str) -> Result<OpenOutcome, AppError> {
        if passphrase.is_empty() {
            return Err(AppError::validation("Please enter the folder password"));
        }
        let pending = self
            .ctx
            .state
            .read()
            .await
            .gate
            .pending()
            .cloned()
            .ok_or_else(|| AppError::validation("No folder is waiting for a password"))?;

        let verified = self
            .ctx
            .gateway
            .verify_folder_password(&pending.id, passphrase)
            .await?;
        if !verified {
            warn!(folder_id = %pending.id, "Folder password rejected");
            return Err(AppError::authentication("Incorrect password"));
        }

        let unlocked = {
            let mut state = self.ctx.state.write().await;
            let still_pending = state.gate.pending().is_some_and(|f| f.id == pending.id);
            if still_pending {
                state.gate.verification_succeeded()
            } else {
                None
            }
        };
        match unlocked {
            Some(folder) => {
                info!(folder_id = %folder.id, "Folder unlocked for this visit");
                self.enter(Some(folder)).await
            }
            None => Ok(OpenOutcome::Stale),
        }
    }

    /// Dismiss the passphrase prompt and stay where we are.
    pub async fn cancel(&self) {
        self.ctx.state.write().await.gate.cancel();
    }

    /// Re-fetch the current folder's children.
    pub async fn refresh(&self) -> Result<OpenOutcome, AppError> {
        let ticket = self.ctx.state.write().await.begin_listing();
        self.load(ticket, None).await
    }

    /// Move the breadcrumb, then load the new folder's children.
    async fn enter(&self, target: Option<Folder>) -> Result<OpenOutcome, AppError> {
        let (ticket, checkpoint) = self.ctx.state.write().await.enter(target.as_ref());
        debug!(folder_id = ?ticket.folder(), seq = ticket.seq(), "Listing folder");
        self.load(ticket, Some(checkpoint)).await
    }

    /// Fetch a listing and apply it if the ticket is still current.
    ///
    /// On failure the breadcrumb goes back to the checkpoint, unless a
    /// later request has taken over in the meantime. If the folder we go
    /// back to has no listing left to wait for, it is fetched again.
    async fn load(
        &self,
        ticket: ListingTicket,
        checkpoint: Option<ListingCheckpoint>,
    ) -> Result<OpenOutcome, AppError> {
        let error = match self.fetch(&ticket).await {
            Ok(outcome) => return Ok(outcome),
            Err(e) => e,
        };
        let failure = self.ctx.state.write().await.fail_listing(&ticket, checkpoint);
        if let ListingFailure::Reload(reload) = failure {
            warn!(folder_id = ?reload.folder(), "Reloading folder after failed navigation");
            if let Err(e) = self.fetch(&reload).await {
                let mut state = self.ctx.state.write().await;
                if state.fail_listing(&reload, None) == ListingFailure::Kept {
                    state.clear_listing();
                }
                debug!(error = %e, "Reload failed");
            }
        }
        Err(error)
    }

    /// Run the two listing calls for `ticket` and apply their result.
    async fn fetch(&self, ticket: &ListingTicket) -> Result<OpenOutcome, AppError> {
        let folder_id = ticket.folder().cloned();
        let (folders, files) = try_join(
            self.ctx.gateway.list_folders(folder_id.as_ref()),
            self.ctx.gateway.list_files(folder_id.as_ref()),
        )
        .await?;

        let outcome = self.ctx.state.write().await.apply_listing(ticket, folders, files);
        Ok(match outcome {
            ListingOutcome::Applied => OpenOutcome::Opened,
            ListingOutcome::Stale => OpenOutcome::Stale,
        })
    }
}
