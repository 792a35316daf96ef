//! The client's whole in-memory state.

use std::sync::Arc;

use tracing::{debug, info, warn};

use nimbus_core::result::AppResult;
use nimbus_core::traits::KeyValueStore;
use nimbus_entity::{AuthSession, File, Folder, UserProfile};

use crate::collection::Collection;
use crate::keys;
use crate::listing::{ListingOutcome, ListingTicket, ListingTracker};
use crate::navigation::{LockGate, NavigationState, navigate};
use crate::sort::{sort_files, sort_folders};
use crate::ui::UiState;
use crate::volumes::VolumeStore;

/// What the store looked like before a navigation moved it.
#[derive(Debug, Clone)]
pub struct ListingCheckpoint {
    navigation: NavigationState,
    seq: u64,
    loading: bool,
}

/// How a failed listing request was settled.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingFailure {
    /// A later request owns the screen; nothing changed.
    Superseded,
    /// The store still shows the current folder.
    Kept,
    /// The navigation was rolled back and the listing it displaced is
    /// still on its way.
    Resumed,
    /// The navigation was rolled back but the restored folder has no
    /// listing in the store or in flight. Fetch it with this ticket.
    Reload(ListingTicket),
}

/// Navigation, item collections, volumes, UI flags and the session.
///
/// Built once by [`DriveState::hydrate`] and dropped on shutdown. Services
/// share it behind an async lock and mutate it only after a gateway call
/// has resolved.
#[derive(Debug)]
pub struct DriveState {
    pub navigation: NavigationState,
    pub gate: LockGate,
    pub listings: ListingTracker,
    pub folders: Collection<Folder>,
    pub files: Collection<File>,
    pub volumes: VolumeStore,
    pub ui: UiState,
    session: Option<AuthSession>,
    kv: Arc<dyn KeyValueStore>,
}

impl DriveState {
    /// Restore the session, volumes and preferences from durable storage.
    pub fn hydrate(kv: Arc<dyn KeyValueStore>) -> AppResult<Self> {
        let session = match (kv.get(keys::TOKEN)?, kv.get_json::<UserProfile>(keys::USER)) {
            (Some(token), Ok(Some(user))) => Some(AuthSession { token, user }),
            (Some(_), Err(e)) => {
                warn!(error = %e, "Stored user profile is unreadable, signing out");
                None
            }
            _ => None,
        };
        let volumes = VolumeStore::hydrate(kv.clone())?;
        let ui = UiState::hydrate(kv.as_ref())?;

        info!(
            signed_in = session.is_some(),
            volumes = volumes.len(),
            "Client state hydrated"
        );
        Ok(Self {
            navigation: NavigationState::root(),
            gate: LockGate::new(),
            listings: ListingTracker::new(),
            folders: Collection::new(),
            files: Collection::new(),
            volumes,
            ui,
            session,
            kv,
        })
    }

    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// Store a new session durably, then adopt it.
    pub fn set_session(&mut self, session: AuthSession) -> AppResult<()> {
        self.kv.set(keys::TOKEN, &session.token)?;
        self.kv.set_json(keys::USER, &session.user)?;
        self.session = Some(session);
        Ok(())
    }

    /// Replace the stored profile (e.g. after `GET /auth/me`).
    pub fn update_user(&mut self, user: UserProfile) -> AppResult<()> {
        if let Some(session) = self.session.as_mut() {
            self.kv.set_json(keys::USER, &user)?;
            session.user = user;
        }
        Ok(())
    }

    /// Forget the session and everything fetched under it.
    ///
    /// Volumes and preferences stay. The in-memory reset happens even when
    /// clearing the durable keys fails; that error is returned afterwards.
    pub fn reset_on_logout(&mut self) -> AppResult<()> {
        let cleared = keys::SESSION_KEYS
            .iter()
            .try_for_each(|key| self.kv.remove(key));

        self.session = None;
        self.navigation = NavigationState::root();
        self.gate.cancel();
        self.listings.invalidate();
        self.folders.clear();
        self.files.clear();
        self.ui.reset_session();
        debug!("Session state cleared");
        cleared
    }

    /// Change and persist the dark mode preference.
    pub fn set_dark_mode(&mut self, enabled: bool) -> AppResult<()> {
        self.ui.set_dark_mode(self.kv.as_ref(), enabled)
    }

    /// Move the navigation state to `target` (`None` = root).
    pub fn move_to(&mut self, target: Option<&Folder>) {
        self.navigation = navigate(target, self.navigation.path());
        self.gate.follow(self.navigation.path());
        self.ui.clear_selection();
        self.ui.preview = None;
    }

    /// Move to `target` and take a ticket for its listing.
    ///
    /// The checkpoint lets [`DriveState::fail_listing`] roll the move back.
    pub fn enter(&mut self, target: Option<&Folder>) -> (ListingTicket, ListingCheckpoint) {
        let checkpoint = ListingCheckpoint {
            navigation: self.navigation.clone(),
            seq: self.listings.latest(),
            loading: self.ui.loading,
        };
        self.move_to(target);
        (self.begin_listing(), checkpoint)
    }

    /// Take a ticket for listing the current folder.
    pub fn begin_listing(&mut self) -> ListingTicket {
        self.ui.loading = true;
        self.listings
            .issue(self.navigation.current_id().cloned())
    }

    /// Apply a listing response if its ticket is still current.
    pub fn apply_listing(
        &mut self,
        ticket: &ListingTicket,
        folders: Vec<Folder>,
        files: Vec<File>,
    ) -> ListingOutcome {
        self.listings.finish(ticket);
        if !self.listings.accepts(ticket, self.navigation.current_id()) {
            debug!(seq = ticket.seq(), "Dropping stale listing");
            return ListingOutcome::Stale;
        }
        self.folders.set_all(folders);
        self.files.set_all(files);
        self.ui.loading = false;
        ListingOutcome::Applied
    }

    /// A listing request failed.
    ///
    /// Only the latest request may change anything. With a checkpoint the
    /// navigation goes back to where it was, so the store never shows one
    /// folder's children under another folder's breadcrumb.
    pub fn fail_listing(
        &mut self,
        ticket: &ListingTicket,
        checkpoint: Option<ListingCheckpoint>,
    ) -> ListingFailure {
        self.listings.finish(ticket);
        if !self.listings.accepts(ticket, self.navigation.current_id()) {
            return ListingFailure::Superseded;
        }
        self.ui.loading = false;
        let Some(checkpoint) = checkpoint else {
            return ListingFailure::Kept;
        };

        self.navigation = checkpoint.navigation;
        if !checkpoint.loading {
            self.listings.invalidate();
            return ListingFailure::Kept;
        }
        if self.listings.resume(checkpoint.seq) {
            self.ui.loading = true;
            return ListingFailure::Resumed;
        }
        ListingFailure::Reload(self.begin_listing())
    }

    /// Drop the listed children, e.g. when the current folder's listing
    /// could not be fetched at all.
    pub fn clear_listing(&mut self) {
        self.folders.clear();
        self.files.clear();
    }

    /// Folders in the order chosen by the sort key.
    pub fn sorted_folders(&self) -> Vec<Folder> {
        let mut folders = self.folders.to_vec();
        sort_folders(&mut folders, self.ui.sort_key);
        folders
    }

    /// Files in the order chosen by the sort key.
    pub fn sorted_files(&self) -> Vec<File> {
        let mut files = self.files.to_vec();
        sort_files(&mut files, self.ui.sort_key);
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nimbus_core::types::{FolderId, UserId};

    use crate::persist::MemoryKeyValueStore;

    fn folder(id: &str) -> Folder {
        Folder {
            id: FolderId::new(id),
            name: id.to_string(),
            parent_id: None,
            path: None,
            starred: false,
            locked: false,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn session() -> AuthSession {
        AuthSession {
            token: "t0k".into(),
            user: UserProfile {
                id: UserId::new("u1"),
                email: "ada@example.com".into(),
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                storage_used: None,
                storage_quota: None,
            },
        }
    }

    #[test]
    fn test_session_persists_across_hydrate() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let mut state = DriveState::hydrate(kv.clone()).expect("hydrate");
        assert!(!state.is_signed_in());
        state.set_session(session()).expect("session");

        let restored = DriveState::hydrate(kv).expect("hydrate");
        assert_eq!(restored.session(), Some(&session()));
    }

    #[test]
    fn test_logout_clears_session_keeps_preferences() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let mut state = DriveState::hydrate(kv.clone()).expect("hydrate");
        state.set_session(session()).expect("session");
        state.set_dark_mode(true).expect("dark");
        state.move_to(Some(&folder("a")));
        state.folders.set_all([folder("b")]);

        state.reset_on_logout().expect("logout");
        assert!(state.session().is_none());
        assert!(state.navigation.is_root());
        assert!(state.folders.is_empty());
        assert!(state.ui.dark_mode());
        assert_eq!(kv.get(keys::TOKEN).expect("get"), None);
    }

    #[test]
    fn test_listing_for_previous_folder_is_stale() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let mut state = DriveState::hydrate(kv).expect("hydrate");

        state.move_to(Some(&folder("x")));
        let x_ticket = state.begin_listing();
        state.move_to(Some(&folder("y")));
        let y_ticket = state.begin_listing();

        let outcome = state.apply_listing(&y_ticket, vec![folder("y-child")], vec![]);
        assert_eq!(outcome, ListingOutcome::Applied);
        let outcome = state.apply_listing(&x_ticket, vec![folder("x-child")], vec![]);
        assert_eq!(outcome, ListingOutcome::Stale);
        assert_eq!(state.folders.to_vec()[0].id.as_str(), "y-child");
        assert!(!state.ui.loading);
    }

    #[test]
    fn test_failed_navigation_resumes_displaced_listing() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let mut state = DriveState::hydrate(kv).expect("hydrate");
        state.folders.set_all([folder("root-child")]);

        let (x_ticket, _) = state.enter(Some(&folder("x")));
        let (y_ticket, checkpoint) = state.enter(Some(&folder("y")));

        let failure = state.fail_listing(&y_ticket, Some(checkpoint));
        assert_eq!(failure, ListingFailure::Resumed);
        assert_eq!(state.navigation.current_id().map(|id| id.as_str()), Some("x"));
        assert!(state.ui.loading);

        let outcome = state.apply_listing(&x_ticket, vec![folder("x-child")], vec![]);
        assert_eq!(outcome, ListingOutcome::Applied);
        assert_eq!(state.folders.to_vec()[0].id.as_str(), "x-child");
        assert!(!state.ui.loading);
    }

    #[test]
    fn test_failed_navigation_reloads_when_displaced_listing_is_gone() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let mut state = DriveState::hydrate(kv).expect("hydrate");

        let (x_ticket, _) = state.enter(Some(&folder("x")));
        let (y_ticket, checkpoint) = state.enter(Some(&folder("y")));
        assert_eq!(
            state.fail_listing(&x_ticket, None),
            ListingFailure::Superseded
        );

        match state.fail_listing(&y_ticket, Some(checkpoint)) {
            ListingFailure::Reload(ticket) => {
                assert_eq!(ticket.folder().map(|id| id.as_str()), Some("x"));
                assert!(state.ui.loading);
            }
            other => panic!("expected a reload, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_navigation_after_settled_listing_keeps_store() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let mut state = DriveState::hydrate(kv).expect("hydrate");

        let (x_ticket, _) = state.enter(Some(&folder("x")));
        state.apply_listing(&x_ticket, vec![folder("x-child")], vec![]);
        let (y_ticket, checkpoint) = state.enter(Some(&folder("y")));

        assert_eq!(
            state.fail_listing(&y_ticket, Some(checkpoint)),
            ListingFailure::Kept
        );
        assert_eq!(state.navigation.current_id().map(|id| id.as_str()), Some("x"));
        assert_eq!(state.folders.to_vec()[0].id.as_str(), "x-child");
        assert!(!state.ui.loading);
    }
}
