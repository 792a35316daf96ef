//! Locked-folder gate.
//!
//! Opening a locked folder parks it here until the user supplies a
//! passphrase that the server accepts. The passphrase itself never enters
//! this type; only the outcome of the verification call does.

use nimbus_core::types::FolderId;
use nimbus_entity::Folder;

/// Where the gate stands.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GateState {
    /// No passphrase pending.
    #[default]
    Unlocked,
    /// Navigation into this folder waits for a passphrase.
    AwaitingPassphrase(Folder),
    /// The folder's passphrase was verified; navigation went ahead.
    UnlockedThisSession(FolderId),
}

/// Answer to a navigation request.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// Navigate now.
    Proceed,
    /// Ask for the passphrase of this folder first.
    PassphraseRequired(Folder),
}

/// State machine guarding navigation into locked folders.
#[derive(Debug, Clone, Default)]
pub struct LockGate {
    state: GateState,
}

impl LockGate {
    /// A gate with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// Folder waiting for a passphrase, if any.
    pub fn pending(&self) -> Option<&Folder> {
        match &self.state {
            GateState::AwaitingPassphrase(folder) => Some(folder),
            _ => None,
        }
    }

    /// Decide whether navigation to `target` may go ahead.
    ///
    /// Unlocked targets always proceed and drop any pending prompt. A
    /// locked target already on `current_path` proceeds too, since it was
    /// verified on the way in. Any other locked target parks the gate.
    pub fn request(&mut self, target: &Folder, current_path: &[Folder]) -> GateDecision {
        if !target.locked {
            if self.pending().is_some() {
                self.state = GateState::Unlocked;
            }
            return GateDecision::Proceed;
        }
        if current_path.iter().any(|f| f.id == target.id) {
            return GateDecision::Proceed;
        }
        self.state = GateState::AwaitingPassphrase(target.clone());
        GateDecision::PassphraseRequired(target.clone())
    }

    /// The server accepted the passphrase. Returns the folder to open.
    pub fn verification_succeeded(&mut self) -> Option<Folder> {
        match std::mem::take(&mut self.state) {
            GateState::AwaitingPassphrase(folder) => {
                self.state = GateState::UnlockedThisSession(folder.id.clone());
                Some(folder)
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// The server rejected the passphrase. The prompt stays open.
    pub fn verification_failed(&self) -> Option<&Folder> {
        self.pending()
    }

    /// Forget an unlock once its folder is no longer on `path`.
    pub fn follow(&mut self, path: &[Folder]) {
        if let GateState::UnlockedThisSession(id) = &self.state {
            if !path.iter().any(|f| &f.id == id) {
                self.state = GateState::Unlocked;
            }
        }
    }

    /// Abandon the pending prompt.
    pub fn cancel(&mut self) {
        self.state = GateState::Unlocked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn folder(id: &str, locked: bool) -> Folder {
        Folder {
            id: FolderId::new(id),
            name: id.to_string(),
            parent_id: None,
            path: None,
            starred: false,
            locked,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_unlocked_folder_proceeds() {
        let mut gate = LockGate::new();
        assert_eq!(gate.request(&folder("a", false), &[]), GateDecision::Proceed);
        assert_eq!(gate.state(), &GateState::Unlocked);
    }

    #[test]
    fn test_locked_folder_parks_until_verified() {
        let mut gate = LockGate::new();
        let vault = folder("vault", true);
        assert_eq!(
            gate.request(&vault, &[]),
            GateDecision::PassphraseRequired(vault.clone())
        );

        assert_eq!(gate.verification_failed(), Some(&vault));
        assert!(matches!(gate.state(), GateState::AwaitingPassphrase(_)));

        assert_eq!(gate.verification_succeeded(), Some(vault.clone()));
        assert_eq!(gate.state(), &GateState::UnlockedThisSession(vault.id.clone()));
    }

    #[test]
    fn test_cancel_returns_to_unlocked() {
        let mut gate = LockGate::new();
        gate.request(&folder("vault", true), &[]);
        gate.cancel();
        assert_eq!(gate.state(), &GateState::Unlocked);
        assert_eq!(gate.verification_succeeded(), None);
    }

    #[test]
    fn test_locked_folder_on_path_skips_prompt() {
        let mut gate = LockGate::new();
        let vault = folder("vault", true);
        let path = vec![vault.clone(), folder("inner", false)];
        assert_eq!(gate.request(&vault, &path), GateDecision::Proceed);
    }

    #[test]
    fn test_forward_reentry_asks_again() {
        let mut gate = LockGate::new();
        let vault = folder("vault", true);
        gate.request(&vault, &[]);
        gate.verification_succeeded();
        // Back at the root the vault is no longer on the path.
        assert!(matches!(
            gate.request(&vault, &[]),
            GateDecision::PassphraseRequired(_)
        ));
    }

    #[test]
    fn test_unlock_is_forgotten_after_leaving_folder() {
        let mut gate = LockGate::new();
        let vault = folder("vault", true);
        let inner = folder("inner", false);
        gate.request(&vault, &[]);
        gate.verification_succeeded();

        gate.follow(&[vault.clone(), inner.clone()]);
        assert_eq!(gate.state(), &GateState::UnlockedThisSession(vault.id.clone()));

        gate.follow(&[folder("elsewhere", false)]);
        assert_eq!(gate.state(), &GateState::Unlocked);
    }

    #[test]
    fn test_other_navigation_drops_pending_prompt() {
        let mut gate = LockGate::new();
        gate.request(&folder("vault", true), &[]);
        gate.request(&folder("plain", false), &[]);
        assert!(gate.pending().is_none());
    }
}
