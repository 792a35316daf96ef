//! Breadcrumb engine.
//!
//! The path is the chain of folders the user walked through, root first,
//! current folder last. It records visited order rather than true
//! ancestry: a folder opened straight from search or the starred list is
//! appended after whatever was current.

use std::fmt;

use nimbus_core::types::FolderId;
use nimbus_entity::Folder;

/// Current folder plus the breadcrumb path leading to it.
///
/// The path is empty exactly when the current folder is the drive root,
/// holds no duplicate ids, and ends with the current folder otherwise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationState {
    path: Vec<Folder>,
}

impl NavigationState {
    /// The drive root.
    pub fn root() -> Self {
        Self::default()
    }

    /// The folder being shown; `None` at the drive root.
    pub fn current(&self) -> Option<&Folder> {
        self.path.last()
    }

    /// Id of the folder being shown.
    pub fn current_id(&self) -> Option<&FolderId> {
        self.current().map(|f| &f.id)
    }

    /// The breadcrumb path, root first.
    pub fn path(&self) -> &[Folder] {
        &self.path
    }

    /// Whether the drive root is shown.
    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Whether a folder is somewhere on the path.
    pub fn contains(&self, id: &FolderId) -> bool {
        self.path.iter().any(|f| &f.id == id)
    }

    /// The entry before the current folder; `None` means the root.
    pub fn parent(&self) -> Option<&Folder> {
        match self.path.len() {
            0 | 1 => None,
            n => self.path.get(n - 2),
        }
    }

    /// Refresh the copy of a renamed or re-starred folder on the path.
    ///
    /// Returns whether the folder was on the path.
    pub fn rename(&mut self, folder: &Folder) -> bool {
        match self.path.iter_mut().find(|f| f.id == folder.id) {
            Some(entry) => {
                *entry = folder.clone();
                true
            }
            None => false,
        }
    }
}

/// Compute the state after moving to `target` (`None` = drive root).
///
/// A target already on the path truncates the path just after it (a jump
/// back); any other target is appended (moving forward). The target copy
/// passed in replaces the stored one so fresh flags win.
pub fn navigate(target: Option<&Folder>, current_path: &[Folder]) -> NavigationState {
    let Some(target) = target else {
        return NavigationState::root();
    };

    let mut path = match current_path.iter().position(|f| f.id == target.id) {
        Some(index) => current_path[..index].to_vec(),
        None => current_path.to_vec(),
    };
    path.push(target.clone());
    NavigationState { path }
}

/// One piece of the rendered breadcrumb.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// The drive root.
    Home,
    /// A folder on the path.
    Folder {
        /// Folder to navigate to when clicked.
        id: FolderId,
        /// Display name.
        name: String,
        /// Whether this is the folder being shown.
        current: bool,
    },
    /// Collapsed middle of a long path.
    Ellipsis,
}

/// Display form of a navigation state.
#[derive(Debug, Clone, PartialEq)]
pub struct Breadcrumb {
    segments: Vec<Segment>,
}

impl Breadcrumb {
    /// Build the breadcrumb. Paths longer than `collapse_after` show only the
    /// first and last folder around an ellipsis unless `expanded` is set.
    pub fn from_state(state: &NavigationState, collapse_after: usize, expanded: bool) -> Self {
        let path = state.path();
        let last = path.len().saturating_sub(1);
        let folder_segment = |index: usize, folder: &Folder| Segment::Folder {
            id: folder.id.clone(),
            name: folder.name.clone(),
            current: index == last,
        };

        let mut segments = vec![Segment::Home];
        if !expanded && path.len() > collapse_after.max(2) {
            segments.push(folder_segment(0, &path[0]));
            segments.push(Segment::Ellipsis);
            segments.push(folder_segment(last, &path[last]));
        } else {
            segments.extend(path.iter().enumerate().map(|(i, f)| folder_segment(i, f)));
        }
        Self { segments }
    }

    /// Segments in display order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether part of the path is hidden.
    pub fn is_collapsed(&self) -> bool {
        self.segments.contains(&Segment::Ellipsis)
    }
}

impl fmt::Display for Breadcrumb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, " / ")?;
            }
            match segment {
                Segment::Home => write!(f, "Home")?,
                Segment::Folder { name, .. } => write!(f, "{name}")?,
                Segment::Ellipsis => write!(f, "…")?,
            }
        }
        Ok(())
    }
}
