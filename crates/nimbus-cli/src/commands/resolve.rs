//! Walking slash-separated paths through the folder tree.
//!
//! Paths are folder names joined by `/`. A leading `/` starts from the
//! drive root; `..` steps back one breadcrumb entry. Locked folders ask
//! for their passphrase on the way through.

use dialoguer::Password;

use nimbus_core::error::AppError;
use nimbus_entity::{File, Folder};
use nimbus_service::{OpenOutcome, Services};

/// Where a passphrase comes from when a locked folder is reached.
#[derive(Debug, Clone, Copy)]
pub enum Passphrase<'a> {
    /// Use this value for every locked folder on the way.
    Given(&'a str),
    /// Ask on the terminal.
    Prompt,
}

impl<'a> From<Option<&'a str>> for Passphrase<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(Self::Prompt, Self::Given)
    }
}

/// A file or folder found by name.
#[derive(Debug, Clone)]
pub enum Item {
    Folder(Folder),
    File(File),
}

impl Item {
    pub fn name(&self) -> &str {
        match self {
            Self::Folder(folder) => &folder.name,
            Self::File(file) => &file.name,
        }
    }
}

/// Split `a/b/c` into (`a/b`, `c`).
pub fn split_parent(path: &str) -> (&str, &str) {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => (&trimmed[..=idx], &trimmed[idx + 1..]),
        None => ("", trimmed),
    }
}

/// Open a folder (`None` = root), answering the lock gate if needed.
pub async fn open(
    services: &Services,
    target: Option<Folder>,
    passphrase: Passphrase<'_>,
) -> Result<(), AppError> {
    let outcome = services.navigation.open(target).await?;
    settle(services, outcome, passphrase).await
}

/// Resolve a navigation outcome to "the folder is open" or an error.
pub async fn settle(
    services: &Services,
    outcome: OpenOutcome,
    passphrase: Passphrase<'_>,
) -> Result<(), AppError> {
    match outcome {
        OpenOutcome::Opened => Ok(()),
        OpenOutcome::Stale => Err(AppError::conflict("Navigation was interrupted")),
        OpenOutcome::PassphraseRequired(folder) => {
            let secret = match passphrase {
                Passphrase::Given(value) => value.to_string(),
                Passphrase::Prompt => prompt_passphrase(&folder)?,
            };
            match services.navigation.submit_passphrase(&secret).await {
                Ok(OpenOutcome::Opened) => Ok(()),
                Ok(_) => Err(AppError::conflict("Navigation was interrupted")),
                Err(e) => {
                    services.navigation.cancel().await;
                    Err(e)
                }
            }
        }
    }
}

/// Walk `path` folder by folder.
///
/// With `from_root` the walk always starts at the drive root, even for
/// paths without a leading `/`.
pub async fn walk(
    services: &Services,
    path: &str,
    from_root: bool,
    passphrase: Passphrase<'_>,
) -> Result<(), AppError> {
    if from_root || path.starts_with('/') {
        open(services, None, passphrase).await?;
    }
    for segment in path.split('/').filter(|s| !s.is_empty() && *s != ".") {
        if segment == ".." {
            let outcome = services.navigation.go_up().await?;
            settle(services, outcome, passphrase).await?;
            continue;
        }
        let folder = find_folder(services, segment).await?;
        open(services, Some(folder), passphrase).await?;
    }
    Ok(())
}

/// Walk to the parent of `path` and look its last segment up there.
pub async fn item(
    services: &Services,
    path: &str,
    from_root: bool,
    passphrase: Passphrase<'_>,
) -> Result<Item, AppError> {
    let (parent, name) = split_parent(path);
    if name.is_empty() {
        return Err(AppError::validation("Please name a file or folder"));
    }
    walk(services, parent, from_root, passphrase).await?;
    lookup(services, name).await
}

/// Find a folder or file by exact name in the current listing.
pub async fn lookup(services: &Services, name: &str) -> Result<Item, AppError> {
    let state = services.state().read().await;
    if let Some(folder) = state.folders.iter().find(|f| f.name == name) {
        return Ok(Item::Folder(folder.clone()));
    }
    if let Some(file) = state.files.iter().find(|f| f.name == name) {
        return Ok(Item::File(file.clone()));
    }
    Err(AppError::not_found(format!("No file or folder named '{name}'")))
}

async fn find_folder(services: &Services, name: &str) -> Result<Folder, AppError> {
    services
        .state()
        .read()
        .await
        .folders
        .iter()
        .find(|f| f.name == name)
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("Folder '{name}' not found")))
}

fn prompt_passphrase(folder: &Folder) -> Result<String, AppError> {
    Password::new()
        .with_prompt(format!("Password for '{}'", folder.name))
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}
