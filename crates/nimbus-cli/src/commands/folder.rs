//! Folder creation and password protection commands.

use dialoguer::Password;

use nimbus_core::error::AppError;
use nimbus_entity::Folder;
use nimbus_service::Services;

use super::resolve::{self, Item, Passphrase};
use crate::output;

/// Create the last segment of `path` inside the folder before it.
pub async fn mkdir(
    path: &str,
    services: &Services,
    from_root: bool,
    passphrase: Option<&str>,
) -> Result<(), AppError> {
    let (parent, name) = resolve::split_parent(path);
    resolve::walk(services, parent, from_root, Passphrase::from(passphrase)).await?;
    let folder = services.folders.create(name).await?;
    output::print_success(&format!("Created folder {}", folder.name));
    Ok(())
}

/// Set a folder password, asking for it twice.
pub async fn lock(
    path: &str,
    services: &Services,
    from_root: bool,
    passphrase: Option<&str>,
) -> Result<(), AppError> {
    let folder = folder_at(path, services, from_root, passphrase).await?;
    let password = prompt("New folder password")?;
    let confirm = prompt("Confirm password")?;
    let folder = services.folders.lock(&folder.id, &password, &confirm).await?;
    output::print_success(&format!("Locked {}", folder.name));
    Ok(())
}

/// Remove a folder password.
pub async fn unlock(
    path: &str,
    services: &Services,
    from_root: bool,
    passphrase: Option<&str>,
) -> Result<(), AppError> {
    let folder = folder_at(path, services, from_root, passphrase).await?;
    let password = prompt("Current folder password")?;
    let folder = services.folders.unlock(&folder.id, &password).await?;
    output::print_success(&format!("Unlocked {}", folder.name));
    Ok(())
}

async fn folder_at(
    path: &str,
    services: &Services,
    from_root: bool,
    passphrase: Option<&str>,
) -> Result<Folder, AppError> {
    match resolve::item(services, path, from_root, Passphrase::from(passphrase)).await? {
        Item::Folder(folder) => Ok(folder),
        Item::File(file) => Err(AppError::validation(format!(
            "'{}' is not a folder",
            file.name
        ))),
    }
}

fn prompt(label: &str) -> Result<String, AppError> {
    Password::new()
        .with_prompt(label)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}
