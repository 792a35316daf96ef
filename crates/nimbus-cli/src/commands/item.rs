//! Commands that act on either a file or a folder.

use dialoguer::Confirm;

use nimbus_core::error::AppError;
use nimbus_service::Services;

use super::resolve::{self, Item, Passphrase};
use crate::output;

pub async fn rename(
    path: &str,
    new_name: &str,
    services: &Services,
    from_root: bool,
    passphrase: Option<&str>,
) -> Result<(), AppError> {
    let item = resolve::item(services, path, from_root, Passphrase::from(passphrase)).await?;
    let renamed = match &item {
        Item::Folder(folder) => services.folders.rename(&folder.id, new_name).await?.name,
        Item::File(file) => services.files.rename(&file.id, new_name).await?.name,
    };
    output::print_success(&format!("Renamed {} to {}", item.name(), renamed));
    Ok(())
}

pub async fn star(
    path: &str,
    services: &Services,
    from_root: bool,
    passphrase: Option<&str>,
) -> Result<(), AppError> {
    let item = resolve::item(services, path, from_root, Passphrase::from(passphrase)).await?;
    let starred = match &item {
        Item::Folder(folder) => services.folders.toggle_star(&folder.id).await?.starred,
        Item::File(file) => services.files.toggle_star(&file.id).await?.starred,
    };
    let verb = if starred { "Starred" } else { "Unstarred" };
    output::print_success(&format!("{verb} {}", item.name()));
    Ok(())
}

/// Move an item to the trash, confirming unless `yes` is set.
pub async fn remove(
    path: &str,
    yes: bool,
    services: &Services,
    from_root: bool,
    passphrase: Option<&str>,
) -> Result<(), AppError> {
    let item = resolve::item(services, path, from_root, Passphrase::from(passphrase)).await?;
    if !yes {
        let prompt = match &item {
            Item::Folder(folder) => {
                format!("Delete folder '{}' and everything in it?", folder.name)
            }
            Item::File(file) => format!("Delete '{}'?", file.name),
        };
        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?;
        if !confirmed {
            output::print_warning("Cancelled");
            return Ok(());
        }
    }
    match &item {
        Item::Folder(folder) => services.folders.delete(&folder.id).await?,
        Item::File(file) => services.files.delete(&file.id).await?,
    }
    output::print_success(&format!("Deleted {}", item.name()));
    Ok(())
}
