//! File upload and download commands.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use clap::Args;

use nimbus_core::error::AppError;
use nimbus_service::Services;

use super::resolve::{self, Item, Passphrase};
use crate::output;

/// Arguments for `upload`
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Local file to upload
    pub file: PathBuf,
    /// Destination folder path (defaults to the root)
    #[arg(short, long)]
    pub dest: Option<String>,
    /// Name to store the file under
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Arguments for `download`
#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// Remote file path
    pub path: String,
    /// Local output path (defaults to the file name)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn upload(
    args: &UploadArgs,
    services: &Services,
    from_root: bool,
    passphrase: Option<&str>,
) -> Result<(), AppError> {
    let dest = args.dest.as_deref().unwrap_or("");
    resolve::walk(services, dest, from_root, Passphrase::from(passphrase)).await?;
    upload_here(&args.file, args.name.as_deref(), services).await
}

/// Upload a local file into the current folder.
pub async fn upload_here(
    file: &Path,
    name: Option<&str>,
    services: &Services,
) -> Result<(), AppError> {
    let name = match name {
        Some(name) => name.to_string(),
        None => file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| AppError::validation("Upload path has no file name"))?,
    };
    let content = tokio::fs::read(file).await.map_err(|e| {
        AppError::with_source(
            nimbus_core::error::ErrorKind::Storage,
            format!("Cannot read {}", file.display()),
            e,
        )
    })?;
    let mime = mime_guess::from_path(file).first_or_octet_stream();

    let uploaded = services
        .uploads
        .upload(&name, mime.essence_str(), Bytes::from(content))
        .await?;
    output::print_success(&format!(
        "Uploaded {} ({})",
        uploaded.name,
        output::human_size(uploaded.size)
    ));
    Ok(())
}

pub async fn download(
    args: &DownloadArgs,
    services: &Services,
    from_root: bool,
    passphrase: Option<&str>,
) -> Result<(), AppError> {
    let file = match resolve::item(services, &args.path, from_root, Passphrase::from(passphrase))
        .await?
    {
        Item::File(file) => file,
        Item::Folder(folder) => {
            return Err(AppError::validation(format!(
                "'{}' is a folder",
                folder.name
            )));
        }
    };
    let content = services.files.download(&file.id).await?;
    let target = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&file.name));
    tokio::fs::write(&target, &content).await.map_err(|e| {
        AppError::with_source(
            nimbus_core::error::ErrorKind::Storage,
            format!("Cannot write {}", target.display()),
            e,
        )
    })?;
    output::print_success(&format!(
        "Downloaded {} to {}",
        file.name,
        target.display()
    ));
    Ok(())
}
