//! Listing, search and preview commands.

use clap::Args;

use nimbus_core::error::AppError;
use nimbus_core::types::SortKey;
use nimbus_entity::{File, PreviewKind};
use nimbus_service::Services;
use nimbus_state::Breadcrumb;

use super::resolve::{self, Item, Passphrase};
use crate::output::{self, ItemRow, OutputFormat};

/// Arguments for `ls`
#[derive(Debug, Args)]
pub struct LsArgs {
    /// Folder path from the drive root (defaults to the root)
    pub path: Option<String>,
    /// Sort key: name, date or size
    #[arg(short, long, default_value = "name")]
    pub sort: SortKey,
}

/// Arguments for `search`
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Text to look for in file names
    pub query: String,
    /// Result page, starting at 0
    #[arg(short, long, default_value = "0")]
    pub page: u32,
}

pub async fn ls(
    args: &LsArgs,
    services: &Services,
    passphrase: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    services.state().write().await.ui.sort_key = args.sort;
    let path = args.path.as_deref().unwrap_or("");
    resolve::walk(services, path, true, Passphrase::from(passphrase)).await?;
    print_listing(services, format).await;
    Ok(())
}

/// Print the breadcrumb and the current folder's children.
pub async fn print_listing(services: &Services, format: OutputFormat) {
    let state = services.state().read().await;
    let rows: Vec<ItemRow> = state
        .sorted_folders()
        .iter()
        .map(ItemRow::folder)
        .chain(state.sorted_files().iter().map(ItemRow::file))
        .collect();
    if format == OutputFormat::Table {
        let crumb = Breadcrumb::from_state(
            &state.navigation,
            services.limits().breadcrumb_collapse_after,
            state.ui.breadcrumb_expanded,
        );
        println!("{crumb}");
    }
    output::print_list(&rows, format);
}

pub async fn search(
    args: &SearchArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), AppError> {
    let page = services.search.search(&args.query, args.page).await?;
    print_files(&page.content, format);
    if format == OutputFormat::Table && page.total_elements > 0 {
        println!(
            "Page {} of {} ({} matches)",
            page.number + 1,
            page.total_pages.max(1),
            page.total_elements
        );
    }
    Ok(())
}

pub async fn starred(services: &Services, format: OutputFormat) -> Result<(), AppError> {
    let files = services.search.starred().await?;
    print_files(&files, format);
    Ok(())
}

pub async fn recent(services: &Services, format: OutputFormat) -> Result<(), AppError> {
    let files = services.search.recent().await?;
    print_files(&files, format);
    Ok(())
}

/// Show a file's preview: text inline, metadata for everything else.
pub async fn preview(
    path: &str,
    services: &Services,
    from_root: bool,
    passphrase: Option<&str>,
) -> Result<(), AppError> {
    let file = match resolve::item(services, path, from_root, Passphrase::from(passphrase)).await? {
        Item::File(file) => file,
        Item::Folder(folder) => {
            return Err(AppError::validation(format!(
                "'{}' is a folder",
                folder.name
            )));
        }
    };
    let preview = services.preview.open(&file.id).await?;

    output::print_kv("Name", &preview.file.name);
    output::print_kv("Type", &preview.file.mime_type);
    output::print_kv("Size", &output::human_size(preview.file.size));
    match (preview.kind, preview.content) {
        (PreviewKind::Text, Some(content)) => {
            println!();
            println!("{}", String::from_utf8_lossy(&content));
        }
        (_, Some(content)) => {
            output::print_kv("Preview", &format!("{} bytes loaded", content.len()));
        }
        (PreviewKind::Office | PreviewKind::Unsupported, None) => {
            output::print_warning("Preview is not available for this file type; download it instead");
        }
        (_, None) => {}
    }
    Ok(())
}

fn print_files(files: &[File], format: OutputFormat) {
    let rows: Vec<ItemRow> = files.iter().map(ItemRow::file).collect();
    output::print_list(&rows, format);
}
