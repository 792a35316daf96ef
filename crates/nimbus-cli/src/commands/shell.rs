//! Interactive shell.
//!
//! Unlike the one-shot commands, the shell keeps its place in the folder
//! tree between lines, so paths are relative to the current folder.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dialoguer::Input;
use tracing::debug;

use nimbus_core::error::{AppError, ErrorKind};
use nimbus_core::types::{FolderId, SortKey};
use nimbus_service::Services;
use nimbus_state::{Breadcrumb, ItemRef, ViewMode};

use super::resolve::{self, Item, Passphrase};
use super::{auth, browse, folder, item, transfer};
use crate::output::{self, OutputFormat};

#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Subcommand)]
enum ShellCommand {
    /// Show the current folder
    Ls,
    /// Re-fetch the current folder
    Refresh,
    /// Change folder by path or id (`/` = root, `..` = up)
    Cd { path: Option<String> },
    /// Open a folder by id, e.g. from search results
    Open { id: String },
    /// Go to the parent folder
    Up,
    /// Show the breadcrumb, or jump to entry N (0 = Home)
    Crumb {
        index: Option<usize>,
        /// Toggle the collapsed middle of long paths
        #[arg(long)]
        all: bool,
    },
    /// Preview a file
    Preview { name: String },
    /// Set the sort key (name, date, size)
    Sort { key: SortKey },
    /// Switch between grid and list view
    View { mode: String },
    /// Turn dark mode on or off
    Dark { mode: String },
    /// Toggle an item in the selection
    Select { name: String },
    /// Create a folder here
    Mkdir { name: String },
    /// Rename an item
    Rename { name: String, new_name: String },
    /// Toggle an item's star
    Star { name: String },
    /// Move an item to the trash
    Rm {
        name: String,
        #[arg(short, long)]
        yes: bool,
    },
    /// Protect a folder with a password
    Lock { name: String },
    /// Remove a folder's password
    Unlock { name: String },
    /// Upload a local file here
    Upload {
        file: PathBuf,
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Download a file
    Download {
        name: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Search file names
    Search {
        query: String,
        #[arg(short, long, default_value = "0")]
        page: u32,
    },
    /// Starred files
    Starred,
    /// Recently changed files
    Recent,
    /// Storage usage
    Usage,
    /// Signed-in user
    Whoami,
    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

/// Run the read-eval loop until `exit` or end of input.
pub async fn run(services: &Services, format: OutputFormat) -> Result<(), AppError> {
    if let Err(e) = resolve::open(services, None, Passphrase::Prompt).await {
        output::print_error(&e.message);
    }

    loop {
        let prompt = prompt_text(services).await;
        let line = match Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => line,
            Err(e) => {
                debug!(error = %e, "Shell input closed");
                break;
            }
        };

        let tokens = match tokenize(&line) {
            Ok(tokens) if tokens.is_empty() => continue,
            Ok(tokens) => tokens,
            Err(e) => {
                output::print_error(&e.message);
                continue;
            }
        };
        let parsed = match ShellLine::try_parse_from(tokens) {
            Ok(parsed) => parsed,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        if matches!(parsed.command, ShellCommand::Exit) {
            break;
        }
        if let Err(e) = dispatch(parsed.command, services, format).await {
            output::print_error(&e.message);
        }
    }
    Ok(())
}

async fn dispatch(
    command: ShellCommand,
    services: &Services,
    format: OutputFormat,
) -> Result<(), AppError> {
    let here = Passphrase::Prompt;
    match command {
        ShellCommand::Ls => browse::print_listing(services, format).await,
        ShellCommand::Refresh => {
            let outcome = services.navigation.refresh().await?;
            resolve::settle(services, outcome, here).await?;
            browse::print_listing(services, format).await;
        }
        ShellCommand::Cd { path } => {
            let path = path.unwrap_or_else(|| "/".to_string());
            match resolve::walk(services, &path, false, here).await {
                Err(e) if e.kind == ErrorKind::NotFound && !path.contains('/') => {
                    let outcome = services.navigation.open_by_id(&FolderId::new(path)).await?;
                    resolve::settle(services, outcome, here).await?;
                }
                other => other?,
            }
            browse::print_listing(services, format).await;
        }
        ShellCommand::Open { id } => {
            let outcome = services.navigation.open_by_id(&FolderId::new(id)).await?;
            resolve::settle(services, outcome, here).await?;
            browse::print_listing(services, format).await;
        }
        ShellCommand::Up => {
            let outcome = services.navigation.go_up().await?;
            resolve::settle(services, outcome, here).await?;
            browse::print_listing(services, format).await;
        }
        ShellCommand::Crumb {
            index: Some(index), ..
        } => {
            let target = match index {
                0 => None,
                n => services
                    .state()
                    .read()
                    .await
                    .navigation
                    .path()
                    .get(n - 1)
                    .cloned(),
            };
            if index > 0 && target.is_none() {
                return Err(AppError::validation(format!("No breadcrumb entry {index}")));
            }
            resolve::open(services, target, here).await?;
            browse::print_listing(services, format).await;
        }
        ShellCommand::Crumb { index: None, all } => {
            let mut state = services.state().write().await;
            if all {
                state.ui.breadcrumb_expanded = !state.ui.breadcrumb_expanded;
            }
            let crumb = Breadcrumb::from_state(
                &state.navigation,
                services.limits().breadcrumb_collapse_after,
                state.ui.breadcrumb_expanded,
            );
            println!("{crumb}");
        }
        ShellCommand::Preview { name } => {
            browse::preview(&name, services, false, None).await?;
        }
        ShellCommand::Sort { key } => {
            services.state().write().await.ui.sort_key = key;
            browse::print_listing(services, format).await;
        }
        ShellCommand::View { mode } => {
            let mode = match mode.as_str() {
                "grid" => ViewMode::Grid,
                "list" => ViewMode::List,
                other => {
                    return Err(AppError::validation(format!("Unknown view mode '{other}'")));
                }
            };
            services.state().write().await.ui.view_mode = mode;
        }
        ShellCommand::Dark { mode } => {
            let enabled = parse_switch(&mode)?;
            services.state().write().await.set_dark_mode(enabled)?;
            output::print_success(if enabled {
                "Dark mode on"
            } else {
                "Dark mode off"
            });
        }
        ShellCommand::Select { name } => {
            let item = match resolve::lookup(services, &name).await? {
                Item::Folder(folder) => ItemRef::Folder(folder.id),
                Item::File(file) => ItemRef::File(file.id),
            };
            let mut state = services.state().write().await;
            let selected = state.ui.toggle_selection(item);
            let verb = if selected { "Selected" } else { "Deselected" };
            output::print_success(&format!(
                "{verb} {name} ({} selected)",
                state.ui.selection().len()
            ));
        }
        ShellCommand::Mkdir { name } => folder::mkdir(&name, services, false, None).await?,
        ShellCommand::Rename { name, new_name } => {
            item::rename(&name, &new_name, services, false, None).await?
        }
        ShellCommand::Star { name } => item::star(&name, services, false, None).await?,
        ShellCommand::Rm { name, yes } => item::remove(&name, yes, services, false, None).await?,
        ShellCommand::Lock { name } => folder::lock(&name, services, false, None).await?,
        ShellCommand::Unlock { name } => folder::unlock(&name, services, false, None).await?,
        ShellCommand::Upload { file, name } => {
            transfer::upload_here(&file, name.as_deref(), services).await?
        }
        ShellCommand::Download { name, output } => {
            let args = transfer::DownloadArgs { path: name, output };
            transfer::download(&args, services, false, None).await?
        }
        ShellCommand::Search { query, page } => {
            let args = browse::SearchArgs { query, page };
            browse::search(&args, services, format).await?
        }
        ShellCommand::Starred => browse::starred(services, format).await?,
        ShellCommand::Recent => browse::recent(services, format).await?,
        ShellCommand::Usage => auth::usage(None, services, false, None, format).await?,
        ShellCommand::Whoami => auth::whoami(services, format).await?,
        ShellCommand::Exit => {}
    }
    Ok(())
}

async fn prompt_text(services: &Services) -> String {
    let state = services.state().read().await;
    let path: Vec<&str> = state
        .navigation
        .path()
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    format!("nimbus:/{}", path.join("/"))
}

fn parse_switch(value: &str) -> Result<bool, AppError> {
    match value {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        other => Err(AppError::validation(format!("Expected on or off, got '{other}'"))),
    }
}

/// Split a line into words, honoring single and double quotes and
/// backslash escapes.
fn tokenize(line: &str) -> Result<Vec<String>, AppError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (None, '"' | '\'') => {
                quote = Some(c);
                in_token = true;
            }
            (q, '\\') if q != Some('\'') => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| AppError::validation("Line ends with a backslash"))?;
                current.push(escaped);
                in_token = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            (_, c) => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if quote.is_some() {
        return Err(AppError::validation("Unterminated quote"));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
