//! CLI command definitions and dispatch.

pub mod auth;
pub mod browse;
pub mod folder;
pub mod item;
pub mod resolve;
pub mod shell;
pub mod transfer;
pub mod volume;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use nimbus_core::error::AppError;
use nimbus_service::Services;

/// Nimbus Drive: cloud file manager client
#[derive(Debug, Parser)]
#[command(name = "nimbus", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Work against a throwaway in-process drive instead of the API
    #[arg(long)]
    pub offline: bool,

    /// Passphrase for locked folders met along a path
    #[arg(long, global = true)]
    pub passphrase: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in
    Login(auth::LoginArgs),
    /// Create an account
    Register(auth::RegisterArgs),
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show storage usage and what kinds of files fill a folder
    Usage {
        /// Folder to break down (default: root)
        path: Option<String>,
    },
    /// List a folder
    Ls(browse::LsArgs),
    /// Search file names
    Search(browse::SearchArgs),
    /// List starred files
    Starred,
    /// List recently changed files
    Recent,
    /// Preview a file
    Preview {
        /// File path
        path: String,
    },
    /// Upload a local file
    Upload(transfer::UploadArgs),
    /// Download a file
    Download(transfer::DownloadArgs),
    /// Create a folder
    Mkdir {
        /// Path of the new folder
        path: String,
    },
    /// Rename a file or folder
    Rename {
        /// Item path
        path: String,
        /// New name
        new_name: String,
    },
    /// Toggle the star on a file or folder
    Star {
        /// Item path
        path: String,
    },
    /// Move a file or folder to the trash
    Rm {
        /// Item path
        path: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Protect a folder with a password
    Lock {
        /// Folder path
        path: String,
    },
    /// Remove a folder's password
    Unlock {
        /// Folder path
        path: String,
    },
    /// Volume management
    Volume(volume::VolumeArgs),
    /// Interactive shell
    Shell,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, services: &Services) -> Result<(), AppError> {
        let format = self.format;
        let pass = self.passphrase.as_deref();
        match &self.command {
            Commands::Login(args) => auth::login(args, services).await,
            Commands::Register(args) => auth::register(args, services).await,
            Commands::Logout => auth::logout(services).await,
            Commands::Whoami => auth::whoami(services, format).await,
            Commands::Usage { path } => {
                auth::usage(path.as_deref(), services, true, pass, format).await
            }
            Commands::Ls(args) => browse::ls(args, services, pass, format).await,
            Commands::Search(args) => browse::search(args, services, format).await,
            Commands::Starred => browse::starred(services, format).await,
            Commands::Recent => browse::recent(services, format).await,
            Commands::Preview { path } => browse::preview(path, services, true, pass).await,
            Commands::Upload(args) => transfer::upload(args, services, true, pass).await,
            Commands::Download(args) => transfer::download(args, services, true, pass).await,
            Commands::Mkdir { path } => folder::mkdir(path, services, true, pass).await,
            Commands::Rename { path, new_name } => {
                item::rename(path, new_name, services, true, pass).await
            }
            Commands::Star { path } => item::star(path, services, true, pass).await,
            Commands::Rm { path, yes } => item::remove(path, *yes, services, true, pass).await,
            Commands::Lock { path } => folder::lock(path, services, true, pass).await,
            Commands::Unlock { path } => folder::unlock(path, services, true, pass).await,
            Commands::Volume(args) => volume::execute(args, services, format).await,
            Commands::Shell => shell::run(services, format).await,
        }
    }
}
