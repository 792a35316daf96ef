//! Volume management commands.

use clap::{Args, Subcommand};

use nimbus_core::error::AppError;
use nimbus_entity::{NewVolume, Volume, VolumeColor};
use nimbus_service::Services;

use crate::output::{self, OutputFormat, VolumeRow};

/// Arguments for volume commands
#[derive(Debug, Args)]
pub struct VolumeArgs {
    /// Volume subcommand
    #[command(subcommand)]
    pub command: VolumeCommand,
}

/// Volume subcommands
#[derive(Debug, Subcommand)]
pub enum VolumeCommand {
    /// List declared volumes
    List,
    /// Declare a new volume
    Create {
        /// Volume name
        #[arg(short, long)]
        name: String,
        /// Capacity in whole GB
        #[arg(short, long)]
        size: u64,
        /// Tag color (indigo, blue, purple, pink, red, orange, green, teal)
        #[arg(short, long, default_value = "indigo")]
        color: VolumeColor,
    },
    /// Rename a volume
    Rename {
        /// Volume name or id
        volume: String,
        /// New name
        name: String,
    },
    /// Remove a volume
    Rm {
        /// Volume name or id
        volume: String,
    },
    /// Show one volume
    Show {
        /// Volume name or id
        volume: String,
    },
}

/// Execute volume commands
pub async fn execute(
    args: &VolumeArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        VolumeCommand::List => {
            let rows: Vec<VolumeRow> = services
                .volumes
                .list()
                .await
                .iter()
                .map(VolumeRow::from)
                .collect();
            output::print_list(&rows, format);
        }
        VolumeCommand::Create { name, size, color } => {
            let volume = services
                .volumes
                .create(NewVolume {
                    name: name.clone(),
                    size_gb: *size,
                    color: *color,
                })
                .await?;
            output::print_success(&format!(
                "Created volume {} ({})",
                volume.name,
                output::human_size(volume.total)
            ));
        }
        VolumeCommand::Rename { volume, name } => {
            let target = find(services, volume).await?;
            let renamed = services.volumes.rename(&target.id, name).await?;
            output::print_success(&format!("Renamed {} to {}", target.name, renamed.name));
        }
        VolumeCommand::Rm { volume } => {
            let target = find(services, volume).await?;
            services.volumes.remove(&target.id).await?;
            output::print_success(&format!("Removed volume {}", target.name));
        }
        VolumeCommand::Show { volume } => {
            let target = find(services, volume).await?;
            let opened = services.volumes.open(&target.id).await?;
            match format {
                OutputFormat::Json => output::print_item(&opened, format),
                OutputFormat::Table => {
                    output::print_kv("Name", &opened.name);
                    output::print_kv("Size", &output::human_size(opened.total));
                    output::print_kv("Used", &format!("{:.1}%", opened.usage_percent()));
                    output::print_kv("Files", &opened.file_count.to_string());
                    output::print_kv("Color", opened.color.as_str());
                    output::print_kv("ID", opened.id.as_str());
                }
            }
        }
    }
    Ok(())
}

/// Look a volume up by id, then by exact name.
async fn find(services: &Services, key: &str) -> Result<Volume, AppError> {
    let volumes = services.volumes.list().await;
    volumes
        .iter()
        .find(|v| v.id.as_str() == key)
        .or_else(|| volumes.iter().find(|v| v.name == key))
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("Volume '{key}' not found")))
}
