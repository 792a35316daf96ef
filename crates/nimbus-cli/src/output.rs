//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use nimbus_entity::{File, Folder, StorageBreakdown, StorageUsage, Volume};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// One row of a folder listing.
#[derive(Debug, Serialize, Tabled)]
pub struct ItemRow {
    /// "dir" or "file"
    #[tabled(rename = "type")]
    pub kind: &'static str,
    /// Name
    pub name: String,
    /// Human-readable size
    pub size: String,
    /// Flags: starred / locked
    pub flags: String,
    /// Created at
    pub created: String,
    /// Item id
    pub id: String,
}

impl ItemRow {
    pub fn folder(folder: &Folder) -> Self {
        let mut flags = String::new();
        if folder.starred {
            flags.push('★');
        }
        if folder.locked {
            flags.push('🔒');
        }
        Self {
            kind: "dir",
            name: format!("{}/", folder.name),
            size: "-".into(),
            flags,
            created: folder.created_at.format("%Y-%m-%d %H:%M").to_string(),
            id: folder.id.to_string(),
        }
    }

    pub fn file(file: &File) -> Self {
        Self {
            kind: "file",
            name: file.name.clone(),
            size: human_size(file.size),
            flags: if file.starred { "★".into() } else { String::new() },
            created: file.created_at.format("%Y-%m-%d %H:%M").to_string(),
            id: file.id.to_string(),
        }
    }
}

/// One row of the volume list.
#[derive(Debug, Serialize, Tabled)]
pub struct VolumeRow {
    pub name: String,
    pub size: String,
    pub used: String,
    pub color: String,
    pub created: String,
    pub id: String,
}

impl From<&Volume> for VolumeRow {
    fn from(volume: &Volume) -> Self {
        Self {
            name: volume.name.clone(),
            size: human_size(volume.total),
            used: format!("{:.1}%", volume.usage_percent()),
            color: volume.color.as_str().to_string(),
            created: volume.created_at.format("%Y-%m-%d").to_string(),
            id: volume.id.to_string(),
        }
    }
}

/// Format a byte count with binary units.
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

/// Print a single item in the selected format
pub fn print_item<T: Serialize + std::fmt::Debug>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{item:#?}"),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
            println!("{json}");
        }
    }
}

/// Print storage usage with a bar.
pub fn print_usage(usage: &StorageUsage, breakdown: &StorageBreakdown, format: OutputFormat) {
    #[derive(Debug, Serialize)]
    struct UsageReport<'a> {
        #[serde(flatten)]
        usage: &'a StorageUsage,
        breakdown: &'a StorageBreakdown,
    }

    if format == OutputFormat::Json {
        print_item(&UsageReport { usage, breakdown }, format);
        return;
    }
    let filled = ((usage.percentage / 5.0).round() as usize).min(20);
    println!(
        "[{}{}] {:.1}%",
        "#".repeat(filled),
        "-".repeat(20 - filled),
        usage.percentage
    );
    print_kv("Used", &human_size(usage.used));
    print_kv("Quota", &human_size(usage.quota));
    print_kv("Available", &human_size(usage.available()));

    println!();
    if breakdown.is_empty() {
        println!("  No files yet");
        return;
    }
    for category in &breakdown.categories {
        let files = if category.files == 1 { "file" } else { "files" };
        print_kv(
            category.category.label(),
            &format!("{} ({} {files})", human_size(category.bytes), category.files),
        );
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}
