mod artifact;
mod config;
mod errors;
mod extract;
mod generate;
mod models;
mod scaffold;
mod server;
mod theme;
mod versions;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{ToolkitConfig, VERSIONS_STORE_PATH};
use crate::errors::AppError;
use crate::server::DevServer;
use crate::versions::VersionStore;

#[derive(Parser, Debug)]
#[command(name = "resumegen", about = "Personal resume generation toolkit", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the live-reload development server for a role
    Dev {
        /// Role code to serve (e.g. FSE, PM)
        role_code: String,
    },
    /// Generate a versioned HTML artifact for a role
    Generate {
        /// Role code, or "list"/"help" to show the role listing
        #[arg(allow_hyphen_values = true)]
        role_code: Option<String>,
        /// Theme id (defaults to the configured theme)
        theme: Option<String>,
        /// Output directory (defaults to the configured one)
        output_dir: Option<String>,
    },
    /// Render an arbitrary resume JSON without touching the version store
    Adhoc {
        /// Path to a resume JSON document
        resume: PathBuf,
        /// Theme id
        #[arg(default_value = "classic")]
        theme: String,
        /// Output directory
        #[arg(default_value = "outputs")]
        output_dir: String,
    },
    /// Create source documents for templated roles that lack one
    Scaffold,
    /// List configured roles with their version counters
    List,
    /// Extract the text layer of a PDF resume to stdout
    Extract {
        /// Path to the PDF
        pdf: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{}=info", env!("CARGO_PKG_NAME")))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let root = std::env::current_dir()?;

    match cli.command {
        Command::Dev { role_code } => {
            let config = ToolkitConfig::load()?;
            let code = role_code.to_uppercase();
            DevServer::new(&root, &config, &code)?.run().await?;
        }
        Command::Generate {
            role_code,
            theme,
            output_dir,
        } => {
            let config = ToolkitConfig::load()?;
            let Some(role_code) = role_code else {
                print_role_listing(&root, &config)?;
                anyhow::bail!("Please specify a role code");
            };
            let code = role_code.to_uppercase();
            if is_listing_alias(&code) {
                print_role_listing(&root, &config)?;
                return Ok(());
            }
            let receipt = generate::generate_versioned(
                &root,
                &config,
                &code,
                theme.as_deref(),
                output_dir.as_deref(),
            )?;
            println!("Resume generated successfully: {}", receipt.filename);
            println!("Role: {} ({})", receipt.role_name, receipt.role_code);
            println!("Version: {}", receipt.version);
            println!("Output: {}", receipt.file_path.display());
            println!("Theme: {}", receipt.theme);
        }
        Command::Adhoc {
            resume,
            theme,
            output_dir,
        } => {
            let receipt = generate::generate_adhoc(&root, &resume, &theme, &output_dir)?;
            println!("Resume generated successfully: {}", receipt.filename);
            println!("Output: {}", receipt.file_path.display());
            println!("Version: {}", receipt.timestamp);
            println!("Hash: {}", receipt.hash);
        }
        Command::Scaffold => {
            let config = ToolkitConfig::load()?;
            let outcome = scaffold::scaffold_missing(&root, &config)?;
            println!(
                "Scaffold complete: {} generated, {} already present",
                outcome.written.len(),
                outcome.skipped.len()
            );
        }
        Command::List => {
            let config = ToolkitConfig::load()?;
            print_role_listing(&root, &config)?;
        }
        Command::Extract { pdf } => {
            let text = extract::extract_text(&pdf)?;
            println!("{}", text.trim_end());
        }
    }

    Ok(())
}

// `code` arrives uppercased, so the hyphenated spellings match too.
fn is_listing_alias(code: &str) -> bool {
    matches!(code, "HELP" | "--HELP" | "-H" | "LIST" | "--LIST" | "-L")
}

/// Prints every configured role with its counters, the way the listing
/// appears for `list`, for listing aliases, and for a missing role code.
fn print_role_listing(root: &Path, config: &ToolkitConfig) -> Result<(), AppError> {
    let store = VersionStore::load(&root.join(VERSIONS_STORE_PATH))?;
    println!();
    println!("Available roles:");
    println!("================");
    for (code, role) in &config.roles {
        let (current, total) = store
            .record(code)
            .map(|record| (record.current, record.total_generated))
            .unwrap_or((0, 0));
        println!("{code:<5} - {:<25} (v{current:03}, {total} total)", role.name);
    }
    println!();
    println!("Themes: {}", theme::available_themes().join(", "));
    Ok(())
}
