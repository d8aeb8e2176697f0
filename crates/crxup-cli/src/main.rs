//! crxup: publishing and diagnostics for the extension update server.
//!
//! Reads UPDATE_SERVER_URL, EXTENSION_PATH, ROUTE_PREFIX, ARCHIVE_PREFIX and
//! ARCHIVE_SUFFIX from the environment (or `.env`).

use anyhow::Context;
use clap::{Parser, Subcommand};
use crxup_cli::{
    extension_id_from_key, init_tracing, latest_release, publish_static, CliSettings,
    UpdateClient,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crxup", about = "Extension update server tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload the newest archive in the release directory to the server
    Upload {
        /// Release directory (defaults to EXTENSION_PATH)
        #[arg(long)]
        release_dir: Option<PathBuf>,
        /// Server base URL (defaults to UPDATE_SERVER_URL)
        #[arg(long)]
        server: Option<String>,
    },
    /// Copy the newest archive into a static hosting directory
    PublishStatic {
        /// Release directory (defaults to EXTENSION_PATH)
        #[arg(long)]
        release_dir: Option<PathBuf>,
        /// Directory served by the static deployment
        #[arg(long, default_value = "public/pp-ext")]
        public_dir: PathBuf,
        /// Public base URL of the static deployment (defaults to UPDATE_SERVER_URL)
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Smoke-test a running server
    Check {
        /// Server base URL (defaults to UPDATE_SERVER_URL)
        #[arg(long)]
        server: Option<String>,
        /// Extension ID used for the update.xml request
        #[arg(long, default_value = "YOUR_EXTENSION_ID")]
        id: String,
    },
    /// Derive the extension ID from a public key (PEM or DER)
    ExtensionId {
        /// Path to the public key
        #[arg(long)]
        key: PathBuf,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let settings = CliSettings::from_env()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Upload {
            release_dir,
            server,
        } => {
            let dir = release_dir.unwrap_or_else(|| settings.release_dir.clone());
            let latest = latest_release(&dir, &settings).await?;
            println!(
                "Uploading {} (version {})...",
                latest.filename, latest.version
            );

            let server = server.unwrap_or_else(|| settings.server_url.clone());
            let client = UpdateClient::new(&server, &settings.route_prefix)?;
            let response = client.upload_archive(&latest.location).await?;
            print_json(&response)?;
        }
        Commands::PublishStatic {
            release_dir,
            public_dir,
            base_url,
        } => {
            let dir = release_dir.unwrap_or_else(|| settings.release_dir.clone());
            let latest = latest_release(&dir, &settings).await?;
            let dest = publish_static(&latest, &public_dir).await?;

            let base_url = base_url.unwrap_or_else(|| settings.server_url.clone());
            let public = settings.catalog_for(&public_dir, &base_url);
            println!("Copied {} to {}", latest.filename, dest.display());
            println!("Archive URL: {}", public.download_url(&latest.filename));
            println!(
                "Update URL:  {}",
                public.route_url("/update.xml?id=YOUR_EXTENSION_ID")
            );
        }
        Commands::Check { server, id } => {
            let server = server.unwrap_or_else(|| settings.server_url.clone());
            let client = UpdateClient::new(&server, &settings.route_prefix)?;

            println!("1. Health ({}/health)", client.base_url());
            print_json(&client.health().await.context("Health check failed")?)?;

            println!("2. Versions ({})", client.route_url("/versions"));
            let listing = client.versions().await.context("Versions request failed")?;
            print_json(&listing)?;
            if listing.versions.is_empty() {
                println!("   No versions published yet");
            }

            println!("3. Update descriptor ({})", client.route_url("/update.xml"));
            match client.update_xml(&id).await {
                Ok(xml) => println!("{}", xml),
                Err(e) => println!("   Update descriptor unavailable: {:#}", e),
            }
        }
        Commands::ExtensionId { key } => {
            let bytes = tokio::fs::read(&key)
                .await
                .with_context(|| format!("Failed to read key: {}", key.display()))?;
            println!("{}", extension_id_from_key(&bytes)?);
        }
    }

    Ok(())
}
