use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::models::NewLink;
use crate::store;

#[derive(Debug, Parser)]
#[command(name = "linkvault", version, about = "Personal bookmark manager")]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Load links from a JSON array of `{url, title, notes?, tags?, createdAt?}`
    Import { file: PathBuf },
}

/// Reads an import file and stores every link in one transaction.
///
/// Records missing a url or title abort the import before anything is written.
pub async fn import_file(pool: &SqlitePool, path: &Path) -> anyhow::Result<usize> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let links: Vec<NewLink> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of links", path.display()))?;

    if let Some(position) = links
        .iter()
        .position(|link| link.url.trim().is_empty() || link.title.trim().is_empty())
    {
        anyhow::bail!("record {position} is missing a url or title");
    }

    let imported = store::import_links(pool, links).await?;
    tracing::info!(imported, file = %path.display(), "import finished");
    Ok(imported)
}
