//! Locating the project file to containerize

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// First `*.csproj` under `root` in sorted order, searched recursively
pub fn find_project(root: &Path) -> Result<Option<PathBuf>> {
    let escaped = glob::Pattern::escape(&root.to_string_lossy());
    let pattern = format!("{escaped}/**/*.csproj");

    let mut matches: Vec<PathBuf> = glob::glob(&pattern)
        .context("Invalid project search pattern")?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    matches.sort();

    debug!(root = %root.display(), found = matches.len(), "Searched for project files");
    Ok(matches.into_iter().next())
}
