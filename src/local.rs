//! Backup directory listing
//!
//! The names of the immediate entries of the backup directory stand in for
//! "already mirrored". Files and directories are both returned; nothing checks
//! that an entry is really a clone.

use std::ffi::OsString;
use std::path::Path;
use tracing::debug;

/// List the names of the immediate entries of `dir`, sorted by name
pub async fn scan_entries(dir: &Path) -> std::io::Result<Vec<OsString>> {
    debug!("Reading backup directory: {}", dir.display());

    let mut reader = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        names.push(entry.file_name());
    }

    names.sort();
    Ok(names)
}

/// Entry names as UTF-8 for comparison with repository names.
///
/// Invalid sequences become U+FFFD, so such an entry never matches a repository.
pub fn display_names(entries: &[OsString]) -> Vec<String> {
    entries
        .iter()
        .map(|name| name.to_string_lossy().into_owned())
        .collect()
}
