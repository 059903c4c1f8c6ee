//! On-disk layout of a run: one folder per board under the output root.

use std::{io, path::Path};

use tokio::fs;
use tracing::info;

/// Folder name for a board: `{base}_{board}` with spaces turned into underscores.
pub fn board_folder_name(base: &str, board: &str) -> String {
    format!("{base}_{}", board.replace(' ', "_"))
}

/// Creates `path` and any missing parents.
pub async fn ensure_directory(path: &Path) -> io::Result<()> {
    if fs::try_exists(path).await? {
        return Ok(());
    }
    fs::create_dir_all(path).await?;
    info!(path = %path.display(), "Created directory");
    Ok(())
}

/// Names of directories in `root` that look like folders of an earlier run
/// with the same base name (`{base}_*`).
pub fn folders_with_base(root: &Path, base: &str) -> io::Result<Vec<String>> {
    let prefix = format!("{base}_");
    let mut found = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str()
            && name.starts_with(&prefix)
        {
            found.push(name.to_string());
        }
    }
    found.sort();
    Ok(found)
}
