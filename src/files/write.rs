//! Writing the final [`FileSet`] to the destination directory.

use super::FileSet;
use crate::logger::Progress;
use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Write every record's contents to `dest/<path>`.
///
/// When `clean` is true the destination directory is removed first.
/// Returns the number of files written.
pub fn write_output(files: &FileSet, dest: &Path, clean: bool) -> Result<usize> {
    if clean && dest.exists() {
        fs::remove_dir_all(dest)
            .with_context(|| format!("Failed to clear output directory: {}", dest.display()))?;
    }
    fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create output directory: {}", dest.display()))?;

    let progress = Progress::new("write", files.len());

    // `try_for_each` stops handing out records after the first error
    let result = files.par_iter().try_for_each(|(key, record)| -> Result<()> {
        let target = output_path(dest, key)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&target, &record.contents)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        progress.inc();
        Ok(())
    });

    progress.finish();
    result?;
    Ok(files.len())
}

/// Resolve a file set key below `dest`, refusing keys that escape it.
fn output_path(dest: &Path, key: &str) -> Result<PathBuf> {
    if key.is_empty() || key.starts_with('/') || key.split('/').any(|part| part == "..") {
        return Err(anyhow!("Refusing to write outside the output directory: `{key}`"));
    }
    Ok(key.split('/').fold(dest.to_path_buf(), |path, part| path.join(part)))
}
