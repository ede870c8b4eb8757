//! Reading directories into a [`FileSet`].

use super::{FileRecord, FileSet, frontmatter};
use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Files to ignore during directory traversal
const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Extensions whose files may start with a front matter block
const FRONT_MATTER_EXTENSIONS: &[&str] = &["md", "markdown", "html", "htm"];

/// Collect all files from a directory recursively.
pub fn collect_all_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Load the content directory, parsing front matter where supported.
pub fn read_content(dir: &Path) -> Result<FileSet> {
    read_dir(dir, true)
}

/// Load every file under `dir` as raw bytes.
pub fn read_raw(dir: &Path) -> Result<FileSet> {
    read_dir(dir, false)
}

fn read_dir(dir: &Path, front_matter: bool) -> Result<FileSet> {
    collect_all_files(dir)
        .par_iter()
        .map(|path| -> Result<(String, FileRecord)> {
            let key = relative_key(dir, path)?;
            let bytes =
                fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
            let record = if front_matter && has_front_matter_extension(path) {
                let (fm, body) = frontmatter::split(&bytes)
                    .with_context(|| format!("Invalid front matter in {key}"))?;
                FileRecord::with_front_matter(fm, body.to_vec())
            } else {
                FileRecord::raw(bytes)
            };
            Ok((key, record))
        })
        .collect()
}

/// `/`-separated path of `path` relative to `root`.
pub fn relative_key(root: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| anyhow!("{} is not under {}", path.display(), root.display()))?;

    let parts = relative
        .components()
        .map(|c| {
            c.as_os_str()
                .to_str()
                .ok_or_else(|| anyhow!("Invalid path encoding: {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(parts.join("/"))
}

fn has_front_matter_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| FRONT_MATTER_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}
