//! The `assets` stage: bring static files into the file set.
//!
//! Files are added as raw records (no front matter) under `destination`.
//! A missing source directory is not an error; the stage logs and does
//! nothing.

use super::Plugin;
use crate::{
    config::defaults,
    files::{FileSet, load},
    log,
    metadata::SiteMetadata,
};
use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetsOptions {
    /// Directory to copy from; `[paths.assets]` when unset.
    pub source: Option<PathBuf>,

    /// Output subdirectory; the output root when unset.
    #[serde(default = "defaults::assets::destination")]
    pub destination: PathBuf,
}

pub struct Assets {
    source: PathBuf,
    destination: String,
}

impl Assets {
    /// A relative `source` override is resolved against the project `root`.
    pub fn new(options: AssetsOptions, default_source: &Path, root: &Path) -> Self {
        let source = match options.source {
            Some(source) if source.is_relative() => root.join(source),
            Some(source) => source,
            None => default_source.to_path_buf(),
        };

        let destination = options
            .destination
            .components()
            .filter_map(|c| match c {
                std::path::Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");

        Self {
            source,
            destination,
        }
    }

    fn key(&self, relative: String) -> String {
        if self.destination.is_empty() {
            relative
        } else {
            format!("{}/{relative}", self.destination)
        }
    }
}

impl Plugin for Assets {
    fn name(&self) -> &'static str {
        "assets"
    }

    fn run(&self, files: &mut FileSet, _metadata: &mut SiteMetadata) -> Result<()> {
        if !self.source.is_dir() {
            log!("assets"; "no directory at {}, skipped", self.source.display());
            return Ok(());
        }

        let assets = load::read_raw(&self.source)?;
        let count = assets.len();
        for (relative, record) in assets {
            files.insert(self.key(relative), record);
        }

        log!("assets"; "{} file(s) from {}", count, self.source.display());
        Ok(())
    }
}
