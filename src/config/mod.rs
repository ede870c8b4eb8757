//! Site configuration management for `site.toml`.
//!
//! # Sections
//!
//! | Section       | Purpose                                          |
//! |---------------|--------------------------------------------------|
//! | `[metadata]`  | Site title and per-language strings              |
//! | `[paths]`     | Content, asset, layout and output directories    |
//! | `[[stages]]`  | Ordered pipeline stages with their options       |
//!
//! # Example
//!
//! ```toml
//! [metadata]
//! site_title = "dPavelescu"
//!
//! [metadata.meta_title]
//! en = "Home"
//! fr = "Accueil"
//!
//! [paths]
//! content = "content"
//! dest = "build"
//!
//! [[stages]]
//! name = "collections"
//! options = { en = { pattern = "en/*.md", sort_by = "order" } }
//!
//! [[stages]]
//! name = "single-page"
//! options = { path = "index.html" }
//! ```

pub mod defaults;
mod error;
mod paths;
mod stage;

pub use error::ConfigError;
pub use stage::StageConfig;

use crate::cli::Cli;
use crate::metadata::LangMap;
use anyhow::{Result, bail};
use educe::Educe;
use paths::PathsConfig;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing site.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Project root directory; relative stage paths resolve against it
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub metadata: MetadataConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    /// Pipeline stages, run in declaration order.
    #[serde(default)]
    #[educe(Default = defaults::stages::pipeline())]
    pub stages: Vec<StageConfig>,
}

/// `[metadata]` section: values every stage may read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetadataConfig {
    /// Language-independent site title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_title: Option<String>,

    #[serde(skip_serializing_if = "LangMap::is_empty")]
    pub meta_title: LangMap,
    #[serde(skip_serializing_if = "LangMap::is_empty")]
    pub meta_description: LangMap,
    #[serde(skip_serializing_if = "LangMap::is_empty")]
    pub copyright: LangMap,

    /// Free-form values such as the site url.
    #[serde(skip_serializing_if = "toml::Table::is_empty")]
    pub site: toml::Table,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Apply CLI overrides and resolve every directory against the root.
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli.root.clone().unwrap_or_else(|| PathBuf::from("./"));
        let root = normalize_path(&root);

        Self::update_option(&mut self.paths.content, cli.content.as_ref());
        Self::update_option(&mut self.paths.dest, cli.output.as_ref());

        self.resolve(&root);
    }

    /// Anchor the config at `root`: record it and resolve every directory.
    pub fn resolve(&mut self, root: &Path) {
        self.paths.resolve(root);
        self.root = root.to_path_buf();
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Check what a build needs before any stage runs.
    pub fn validate(&self) -> Result<()> {
        if !self.paths.content.is_dir() {
            bail!(ConfigError::Validation(format!(
                "[paths.content] `{}` is not a directory",
                self.paths.content.display()
            )));
        }

        if let Some(stage) = self.stages.iter().find(|s| s.name.trim().is_empty()) {
            bail!(ConfigError::Validation(format!(
                "stage name must not be empty (when = {:?})",
                stage.when
            )));
        }

        Ok(())
    }
}

/// Normalize a path to absolute, using canonicalize if the path exists
fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_has_no_stages() {
        let config = SiteConfig::from_str("").unwrap();
        assert!(config.stages.is_empty());
        assert!(config.metadata.site_title.is_none());
    }

    #[test]
    fn test_default_config_has_pipeline() {
        let config = SiteConfig::default();
        let names: Vec<_> = config.stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "drafts",
                "collections",
                "markdown",
                "single-page",
                "layouts",
                "assets",
                "minify"
            ]
        );
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let text = toml::to_string_pretty(&SiteConfig::default()).unwrap();
        let parsed = SiteConfig::from_str(&text).unwrap();

        assert_eq!(parsed.stages, SiteConfig::default().stages);
        assert_eq!(parsed.paths.dest, PathBuf::from("build"));
    }

    #[test]
    fn test_unknown_section_rejected() {
        let err = SiteConfig::from_str("[plugins]\nx = 1\n").unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn test_metadata_language_maps() {
        let config = SiteConfig::from_str(
            r#"
            [metadata]
            site_title = "Site"
            [metadata.meta_description]
            en = "About us"
            fr = "À propos"
            "#,
        )
        .unwrap();

        assert_eq!(config.metadata.site_title.as_deref(), Some("Site"));
        assert_eq!(config.metadata.meta_description["fr"], "À propos");
        assert!(config.metadata.meta_title.is_empty());
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = SiteConfig::from_path(Path::new("/nonexistent/site.toml")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Io(..))
        ));
    }

    #[test]
    fn test_update_with_cli_resolves_paths() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_str().unwrap();
        let cli = Cli::parse_from(["stitch", "--root", root, "--output", "public", "build"]);

        let mut config = SiteConfig::from_str("").unwrap();
        config.update_with_cli(&cli);

        let root = dir.path().canonicalize().unwrap();
        assert_eq!(config.root, root);
        assert_eq!(config.paths.dest, root.join("public"));
        assert_eq!(config.paths.content, root.join("content"));
    }

    #[test]
    fn test_validate_requires_content_dir() {
        let dir = TempDir::new().unwrap();
        let mut config = SiteConfig::from_str("").unwrap();
        config.paths.resolve(dir.path());

        assert!(config.validate().is_err());

        fs::create_dir_all(&config.paths.content).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_stage_name() {
        let dir = TempDir::new().unwrap();
        let mut config = SiteConfig::from_str("[[stages]]\nname = \" \"\n").unwrap();
        config.paths.resolve(dir.path());
        fs::create_dir_all(&config.paths.content).unwrap();

        assert!(config.validate().is_err());
    }
}
