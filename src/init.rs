//! Site initialization module.
//!
//! Creates new site structure with default configuration.

use crate::{config::SiteConfig, log};
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Default config filename
const CONFIG_FILE: &str = "site.toml";

/// Files to write ignore patterns to
const IGNORE_FILES: &[&str] = &[".gitignore"];

/// Seed values for `[metadata]` in the generated config
const SITE_TITLE: &str = "My Site";
const HOME_TITLE: (&str, &str) = ("en", "Home");

/// Starter page so the first build has something to aggregate
const SAMPLE_PAGE: (&str, &str) = (
    "content/en/welcome.md",
    "---\ntitle: Welcome\norder: 1\n---\n\nFirst section of the page.\n",
);

/// Create a new site with default structure
pub fn new_site(root: &Path, has_name: bool) -> Result<()> {
    // Without a name the site is created in place; refuse to mix it into
    // an existing project
    if !has_name && !is_dir_empty(root)? {
        bail!(
            "Current directory is not empty. Use `stitch init <SITE_NAME>` to create in a subdirectory."
        );
    }

    let mut config = SiteConfig::default();
    config.metadata.site_title = Some(SITE_TITLE.into());
    let (lang, title) = HOME_TITLE;
    config.metadata.meta_title.insert(lang.into(), title.into());

    init_site_structure(root, &config)?;
    init_default_config(root, &config)?;
    init_ignored_files(root, &config)?;

    log!("init"; "site created at {}", root.display());
    Ok(())
}

/// Check if a directory is completely empty
fn is_dir_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Write default configuration file
fn init_default_config(root: &Path, config: &SiteConfig) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    fs::write(root.join(CONFIG_FILE), content)?;
    Ok(())
}

/// Create site directory structure
fn init_site_structure(root: &Path, config: &SiteConfig) -> Result<()> {
    let paths = &config.paths;
    for dir in [&paths.content, &paths.assets, &paths.layouts] {
        let path = root.join(dir);
        if path.exists() {
            bail!(
                "Path `{}` already exists. Try `stitch init <SITE_NAME>` instead.",
                path.display()
            );
        }
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
    }

    let (relative, body) = SAMPLE_PAGE;
    let page = root.join(relative);
    if let Some(parent) = page.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&page, body)?;
    Ok(())
}

/// Ignore the output directory
fn init_ignored_files(root: &Path, config: &SiteConfig) -> Result<()> {
    let content = format!("/{}\n", config.paths.dest.display());
    for filename in IGNORE_FILES {
        let path = root.join(filename);
        if !path.exists() {
            fs::write(&path, &content)?;
        }
    }
    Ok(())
}
