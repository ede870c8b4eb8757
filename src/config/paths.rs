//! `[paths]` section configuration.
//!
//! Directory roots of the site. Only `content`, `assets` and `dest` are read
//! by the built-in stages; the others are declared for external stages
//! (templates, scripts, styles).

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[paths]` section in site.toml.
///
/// # Example
/// ```toml
/// [paths]
/// content = "content"
/// assets = "sources"
/// dest = "build"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Pages with front matter.
    #[serde(default = "defaults::paths::content")]
    #[educe(Default = defaults::paths::content())]
    pub content: PathBuf,

    /// Static files copied by the `assets` stage.
    #[serde(default = "defaults::paths::assets")]
    #[educe(Default = defaults::paths::assets())]
    pub assets: PathBuf,

    #[serde(default = "defaults::paths::scripts")]
    #[educe(Default = defaults::paths::scripts())]
    pub scripts: PathBuf,

    #[serde(default = "defaults::paths::styles")]
    #[educe(Default = defaults::paths::styles())]
    pub styles: PathBuf,

    #[serde(default = "defaults::paths::layouts")]
    #[educe(Default = defaults::paths::layouts())]
    pub layouts: PathBuf,

    /// Output directory.
    #[serde(default = "defaults::paths::dest")]
    #[educe(Default = defaults::paths::dest())]
    pub dest: PathBuf,
}

impl PathsConfig {
    /// Join every relative directory onto `root`.
    pub fn resolve(&mut self, root: &std::path::Path) {
        for dir in [
            &mut self.content,
            &mut self.assets,
            &mut self.scripts,
            &mut self.styles,
            &mut self.layouts,
            &mut self.dest,
        ] {
            if dir.is_relative() {
                *dir = root.join(&*dir);
            }
        }
    }
}
