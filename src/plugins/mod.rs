//! Built-in pipeline stages.
//!
//! | Stage         | Effect on the file set                                  |
//! |---------------|---------------------------------------------------------|
//! | `drafts`      | Removes records with `draft: true`                      |
//! | `collections` | Tags records with collection labels, fills metadata     |
//! | `single-page` | Folds ordered pages into one aggregate per language     |
//! | `assets`      | Adds static files from the asset directory              |
//! | `minify`      | Minifies HTML records                                   |
//!
//! Any other stage name in `site.toml` (`markdown`, `permalinks`, `layouts`,
//! ...) belongs to an external tool and is skipped by [`from_stage`].

pub mod assets;
pub mod collections;
pub mod drafts;
pub mod minify;
pub mod single_page;

use crate::{
    config::{SiteConfig, StageConfig},
    files::FileSet,
    metadata::SiteMetadata,
};
use anyhow::Result;

/// A pipeline stage.
///
/// Stages run one after another and own the file set while they run.
/// Returning `Ok` hands it to the next stage; an error aborts the build.
pub trait Plugin {
    fn name(&self) -> &'static str;

    fn run(&self, files: &mut FileSet, metadata: &mut SiteMetadata) -> Result<()>;
}

/// Instantiate the built-in stage named by `stage`.
///
/// Returns `Ok(None)` for names this tool does not implement.
pub fn from_stage(stage: &StageConfig, config: &SiteConfig) -> Result<Option<Box<dyn Plugin>>> {
    let plugin: Box<dyn Plugin> = match stage.name.as_str() {
        "drafts" => Box::new(drafts::Drafts),
        "collections" => Box::new(collections::Collections::new(stage.options()?)?),
        "single-page" => Box::new(single_page::SinglePage::new(stage.options()?)),
        "assets" => Box::new(assets::Assets::new(stage.options()?, &config.paths.assets, &config.root)),
        "minify" => Box::new(minify::Minify::new(stage.options()?)),
        _ => return Ok(None),
    };
    Ok(Some(plugin))
}
