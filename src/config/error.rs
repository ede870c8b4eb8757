//! Errors raised while loading `site.toml`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read site config `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("site config is not valid TOML or has unknown keys")]
    Toml(#[from] toml::de::Error),

    /// A `[[stages]]` entry whose `options` table does not fit the stage.
    #[error("invalid options for stage `{stage}`")]
    StageOptions {
        stage: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("site config rejected: {0}")]
    Validation(String),
}
