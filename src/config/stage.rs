//! `[[stages]]` entries.
//!
//! Each entry names a stage, optionally gates it on the build environment,
//! and carries a free-form `options` table that the stage deserializes into
//! its own options type.
//!
//! ```toml
//! [[stages]]
//! name = "single-page"
//! options = { path = "index.html", default_lang = "en" }
//!
//! [[stages]]
//! name = "minify"
//! when = "production"
//! ```

use super::error::ConfigError;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use toml::{Table, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageConfig {
    pub name: String,

    /// Run only when the build environment equals this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,

    #[serde(default, skip_serializing_if = "Table::is_empty")]
    pub options: Table,
}

impl StageConfig {
    pub fn is_enabled(&self, env: &str) -> bool {
        self.when.as_deref().is_none_or(|when| when == env)
    }

    /// Deserialize `options` into the stage's options type.
    pub fn options<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        Value::Table(self.options.clone())
            .try_into()
            .map_err(|source| ConfigError::StageOptions {
                stage: self.name.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(deny_unknown_fields)]
    struct Options {
        path: String,
        #[serde(default)]
        depth: u32,
    }

    #[test]
    fn test_stages_parse_in_order() {
        let config = SiteConfig::from_str(
            r#"
            [[stages]]
            name = "drafts"

            [[stages]]
            name = "single-page"
            options = { path = "index.html" }

            [[stages]]
            name = "minify"
            when = "production"
            "#,
        )
        .unwrap();

        let names: Vec<_> = config.stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["drafts", "single-page", "minify"]);
        assert_eq!(config.stages[2].when.as_deref(), Some("production"));
    }

    #[test]
    fn test_is_enabled() {
        let always = StageConfig {
            name: "drafts".into(),
            ..StageConfig::default()
        };
        let gated = StageConfig {
            name: "minify".into(),
            when: Some("production".into()),
            ..StageConfig::default()
        };

        assert!(always.is_enabled("development"));
        assert!(gated.is_enabled("production"));
        assert!(!gated.is_enabled("development"));
    }

    #[test]
    fn test_options_deserialize() {
        let config = SiteConfig::from_str(
            r#"
            [[stages]]
            name = "x"
            [stages.options]
            path = "all.html"
            "#,
        )
        .unwrap();

        let options: Options = config.stages[0].options().unwrap();
        assert_eq!(
            options,
            Options {
                path: "all.html".into(),
                depth: 0
            }
        );
    }

    #[test]
    fn test_options_error_names_stage() {
        let stage = StageConfig {
            name: "single-page".into(),
            ..StageConfig::default()
        };

        let err = stage.options::<Options>().unwrap_err();
        assert!(matches!(err, ConfigError::StageOptions { ref stage, .. } if stage == "single-page"));
    }
}
