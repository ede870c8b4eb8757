//! Site metadata shared by the pipeline stages.
//!
//! The configured part (`[metadata]` in `site.toml`) is fixed for a build;
//! the `collections` stage fills in [`SiteMetadata::collections`]. The
//! `single-page` stage only ever reads it.

use crate::config::MetadataConfig;
use crate::files::Fields;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-language strings, keyed by language code.
pub type LangMap = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SiteMetadata {
    pub site_title: Option<String>,
    pub meta_title: LangMap,
    pub meta_description: LangMap,
    pub copyright: LangMap,

    /// Free-form site values (url, title, ...) for templates.
    pub site: Fields,

    /// Known groups, keyed by name. Each key is also a language code for the
    /// `single-page` stage.
    pub collections: BTreeMap<String, Collection>,
}

/// Members of one collection, in the collection's sort order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Collection {
    pub members: Vec<String>,
    #[serde(skip_serializing_if = "Fields::is_empty")]
    pub metadata: Fields,
}

impl SiteMetadata {
    pub fn from_config(config: &MetadataConfig) -> Self {
        let site = match serde_json::to_value(&config.site) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => Fields::new(),
        };

        Self {
            site_title: config.site_title.clone(),
            meta_title: config.meta_title.clone(),
            meta_description: config.meta_description.clone(),
            copyright: config.copyright.clone(),
            site,
            collections: BTreeMap::new(),
        }
    }

    /// Language codes in ascending order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use serde_json::json;

    #[test]
    fn test_from_config_copies_language_maps() {
        let config = SiteConfig::from_str(
            r#"
            [metadata]
            site_title = "dPavelescu"

            [metadata.site]
            url = "dpavelescu.com"

            [metadata.meta_title]
            en = "Home"
            fr = "Accueil"

            [metadata.copyright]
            en = "All rights reserved"
            "#,
        )
        .unwrap();

        let meta = SiteMetadata::from_config(&config.metadata);

        assert_eq!(meta.site_title.as_deref(), Some("dPavelescu"));
        assert_eq!(meta.meta_title["fr"], "Accueil");
        assert_eq!(meta.copyright.get("fr"), None);
        assert!(meta.meta_description.is_empty());
        assert_eq!(meta.site.get("url"), Some(&json!("dpavelescu.com")));
        assert!(meta.collections.is_empty());
    }

    #[test]
    fn test_languages_sorted() {
        let mut meta = SiteMetadata::default();
        meta.collections.insert("fr".into(), Collection::default());
        meta.collections.insert("en".into(), Collection::default());

        assert_eq!(meta.languages().collect::<Vec<_>>(), vec!["en", "fr"]);
    }
}
