//! The `collections` stage: group records and register the groups.
//!
//! A record joins a collection when its path matches the collection's glob
//! `pattern`, or when its front matter already lists the collection. Joined
//! names are appended to the record's `collection` labels, so a front matter
//! label always stays first; pattern matches follow in collection-name order.
//!
//! ```toml
//! [[stages]]
//! name = "collections"
//!
//! [stages.options.en]
//! pattern = "en/*.md"
//! sort_by = "order"
//!
//! [stages.options.fr]
//! pattern = "fr/*.md"
//! sort_by = "order"
//! metadata = { title = "Français" }
//! ```
//!
//! Every configured collection is registered in the site metadata, even when
//! nothing matches it.

use super::Plugin;
use crate::{
    files::{FileRecord, FileSet, Fields},
    log,
    metadata::{Collection, SiteMetadata},
};
use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// `*` must not cross directories; use `**` for nested paths
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Options of one collection.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionOptions {
    pub pattern: Option<String>,

    /// `order`, `title`, `path` or any front matter field.
    pub sort_by: Option<String>,

    #[serde(default)]
    pub reverse: bool,

    /// Extra values stored with the collection in the site metadata.
    #[serde(default)]
    pub metadata: toml::Table,
}

pub type CollectionsOptions = BTreeMap<String, CollectionOptions>;

pub struct Collections {
    collections: Vec<(String, Option<Pattern>, CollectionOptions)>,
}

impl Collections {
    pub fn new(options: CollectionsOptions) -> Result<Self> {
        let collections = options
            .into_iter()
            .map(|(name, options)| -> Result<(String, Option<Pattern>, CollectionOptions)> {
                let pattern = options
                    .pattern
                    .as_deref()
                    .map(Pattern::new)
                    .transpose()
                    .with_context(|| format!("Invalid pattern for collection `{name}`"))?;
                Ok((name, pattern, options))
            })
            .collect::<Result<_>>()?;
        Ok(Self { collections })
    }
}

impl Plugin for Collections {
    fn name(&self) -> &'static str {
        "collections"
    }

    fn run(&self, files: &mut FileSet, metadata: &mut SiteMetadata) -> Result<()> {
        for (name, pattern, _) in &self.collections {
            let Some(pattern) = pattern else { continue };
            for (path, record) in files.iter_mut() {
                if pattern.matches_with(path, MATCH_OPTIONS) && !record.collection.contains(name) {
                    record.collection.push(name.clone());
                }
            }
        }

        let mut members: BTreeMap<String, Vec<String>> = self
            .collections
            .iter()
            .map(|(name, _, _)| (name.clone(), Vec::new()))
            .collect();
        for (path, record) in files.iter() {
            for name in &record.collection {
                members.entry(name.clone()).or_default().push(path.clone());
            }
        }

        for (name, mut paths) in members {
            let options = self
                .collections
                .iter()
                .find(|(configured, _, _)| *configured == name)
                .map(|(_, _, options)| options);

            if let Some(key) = options.and_then(|o| o.sort_by.as_deref()) {
                paths.sort_by_cached_key(|path| SortKey::of(&files[path], path, key));
            }
            if options.is_some_and(|o| o.reverse) {
                paths.reverse();
            }

            log!("collections"; "{}: {} member(s)", name, paths.len());
            metadata.collections.insert(
                name,
                Collection {
                    members: paths,
                    metadata: options.map(|o| to_fields(&o.metadata)).unwrap_or_default(),
                },
            );
        }

        Ok(())
    }
}

/// Sort value of a record; numbers before text, missing values last.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Number(i64),
    Text(String),
    Missing,
}

impl SortKey {
    fn of(record: &FileRecord, path: &str, key: &str) -> Self {
        match key {
            "order" => record.order.map_or(Self::Missing, Self::Number),
            "title" => record.title.clone().map_or(Self::Missing, Self::Text),
            "path" => Self::Text(path.to_owned()),
            field => match record.fields.get(field) {
                None | Some(Value::Null) => Self::Missing,
                Some(Value::Number(n)) if n.is_i64() => n.as_i64().map_or(Self::Missing, Self::Number),
                Some(Value::String(s)) => Self::Text(s.clone()),
                Some(other) => Self::Text(other.to_string()),
            },
        }
    }
}

fn to_fields(table: &toml::Table) -> Fields {
    match serde_json::to_value(table) {
        Ok(Value::Object(map)) => map,
        _ => Fields::new(),
    }
}
