//! The `single-page` stage: one aggregate page per language.
//!
//! Every record whose first collection label is a known language and which
//! carries an `order` is pulled out of the file set and becomes an [`Item`]
//! of that language's aggregate. The aggregate is written to `path` for the
//! default language and to `<lang>/path` for the others.
//!
//! ```text
//! en/b.md {collection: [en], order: 2} ─┐
//! en/a.md {collection: [en], order: 1} ─┼─► index.html     contentItems = [a, b]
//! fr/c.md {collection: [fr], order: 1} ─┴─► fr/index.html  contentItems = [c]
//! ```
//!
//! # Ordering
//!
//! Records are scanned in path order. What happens with duplicate, missing or
//! non-positive orders depends on [`OrderPolicy`].

use super::Plugin;
use crate::{
    config::defaults,
    files::{Aggregate, FileRecord, FileSet, Item},
    log,
    metadata::SiteMetadata,
    utils::slug::link_for,
};
use anyhow::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Options of the `single-page` stage.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SinglePageOptions {
    /// File name of the aggregate.
    pub path: String,

    /// Language written without a directory prefix.
    #[serde(default = "defaults::single_page::default_lang")]
    pub default_lang: String,

    #[serde(default)]
    pub on_invalid_order: OrderPolicy,

    /// Highest accepted `order`. Keeps one stray value from allocating a
    /// huge slot list; larger orders are handled like orders below 1.
    #[serde(default = "defaults::single_page::max_order")]
    pub max_order: usize,
}

/// What to do when a language's orders are not exactly `1..=N`.
///
/// An order is valid when it lies in `1..=max_order`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderPolicy {
    /// Place each item at `order - 1`. Duplicates overwrite (later path wins),
    /// gaps stay empty, orders outside `1..=max_order` are dropped. Each case
    /// is logged.
    #[default]
    Keep,
    /// Sort by order and drop the holes; nothing is lost.
    Compact,
    /// Fail the build, including on any order outside `1..=max_order`.
    Error,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("aggregate `path` must not be empty")]
    EmptyPath,

    #[error("`{first}` and `{second}` both have order {order} in language `{lang}`")]
    DuplicateOrder {
        lang: String,
        order: i64,
        first: String,
        second: String,
    },

    #[error("`{path}` has order {order} in language `{lang}`, orders start at 1")]
    OrderOutOfRange {
        lang: String,
        path: String,
        order: i64,
    },

    #[error("`{path}` has order {order} in language `{lang}`, above `max_order` ({max})")]
    OrderTooLarge {
        lang: String,
        path: String,
        order: i64,
        max: usize,
    },

    #[error("language `{lang}` has no item with order {order}")]
    MissingOrder { lang: String, order: i64 },
}

/// Where the aggregate of `lang` is stored.
pub fn target_path(lang: &str, options: &SinglePageOptions) -> String {
    if lang == options.default_lang {
        options.path.clone()
    } else {
        format!("{lang}/{}", options.path)
    }
}

/// Build one aggregate per language of `metadata.collections`.
///
/// Works in two phases so no record is removed while the set is scanned:
/// the first pass only records which paths belong to which language, the
/// second removes them, builds the items and inserts the aggregates.
pub fn aggregate(
    mut files: FileSet,
    metadata: &SiteMetadata,
    options: &SinglePageOptions,
) -> Result<FileSet, AggregateError> {
    if options.path.is_empty() {
        return Err(AggregateError::EmptyPath);
    }

    let mut matched: BTreeMap<&str, Vec<(String, i64)>> =
        metadata.languages().map(|lang| (lang, Vec::new())).collect();
    for (path, record) in &files {
        let (Some(lang), Some(order)) = (record.lang(), record.order) else {
            continue;
        };
        if let Some(entries) = matched.get_mut(lang) {
            entries.push((path.clone(), order));
        }
    }

    let mut consumed: Vec<(&str, Vec<Item>)> = Vec::with_capacity(matched.len());
    for (lang, entries) in matched {
        let items = entries
            .into_iter()
            .filter_map(|(path, order)| {
                let record = files.remove(&path)?;
                Some(build_item(path, order, record))
            })
            .collect();
        consumed.push((lang, items));
    }

    let mut aggregates = Vec::with_capacity(consumed.len());
    for (lang, items) in consumed {
        let content_items = place(lang, items, options)?;
        aggregates.push((
            target_path(lang, options),
            aggregate_record(lang, metadata, content_items),
        ));
    }

    for (target, record) in aggregates {
        if files.insert(target.clone(), record).is_some() {
            log!("warn"; "`{}` replaced by the aggregate page", target);
        }
    }

    Ok(files)
}

fn build_item(path: String, order: i64, record: FileRecord) -> Item {
    let FileRecord {
        contents,
        collection,
        title,
        mut fields,
        ..
    } = record;

    // The fixed fields win over front matter keys of the same name
    for key in ["path", "link", "contents"] {
        fields.remove(key);
    }

    Item {
        link: link_for(title.as_deref()),
        contents: String::from_utf8_lossy(&contents).into_owned(),
        path,
        title,
        order,
        collection,
        fields,
    }
}

fn aggregate_record(lang: &str, metadata: &SiteMetadata, content_items: Vec<Option<Item>>) -> FileRecord {
    FileRecord {
        aggregate: Some(Aggregate {
            lang_code: lang.to_owned(),
            meta_title: metadata.meta_title.get(lang).cloned(),
            meta_description: metadata.meta_description.get(lang).cloned(),
            copyright: metadata.copyright.get(lang).cloned(),
            site_title: metadata.site_title.clone(),
            content_items,
        }),
        ..FileRecord::default()
    }
}

/// Arrange `items` (in scan order) into slots according to the order policy.
fn place(
    lang: &str,
    items: Vec<Item>,
    options: &SinglePageOptions,
) -> Result<Vec<Option<Item>>, AggregateError> {
    match options.on_invalid_order {
        OrderPolicy::Keep => Ok(place_sparse(lang, items, options.max_order)),
        OrderPolicy::Compact => Ok(place_compact(items)),
        OrderPolicy::Error => place_strict(lang, items, options.max_order),
    }
}

fn place_sparse(lang: &str, items: Vec<Item>, max_order: usize) -> Vec<Option<Item>> {
    let mut slots: Vec<Option<Item>> = Vec::new();

    for item in items {
        let index = match slot_index(lang, &item, max_order) {
            Ok(index) => index,
            Err(err) => {
                log!("warn"; "{}; item dropped", err);
                continue;
            }
        };
        if index >= slots.len() {
            slots.resize_with(index + 1, || None);
        }
        let path = item.path.clone();
        if let Some(previous) = slots[index].replace(item) {
            log!("warn"; "`{}` overwritten by `{}` at order {} ({})", previous.path, path, index + 1, lang);
        }
    }

    let holes = slots.iter().filter(|slot| slot.is_none()).count();
    if holes > 0 {
        log!("warn"; "{} empty slot(s) in the `{}` aggregate", holes, lang);
    }

    slots
}

fn place_compact(mut items: Vec<Item>) -> Vec<Option<Item>> {
    // Stable: equal orders keep their scan order
    items.sort_by_key(|item| item.order);
    items.into_iter().map(Some).collect()
}

fn place_strict(
    lang: &str,
    mut items: Vec<Item>,
    max_order: usize,
) -> Result<Vec<Option<Item>>, AggregateError> {
    for item in &items {
        slot_index(lang, item, max_order)?;
    }

    items.sort_by_key(|item| item.order);

    if let Some(pair) = items.windows(2).find(|pair| pair[0].order == pair[1].order) {
        return Err(AggregateError::DuplicateOrder {
            lang: lang.to_owned(),
            order: pair[0].order,
            first: pair[0].path.clone(),
            second: pair[1].path.clone(),
        });
    }

    // Sorted and unique: any gap shows up as the first index whose order differs
    if let Some(missing) = (1..).zip(&items).find(|(expected, item)| item.order != *expected) {
        return Err(AggregateError::MissingOrder {
            lang: lang.to_owned(),
            order: missing.0,
        });
    }

    Ok(items.into_iter().map(Some).collect())
}

/// Zero-based slot of the item's 1-based order.
fn slot_index(lang: &str, item: &Item, max_order: usize) -> Result<usize, AggregateError> {
    let Some(index) = item
        .order
        .checked_sub(1)
        .and_then(|index| usize::try_from(index).ok())
    else {
        return Err(AggregateError::OrderOutOfRange {
            lang: lang.to_owned(),
            path: item.path.clone(),
            order: item.order,
        });
    };

    if index >= max_order {
        return Err(AggregateError::OrderTooLarge {
            lang: lang.to_owned(),
            path: item.path.clone(),
            order: item.order,
            max: max_order,
        });
    }
    Ok(index)
}

// ============================================================================
// Stage
// ============================================================================

/// Pipeline wrapper around [`aggregate`].
pub struct SinglePage {
    options: SinglePageOptions,
}

impl SinglePage {
    pub const fn new(options: SinglePageOptions) -> Self {
        Self { options }
    }
}

impl Plugin for SinglePage {
    fn name(&self) -> &'static str {
        "single-page"
    }

    fn run(&self, files: &mut FileSet, metadata: &mut SiteMetadata) -> Result<()> {
        let input = std::mem::take(files);
        *files = aggregate(input, metadata, &self.options)?;

        for lang in metadata.languages() {
            let target = target_path(lang, &self.options);
            let count = files
                .get(&target)
                .and_then(|record| record.aggregate.as_ref())
                .map_or(0, |aggregate| aggregate.items().count());
            log!("single-page"; "{} <- {} item(s) [{}]", target, count, lang);
        }
        Ok(())
    }
}
