//! In-memory file set passed between pipeline stages.
//!
//! # Architecture
//!
//! ```text
//! content/ ──► load::read_content() ──► FileSet ──► stages ──► write::write_output() ──► dest/
//!                     │                                  │
//!                     └── frontmatter::split()           └── may add, mutate or remove records
//! ```
//!
//! Keys are `/`-separated paths relative to the content directory; the same
//! key becomes the output path under the destination directory.

pub mod frontmatter;
pub mod load;
pub mod write;

use frontmatter::FrontMatter;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Free-form front matter fields that have no typed slot.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// The working file set, ordered by path.
///
/// Ordered iteration makes every stage deterministic, including which record
/// "comes later" when two records compete for the same slot.
pub type FileSet = BTreeMap<String, FileRecord>;

/// One entry of the [`FileSet`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileRecord {
    #[serde(serialize_with = "bytes_as_text")]
    pub contents: Vec<u8>,

    /// Group labels; the first one is the language of the page.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub collection: Vec<String>,

    /// 1-based position inside the page's language aggregate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub draft: bool,

    #[serde(flatten)]
    pub fields: Fields,

    /// Present only on records synthesized by the `single-page` stage.
    #[serde(flatten)]
    pub aggregate: Option<Aggregate>,
}

impl FileRecord {
    /// A record with raw contents and no metadata (assets, binary files).
    pub fn raw(contents: Vec<u8>) -> Self {
        Self {
            contents,
            ..Self::default()
        }
    }

    pub fn with_front_matter(front_matter: FrontMatter, contents: Vec<u8>) -> Self {
        Self {
            contents,
            collection: front_matter.collection,
            order: front_matter.order,
            title: front_matter.title,
            draft: front_matter.draft,
            fields: front_matter.fields,
            aggregate: None,
        }
    }

    /// Language of the record: the first collection label.
    pub fn lang(&self) -> Option<&str> {
        self.collection.first().map(String::as_str)
    }
}

/// Payload of a synthesized per-language aggregate record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregate {
    #[serde(rename = "langCode")]
    pub lang_code: String,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub copyright: Option<String>,
    pub site_title: Option<String>,

    /// Slot `n` holds the item whose `order` is `n + 1`; `None` is a hole.
    #[serde(rename = "contentItems")]
    pub content_items: Vec<Option<Item>>,
}

impl Aggregate {
    /// Items in slot order, skipping holes.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.content_items.iter().flatten()
    }
}

/// Summary of one consumed source record inside an [`Aggregate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Item {
    /// Path the record had in the file set.
    pub path: String,

    /// Anchor slug derived from the title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    pub contents: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub order: i64,

    pub collection: Vec<String>,

    #[serde(flatten)]
    pub fields: Fields,
}

fn bytes_as_text<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(bytes))
}
