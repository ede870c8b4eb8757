//! YAML front matter extraction.
//!
//! A front matter block opens on the first line with `---` and closes on the
//! next line that is exactly `---`:
//!
//! ```text
//! ---
//! title: About us
//! collection: en
//! order: 2
//! ---
//! Body text...
//! ```
//!
//! `title`, `order`, `collection` and `draft` are lifted into typed fields,
//! everything else is kept as-is in [`FrontMatter::fields`].

use super::Fields;
use serde_json::Value;
use thiserror::Error;

const FENCE: &str = "---";

#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("invalid YAML front matter")]
    Yaml(#[from] serde_yaml::Error),

    #[error("front matter must be a mapping, found {0}")]
    NotAMapping(&'static str),

    #[error("`order` must be an integer, found `{0}`")]
    InvalidOrder(Value),

    #[error("`collection` must be a string or a list of strings, found `{0}`")]
    InvalidCollection(Value),
}

/// Typed view of a front matter block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub order: Option<i64>,
    pub collection: Vec<String>,
    pub draft: bool,
    pub fields: Fields,
}

/// Split `source` into its front matter and the remaining body.
///
/// Sources without an opening fence, or whose fence is never closed, are
/// returned whole with an empty [`FrontMatter`].
pub fn split(source: &[u8]) -> Result<(FrontMatter, &[u8]), FrontMatterError> {
    let Ok(text) = std::str::from_utf8(source) else {
        return Ok((FrontMatter::default(), source));
    };
    let Some((yaml, body_start)) = locate(text) else {
        return Ok((FrontMatter::default(), source));
    };

    let front_matter = parse(yaml)?;
    Ok((front_matter, &source[body_start..]))
}

/// Find the YAML block and the byte offset where the body starts.
fn locate(text: &str) -> Option<(&str, usize)> {
    let first_line_end = text.find('\n')?;
    if text[..first_line_end].trim_end() != FENCE {
        return None;
    }

    let yaml_start = first_line_end + 1;
    let mut offset = yaml_start;
    for line in text[yaml_start..].split_inclusive('\n') {
        if line.trim_end() == FENCE {
            return Some((&text[yaml_start..offset], offset + line.len()));
        }
        offset += line.len();
    }
    None
}

fn parse(yaml: &str) -> Result<FrontMatter, FrontMatterError> {
    if yaml.trim().is_empty() {
        return Ok(FrontMatter::default());
    }

    let mut fields = match serde_yaml::from_str::<Value>(yaml)? {
        Value::Null => Fields::new(),
        Value::Object(map) => map,
        other => return Err(FrontMatterError::NotAMapping(kind(&other))),
    };

    let title = fields.remove("title").and_then(|value| match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    });

    let order = match fields.remove("order") {
        None => None,
        Some(value) => Some(
            value
                .as_i64()
                .ok_or(FrontMatterError::InvalidOrder(value))?,
        ),
    };

    let collection = match fields.remove("collection") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(name)) => vec![name],
        Some(Value::Array(names)) => names
            .into_iter()
            .map(|name| match name {
                Value::String(s) => Ok(s),
                other => Err(FrontMatterError::InvalidCollection(other)),
            })
            .collect::<Result<_, _>>()?,
        Some(other) => return Err(FrontMatterError::InvalidCollection(other)),
    };

    let draft = fields
        .remove("draft")
        .and_then(|value| value.as_bool())
        .unwrap_or(false);

    Ok(FrontMatter {
        title,
        order,
        collection,
        draft,
        fields,
    })
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_extracts_known_keys() {
        let source = b"---\ntitle: About us\norder: 2\ncollection: en\nlayout: page.hbs\n---\nBody\n";
        let (fm, body) = split(source).unwrap();

        assert_eq!(fm.title.as_deref(), Some("About us"));
        assert_eq!(fm.order, Some(2));
        assert_eq!(fm.collection, vec!["en".to_string()]);
        assert!(!fm.draft);
        assert_eq!(fm.fields.get("layout"), Some(&json!("page.hbs")));
        assert!(!fm.fields.contains_key("title"));
        assert_eq!(body, b"Body\n");
    }

    #[test]
    fn test_split_collection_list() {
        let source = b"---\ncollection: [fr, home]\n---\n";
        let (fm, body) = split(source).unwrap();

        assert_eq!(fm.collection, vec!["fr".to_string(), "home".to_string()]);
        assert!(body.is_empty());
    }

    #[test]
    fn test_split_without_front_matter() {
        let source = b"# Just markdown\n";
        let (fm, body) = split(source).unwrap();

        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, source);
    }

    #[test]
    fn test_split_unclosed_fence_is_body() {
        let source = b"---\ntitle: never closed\n";
        let (fm, body) = split(source).unwrap();

        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, source);
    }

    #[test]
    fn test_split_empty_block() {
        let (fm, body) = split(b"---\n---\nrest").unwrap();

        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, b"rest");
    }

    #[test]
    fn test_split_crlf_fences() {
        let (fm, body) = split(b"---\r\ntitle: Windows\r\n---\r\nbody").unwrap();

        assert_eq!(fm.title.as_deref(), Some("Windows"));
        assert_eq!(body, b"body");
    }

    #[test]
    fn test_split_binary_passthrough() {
        let source = [0xff, 0xfe, 0x00, 0x2d];
        let (fm, body) = split(&source).unwrap();

        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, source);
    }

    #[test]
    fn test_draft_flag() {
        let (fm, _) = split(b"---\ndraft: true\n---\n").unwrap();
        assert!(fm.draft);
    }

    #[test]
    fn test_numeric_title_is_stringified() {
        let (fm, _) = split(b"---\ntitle: 2024\n---\n").unwrap();
        assert_eq!(fm.title.as_deref(), Some("2024"));
    }

    #[test]
    fn test_invalid_order_rejected() {
        let err = split(b"---\norder: first\n---\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::InvalidOrder(_)));
        assert!(err.to_string().contains("first"));
    }

    #[test]
    fn test_invalid_collection_rejected() {
        let err = split(b"---\ncollection: [en, 3]\n---\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::InvalidCollection(_)));
    }

    #[test]
    fn test_non_mapping_rejected() {
        let err = split(b"---\n- a\n- b\n---\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::NotAMapping("a list")));
    }

    #[test]
    fn test_invalid_yaml_rejected() {
        let err = split(b"---\ntitle: [unclosed\n---\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::Yaml(_)));
    }
}
