//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// [paths] Section Defaults
// ============================================================================

pub mod paths {
    use std::path::PathBuf;

    pub fn content() -> PathBuf {
        "content".into()
    }

    pub fn assets() -> PathBuf {
        "sources".into()
    }

    pub fn scripts() -> PathBuf {
        "scripts".into()
    }

    pub fn styles() -> PathBuf {
        "styles".into()
    }

    pub fn layouts() -> PathBuf {
        "layouts".into()
    }

    pub fn dest() -> PathBuf {
        "build".into()
    }
}

// ============================================================================
// [[stages]] Defaults
// ============================================================================

pub mod stages {
    use super::super::StageConfig;
    use toml::{Table, Value};

    /// Pipeline written by `stitch init`.
    pub fn pipeline() -> Vec<StageConfig> {
        vec![
            stage("drafts", None, Table::new()),
            stage("collections", None, collections()),
            stage("markdown", None, Table::new()),
            stage("single-page", None, single_page()),
            stage("layouts", None, Table::new()),
            stage("assets", None, Table::new()),
            stage("minify", Some("production"), Table::new()),
        ]
    }

    fn stage(name: &str, when: Option<&str>, options: Table) -> StageConfig {
        StageConfig {
            name: name.into(),
            when: when.map(Into::into),
            options,
        }
    }

    fn collections() -> Table {
        let mut en = Table::new();
        en.insert("pattern".into(), Value::String("en/*.md".into()));
        en.insert("sort_by".into(), Value::String("order".into()));

        let mut table = Table::new();
        table.insert("en".into(), Value::Table(en));
        table
    }

    fn single_page() -> Table {
        let mut table = Table::new();
        table.insert("path".into(), Value::String("index.html".into()));
        table
    }
}

// ============================================================================
// Stage Option Defaults
// ============================================================================

pub mod single_page {
    pub fn default_lang() -> String {
        "en".into()
    }

    pub const fn max_order() -> usize {
        10_000
    }
}

pub mod assets {
    use std::path::PathBuf;

    pub fn destination() -> PathBuf {
        "".into()
    }
}
