//! Ordered stage execution.
//!
//! ```text
//! [[stages]] ──► from_config() ──► Pipeline { drafts, collections, single-page, ... }
//!                    │
//!                    ├── `when` does not match env ──► skipped
//!                    └── not a built-in            ──► skipped (external tool)
//! ```

use crate::{
    config::SiteConfig,
    files::FileSet,
    log,
    metadata::SiteMetadata,
    plugins::{self, Plugin},
};
use anyhow::{Context, Result};

pub struct Pipeline {
    stages: Vec<Box<dyn Plugin>>,
}

impl Pipeline {
    /// Instantiate the stages of `config` that run in `env`.
    pub fn from_config(config: &SiteConfig, env: &str) -> Result<Self> {
        let mut stages = Vec::with_capacity(config.stages.len());

        for stage in &config.stages {
            if !stage.is_enabled(env) {
                log!("pipeline"; "`{}` skipped (runs in {})", stage.name, stage.when.as_deref().unwrap_or_default());
                continue;
            }
            match plugins::from_stage(stage, config)? {
                Some(plugin) => stages.push(plugin),
                None => log!("pipeline"; "`{}` is not built in, skipped", stage.name),
            }
        }

        Ok(Self { stages })
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run every stage in order; the first failure stops the build.
    pub fn run(&self, files: &mut FileSet, metadata: &mut SiteMetadata) -> Result<()> {
        for stage in &self.stages {
            stage
                .run(files, metadata)
                .with_context(|| format!("Stage `{}` failed", stage.name()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::FileRecord;

    fn config(stages: &str) -> SiteConfig {
        SiteConfig::from_str(stages).unwrap()
    }

    fn page(lang: &str, order: i64, title: &str) -> FileRecord {
        FileRecord {
            contents: title.as_bytes().to_vec(),
            order: Some(order),
            title: Some(title.into()),
            collection: vec![lang.into()],
            ..FileRecord::default()
        }
    }

    const STAGES: &str = r#"
        [[stages]]
        name = "drafts"

        [[stages]]
        name = "markdown"

        [[stages]]
        name = "single-page"
        options = { path = "index.html" }

        [[stages]]
        name = "minify"
        when = "production"
    "#;

    #[test]
    fn test_from_config_filters_env_and_external() {
        let config = config(STAGES);

        let dev = Pipeline::from_config(&config, "development").unwrap();
        assert_eq!(dev.names(), vec!["drafts", "single-page"]);

        let prod = Pipeline::from_config(&config, "production").unwrap();
        assert_eq!(prod.names(), vec!["drafts", "single-page", "minify"]);
    }

    #[test]
    fn test_run_in_order() {
        let pipeline = Pipeline::from_config(
            &config(
                r#"
                [[stages]]
                name = "collections"
                options = { en = { pattern = "en/*.md" }, fr = { pattern = "fr/*.md" } }

                [[stages]]
                name = "single-page"
                options = { path = "index.html" }
                "#,
            ),
            "development",
        )
        .unwrap();

        let mut files = FileSet::new();
        files.insert("en/a.md".into(), FileRecord { collection: vec![], ..page("en", 1, "A") });
        files.insert("fr/c.md".into(), FileRecord { collection: vec![], ..page("fr", 1, "C") });
        let mut meta = SiteMetadata::default();

        pipeline.run(&mut files, &mut meta).unwrap();

        assert_eq!(files.keys().collect::<Vec<_>>(), vec!["fr/index.html", "index.html"]);
        let en = files["index.html"].aggregate.as_ref().unwrap();
        assert_eq!(en.items().map(|i| i.path.as_str()).collect::<Vec<_>>(), vec!["en/a.md"]);
    }

    #[test]
    fn test_run_stops_on_error() {
        let pipeline = Pipeline::from_config(
            &config(
                r#"
                [[stages]]
                name = "single-page"
                options = { path = "index.html", on_invalid_order = "error" }

                [[stages]]
                name = "drafts"
                "#,
            ),
            "development",
        )
        .unwrap();

        let mut files = FileSet::new();
        files.insert("en/a.md".into(), page("en", 1, "A"));
        files.insert("en/b.md".into(), page("en", 1, "B"));
        let mut meta = SiteMetadata::default();
        meta.collections.insert("en".into(), Default::default());

        let err = pipeline.run(&mut files, &mut meta).unwrap_err();
        assert!(err.to_string().contains("single-page"));
        assert!(format!("{err:#}").contains("both have order 1"));
    }

    #[test]
    fn test_bad_options_fail_construction() {
        let result = Pipeline::from_config(
            &config("[[stages]]\nname = \"minify\"\noptions = { shrink = true }\n"),
            "development",
        );
        assert!(result.is_err());
    }
}
