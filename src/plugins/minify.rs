//! The `minify` stage: shrink HTML records with `minify_html`.
//!
//! Only `.html`/`.htm` records are touched; usually gated with
//! `when = "production"`.

use super::Plugin;
use crate::{files::FileSet, log, metadata::SiteMetadata};
use anyhow::Result;
use educe::Educe;
use serde::Deserialize;

const HTML_EXTENSIONS: &[&str] = &[".html", ".htm"];

#[derive(Debug, Clone, PartialEq, Educe, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct MinifyOptions {
    #[educe(Default = true)]
    pub keep_closing_tags: bool,

    pub keep_comments: bool,

    #[educe(Default = true)]
    pub minify_css: bool,

    #[educe(Default = true)]
    pub minify_js: bool,
}

pub struct Minify {
    cfg: minify_html::Cfg,
}

impl Minify {
    pub fn new(options: MinifyOptions) -> Self {
        let mut cfg = minify_html::Cfg::new();
        cfg.keep_closing_tags = options.keep_closing_tags;
        cfg.keep_html_and_head_opening_tags = true;
        cfg.keep_comments = options.keep_comments;
        cfg.minify_css = options.minify_css;
        cfg.minify_js = options.minify_js;
        cfg.remove_bangs = true;
        cfg.remove_processing_instructions = true;
        Self { cfg }
    }
}

impl Plugin for Minify {
    fn name(&self) -> &'static str {
        "minify"
    }

    fn run(&self, files: &mut FileSet, _metadata: &mut SiteMetadata) -> Result<()> {
        let mut count = 0;
        for (_, record) in files.iter_mut().filter(|(path, _)| is_html(path)) {
            record.contents = minify_html::minify(&record.contents, &self.cfg);
            count += 1;
        }
        log!("minify"; "{} html file(s)", count);
        Ok(())
    }
}

fn is_html(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    HTML_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}
