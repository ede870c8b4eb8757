//! Site building orchestration.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── read_content()      content/ ──► FileSet
//!     │
//!     ├── Pipeline::run()     drafts ──► collections ──► single-page ──► ...
//!     │
//!     └── write_output()      FileSet ──► dest/
//! ```

use crate::{
    config::SiteConfig,
    files::{FileSet, load::read_content, write::write_output},
    log,
    logger,
    metadata::SiteMetadata,
    pipeline::Pipeline,
};
use anyhow::{Context, Result};
use serde::Serialize;

/// Settings of one build invocation.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub env: String,
    pub clean: bool,
    pub dump: bool,
}

/// What `--dump` prints.
#[derive(Serialize)]
struct Dump<'a> {
    metadata: &'a SiteMetadata,
    files: &'a FileSet,
}

/// Load, transform and write the site. Returns the final file set.
///
/// With `dump` set, stdout carries only the JSON of the final file set; logs
/// and the progress bar go to stderr.
pub fn build_site(config: &SiteConfig, options: &BuildOptions) -> Result<FileSet> {
    if options.dump {
        logger::use_stderr();
    }

    let pipeline = Pipeline::from_config(config, &options.env)?;
    log!("build"; "env `{}`, stages: {}", options.env, pipeline.names().join(" -> "));

    let mut files = read_content(&config.paths.content)?;
    log!("build"; "loaded {} file(s) from {}", files.len(), config.paths.content.display());

    let mut metadata = SiteMetadata::from_config(&config.metadata);
    pipeline.run(&mut files, &mut metadata)?;

    let written = write_output(&files, &config.paths.dest, options.clean)?;

    if options.dump {
        println!("{}", dump_json(&metadata, &files)?);
    }

    if written == 0 {
        log!("warn"; "output is empty, check [paths.content] and the stage list");
    } else {
        log!("build"; "done, {} file(s) in {}", written, config.paths.dest.display());
    }

    Ok(files)
}

fn dump_json(metadata: &SiteMetadata, files: &FileSet) -> Result<String> {
    let dump = Dump { metadata, files };
    serde_json::to_string_pretty(&dump).context("Failed to serialize file set")
}
