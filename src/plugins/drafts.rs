//! The `drafts` stage: drop unpublished pages.

use super::Plugin;
use crate::{files::FileSet, log, metadata::SiteMetadata};
use anyhow::Result;

pub struct Drafts;

impl Plugin for Drafts {
    fn name(&self) -> &'static str {
        "drafts"
    }

    fn run(&self, files: &mut FileSet, _metadata: &mut SiteMetadata) -> Result<()> {
        let before = files.len();
        files.retain(|_, record| !record.draft);

        let removed = before - files.len();
        if removed > 0 {
            log!("drafts"; "skipped {} draft(s)", removed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::FileRecord;

    #[test]
    fn test_drafts_removed() {
        let mut files = FileSet::new();
        files.insert("a.md".into(), FileRecord::default());
        files.insert(
            "b.md".into(),
            FileRecord {
                draft: true,
                ..FileRecord::default()
            },
        );

        Drafts.run(&mut files, &mut SiteMetadata::default()).unwrap();

        assert_eq!(files.keys().collect::<Vec<_>>(), vec!["a.md"]);
    }
}
