//! Code for splicing the featured-posts section into the site homepage.

use crate::builder::FEATURED_SECTION_MARKER;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::{create_dir_all, read_to_string, write};

/// The featured-posts section is inserted right before this element.
pub const INSERTION_MARKER: &str = r#"<div class="support-section">"#;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HomepageOutcome {
    /// The section was inserted and the homepage rewritten.
    Patched,
    /// The homepage already had a featured-posts section, so nothing was written.
    AlreadyPatched,
    /// The insertion marker was missing; the homepage was written without changes.
    MarkerMissing,
    /// None of the candidate homepage files exist.
    NotFound,
}

/// Inserts `section` into the first existing homepage among `sources` and writes the result to `target`.
///
/// # Errors
/// This function returns an error if the homepage cannot be read, or the patched homepage cannot be written.
pub fn patch_homepage(
    sources: &[Utf8PathBuf],
    target: &Utf8Path,
    section: &str,
) -> Result<HomepageOutcome> {
    let Some(source) = sources.iter().find(|path| path.is_file()) else {
        return Ok(HomepageOutcome::NotFound);
    };

    let html = read_to_string(source).with_context(|| format!("failed to read homepage at {source}"))?;

    if html.contains(FEATURED_SECTION_MARKER) {
        return Ok(HomepageOutcome::AlreadyPatched);
    }

    let (html, outcome) = match insert_section(&html, section) {
        Some(patched) => (patched, HomepageOutcome::Patched),
        None => (html, HomepageOutcome::MarkerMissing),
    };

    if let Some(parent) = target.parent().filter(|parent| !parent.as_str().is_empty()) {
        create_dir_all(parent).with_context(|| format!("failed to create directory {parent}"))?;
    }

    write(target, html).with_context(|| format!("failed to write homepage to {target}"))?;

    Ok(outcome)
}

fn insert_section(html: &str, section: &str) -> Option<String> {
    let index = html.find(INSERTION_MARKER)?;

    let mut patched = String::with_capacity(html.len() + section.len() + 2);
    patched.push_str(&html[..index]);
    patched.push_str(section);
    patched.push_str("\n\n");
    patched.push_str(&html[index..]);

    Some(patched)
}

#[cfg(test)]
mod test {
    use super::{patch_homepage, HomepageOutcome};
    use camino::Utf8PathBuf;
    use std::fs::{read_to_string, write};

    const SECTION: &str = "<div class=\"featured-posts-section\">posts</div>";

    fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().expect("temporary directory should be created");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_owned()).expect("path should be UTF-8");
        (dir, root)
    }

    #[test]
    fn inserts_before_first_marker() {
        let (_dir, root) = temp_root();
        let home = root.join("index.html");
        write(
            &home,
            "<main><div class=\"support-section\">a</div><div class=\"support-section\">b</div></main>",
        )
        .expect("homepage should be written");

        let outcome = patch_homepage(&[home.clone()], &home, SECTION).expect("patching should succeed");

        assert_eq!(outcome, HomepageOutcome::Patched);
        assert_eq!(
            read_to_string(&home).expect("homepage should be readable"),
            "<main><div class=\"featured-posts-section\">posts</div>\n\n<div class=\"support-section\">a</div><div class=\"support-section\">b</div></main>"
        );
    }

    #[test]
    fn patching_twice_changes_nothing() {
        let (_dir, root) = temp_root();
        let home = root.join("index.html");
        write(&home, "<body><div class=\"support-section\"></div></body>").expect("homepage should be written");

        patch_homepage(&[home.clone()], &home, SECTION).expect("patching should succeed");
        let once = read_to_string(&home).expect("homepage should be readable");

        let outcome = patch_homepage(&[home.clone()], &home, SECTION).expect("patching should succeed");
        assert_eq!(outcome, HomepageOutcome::AlreadyPatched);
        assert_eq!(read_to_string(&home).expect("homepage should be readable"), once);
    }

    #[test]
    fn falls_back_to_later_sources() {
        let (_dir, root) = temp_root();
        let dist_home = root.join("dist/index.html");
        let home = root.join("index.html");
        write(&home, "<div class=\"support-section\"></div>").expect("homepage should be written");

        let outcome = patch_homepage(&[dist_home.clone(), home.clone()], &dist_home, SECTION)
            .expect("patching should succeed");

        assert_eq!(outcome, HomepageOutcome::Patched);
        assert!(read_to_string(&dist_home)
            .expect("patched homepage should be written to the target")
            .starts_with(SECTION));
        assert_eq!(
            read_to_string(&home).expect("source should be readable"),
            "<div class=\"support-section\"></div>",
            "the source homepage should be left alone"
        );
    }

    #[test]
    fn missing_marker_and_missing_file() {
        let (_dir, root) = temp_root();
        let home = root.join("index.html");

        assert_eq!(
            patch_homepage(&[home.clone()], &home, SECTION).expect("a missing homepage is not an error"),
            HomepageOutcome::NotFound
        );

        write(&home, "<body></body>").expect("homepage should be written");
        assert_eq!(
            patch_homepage(&[home.clone()], &home, SECTION).expect("patching should succeed"),
            HomepageOutcome::MarkerMissing
        );
        assert_eq!(read_to_string(&home).expect("homepage should be readable"), "<body></body>");
    }
}
