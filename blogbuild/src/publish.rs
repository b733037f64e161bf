//! Code for managing files in the output directories: cleaning, redirects and static assets.

use crate::config::{Config, StaticAssets, BLOG_DIR};
use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs::{copy, read_dir, remove_file, write};
use tracing::info;

/// Removes every regular file directly inside `dir`, leaving subdirectories alone.
/// Returns the number of files removed.
///
/// # Errors
/// This function returns an error if the directory cannot be listed or a file cannot be removed.
pub fn clean_dir(dir: &Utf8Path) -> Result<usize> {
    let mut removed = 0;

    for entry in read_dir(dir).with_context(|| format!("failed to read directory {dir}"))? {
        let entry = entry.with_context(|| format!("failed to read entry in {dir}"))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("failed to read file type of {:?}", entry.path()))?;

        if file_type.is_file() {
            remove_file(entry.path())
                .with_context(|| format!("failed to remove {:?}", entry.path()))?;
            info!("deleted {}", entry.file_name().to_string_lossy());
            removed += 1;
        }
    }

    Ok(removed)
}

/// Renders the redirect rules mapping each post's clean URL to its HTML file.
#[must_use]
pub fn redirect_rules<'a>(slugs: impl IntoIterator<Item = &'a str>) -> String {
    let mut rules = String::from("# Blog post specific redirects - auto-generated\n\n");

    for slug in slugs {
        rules.push_str(&format!(
            "/{BLOG_DIR}/{slug}    /{BLOG_DIR}/{slug}.html    200\n"
        ));
    }

    rules
}

/// Writes redirect rules for `slugs` to `path`.
///
/// # Errors
/// This function returns an error if the file cannot be written.
pub fn write_redirects<'a>(path: &Utf8Path, slugs: impl IntoIterator<Item = &'a str>) -> Result<()> {
    write(path, redirect_rules(slugs))
        .with_context(|| format!("failed to write redirects file to {path}"))
}

/// Copies static pages into the output directory unless already there,
/// then copies the site-wide redirects file, replacing any existing copy.
/// Missing source files are skipped. Returns the number of files copied.
///
/// # Errors
/// This function returns an error if copying an existing file fails.
pub fn copy_static_assets(config: &Config, assets: &StaticAssets) -> Result<usize> {
    let mut copied = 0;

    for page in assets.pages.iter() {
        let (source, destination) = config.static_page_paths(page);

        if source.is_file() && !destination.exists() {
            info!("copying {page} to {}", config.output_dir);
            copy(&source, &destination)
                .with_context(|| format!("failed to copy {source} to {destination}"))?;
            copied += 1;
        }
    }

    if assets.redirects.is_file() {
        let destination = config.output_dir.join("_redirects");
        info!("copying {} to {destination}", assets.redirects);
        copy(&assets.redirects, &destination)
            .with_context(|| format!("failed to copy {} to {destination}", assets.redirects))?;
        copied += 1;
    }

    Ok(copied)
}
