//! Textual rewrites applied to raw post content before and around Markdown rendering.
//!
//! Word character classes are ASCII-only, so accented letters are dropped from slugs
//! and end inline headings.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Alt text given to bare image URLs that get promoted to Markdown images.
pub const IMAGE_ALT_TEXT: &str = "Interior design";

// A level-1 heading at the start of a line. The heading text ends before two whitespace characters,
// a newline, or the end of the line; the terminator is matched but never removed.
static TITLE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^#\s+(.+?)(?:\s{2}|\n|$)").expect("title heading pattern is valid")
});

static INLINE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\s+)(#{2,4}\s+[[:word:]\s\-:&',]+)(\s+)")
        .expect("inline heading pattern is valid")
});

// The first alternative swallows existing Markdown images so that their URLs are left alone.
static IMAGE_OR_BARE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<image>!\[[^\]]*\]\([^)]*\))|(?P<url>https://\S+\.(?:jpg|jpeg|png|gif))")
        .expect("image URL pattern is valid")
});

static MARKDOWN_IMAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[.*?\]\((https://[^\s)]+\.(?:jpg|jpeg|png|gif))\)")
        .expect("Markdown image pattern is valid")
});

static BARE_IMAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://\S+\.(?:jpg|jpeg|png|gif)").expect("bare image URL pattern is valid")
});

// Code, links, images and raw HTML tags are matched first so that URLs inside them are left alone.
static BARE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)(?P<skip>```.*?```|`[^`\n]*`|!?\[[^\]]*\]\([^)]*\)|<[^>\n]*>)|(?P<url>https?://[^\s<>()\[\]`"]+)"#,
    )
    .expect("bare URL pattern is valid")
});

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^[:word:]\s-]").expect("slug character pattern is valid"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

static HYPHEN_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-+").expect("hyphen pattern is valid"));

/// Looks for a level-1 Markdown heading in `content`.
/// If one is found, returns the trimmed heading text
/// along with the content with that heading removed (first occurrence only).
#[must_use]
pub fn extract_title(content: &str) -> Option<(String, String)> {
    let captures = TITLE_HEADING.captures(content)?;
    let whole = captures.get(0)?;
    let heading = captures.get(1)?;

    let title = heading.as_str().trim();
    if title.is_empty() {
        return None;
    }

    let mut remaining = String::with_capacity(content.len());
    remaining.push_str(&content[..whole.start()]);
    remaining.push_str(&content[heading.end()..]);

    Some((title.to_owned(), remaining))
}

/// Moves level-2 to level-4 heading markers that appear mid-text onto their own paragraph,
/// so that the Markdown renderer treats them as headings.
#[must_use]
pub fn normalize_headings(content: &str) -> String {
    INLINE_HEADING
        .replace_all(content, "\n\n${2}\n\n")
        .into_owned()
}

/// Wraps bare image URLs into Markdown image syntax, each in its own paragraph.
/// URLs that are already part of a Markdown image are left untouched.
#[must_use]
pub fn wrap_image_urls(content: &str) -> String {
    IMAGE_OR_BARE_URL
        .replace_all(content, |captures: &Captures<'_>| match captures.name("url") {
            Some(url) => format!("\n\n![{IMAGE_ALT_TEXT}]({})\n\n", url.as_str()),
            None => captures[0].to_owned(),
        })
        .into_owned()
}

/// Turns bare `http://` and `https://` URLs into Markdown autolinks.
/// Trailing punctuation is kept outside the link.
#[must_use]
pub fn link_bare_urls(content: &str) -> String {
    BARE_URL
        .replace_all(content, |captures: &Captures<'_>| match captures.name("url") {
            Some(url) => {
                let url = url.as_str();
                let link = url.trim_end_matches(|c: char| {
                    matches!(c, '.' | ',' | ':' | ';' | '!' | '?' | '*' | '_' | '~' | '\'')
                });
                format!("<{link}>{}", &url[link.len()..])
            }
            None => captures[0].to_owned(),
        })
        .into_owned()
}

/// Finds the URL of the image to feature for a post.
/// Markdown images take priority over bare URLs anywhere in the content.
#[must_use]
pub fn find_featured_image(content: &str) -> Option<&str> {
    MARKDOWN_IMAGE_URL
        .captures(content)
        .and_then(|captures| captures.get(1))
        .or_else(|| BARE_IMAGE_URL.find(content))
        .map(|url| url.as_str())
}

/// Derives a URL-safe identifier from a post title.
///
/// The result only contains lowercase ASCII word characters and single hyphens,
/// and never starts or ends with a hyphen; slugifying a slug returns it unchanged.
#[must_use]
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(&lowered, "");
    let hyphenated = WHITESPACE_RUN.replace_all(&stripped, "-");
    let collapsed = HYPHEN_RUN.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_owned()
}
