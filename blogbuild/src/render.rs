//! Utilities for turning post Markdown into HTML and pulling plain-text excerpts back out of it.

use pulldown_cmark::{html::push_html, Options, Parser};
use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

/// Number of characters kept from the first paragraph when building an excerpt.
pub const EXCERPT_LENGTH: usize = 150;

/// Excerpt used when a post has no paragraph to take one from.
pub const FALLBACK_EXCERPT: &str = "Read this blog post about interior design trends and tips...";

// Paragraphs spanning several lines are not considered.
static FIRST_PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<p>(.*?)</p>").expect("paragraph pattern is valid"));

/// Converts Markdown into an HTML fragment.
/// Headings are rendered without generated `id` attributes.
#[must_use]
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(
        markdown,
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS,
    );

    let mut html = String::with_capacity(markdown.len() * 3 / 2);
    push_html(&mut html, parser);
    html
}

/// Builds a short plain-text excerpt from the first paragraph of rendered post HTML.
/// The excerpt is at most [`EXCERPT_LENGTH`] characters followed by `...`.
#[must_use]
pub fn extract_excerpt(html: &str) -> String {
    let Some(inner) = FIRST_PARAGRAPH
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|inner| inner.as_str())
        .filter(|inner| !inner.is_empty())
    else {
        return FALLBACK_EXCERPT.to_owned();
    };

    let mut excerpt: String = html_to_text(inner).chars().take(EXCERPT_LENGTH).collect();
    excerpt.push_str("...");
    excerpt
}

fn html_to_text(fragment: &str) -> String {
    Html::parse_fragment(&format!("<div>{fragment}</div>"))
        .root_element()
        .text()
        .collect()
}

#[cfg(test)]
mod test {
    use super::{extract_excerpt, markdown_to_html, EXCERPT_LENGTH, FALLBACK_EXCERPT};

    #[test]
    fn headings_have_no_ids() {
        let html = markdown_to_html("## Sustainable Materials\n\nText");
        assert!(html.contains("<h2>Sustainable Materials</h2>"));
        assert!(html.contains("<p>Text</p>"));
    }

    #[test]
    fn images_render_as_img_tags() {
        let html = markdown_to_html("![Interior design](https://x.com/a.jpg)");
        assert!(html.contains(r#"<img src="https://x.com/a.jpg" alt="Interior design" />"#));
    }

    #[test]
    fn excerpt_strips_markup() {
        assert_eq!(
            extract_excerpt("<h2>Skip</h2>\n<p>Some <strong>bold</strong> &amp; <a href=\"/x\">linked</a> text</p>"),
            "Some bold & linked text..."
        );
    }

    #[test]
    fn excerpt_is_truncated() {
        let long = "word ".repeat(100);
        let excerpt = extract_excerpt(&format!("<p>{long}</p>"));

        assert_eq!(excerpt.chars().count(), EXCERPT_LENGTH + 3);
        assert!(excerpt.ends_with("..."));
        assert!(long.starts_with(excerpt.trim_end_matches("...")));
    }

    #[test]
    fn excerpt_counts_characters_not_bytes() {
        let long = "é".repeat(200);
        let excerpt = extract_excerpt(&format!("<p>{long}</p>"));
        assert_eq!(excerpt.chars().count(), EXCERPT_LENGTH + 3);
    }

    #[test]
    fn excerpt_fallback() {
        assert_eq!(extract_excerpt("<h2>Only a heading</h2>"), FALLBACK_EXCERPT);
        assert_eq!(extract_excerpt("<p></p>"), FALLBACK_EXCERPT);
        // Multi-line paragraphs are skipped in favour of the next single-line one
        assert_eq!(
            extract_excerpt("<p>first\nsecond</p>\n<p>third</p>"),
            "third..."
        );
    }
}
