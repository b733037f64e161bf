//! Code for building complete HTML pages and page fragments from posts.
//!
//! Pages are produced from HTML templates containing `{{name}}` placeholders.
//! Built-in templates are compiled into the binary; any of them can be replaced
//! by a file of the same name in the configured templates directory.

use crate::{
    config::{Config, Variant, BLOG_DIR},
    post::{FeaturedPost, Post},
};
use aho_corasick::{AhoCorasick, MatchKind};
use anyhow::{Context, Result};
use camino::Utf8Path;
use html_escape::{encode_double_quoted_attribute, encode_text};
use jiff::civil::Date;
use std::fs::read_to_string;

/// Element that the homepage's featured-posts section starts with.
pub const FEATURED_SECTION_MARKER: &str = r#"<div class="featured-posts-section">"#;

const PLACEHOLDERS: [&str; 18] = [
    "{{about_href}}",
    "{{author}}",
    "{{blog_href}}",
    "{{body}}",
    "{{cards}}",
    "{{contact_href}}",
    "{{date}}",
    "{{description}}",
    "{{excerpt}}",
    "{{head}}",
    "{{image}}",
    "{{main}}",
    "{{post_href}}",
    "{{posts}}",
    "{{privacy_href}}",
    "{{site_name}}",
    "{{terms_href}}",
    "{{title}}",
];

const LAYOUT_TEMPLATE: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/layout.html"));
const POST_TEMPLATE: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/post.html"));
const LISTING_TEMPLATE: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/listing.html"));
const CARD_TEMPLATE: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/card.html"));
const FEATURED_TEMPLATE: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/featured.html"));
const FEATURED_POST_TEMPLATE: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/featured-post.html"));

struct Template {
    text: Box<str>,
}

impl Template {
    fn load(dir: Option<&Utf8Path>, name: &str, builtin: &str) -> Result<Self> {
        let text = match dir.map(|dir| dir.join(name)).filter(|path| path.is_file()) {
            Some(path) => read_to_string(&path)
                .with_context(|| format!("failed to read template file at {path}"))?
                .into(),
            None => builtin.into(),
        };

        Ok(Self { text })
    }

    // Placeholders without a supplied value are left in place.
    // Substituted values are never scanned for further placeholders.
    fn render(&self, placeholders: &AhoCorasick, values: &[(&str, &str)]) -> String {
        let mut html = String::with_capacity(self.text.len() * 2);

        placeholders.replace_all_with(&self.text, &mut html, |_, matched, dst| {
            let name = &matched[2..matched.len() - 2];
            match values.iter().find(|(key, _)| *key == name) {
                Some((_, value)) => dst.push_str(value),
                None => dst.push_str(matched),
            }
            true
        });

        html
    }
}

/// Builds URLs for pages on the site.
/// The development server serves files as-is, while production rewrites clean URLs to `.html` files.
#[derive(Clone, Copy)]
struct Links {
    variant: Variant,
}

impl Links {
    fn page(self, stem: &str) -> String {
        match self.variant {
            Variant::Development => format!("/{stem}.html"),
            Variant::Production => format!("/{stem}"),
        }
    }

    fn blog(self) -> String {
        match self.variant {
            Variant::Development => format!("/{BLOG_DIR}/index.html"),
            Variant::Production => format!("/{BLOG_DIR}"),
        }
    }

    fn post(self, slug: &str) -> String {
        match self.variant {
            Variant::Development => format!("/{BLOG_DIR}/{slug}.html"),
            Variant::Production => format!("/{BLOG_DIR}/{slug}"),
        }
    }
}

pub struct PageBuilder {
    placeholders: AhoCorasick,
    layout: Template,
    post: Template,
    listing: Template,
    card: Template,
    featured: Template,
    featured_post: Template,
    links: Links,
    site_name: Box<str>,
    author: Box<str>,
    // Every page generated in one build carries the same date
    date: String,
}

impl PageBuilder {
    /// Initializes the webpage HTML builder, loading templates from the configured templates directory
    /// or falling back to the built-in ones.
    ///
    /// # Errors
    /// This function returns an error if:
    /// - a template file exists in the templates directory but cannot be read
    /// - the placeholder matcher cannot be built
    pub fn new(config: &Config, date: Date) -> Result<Self> {
        let dir = config.templates_dir.as_deref();

        Ok(Self {
            placeholders: AhoCorasick::builder()
                .match_kind(MatchKind::LeftmostFirst)
                .build(PLACEHOLDERS)
                .context("failed to build template placeholder matcher")?,
            layout: Template::load(dir, "layout.html", LAYOUT_TEMPLATE)?,
            post: Template::load(dir, "post.html", POST_TEMPLATE)?,
            listing: Template::load(dir, "listing.html", LISTING_TEMPLATE)?,
            card: Template::load(dir, "card.html", CARD_TEMPLATE)?,
            featured: Template::load(dir, "featured.html", FEATURED_TEMPLATE)?,
            featured_post: Template::load(dir, "featured-post.html", FEATURED_POST_TEMPLATE)?,
            links: Links {
                variant: config.variant,
            },
            site_name: encode_text(&config.site_name).into(),
            author: encode_text(&config.author).into(),
            date: date.strftime("%B %-d, %Y").to_string(),
        })
    }

    /// Outputs a complete HTML document for a single post.
    #[must_use]
    pub fn post_page(&self, post: &Post) -> String {
        let title = encode_text(&post.title);
        let blog_href = self.links.blog();

        let main = self.post.render(
            &self.placeholders,
            &[
                ("blog_href", &*blog_href),
                ("title", &*title),
                ("author", &*self.author),
                ("date", &*self.date),
                ("body", &*post.body_html),
            ],
        );

        let description = format!(
            "{} - Interior design tips and trends from AI Interior Design Generator.",
            encode_double_quoted_attribute(&post.title)
        );

        // Posts are served from clean URLs in production
        let head = match self.links.variant {
            Variant::Development => "",
            Variant::Production => "\n    <base href=\"/\">",
        };

        self.page(&title, &description, head, &main)
    }

    /// Outputs the listing card for a post.
    #[must_use]
    pub fn listing_card(&self, post: &Post) -> String {
        let image = post.featured_image.as_deref().map_or_else(String::new, |src| {
            format!(
                r#"<div class="blog-card-image"><img src="{}" alt="{}" /></div>"#,
                encode_double_quoted_attribute(src),
                encode_double_quoted_attribute(&post.title)
            )
        });

        self.card.render(
            &self.placeholders,
            &[
                ("image", &*image),
                ("post_href", &*self.links.post(&post.slug)),
                ("title", &*encode_text(&post.title)),
                ("author", &*self.author),
                ("date", &*self.date),
                ("excerpt", &*encode_text(&post.excerpt)),
            ],
        )
    }

    /// Outputs the complete listing page containing the given cards.
    #[must_use]
    pub fn listing_page(&self, cards: &str) -> String {
        let main = self
            .listing
            .render(&self.placeholders, &[("cards", cards.trim_end())]);

        self.page(
            "Blog",
            "Blog posts about interior design, home decor, and design trends from AI Interior Design Generator.",
            "",
            &main,
        )
    }

    /// Outputs the homepage fragment showcasing the given posts.
    /// The fragment starts with [`FEATURED_SECTION_MARKER`] when the built-in template is used.
    #[must_use]
    pub fn featured_section(&self, posts: &[FeaturedPost]) -> String {
        let cards: String = posts
            .iter()
            .map(|post| {
                let image = post.featured_image.as_deref().map_or_else(String::new, |src| {
                    format!(
                        r#"<div class="featured-post-image"><img src="{}" alt="{}" /></div>"#,
                        encode_double_quoted_attribute(src),
                        encode_double_quoted_attribute(&post.title)
                    )
                });

                self.featured_post.render(
                    &self.placeholders,
                    &[
                        ("image", &*image),
                        ("post_href", &*self.links.post(&post.slug)),
                        ("title", &*encode_text(&post.title)),
                        ("author", &*self.author),
                        ("date", &*self.date),
                        ("excerpt", &*encode_text(&post.excerpt)),
                    ],
                )
            })
            .collect();

        self.featured
            .render(
                &self.placeholders,
                &[("posts", cards.trim_end()), ("blog_href", &*self.links.blog())],
            )
            .trim_end()
            .to_owned()
    }

    fn page(&self, title: &str, description: &str, head: &str, main: &str) -> String {
        self.layout.render(
            &self.placeholders,
            &[
                ("title", title),
                ("description", description),
                ("site_name", &*self.site_name),
                ("head", head),
                ("about_href", &*self.links.page("about")),
                ("blog_href", &*self.links.blog()),
                ("contact_href", &*self.links.page("contact")),
                ("privacy_href", &*self.links.page("privacy")),
                ("terms_href", &*self.links.page("terms")),
                ("main", main.trim_end()),
            ],
        )
    }
}

/// Accumulates listing cards in the order posts are added.
pub struct ListingBuilder {
    cards: String,
    len: usize,
}

impl ListingBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cards: String::new(),
            len: 0,
        }
    }

    pub fn add_post(&mut self, builder: &PageBuilder, post: &Post) {
        self.cards.push_str(&builder.listing_card(post));
        self.len += 1;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn into_html(self, builder: &PageBuilder) -> String {
        builder.listing_page(&self.cards)
    }
}
