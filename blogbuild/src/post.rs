//! Code for deriving render-ready posts from resolved CSV records.

use crate::{
    record::ResolvedRecord,
    render::{extract_excerpt, markdown_to_html},
    text::{
        extract_title, find_featured_image, link_bare_urls, normalize_headings, slugify,
        wrap_image_urls,
    },
};

/// Title used when a record has neither a title field nor a level-1 heading.
pub const DEFAULT_TITLE: &str = "Interior Design Blog Post";

const SAMPLE_TITLE: &str = "Interior Design Trends for 2025";

const SAMPLE_EXCERPT: &str = "The world of interior design is constantly evolving, with new trends emerging each year. As we move into 2025, several exciting trends are taking center stage, transforming how we...";

const SAMPLE_CONTENT: &str = "# Interior Design Trends for 2025

The world of interior design is constantly evolving, with new trends emerging each year. As we move into 2025, several exciting trends are taking center stage, transforming how we think about and design our living spaces.

## Sustainable Materials

Sustainability continues to be a major focus in interior design. Homeowners and designers alike are increasingly opting for eco-friendly materials like reclaimed wood, recycled glass, and sustainable fabrics. These materials not only reduce environmental impact but also add character and warmth to spaces.

## Biophilic Design

Connecting with nature through design remains a strong trend in 2025. Biophilic design incorporates natural elements like plants, natural light, and organic materials to create spaces that promote wellbeing and reduce stress. Large windows, indoor gardens, and nature-inspired colors are becoming standard features in modern homes.

## Smart Home Integration

Technology integration is seamlessly blending with aesthetic design. Smart home features are now being built into furniture and fixtures, creating spaces that are both beautiful and functional. From voice-activated lighting to temperature-regulating window treatments, technology is enhancing how we experience our homes.

## Multifunctional Spaces

As remote work continues to be a part of many people's lives, the need for flexible, multifunctional spaces is growing. Designers are creating innovative solutions that allow rooms to serve multiple purposes without sacrificing style or comfort.";

/// A blog entry that is ready to be written out as HTML.
#[cfg_attr(test, derive(Debug))]
pub struct Post {
    pub title: Box<str>,
    pub slug: Box<str>,
    pub body_html: Box<str>,
    pub excerpt: Box<str>,
    pub featured_image: Option<Box<str>>,
}

/// The parts of a post shown in the homepage's featured section.
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct FeaturedPost {
    pub title: Box<str>,
    pub slug: Box<str>,
    pub excerpt: Box<str>,
    pub featured_image: Option<Box<str>>,
}

impl Post {
    /// Derives a post from a record's title and content.
    ///
    /// A level-1 heading in the content becomes the display title and is removed from the body.
    /// Inline headings and bare image URLs are then normalized before the body is rendered.
    #[must_use]
    pub fn from_record(record: &ResolvedRecord) -> Self {
        let (title, content) = extract_title(&record.content).unwrap_or_else(|| {
            let title = if record.title.is_empty() {
                DEFAULT_TITLE.to_owned()
            } else {
                record.title.clone()
            };
            (title, record.content.clone())
        });

        let content = wrap_image_urls(&normalize_headings(&content));
        let body_html = markdown_to_html(&link_bare_urls(&content));

        Self {
            slug: slugify(&title).into(),
            excerpt: extract_excerpt(&body_html).into(),
            featured_image: find_featured_image(&content).map(Into::into),
            body_html: body_html.into(),
            title: title.into(),
        }
    }

    /// Builds the placeholder post published when no posts could be read from CSV.
    #[must_use]
    pub fn sample() -> Self {
        let body = extract_title(SAMPLE_CONTENT).map_or(SAMPLE_CONTENT.into(), |(_, body)| body);

        Self {
            title: SAMPLE_TITLE.into(),
            slug: slugify(SAMPLE_TITLE).into(),
            body_html: markdown_to_html(&body).into(),
            excerpt: SAMPLE_EXCERPT.into(),
            featured_image: None,
        }
    }

    #[must_use]
    pub fn to_featured(&self) -> FeaturedPost {
        FeaturedPost {
            title: self.title.clone(),
            slug: self.slug.clone(),
            excerpt: self.excerpt.clone(),
            featured_image: self.featured_image.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Post, DEFAULT_TITLE};
    use crate::record::ResolvedRecord;

    fn post(title: &str, content: &str) -> Post {
        Post::from_record(&ResolvedRecord {
            title: title.into(),
            content: content.into(),
        })
    }

    #[test]
    fn heading_becomes_title() {
        let post = post(
            "My Room",
            "# My Room\n\nA cozy space with a https://x.com/a.jpg photo.",
        );

        assert_eq!(&*post.title, "My Room");
        assert_eq!(&*post.slug, "my-room");
        assert!(!post.body_html.contains("<h1>"), "title heading should be removed from body");
        assert!(post
            .body_html
            .contains(r#"<img src="https://x.com/a.jpg" alt="Interior design" />"#));
        assert_eq!(post.featured_image.as_deref(), Some("https://x.com/a.jpg"));
        assert!(post.excerpt.starts_with("A cozy space with a"));
        assert!(post.excerpt.ends_with("..."));
    }

    #[test]
    fn record_title_is_used_without_heading() {
        let post = post("Small Kitchens", "Tips for tight spaces.");

        assert_eq!(&*post.title, "Small Kitchens");
        assert_eq!(&*post.slug, "small-kitchens");
        assert_eq!(&*post.excerpt, "Tips for tight spaces....");
        assert!(post.featured_image.is_none());
    }

    #[test]
    fn default_title() {
        let post = post("", "Untitled musings.");
        assert_eq!(&*post.title, DEFAULT_TITLE);
        assert_eq!(&*post.slug, "interior-design-blog-post");
    }

    #[test]
    fn inline_headings_render_as_headings() {
        let post = post("Guide", "Welcome to the guide. ## Lighting Tips Use warm bulbs.");
        assert!(post.body_html.contains("<h2>Lighting Tips Use warm</h2>"));
        assert!(post.body_html.contains("<p>bulbs.</p>"));
    }

    #[test]
    fn bare_urls_are_linked() {
        let post = post("Shops", "Find it at https://x.com/lamps. Also https://x.com/a.png");

        assert!(post
            .body_html
            .contains(r#"<a href="https://x.com/lamps">https://x.com/lamps</a>."#));
        assert!(post
            .body_html
            .contains(r#"<img src="https://x.com/a.png" alt="Interior design" />"#));
        assert_eq!(&*post.excerpt, "Find it at https://x.com/lamps. Also...");
    }

    #[test]
    fn excerpt_length_is_bounded() {
        let post = post("Long", &"Lots of words here. ".repeat(50));
        assert!(post.excerpt.chars().count() <= 153);
    }

    #[test]
    fn sample_post() {
        let sample = Post::sample();

        assert_eq!(&*sample.title, "Interior Design Trends for 2025");
        assert_eq!(&*sample.slug, "interior-design-trends-for-2025");
        assert!(sample.excerpt.ends_with("transforming how we..."));
        assert!(!sample.body_html.contains("<h1>"));
        assert!(sample.body_html.contains("<h2>Sustainable Materials</h2>"));
        assert!(sample.featured_image.is_none());
    }

    #[test]
    fn featured_projection() {
        let post = post("T", "![x](https://x.com/a.png)\n\nBody text.");
        let featured = post.to_featured();

        assert_eq!(featured.title, post.title);
        assert_eq!(featured.slug, post.slug);
        assert_eq!(featured.excerpt, post.excerpt);
        assert_eq!(featured.featured_image.as_deref(), Some("https://x.com/a.png"));
    }
}
