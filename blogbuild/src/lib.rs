//! Build step that turns a CSV export of blog posts into static HTML:
//! one page per post, a listing page, and a featured-posts section on the site homepage.

mod builder;
mod config;
mod homepage;
mod post;
mod publish;
mod record;
mod render;
mod site;
mod text;

pub use builder::{ListingBuilder, PageBuilder, FEATURED_SECTION_MARKER};
pub use config::{Config, StaticAssets, Variant, BLOG_DIR};
pub use homepage::{patch_homepage, HomepageOutcome, INSERTION_MARKER};
pub use post::{FeaturedPost, Post, DEFAULT_TITLE};
pub use publish::{clean_dir, copy_static_assets, redirect_rules, write_redirects};
pub use record::{load_records, read_records, RawRecord, RecordSource, ResolvedRecord};
pub use render::{extract_excerpt, markdown_to_html, EXCERPT_LENGTH, FALLBACK_EXCERPT};
pub use site::{build_site, BuildReport, FEATURED_POST_COUNT};
pub use text::{
    extract_title, find_featured_image, link_bare_urls, normalize_headings, slugify,
    wrap_image_urls, IMAGE_ALT_TEXT,
};
