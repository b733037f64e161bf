//! Stitches together the steps of a blog build: reading records, writing post and listing pages,
//! writing redirects, patching the homepage and copying static assets.
//!
//! Only failures to set up the output directory or write the listing page stop a build.
//! Everything else is logged and skipped so that one bad record never blocks the rest.

use crate::{
    builder::{ListingBuilder, PageBuilder},
    config::Config,
    homepage::{patch_homepage, HomepageOutcome},
    post::{FeaturedPost, Post},
    publish::{clean_dir, copy_static_assets, write_redirects},
    record::{load_records, RecordSource},
};
use anyhow::{Context, Result};
use foldhash::{HashSet, HashSetExt};
use jiff::civil::Date;
use std::fs::{create_dir_all, write};
use tracing::{error, info, warn};

/// Number of posts shown on the homepage.
pub const FEATURED_POST_COUNT: usize = 2;

/// Summary of what a build produced.
pub struct BuildReport {
    /// Slugs of all published posts, in CSV order. May contain duplicates.
    pub slugs: Vec<Box<str>>,
    pub featured: Vec<FeaturedPost>,
    /// Whether the sample post was published because no posts could be read.
    pub used_sample: bool,
    /// `None` if there were no featured posts to put on the homepage.
    pub homepage: Option<HomepageOutcome>,
}

struct Publisher<'a> {
    config: &'a Config,
    page_builder: &'a PageBuilder,
    listing: ListingBuilder,
    featured: Vec<FeaturedPost>,
    slugs: Vec<Box<str>>,
    seen_slugs: HashSet<Box<str>>,
}

impl Publisher<'_> {
    fn publish(&mut self, post: &Post) -> Result<()> {
        let output_path = self.config.blog_dir.join(format!("{}.html", post.slug));

        write(&output_path, self.page_builder.post_page(post))
            .with_context(|| format!("failed to write post HTML to {output_path}"))?;

        info!("created blog post {output_path}");

        // Slugs are not made unique: a later post with the same slug replaces the earlier file
        if !self.seen_slugs.insert(post.slug.clone()) {
            warn!(
                "post \"{}\" has the same slug as an earlier post; {output_path} was overwritten",
                post.title
            );
        }

        self.listing.add_post(self.page_builder, post);
        if self.featured.len() < FEATURED_POST_COUNT {
            self.featured.push(post.to_featured());
        }
        self.slugs.push(post.slug.clone());

        Ok(())
    }
}

/// Builds the blog described by `config`, stamping every page with `date`.
///
/// # Errors
/// This function returns an error if:
/// - the blog output directory cannot be created
/// - a template file cannot be read
/// - the listing page cannot be written
pub fn build_site(config: &Config, date: Date) -> Result<BuildReport> {
    create_dir_all(&config.blog_dir)
        .with_context(|| format!("failed to create blog output directory at {}", config.blog_dir))?;

    if config.clean_blog_dir {
        info!("cleaning existing blog files in {}", config.blog_dir);
        if let Err(err) = clean_dir(&config.blog_dir) {
            warn!("{err:#}");
        }
    }

    let page_builder = PageBuilder::new(config, date).context("failed to load page templates")?;

    let mut publisher = Publisher {
        config,
        page_builder: &page_builder,
        listing: ListingBuilder::new(),
        featured: Vec::with_capacity(FEATURED_POST_COUNT),
        slugs: Vec::new(),
        seen_slugs: HashSet::new(),
    };

    let records = match load_records(&config.csv_paths) {
        RecordSource::Csv { records, .. } => records,
        RecordSource::Missing => {
            error!("no CSV file found at any of {:?}", config.csv_paths);
            Vec::new()
        }
        RecordSource::Unparseable(err) => {
            error!("{err:#}");
            Vec::new()
        }
    };

    for (index, record) in records.iter().enumerate() {
        let number = index + 1;
        info!("processing record {number}/{}", records.len());

        if let Err(err) = (|| {
            let Some(resolved) = record.resolve() else {
                warn!(
                    "skipping post \"{}\" (record {number}) because its content is empty",
                    record.title()
                );
                return Ok(());
            };

            let post = Post::from_record(&resolved);
            info!("record {number} has title \"{}\"", post.title);

            publisher.publish(&post)
        })()
        .with_context(|| format!("failed to process record {number}"))
        {
            error!("{err:#}");
        }
    }

    let used_sample = publisher.slugs.is_empty();
    if used_sample {
        warn!("no blog posts were created from CSV, publishing a sample post instead");
        if let Err(err) = publisher
            .publish(&Post::sample())
            .context("failed to publish sample post")
        {
            error!("{err:#}");
        }
    }

    let Publisher {
        listing,
        featured,
        slugs,
        ..
    } = publisher;

    info!("writing listing page with {} posts", listing.len());
    let listing_path = config.blog_dir.join("index.html");
    write(&listing_path, listing.into_html(&page_builder))
        .with_context(|| format!("failed to write listing page to {listing_path}"))?;

    if let Some(path) = &config.redirects_file {
        match write_redirects(path, slugs.iter().map(|slug| &**slug)) {
            Ok(()) => info!("created blog redirects file at {path}"),
            Err(err) => error!("{err:#}"),
        }
    }

    let mut report = BuildReport {
        slugs,
        featured,
        used_sample,
        homepage: None,
    };

    if !report.featured.is_empty() {
        let section = page_builder.featured_section(&report.featured);

        match patch_homepage(&config.homepage_sources, &config.homepage_target, &section) {
            Ok(outcome) => {
                report.homepage = Some(outcome);
                match outcome {
                    HomepageOutcome::Patched => info!("updated homepage with featured posts"),
                    HomepageOutcome::AlreadyPatched => {
                        info!("homepage already has a featured posts section");
                    }
                    HomepageOutcome::MarkerMissing => warn!(
                        "homepage has no support section to insert featured posts before; left unchanged"
                    ),
                    HomepageOutcome::NotFound => {
                        warn!("no homepage found to update with featured posts; stopping");
                        return Ok(report);
                    }
                }
            }
            Err(err) => error!("{:#}", err.context("failed to update homepage")),
        }
    }

    if let Some(assets) = &config.static_assets {
        match copy_static_assets(config, assets) {
            Ok(copied) => info!("copied {copied} static files to {}", config.output_dir),
            Err(err) => error!("{:#}", err.context("failed to copy static files")),
        }
    }

    Ok(report)
}
