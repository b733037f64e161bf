//! Code for reading app configuration from a TOML file. The configuration file path is supplied via the command line.
//! Without a configuration file, the production defaults are used with the current directory as the site root.

use anyhow::{anyhow, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use same_file::is_same_file;
use serde::Deserialize;
use std::{env::args, fs::read_to_string};
use toml_edit::de::from_str as toml_from_str;

/// Name of the blog output directory; also the URL path prefix of every post.
pub const BLOG_DIR: &str = "blog";

const STATIC_PAGES: [&str; 4] = ["about.html", "contact.html", "terms.html", "privacy.html"];

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Writes posts into the source tree's `blog/` directory and patches `index.html` in place.
    Development,
    /// Writes posts into `dist/blog/`, along with redirects and static pages.
    #[default]
    Production,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    variant: Variant,
    // Directory containing the site sources (homepage, static pages, CSV)
    #[serde(default = "default_root_dir")]
    root_dir: Utf8PathBuf,
    #[serde(default = "default_author")]
    author: Box<str>,
    #[serde(default = "default_site_name")]
    site_name: Box<str>,
    // Candidate CSV paths, tried in order, relative to `root_dir`
    csv_paths: Option<Box<[Utf8PathBuf]>>,
    // Directory for generated output, relative to `root_dir`
    output_dir: Option<Utf8PathBuf>,
    // Directory of HTML templates overriding the built-in ones
    templates_dir: Option<Utf8PathBuf>,
}

fn default_root_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(".")
}

fn default_author() -> Box<str> {
    "Jane Vance".into()
}

fn default_site_name() -> Box<str> {
    "Free AI Interior Design Generator".into()
}

pub struct Config {
    pub variant: Variant,
    pub root_dir: Utf8PathBuf,
    // Displayed as "By ..." on posts and cards
    pub author: Box<str>,
    pub site_name: Box<str>,
    pub csv_paths: Box<[Utf8PathBuf]>,
    pub output_dir: Utf8PathBuf,
    pub blog_dir: Utf8PathBuf,
    // Homepage files to read from, in order of preference
    pub homepage_sources: Box<[Utf8PathBuf]>,
    pub homepage_target: Utf8PathBuf,
    pub redirects_file: Option<Utf8PathBuf>,
    pub static_assets: Option<StaticAssets>,
    // Whether to delete existing files in `blog_dir` before building
    pub clean_blog_dir: bool,
    pub templates_dir: Option<Utf8PathBuf>,
}

/// Files copied from the site sources into the output directory.
pub struct StaticAssets {
    // Copied only when not already present in the output directory
    pub pages: Box<[Utf8PathBuf]>,
    // Copied unconditionally to `<output_dir>/_redirects`
    pub redirects: Utf8PathBuf,
}

impl Config {
    /// Reads a config file from a path provided by command-line arguments.
    /// If no path is provided, the production defaults for the current directory are used.
    ///
    /// # Errors
    /// This function returns an error if:
    /// - too many command-line arguments are provided
    /// - the configuration file cannot be read or parsed
    /// - a config parameter interpreted as a directory path does not point to a directory
    /// - the blog output directory and the site root point to the same location
    pub fn from_env() -> Result<Self> {
        let mut args = args().skip(1);

        let config_path = args.next();

        if args.next().is_some() {
            return Err(anyhow!("too many input arguments were provided"));
        }

        let config = match config_path {
            Some(path) => Self::from_toml(
                &read_to_string(&path)
                    .with_context(|| format!("failed to read configuration from {path}"))?,
            )
            .context("failed to parse configuration file")?,
            None => Self::for_variant(Variant::Production, default_root_dir()),
        };

        config
            .check_paths()
            .context("configuration is invalid")?;

        Ok(config)
    }

    /// Parses configuration from TOML text. Paths are not checked against the filesystem.
    ///
    /// # Errors
    /// This function returns an error if the text is not valid TOML
    /// or contains unknown keys or values of the wrong type.
    pub fn from_toml(text: &str) -> Result<Self> {
        let file: ConfigFile = toml_from_str(text)?;

        let mut config = Self::for_variant(file.variant, file.root_dir);
        config.author = file.author;
        config.site_name = file.site_name;
        config.templates_dir = file.templates_dir.map(|dir| config.root_dir.join(dir));

        if let Some(paths) = file.csv_paths {
            config.csv_paths = paths.iter().map(|path| config.root_dir.join(path)).collect();
        }

        if let Some(output_dir) = file.output_dir {
            config.set_output_dir(config.root_dir.join(output_dir));
        }

        Ok(config)
    }

    /// Builds the default configuration of a variant for a site rooted at `root_dir`.
    #[must_use]
    pub fn for_variant(variant: Variant, root_dir: Utf8PathBuf) -> Self {
        let mut config = Self {
            variant,
            author: default_author(),
            site_name: default_site_name(),
            csv_paths: Box::default(),
            output_dir: root_dir.clone(),
            blog_dir: root_dir.join(BLOG_DIR),
            homepage_sources: Box::default(),
            homepage_target: root_dir.join("index.html"),
            redirects_file: None,
            static_assets: None,
            clean_blog_dir: false,
            templates_dir: None,
            root_dir,
        };

        match variant {
            Variant::Development => {
                config.csv_paths = [config.root_dir.join("dev-blogposts.csv")].into();
                config.homepage_sources = [config.homepage_target.clone()].into();
                config.clean_blog_dir = true;
            }
            Variant::Production => {
                config.csv_paths = [
                    config.root_dir.join("blogposts.csv"),
                    config.root_dir.join("public/blogposts.csv"),
                ]
                .into();
                config.static_assets = Some(StaticAssets {
                    pages: STATIC_PAGES
                        .iter()
                        .map(|page| Utf8PathBuf::from(*page))
                        .collect(),
                    redirects: config.root_dir.join("public/_redirects"),
                });
                config.set_output_dir(config.root_dir.join("dist"));
            }
        }

        config
    }

    // Production keeps its homepage and redirects in the output directory; development edits sources in place
    fn set_output_dir(&mut self, output_dir: Utf8PathBuf) {
        self.blog_dir = output_dir.join(BLOG_DIR);

        if self.variant == Variant::Production {
            self.homepage_target = output_dir.join("index.html");
            self.homepage_sources = [
                self.homepage_target.clone(),
                self.root_dir.join("index.html"),
            ]
            .into();
            self.redirects_file = Some(output_dir.join("blog-redirects"));
        } else {
            self.homepage_sources = [self.homepage_target.clone()].into();
        }

        self.output_dir = output_dir;
    }

    /// Returns the path of a static page inside the site sources and inside the output directory.
    #[must_use]
    pub fn static_page_paths(&self, page: &Utf8Path) -> (Utf8PathBuf, Utf8PathBuf) {
        (self.root_dir.join(page), self.output_dir.join(page))
    }

    fn check_paths(&self) -> Result<()> {
        if !self.root_dir.is_dir() {
            return Err(anyhow!(
                "`root_dir`: {:?} does not point to a directory",
                self.root_dir
            ));
        }

        if let Some(dir) = &self.templates_dir {
            if !dir.is_dir() {
                return Err(anyhow!(
                    "`templates_dir`: {dir:?} does not point to a directory"
                ));
            }
        }

        // The blog directory may not exist yet, in which case it can't alias anything
        if self.blog_dir.exists()
            && is_same_file(&self.blog_dir, &self.root_dir)
                .context("failed to compare blog output directory with site root")?
        {
            Err(anyhow!(
                "the blog output directory and `root_dir` point to the same location"
            ))
        } else {
            Ok(())
        }
    }
}
