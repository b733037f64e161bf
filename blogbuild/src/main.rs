use anyhow::{Context, Result};
use blogbuild::{build_site, Config};
use jiff::Zoned;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Read configuration
    let config = Config::from_env().context("failed to read configuration")?;

    info!("building {:?} blog into {}", config.variant, config.blog_dir);

    let report = build_site(&config, Zoned::now().date()).context("failed to build blog")?;

    info!(
        "published {} posts, {} featured on the homepage",
        report.slugs.len(),
        report.featured.len()
    );

    Ok(())
}
