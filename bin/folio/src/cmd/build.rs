//! Build command - generates the static site

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use color_eyre::eyre::{Result, WrapErr};
use folio_core::Config;
use folio_generator::{BuildStats, Builder};

use super::check::quick_validate;
use crate::SitePaths;

/// Command-line overrides applied on top of `config.toml`.
#[derive(Debug, Clone, Default)]
pub struct BuildOverrides {
    /// Output directory.
    pub output: Option<PathBuf>,

    /// Include drafts.
    pub drafts: bool,

    /// Site base URL (e.g., https://bridger.to).
    pub base_url: Option<String>,
}

impl BuildOverrides {
    /// Apply overrides to a loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(output) = &self.output {
            config.build.output_dir = output.to_string_lossy().to_string();
        }

        if self.drafts {
            config.build.drafts = true;
        }

        if let Some(url) = &self.base_url {
            tracing::info!(base_url = url, "Overriding site base_url from CLI");
            config.site.base_url = url.clone();
        }
    }
}

/// Load the config and resolve the site directories, with overrides applied.
pub fn load_site(config_path: &Path, overrides: &BuildOverrides) -> Result<(Config, SitePaths)> {
    let mut config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    overrides.apply(&mut config);
    config
        .validate()
        .wrap_err("Invalid configuration after CLI overrides")?;

    let paths = SitePaths::resolve(config_path, &config);
    Ok((config, paths))
}

/// Create a builder for the resolved site.
pub fn builder_for(config: Config, paths: &SitePaths) -> Builder {
    let mut builder = Builder::new(config, &paths.content, &paths.output);

    if paths.static_dir.is_dir() {
        tracing::info!(dir = %paths.static_dir.display(), "Found static directory, will copy to output");
        builder = builder.with_static_dir(&paths.static_dir);
    }

    builder
}

/// Run the build command.
///
/// Builds the static site from content files to the output directory.
pub fn run(config_path: &Path, overrides: &BuildOverrides) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?overrides, "Starting build");

    let (config, paths) = load_site(config_path, overrides)?;

    let warnings = quick_validate(&config, &paths);
    if !warnings.is_empty() {
        println!();
        println!("  Warnings:");
        for warn in &warnings {
            println!("  ⚠ {warn}");
        }
        println!();
    }

    tracing::debug!(?config, "Loaded configuration");

    let stats = builder_for(config, &paths)
        .build()
        .wrap_err("Build failed")?;

    let duration = start.elapsed();

    println!();
    println!("  Build completed successfully!");
    print_stats(&stats);
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {}", paths.output.display());
    println!();

    tracing::info!(?stats, ?duration, "Build completed successfully");

    Ok(())
}

/// Print build statistics.
pub fn print_stats(stats: &BuildStats) {
    println!();
    println!("  Pages:      {}", stats.pages);
    println!("  Indexes:    {}", stats.indexes);
    println!("  Redirects:  {}", stats.redirects);
    println!("  Assets:     {}", stats.assets);
    println!();
}
