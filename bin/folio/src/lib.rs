//! Folio CLI Library
//!
//! Commands and the development server behind the `folio` binary.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, serve, new, check)
//! - [`server`] - Development server with live reload and redirects
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use folio::cmd::build::{self, BuildOverrides};
//!
//! build::run(Path::new("config.toml"), &BuildOverrides::default()).unwrap();
//! ```

use std::path::{Path, PathBuf};

pub mod cmd;
pub mod server;

pub use folio_core::{Config, Page};
pub use folio_generator::{BuildStats, Builder, ContentCollector, SiteContent};

/// Initialize tracing with the specified verbosity level.
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
///
/// ```no_run
/// folio::init_tracing(2); // Enable DEBUG level logging
/// ```
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

/// Directories of a site, resolved against the config file's directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePaths {
    pub root: PathBuf,
    pub content: PathBuf,
    pub output: PathBuf,
    pub static_dir: PathBuf,
}

impl SitePaths {
    /// Resolve the configured directories relative to `config_path`.
    #[must_use]
    pub fn resolve(config_path: &Path, config: &Config) -> Self {
        let root = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf();

        Self {
            content: root.join(&config.build.content_dir),
            output: root.join(&config.build.output_dir),
            static_dir: root.join(&config.build.static_dir),
            root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_paths_relative_to_config() {
        let config = Config::from_toml_str(
            "[site]\ntitle = \"T\"\nbase_url = \"https://example.com\"",
        )
        .expect("valid config");

        let paths = SitePaths::resolve(Path::new("site/config.toml"), &config);
        assert_eq!(paths.content, PathBuf::from("site/content"));
        assert_eq!(paths.output, PathBuf::from("site/public"));
        assert_eq!(paths.static_dir, PathBuf::from("site/static"));

        let bare = SitePaths::resolve(Path::new("config.toml"), &config);
        assert_eq!(bare.root, PathBuf::from("."));
    }
}
