//! Robots.txt generation.

use std::{fs, path::Path};

use folio_core::Config;
use thiserror::Error;
use tracing::info;

/// Robots generation errors.
#[derive(Debug, Error)]
pub enum RobotsError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for robots generation.
pub type Result<T> = std::result::Result<T, RobotsError>;

/// Robots.txt generator.
#[derive(Debug)]
pub struct RobotsGenerator {
    config: Config,
}

impl RobotsGenerator {
    /// Create a new robots generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Contents of robots.txt.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("User-agent: *\n");

        for path in &self.config.robots.disallow {
            out.push_str(&format!("Disallow: {path}\n"));
        }

        for path in &self.config.robots.allow {
            out.push_str(&format!("Allow: {path}\n"));
        }

        if self.config.sitemap.enabled {
            out.push_str(&format!("Sitemap: {}\n", self.config.url_for("/sitemap.xml")));
        }

        out
    }

    /// Write robots.txt into the output directory, if enabled.
    pub fn generate(&self, output_dir: &Path) -> Result<bool> {
        if !self.config.robots.enabled {
            return Ok(false);
        }

        info!("generating robots.txt");
        fs::write(output_dir.join("robots.txt"), self.render())?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(extra: &str) -> Config {
        Config::from_toml_str(&format!(
            "[site]\ntitle = \"T\"\nbase_url = \"https://bridger.to\"\n{extra}"
        ))
        .expect("valid config")
    }

    #[test]
    fn test_render_rules_and_sitemap() {
        let robots = RobotsGenerator::new(config(
            "[robots]\nallow = [\"/\"]\ndisallow = [\"/private\"]",
        ))
        .render();

        assert_eq!(
            robots,
            "User-agent: *\nDisallow: /private\nAllow: /\nSitemap: https://bridger.to/sitemap.xml\n"
        );
    }

    #[test]
    fn test_disabled_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let written = RobotsGenerator::new(config("[robots]\nenabled = false"))
            .generate(dir.path())
            .expect("generate");

        assert!(!written);
        assert!(!dir.path().join("robots.txt").exists());
    }

    #[test]
    fn test_writes_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(RobotsGenerator::new(config("")).generate(dir.path()).expect("generate"));
        let text = fs::read_to_string(dir.path().join("robots.txt")).expect("read");
        assert!(text.starts_with("User-agent: *"));
    }
}
