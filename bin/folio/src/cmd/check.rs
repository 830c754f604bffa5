//! Check command - validate configuration and content

use std::{collections::HashSet, path::Path};

use color_eyre::eyre::{Result, bail};
use folio_core::{Config, ContentPath, content::ContentType};
use folio_parser::ParserRegistry;

use crate::SitePaths;

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates configuration and all content files.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and content");

    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    let config = match Config::load_with_env(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            c
        }
        Err(e) => {
            println!("  ✗ Configuration invalid: {e}");
            bail!("Configuration error: {e}");
        }
    };
    let paths = SitePaths::resolve(config_path, &config);

    let mut routes = HashSet::new();
    if paths.content.exists() {
        println!("\nChecking content files...");
        routes = validate_content_files(&config, &paths.content, &mut result);
    } else {
        result.add_warning(format!(
            "Content directory does not exist: {}",
            paths.content.display()
        ));
    }

    println!("\nChecking directories...");
    check_directories(&paths, &mut result);

    println!("\nChecking links...");
    check_links(&config, &routes, &mut result);

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Quick validation for build/serve commands.
///
/// Returns non-fatal warnings about the site layout.
pub fn quick_validate(config: &Config, paths: &SitePaths) -> Vec<String> {
    let mut warnings = Vec::new();

    if !paths.content.exists() {
        warnings.push(format!(
            "Content directory {} does not exist; only the home page will be built",
            paths.content.display()
        ));
        return warnings;
    }

    for section in &config.sections {
        if !paths.content.join(&section.name).is_dir() {
            warnings.push(format!(
                "Section `{}` has no content/{}/ directory; its index will be empty",
                section.name, section.name
            ));
        }
    }

    warnings
}

/// Parse every content file; returns the URLs that parsed.
fn validate_content_files(
    config: &Config,
    dir: &Path,
    result: &mut ValidationResult,
) -> HashSet<String> {
    let registry = ParserRegistry::from_build_config(&config.build);
    let mut routes = HashSet::new();
    let mut checked = 0;
    let mut failed = 0;

    for entry in walkdir::WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        if ContentType::from_extension(ext).is_none() {
            continue;
        }

        checked += 1;

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                result.add_error(format!("{}: Failed to read file: {e}", path.display()));
                failed += 1;
                continue;
            }
        };

        match registry.parse(&content, path) {
            Ok(doc) => {
                if doc.meta.description.is_none() {
                    result.add_warning(format!("{}: no description", path.display()));
                }
                if doc.meta.draft {
                    result.add_warning(format!("{}: draft, skipped by build", path.display()));
                }
                let relative = path.strip_prefix(dir).unwrap_or(path);
                if let Some(cp) = ContentPath::from_path(relative) {
                    routes.insert(config.route(cp).url_path());
                }
            }
            Err(e) => {
                result.add_error(format!("{}: {e}", path.display()));
                failed += 1;
            }
        }
    }

    if failed == 0 {
        println!("  ✓ All {checked} content files valid");
    } else {
        println!("  ✗ {failed}/{checked} content files have errors");
    }

    routes
}

/// Check that the site directories exist.
fn check_directories(paths: &SitePaths, result: &mut ValidationResult) {
    let dirs = [("content", &paths.content, true), ("static", &paths.static_dir, false)];

    for (name, path, required) in dirs {
        if path.exists() {
            println!("  ✓ {name}/ exists");
        } else if required {
            result.add_error(format!("Required directory missing: {}", path.display()));
            println!("  ✗ {name}/ missing (required)");
        } else {
            result.add_warning(format!("Optional directory missing: {}", path.display()));
            println!("  ⚠ {name}/ missing (optional)");
        }
    }

    if paths.output.exists() && !paths.output.is_dir() {
        result.add_error(format!(
            "Output path exists but is not a directory: {}",
            paths.output.display()
        ));
    }
}

/// Warn about internal links that no route will answer.
fn check_links(config: &Config, routes: &HashSet<String>, result: &mut ValidationResult) {
    let mut known: HashSet<String> = routes.clone();
    known.insert("/".to_string());
    known.extend(config.sections.iter().map(|s| format!("/{}", s.name)));
    known.extend(config.redirects.iter().map(|r| r.source.clone()));

    let home = &config.home;
    let links = config
        .nav
        .iter()
        .chain(&home.links)
        .chain(&home.profiles)
        .chain(home.footer_link.as_ref());

    let mut broken = 0;
    for link in links.filter(|l| !l.is_external() && l.href.starts_with('/')) {
        let path = link.href.split(['#', '?']).next().unwrap_or("/");
        let normalized = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        if !known.contains(normalized) {
            result.add_warning(format!("Link `{}` points to unknown route {}", link.label, link.href));
            broken += 1;
        }
    }

    if broken == 0 {
        println!("  ✓ Internal links resolve");
    } else {
        println!("  ⚠ {broken} internal link(s) do not resolve");
    }
}
