//! New command - create new content from a template

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use color_eyre::eyre::{Result, WrapErr, bail};
use folio_core::Config;

use crate::SitePaths;

/// Kind of document to scaffold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ContentTemplate {
    /// Dated Markdown post, created as a draft.
    Post,
    /// Undated standalone Markdown page.
    Page,
    /// Dated MDX post with an ESM export line.
    Mdx,
}

impl ContentTemplate {
    fn extension(self) -> &'static str {
        match self {
            Self::Post | Self::Page => "md",
            Self::Mdx => "mdx",
        }
    }
}

/// Run the new command.
///
/// Creates a content file with boilerplate front-matter under the content
/// directory of the site at `config_path`.
pub fn run(config_path: &Path, path: &Path, template: ContentTemplate) -> Result<PathBuf> {
    tracing::info!(?path, ?template, "Creating new content");

    let content_dir = match Config::load(config_path) {
        Ok(config) => SitePaths::resolve(config_path, &config).content,
        Err(e) => {
            tracing::debug!(error = %e, "no usable config, using ./content");
            PathBuf::from("content")
        }
    };

    let full_path = content_dir.join(path);
    let file_path = if full_path.extension().is_some() {
        full_path
    } else {
        full_path.with_extension(template.extension())
    };

    if file_path.exists() {
        bail!("{} already exists", file_path.display());
    }

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).wrap_err("Failed to create directories")?;
    }

    fs::write(&file_path, scaffold(path, template, Utc::now())).wrap_err("Failed to write file")?;

    tracing::info!(?file_path, "Created new content file");
    println!("Created: {}", file_path.display());

    Ok(file_path)
}

/// Title derived from the file stem: `my-first-post` becomes `My first post`.
fn title_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled")
        .replace(['-', '_'], " ");

    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Untitled".to_string(),
    }
}

fn scaffold(path: &Path, template: ContentTemplate, now: DateTime<Utc>) -> String {
    let title = title_from_path(path).replace('"', "\\\"");
    let date = now.format("%Y-%m-%d");

    match template {
        ContentTemplate::Post => format!(
            "---\ntitle: \"{title}\"\ndescription: \"\"\ndate: {date}\ndraft: true\ntags: []\n---\n\nWrite your content here.\n"
        ),
        ContentTemplate::Page => format!(
            "---\ntitle: \"{title}\"\ndescription: \"\"\n---\n\nWrite your content here.\n"
        ),
        ContentTemplate::Mdx => format!(
            "---\ntitle: \"{title}\"\ndescription: \"\"\ndate: {date}\ndraft: true\n---\n\nexport const status = \"draft\"\n\nWrite your content here.\n"
        ),
    }
}
