//! End-to-end tests for Folio.
//!
//! These tests build the sample site under `site/` into a temporary directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use folio_core::Config;
use folio_generator::{BuildError, Builder};

fn site_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../site")
}

fn sample_config() -> Config {
    Config::load(&site_dir().join("config.toml")).expect("sample config should load")
}

fn build_sample(output: &Path) -> folio_generator::BuildStats {
    let site = site_dir();
    Builder::new(sample_config(), site.join("content"), output)
        .with_static_dir(site.join("static"))
        .build()
        .expect("sample site should build")
}

fn read(output: &Path, rel: &str) -> String {
    fs::read_to_string(output.join(rel)).unwrap_or_else(|e| panic!("reading {rel}: {e}"))
}

#[test]
fn test_sample_site_config_loads() {
    let config = sample_config();
    assert_eq!(config.site.title, "Bridger Tower");
    assert_eq!(config.redirects.len(), 5);
    assert_eq!(config.sitemap.entries.len(), 3);
    assert_eq!(config.home.profiles.len(), 3);
}

#[test]
fn test_sample_site_builds() {
    let out = tempfile::tempdir().expect("tempdir");
    let stats = build_sample(out.path());

    assert_eq!(stats.pages, 4);
    assert_eq!(stats.indexes, 3);
    assert_eq!(stats.redirects, 5);
    assert_eq!(stats.assets, 1);

    for rel in [
        "index.html",
        "work/index.html",
        "posts/index.html",
        "payload-r2/index.html",
        "mac/index.html",
        "work/folio/index.html",
        "site/index.html",
        "sitemap.xml",
        "rss.xml",
        "robots.txt",
        "logo.svg",
    ] {
        assert!(out.path().join(rel).exists(), "{rel} should exist");
    }

    // Posts are served at the top level.
    assert!(!out.path().join("posts/mac").exists());
}

#[test]
fn test_home_page_structure() {
    let out = tempfile::tempdir().expect("tempdir");
    build_sample(out.path());
    let home = read(out.path(), "index.html");

    assert!(home.contains("<h1>Bridger Tower</h1>"));
    assert!(home.contains(r#"<p>+ <a href="/posts">Read my thoughts</a></p>"#));
    assert!(home.contains(
        r#"<p>See my resume on <a href="https://read.cv/bridger" target="_blank" rel="noopener noreferrer">read.cv</a></p>"#
    ));
    assert!(home.contains(r#"2025-Present, <a href="/site">read about my site</a>"#));
    assert_eq!(home.matches(r#"<div class="row "#).count(), 5);
}

#[test]
fn test_mdx_post_renders_components() {
    let out = tempfile::tempdir().expect("tempdir");
    build_sample(out.path());
    let post = read(out.path(), "payload-r2/index.html");

    assert!(post.contains(r#"<h1 class="title">Payload CMS with Cloudflare R2</h1>"#));
    assert!(!post.contains("import { Callout }"));
    assert!(!post.contains("adapted from a project README"));
    assert!(post.contains(r#"id="install""#));
    assert!(post.contains(r#"data-language="ts""#));
    assert!(post.contains(r#"class="copy-button""#));
    assert!(post.contains(r#"<td class="line-number" aria-hidden="true">1</td>"#));
    assert!(post.contains("&copy; Bridger Tower, 2025</p>"));
}

#[test]
fn test_posts_index_newest_first() {
    let out = tempfile::tempdir().expect("tempdir");
    build_sample(out.path());
    let index = read(out.path(), "posts/index.html");

    let r2 = index.find(r#"href="/payload-r2""#).expect("payload post listed");
    let mac = index.find(r#"href="/mac""#).expect("mac post listed");
    assert!(r2 < mac);
}

#[test]
fn test_redirect_pages_written() {
    let out = tempfile::tempdir().expect("tempdir");
    build_sample(out.path());

    let yt = read(out.path(), "yt/index.html");
    assert!(yt.contains("url=https://youtube.com/@bridgertower"));
    let github = read(out.path(), "github/index.html");
    assert!(github.contains("url=https://github.com/brijr"));
}

#[test]
fn test_sitemap_rss_robots() {
    let out = tempfile::tempdir().expect("tempdir");
    build_sample(out.path());

    let sitemap = read(out.path(), "sitemap.xml");
    assert!(sitemap.contains("<loc>https://bridger.to</loc>"));
    assert!(sitemap.contains("<priority>0.8</priority>"));
    assert!(sitemap.contains("<loc>https://bridger.to/mac</loc>"));

    let rss = read(out.path(), "rss.xml");
    assert!(rss.contains("https://bridger.to/payload-r2"));
    assert!(!rss.contains("https://bridger.to/work/folio"));

    let robots = read(out.path(), "robots.txt");
    assert!(robots.contains("Sitemap: https://bridger.to/sitemap.xml"));
}

#[test]
fn test_missing_title_fails_build() {
    let content = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(content.path().join("posts")).expect("mkdir");
    fs::write(content.path().join("posts/ok.md"), "---\ntitle: Ok\n---\nfine").expect("write");
    fs::write(
        content.path().join("posts/untitled.md"),
        "---\ndescription: no title here\n---\nbody",
    )
    .expect("write");

    let err = Builder::new(sample_config(), content.path(), out.path())
        .build()
        .unwrap_err();

    assert!(matches!(err, BuildError::Collector(_)));
    let message = err.to_string();
    assert!(message.contains("untitled.md"));
    assert!(message.contains("title is required"));
}
