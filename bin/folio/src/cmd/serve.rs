//! Serve command - development server with live reload

use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use color_eyre::eyre::{Result, WrapErr, eyre};
use folio_core::Config;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::{net::TcpListener, sync::mpsc};

use super::{
    build::{BuildOverrides, builder_for, load_site, print_stats},
    check::quick_validate,
};
use crate::{
    SitePaths,
    server::{LIVERELOAD_SCRIPT, ServerState, create_router},
};

/// Quiet period after the last file event before rebuilding.
const DEBOUNCE: Duration = Duration::from_millis(200);

/// Run the serve command.
///
/// Builds the site with drafts, serves the output and rebuilds on change.
pub async fn run(config_path: &Path, port: u16, open_browser: bool) -> Result<()> {
    tracing::info!(?config_path, port, "Starting dev server");

    let overrides = BuildOverrides {
        drafts: true,
        ..BuildOverrides::default()
    };
    let (config, paths) = load_site(config_path, &overrides)?;

    for warn in quick_validate(&config, &paths) {
        println!("  ⚠ {warn}");
    }

    println!("  Running initial build...");
    rebuild(config.clone(), paths.clone()).await?;

    let redirects = config
        .redirect_table()
        .wrap_err("Invalid redirect configuration")?;
    let state = Arc::new(ServerState::new(redirects));

    let (tx, mut rx) = mpsc::channel::<()>(64);
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<notify::Event>| {
            if let Ok(event) = res
                && matches!(
                    event.kind,
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                )
            {
                let _ = tx.blocking_send(());
            }
        },
        notify::Config::default(),
    )
    .wrap_err("Failed to create file watcher")?;

    for dir in watched_dirs(&paths) {
        watcher
            .watch(&dir, RecursiveMode::Recursive)
            .wrap_err_with(|| format!("Failed to watch {}", dir.display()))?;
        tracing::debug!(dir = %dir.display(), "watching");
    }

    let output_dir = paths.output.clone();
    let rebuild_state = state.clone();
    tokio::spawn(async move {
        while rx.recv().await.is_some() {
            // Wait until events stop arriving for a full debounce window.
            while let Ok(Some(())) = tokio::time::timeout(DEBOUNCE, rx.recv()).await {}

            println!("  File change detected, rebuilding...");
            match rebuild(config.clone(), paths.clone()).await {
                Ok(()) => rebuild_state.notify_reload(),
                Err(e) => {
                    tracing::error!(error = %e, "rebuild failed");
                    eprintln!("  ✗ Rebuild failed: {e:#}");
                }
            }
        }
    });

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let app = create_router(&output_dir, state);

    let listener = TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {addr}"))?;

    println!();
    println!("  Dev server running at http://{addr}");
    println!("  Press Ctrl+C to stop");
    println!();

    if open_browser && let Err(e) = open::that(format!("http://{addr}")) {
        tracing::warn!(error = %e, "could not open browser");
    }

    // Keep watcher alive
    let _watcher = watcher;

    axum::serve(listener, app).await.wrap_err("Server error")?;

    Ok(())
}

/// Directories whose changes trigger a rebuild.
fn watched_dirs(paths: &SitePaths) -> Vec<PathBuf> {
    [&paths.content, &paths.static_dir]
        .into_iter()
        .filter(|dir| dir.exists())
        .cloned()
        .collect()
}

/// Build off the async runtime, then inject the live reload script.
async fn rebuild(config: Config, paths: SitePaths) -> Result<()> {
    tokio::task::spawn_blocking(move || {
        let stats = builder_for(config, &paths)
            .build()
            .wrap_err("Build failed")?;
        inject_livereload(&paths.output)?;
        print_stats(&stats);
        Ok::<_, color_eyre::eyre::Report>(())
    })
    .await
    .map_err(|e| eyre!("build task panicked: {e}"))?
}

/// Inject the live reload script into every HTML file under `output_dir`.
fn inject_livereload(output_dir: &Path) -> Result<usize> {
    let mut injected = 0;

    for entry in walkdir::WalkDir::new(output_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "html"))
    {
        let path = entry.path();
        let content = fs::read_to_string(path)?;

        // Redirect pages have no body script to reload.
        if content.contains("data-livereload") || !content.contains("</body>") {
            continue;
        }

        let modified = content.replacen("</body>", &format!("{LIVERELOAD_SCRIPT}</body>"), 1);
        fs::write(path, modified)?;
        injected += 1;
    }

    tracing::debug!(injected, "live reload script injected");
    Ok(injected)
}
