//! Generate static files

use anyhow::Result;
use notify::Watcher;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::cache::{self, CacheDb};
use crate::generator::Generator;
use crate::manifest::Manifest;
use crate::Site;

/// Generate the static site (with incremental support)
pub fn run(site: &Site) -> Result<()> {
    run_with_options(site, false)
}

/// Generate with force option
pub fn run_with_options(site: &Site, force: bool) -> Result<()> {
    let start = std::time::Instant::now();

    let manifest = Manifest::load(site.manifest_path())?;
    tracing::info!("Loaded {} post(s) from the manifest", manifest.len());

    let previous = CacheDb::load(&site.base_dir);
    let current = cache::snapshot(site, &manifest);

    let changeset = if force {
        tracing::info!("Full generation (forced)");
        cache::ChangeSet::full_rebuild()
    } else {
        cache::detect_changes(&previous, &current)
    };

    if !changeset.has_changes() {
        tracing::info!(
            "No changes detected, skipping generation ({:.2}s)",
            start.elapsed().as_secs_f64()
        );
        return Ok(());
    }

    tracing::info!("Changes detected: {}", changeset.summary());

    let generator = Generator::new(site)?;
    if changeset.full_rebuild {
        generator.generate(&manifest)?;
    } else {
        generator.generate_incremental(
            &manifest,
            &changeset.changed_posts,
            changeset.static_changed,
        )?;
    }

    current.save(&site.base_dir)?;

    tracing::info!("Generated in {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}

/// Watch for file changes and regenerate
pub async fn watch(site: &Site) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    if site.posts_dir.exists() {
        watcher.watch(site.posts_dir.as_ref(), notify::RecursiveMode::Recursive)?;
    }

    let manifest_path = site.manifest_path();
    if manifest_path.exists() {
        watcher.watch(&manifest_path, notify::RecursiveMode::NonRecursive)?;
    }

    let config_path = site.base_dir.join("_config.yml");
    if config_path.exists() {
        watcher.watch(&config_path, notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes (incremental mode). Press Ctrl+C to stop.");

    // Debounce events
    let mut last_rebuild = std::time::Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, regenerating...");
                    if let Err(e) = run(site) {
                        tracing::error!("Generation failed: {}", e);
                    }
                    last_rebuild = std::time::Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                // Continue waiting
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    Ok(())
}
