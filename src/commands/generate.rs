//! Generate static files

use anyhow::Result;
use notify::Watcher;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::content::loader::ContentLoader;
use crate::generator::Generator;
use crate::store::ContentStore;
use crate::Pdfzone;

/// Generate the static site
pub fn run(site: &Pdfzone) -> Result<()> {
    let start = std::time::Instant::now();

    let loader = ContentLoader::new(site);
    let posts = loader.load_posts()?;
    tracing::info!("Loaded {} posts", posts.len());

    // Duplicate slugs/ids surface here and abort the build
    let store = ContentStore::from_posts(posts)?;

    let generator = Generator::new(site)?;
    generator.generate(&store)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

/// Watch for file changes and regenerate
pub async fn watch(site: &Pdfzone) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    watcher.watch(site.source_dir.as_ref(), notify::RecursiveMode::Recursive)?;

    let config_path = site.base_dir.join("_config.yml");
    if config_path.exists() {
        watcher.watch(config_path.as_ref(), notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut last_rebuild = std::time::Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                // Debounce: only rebuild if more than 500ms since last rebuild
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
