//! Build the static site

use anyhow::Result;
use notify::{Event, Watcher};
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::generator::Generator;
use crate::Folio;

/// Minimum gap between two rebuilds in watch mode
const DEBOUNCE: Duration = Duration::from_millis(500);

/// Generate the static site
pub fn run(folio: &Folio) -> Result<()> {
    let start = Instant::now();

    let posts = folio.posts().list();
    let catalog = folio.catalog()?;
    tracing::info!(
        "Loaded {} posts and {} projects",
        posts.len(),
        catalog.len()
    );

    let generator = Generator::new(folio)?;
    generator.generate(&posts, &catalog)?;

    tracing::info!("Generated in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

/// Watch content and configuration, rebuilding on change
pub fn watch(folio: &Folio) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    if folio.content_dir.exists() {
        watcher.watch(&folio.content_dir, notify::RecursiveMode::Recursive)?;
    }

    let config_path = folio.base_dir.join(crate::CONFIG_FILE);
    if config_path.exists() {
        watcher.watch(&config_path, notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut last_rebuild = Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => {
                // Our own output must not trigger another build
                if event
                    .paths
                    .iter()
                    .all(|p| p.starts_with(&folio.public_dir))
                {
                    continue;
                }
                if last_rebuild.elapsed() <= DEBOUNCE {
                    continue;
                }

                tracing::info!("Change detected, rebuilding...");
                match folio.reload() {
                    Ok(reloaded) => {
                        if let Err(e) = run(&reloaded) {
                            tracing::error!("Build failed: {}", e);
                        }
                    }
                    Err(e) => tracing::error!("Failed to reload configuration: {}", e),
                }
                last_rebuild = Instant::now();
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_build_empty_site() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();
        run(&folio).unwrap();

        assert!(folio.public_dir.join("index.html").is_file());
        assert!(folio.public_dir.join("projects/index.html").is_file());
        let blog = fs::read_to_string(folio.public_dir.join("blog/index.html")).unwrap();
        assert!(blog.contains("Nothing published yet."));
    }
}
