//! Re-run checks when the input file changes

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{Config as WatcherConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::check_once;
use crate::config::Config;

/// Editors often write a file in several steps; wait this long for quiet
const SETTLE_TIME: Duration = Duration::from_millis(200);

/// Events from the file watcher
#[derive(Debug)]
enum WatcherEvent {
    FileChanged,
    WatcherError(notify::Error),
}

/// Check the file, then check again after every change until the watcher stops
pub async fn watch(config: &Config) -> Result<()> {
    let target = config
        .file
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", config.file.display()))?;
    let directory = target
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let watched = target.clone();
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| match res {
            Ok(event) => {
                if let EventKind::Create(_) | EventKind::Modify(_) = event.kind {
                    if event.paths.iter().any(|path| is_same_file(path, &watched)) {
                        let _ = tx.send(WatcherEvent::FileChanged);
                    }
                }
            }
            Err(e) => {
                let _ = tx.send(WatcherEvent::WatcherError(e));
            }
        },
        WatcherConfig::default().with_poll_interval(Duration::from_secs(1)),
    )?;

    // The directory, not the file, so replace-on-save is still seen
    watcher
        .watch(&directory, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch {}", directory.display()))?;
    log::info!("Watching {}", target.display());

    report_failure(check_once(config).await);

    while let Some(event) = rx.recv().await {
        match event {
            WatcherEvent::FileChanged => {
                tokio::time::sleep(SETTLE_TIME).await;
                drain_pending(&mut rx);
                log::debug!("{} changed, checking again", target.display());
                report_failure(check_once(config).await);
            }
            WatcherEvent::WatcherError(e) => {
                log::error!("File watcher error: {e}");
            }
        }
    }

    Ok(())
}

/// Discard changes queued while settling, logging any watcher errors among them.
/// Returns how many errors were seen.
fn drain_pending(rx: &mut mpsc::UnboundedReceiver<WatcherEvent>) -> usize {
    let mut errors = 0;
    while let Ok(event) = rx.try_recv() {
        if let WatcherEvent::WatcherError(e) = event {
            log::error!("File watcher error: {e}");
            errors += 1;
        }
    }
    errors
}

fn is_same_file(path: &Path, target: &Path) -> bool {
    path == target || path.canonicalize().is_ok_and(|path| path == target)
}

/// A failed check does not end the watch
fn report_failure(result: Result<bool>) {
    if let Err(e) = result {
        log::error!("{e:#}");
    }
}
