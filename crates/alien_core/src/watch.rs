//! Modification-time polling for hot-reloadable content files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub struct ContentWatcher {
    path: PathBuf,
    last_seen_modified: Option<SystemTime>,
}

impl ContentWatcher {
    pub fn new(path: PathBuf) -> Self {
        let last_seen_modified = modified_time(&path);
        Self {
            path,
            last_seen_modified,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True once per observed change. A file that appears after startup
    /// counts as a change; a file that disappears does not.
    pub fn should_reload(&mut self) -> bool {
        let current = modified_time(&self.path);
        match (self.last_seen_modified, current) {
            (Some(old), Some(now)) if now > old => {
                self.last_seen_modified = Some(now);
                true
            }
            (None, Some(now)) => {
                self.last_seen_modified = Some(now);
                true
            }
            _ => false,
        }
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok()?.modified().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn temp_path(hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "alien_watch_test_{}_{}_{}.json",
            hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn unchanged_file_does_not_trigger() {
        let path = temp_path("unchanged");
        fs::write(&path, "{}").expect("write temp file");
        let mut watcher = ContentWatcher::new(path.clone());
        assert!(!watcher.should_reload());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn file_created_after_start_triggers_once() {
        let path = temp_path("created");
        let mut watcher = ContentWatcher::new(path.clone());
        assert!(!watcher.should_reload());
        fs::write(&path, "{}").expect("write temp file");
        assert!(watcher.should_reload());
        assert!(!watcher.should_reload());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn newer_mtime_triggers() {
        let path = temp_path("touched");
        fs::write(&path, "{}").expect("write temp file");
        let mut watcher = ContentWatcher::new(path.clone());
        let file = fs::File::options()
            .write(true)
            .open(&path)
            .expect("open temp file");
        file.set_modified(SystemTime::now() + Duration::from_secs(5))
            .expect("set mtime");
        assert!(watcher.should_reload());
        let _ = fs::remove_file(path);
    }
}
