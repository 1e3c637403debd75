//! Utility helpers

use crate::{Error, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub struct Utils;

impl Utils {
    pub fn date_time_filename(prefix: &str, postfix: &str) -> String {
        let now = chrono::Local::now();
        format!("{}{}{}", prefix, now.format("%Y%m%d_%H%M%S"), postfix)
    }

    /// Sibling path used to stage a write before renaming over `dest`
    pub fn staging_path_for<P: AsRef<Path>>(dest: P) -> PathBuf {
        let dest = dest.as_ref();
        let mut name = dest
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".partial");
        dest.with_file_name(name)
    }
}

/// Self-deleting temporary directory
pub struct TempFolder {
    path: PathBuf,
}

impl TempFolder {
    pub fn new() -> Result<Self> {
        let mut path = env::temp_dir();
        let unique = format!(
            "stlrelief_{}_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        );
        path.push(unique);
        fs::create_dir_all(&path).map_err(|source| Error::ResourceUnavailable {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFolder {
    fn drop(&mut self) {
        if let Ok(entries) = fs::read_dir(&self.path) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_file() {
                    let _ = fs::remove_file(path);
                }
            }
        }
        let _ = fs::remove_dir(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_folder_cleanup() {
        let path = {
            let tmp = TempFolder::new().unwrap();
            fs::write(tmp.path().join("a.txt"), b"x").unwrap();
            tmp.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_temp_folders_are_distinct() {
        let a = TempFolder::new().unwrap();
        let b = TempFolder::new().unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_staging_path() {
        let staged = Utils::staging_path_for("/tmp/out/model.stl");
        assert_eq!(staged, PathBuf::from("/tmp/out/model.stl.partial"));
    }

    #[test]
    fn test_date_time_filename() {
        let name = Utils::date_time_filename("run_", ".log");
        assert!(name.starts_with("run_"));
        assert!(name.ends_with(".log"));
        assert_eq!(name.len(), "run_".len() + 15 + ".log".len());
    }
}
