// Tue Jan 13 2026 - Alex

use crate::config::Config;
use crate::unit::UnitDescriptor;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Finds unit files below a root directory. Read-only; every `walk` starts over.
#[derive(Debug, Clone)]
pub struct DirectoryWalker {
    suffix: String,
    recursive: bool,
}

impl DirectoryWalker {
    pub fn new(suffix: &str) -> Self {
        Self {
            suffix: suffix.to_string(),
            recursive: true,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.unit_suffix).with_recursive(config.recursive)
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Lazily yields `root` and, when recursive, every readable directory below it.
    /// A missing or unreadable root yields nothing.
    pub fn walk(&self, root: &Path) -> DirectoryWalk {
        DirectoryWalk {
            pending: vec![root.to_path_buf()],
            recursive: self.recursive,
        }
    }

    /// Unit files directly inside `dir`, in the order the filesystem returns them.
    pub fn list_unit_files(&self, dir: &Path) -> io::Result<Vec<UnitDescriptor>> {
        let mut units = Vec::new();

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            if let Some(unit) = UnitDescriptor::from_path(&path, &self.suffix) {
                units.push(unit);
            }
        }

        Ok(units)
    }
}

pub struct DirectoryWalk {
    pending: Vec<PathBuf>,
    recursive: bool,
}

impl Iterator for DirectoryWalk {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        while let Some(dir) = self.pending.pop() {
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    log::debug!("Skipping unreadable directory {:?}: {}", dir, e);
                    continue;
                }
            };

            if self.recursive {
                let mut children: Vec<PathBuf> = entries
                    .flatten()
                    // file_type() does not follow symlinks, so linked directories are never entered.
                    .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
                    .map(|entry| entry.path())
                    .collect();
                children.reverse();
                self.pending.extend(children);
            }

            return Some(dir);
        }

        None
    }
}
