//! store.rs — flat-file record of titles that were already posted.
//!
//! One title per line, append-only. A title is appended right after its send
//! attempt, so a crash can at worst cause a repeat post on the next run.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_STATE_PATH: &str = "posted_titles.txt";

#[derive(Debug, Clone)]
pub struct TitleStore {
    path: PathBuf,
}

impl TitleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all posted titles. A missing file is an empty set.
    pub fn load(&self) -> Result<HashSet<String>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashSet::new()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("reading posted titles from {}", self.path.display())
                })
            }
        };
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Append one title and sync it to disk before returning.
    pub fn append(&self, title: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {} for append", self.path.display()))?;
        file.write_all(format!("{title}\n").as_bytes())
            .with_context(|| format!("appending to {}", self.path.display()))?;
        file.sync_data().context("syncing posted titles")?;
        Ok(())
    }
}
