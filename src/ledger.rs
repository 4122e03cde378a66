//! ledger.rs — durable set of already-published source identifiers.
//!
//! The file is the authority: one identifier per line, append-only. It is
//! read fully at startup into a `HashSet` for membership checks; every
//! `record` appends and fsyncs before returning, so a crash right after a
//! successful `record` still leaves the entry durable. The in-memory set is
//! only updated after the durable append succeeded.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    seen: HashSet<String>,
}

impl Ledger {
    /// Load the ledger from `path`. A missing file is an empty ledger;
    /// it is created on the first `record`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let seen = match std::fs::read_to_string(&path) {
            Ok(content) => content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashSet::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("reading ledger {}", path.display()))
            }
        };
        tracing::info!(entries = seen.len(), path = %path.display(), "ledger loaded");
        Ok(Self { path, seen })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Durably append `id`. Recording an already-present identifier is a
    /// no-op, not an error, and writes nothing.
    pub fn record(&mut self, id: &str) -> Result<()> {
        if self.seen.contains(id) {
            tracing::debug!(id, "ledger record skipped, already present");
            return Ok(());
        }
        let mut file: File = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening ledger {}", self.path.display()))?;
        writeln!(file, "{id}").context("appending to ledger")?;
        file.sync_data().context("syncing ledger")?;
        self.seen.insert(id.to_string());
        tracing::info!(id, entries = self.seen.len(), "ledger entry recorded");
        Ok(())
    }
}
