use std::{
    collections::HashMap,
    future::Future,
    path::{Path, PathBuf},
};

use anyhow::Context;
use futures::channel::oneshot;

use crate::foundation::error::{ScrollmapError, ScrollmapResult};

/// Fetches layer sources and icon assets by location.
///
/// Fetches for different layers run concurrently; an implementation must not assume any
/// ordering between them.
pub trait SourceFetcher {
    /// Fetch the bytes at `location`.
    fn fetch(&self, location: &str) -> impl Future<Output = ScrollmapResult<Vec<u8>>>;

    /// URL a renderer should use to reference `location` directly.
    fn external_url(&self, location: &str) -> String {
        location.to_string()
    }
}

/// Reads locations as relative paths under a root directory.
///
/// Each read runs on its own short-lived thread, so the fetch futures of different layers make
/// progress concurrently under a single-threaded executor.
#[derive(Clone, Debug)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    /// Fetcher rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceFetcher for FsFetcher {
    async fn fetch(&self, location: &str) -> ScrollmapResult<Vec<u8>> {
        let path = self.root.join(normalize_rel_path(location)?);
        let (tx, rx) = oneshot::channel();
        std::thread::Builder::new()
            .name("scrollmap-fetch".to_string())
            .spawn(move || {
                let _ = tx.send(read_bytes(&path));
            })
            .context("spawn source reader")?;
        rx.await
            .map_err(|_| anyhow::anyhow!("source read for '{location}' was abandoned"))?
    }

    fn external_url(&self, location: &str) -> String {
        normalize_rel_path(location).unwrap_or_else(|_| location.to_string())
    }
}

fn read_bytes(path: &Path) -> ScrollmapResult<Vec<u8>> {
    std::fs::read(path)
        .with_context(|| format!("read source bytes from '{}'", path.display()))
        .map_err(ScrollmapError::from)
}

/// In-memory fetcher keyed by normalized location.
#[derive(Clone, Debug, Default)]
pub struct MemoryFetcher {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    /// Empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bytes at `location`.
    pub fn insert(&mut self, location: &str, bytes: impl Into<Vec<u8>>) -> ScrollmapResult<()> {
        self.files.insert(normalize_rel_path(location)?, bytes.into());
        Ok(())
    }

    /// Builder form of [`MemoryFetcher::insert`].
    pub fn with(mut self, location: &str, bytes: impl Into<Vec<u8>>) -> ScrollmapResult<Self> {
        self.insert(location, bytes)?;
        Ok(self)
    }
}

impl SourceFetcher for MemoryFetcher {
    async fn fetch(&self, location: &str) -> ScrollmapResult<Vec<u8>> {
        let norm = normalize_rel_path(location)?;
        self.files
            .get(&norm)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no such location '{norm}'").into())
    }
}

/// Normalize a source location into a stable, relative, `/`-separated key.
///
/// Rejects absolute paths and `..` segments.
pub fn normalize_rel_path(source: &str) -> ScrollmapResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(ScrollmapError::validation("source paths must be relative"));
    }
    if s.is_empty() {
        return Err(ScrollmapError::validation("source path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ScrollmapError::validation("source paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ScrollmapError::validation(
            "source path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/layers/source.rs"]
mod tests;
