use std::collections::HashMap;
use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::foundation::error::{VibeError, VibeResult};
use crate::model::{PostEntry, PostId};
use crate::render::markup::CardMarkup;

/// Persistent home of generated card markup, keyed by post.
///
/// One artifact per post; `put` replaces any previous artifact.
pub trait ArtifactStore: Send + Sync {
    /// Store `markup` for `post`.
    fn put(&self, post: &PostId, markup: &CardMarkup) -> VibeResult<()>;
    /// Markup stored for `post`, if any.
    fn get(&self, post: &PostId) -> VibeResult<Option<CardMarkup>>;
    /// Drop the artifact for `post`. Returns whether one existed.
    fn remove(&self, post: &PostId) -> VibeResult<bool>;
}

/// Process-local [`ArtifactStore`].
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    inner: RwLock<HashMap<PostId, CardMarkup>>,
}

impl MemoryArtifactStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored artifacts.
    pub fn len(&self) -> usize {
        match self.inner.read() {
            Ok(m) => m.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> VibeError {
    VibeError::store("artifact map lock poisoned")
}

impl ArtifactStore for MemoryArtifactStore {
    fn put(&self, post: &PostId, markup: &CardMarkup) -> VibeResult<()> {
        self.inner
            .write()
            .map_err(poisoned)?
            .insert(post.clone(), markup.clone());
        Ok(())
    }

    fn get(&self, post: &PostId) -> VibeResult<Option<CardMarkup>> {
        Ok(self.inner.read().map_err(poisoned)?.get(post).cloned())
    }

    fn remove(&self, post: &PostId) -> VibeResult<bool> {
        Ok(self.inner.write().map_err(poisoned)?.remove(post).is_some())
    }
}

/// [`ArtifactStore`] keeping one `<post_id>.svg` file per post in a directory.
///
/// Each write goes to its own temporary file which is then renamed over the artifact, so
/// readers and overlapping writers never observe a partial artifact. The last rename wins.
#[derive(Clone, Debug)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    /// Store rooted at `root`; the directory is created if needed.
    pub fn open(root: impl Into<PathBuf>) -> VibeResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            VibeError::store(format!("create store dir '{}': {e}", root.display()))
        })?;
        Ok(Self { root })
    }

    /// Directory holding the artifacts.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File that holds (or would hold) the artifact for `post`.
    pub fn artifact_path(&self, post: &PostId) -> PathBuf {
        self.root.join(format!("{post}.svg"))
    }
}

impl ArtifactStore for FsArtifactStore {
    fn put(&self, post: &PostId, markup: &CardMarkup) -> VibeResult<()> {
        let path = self.artifact_path(post);
        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{post}."))
            .suffix(".svg.tmp")
            .tempfile_in(&self.root)
            .map_err(|e| {
                VibeError::store(format!("create temp file in '{}': {e}", self.root.display()))
            })?;
        tmp.write_all(markup.as_str().as_bytes())
            .map_err(|e| VibeError::store(format!("write '{}': {e}", tmp.path().display())))?;
        // The temp file is removed on drop if the rename fails.
        tmp.persist(&path)
            .map_err(|e| VibeError::store(format!("rename into '{}': {}", path.display(), e.error)))?;
        tracing::debug!(post = %post, path = %path.display(), "artifact stored");
        Ok(())
    }

    fn get(&self, post: &PostId) -> VibeResult<Option<CardMarkup>> {
        let path = self.artifact_path(post);
        match std::fs::read_to_string(&path) {
            Ok(s) => Ok(Some(CardMarkup::new(s))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VibeError::store(format!("read '{}': {e}", path.display()))),
        }
    }

    fn remove(&self, post: &PostId) -> VibeResult<bool> {
        let path = self.artifact_path(post);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(VibeError::store(format!("remove '{}': {e}", path.display()))),
        }
    }
}

/// Lookup of published posts, used by the read path.
pub trait PostCatalog: Send + Sync {
    /// Entry for `post`, or `None` when the post does not exist.
    fn lookup(&self, post: &PostId) -> VibeResult<Option<PostEntry>>;
}

/// In-memory [`PostCatalog`].
#[derive(Clone, Debug, Default)]
pub struct MemoryPostCatalog {
    posts: HashMap<PostId, PostEntry>,
}

impl MemoryPostCatalog {
    /// Empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace `post`.
    pub fn insert(&mut self, post: PostId, entry: PostEntry) {
        self.posts.insert(post, entry);
    }

    /// Builder form of [`MemoryPostCatalog::insert`].
    pub fn with(mut self, post: PostId, entry: PostEntry) -> Self {
        self.insert(post, entry);
        self
    }
}

impl PostCatalog for MemoryPostCatalog {
    fn lookup(&self, post: &PostId) -> VibeResult<Option<PostEntry>> {
        Ok(self.posts.get(post).cloned())
    }
}

#[cfg(test)]
#[path = "../tests/unit/store.rs"]
mod tests;
