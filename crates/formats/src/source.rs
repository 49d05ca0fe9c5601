//! Where story resources come from.
//!
//! The loader only needs "give me the text behind this path". Hosts plug in
//! a filesystem directory, an in-memory map (tests, embedded builds) or a
//! remote HTTP origin by implementing [`ResourceSource`].

use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

/// Boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug)]
pub struct SourceError {
    pub path: String,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        path: impl Into<String>,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

pub trait ResourceSource: Send + Sync {
    /// Human-readable origin, for logs.
    fn describe(&self) -> String;

    /// Fetches the full text of `path`.
    fn fetch(&self, path: &str) -> BoxFuture<'_, Result<String, SourceError>>;
}

/// Reads resources relative to a root directory.
#[derive(Debug, Clone)]
pub struct FilesystemSource {
    root: PathBuf,
}

impl FilesystemSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceSource for FilesystemSource {
    fn describe(&self) -> String {
        format!("dir:{}", self.root.display())
    }

    fn fetch(&self, path: &str) -> BoxFuture<'_, Result<String, SourceError>> {
        let full = self.root.join(path);
        let path = path.to_string();
        Box::pin(async move {
            tokio::fs::read_to_string(&full)
                .await
                .map_err(|e| SourceError::with_source(path, format!("read {}", full.display()), e))
        })
    }
}

/// In-memory resources keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }
}

impl ResourceSource for MemorySource {
    fn describe(&self) -> String {
        format!("memory:{} files", self.files.len())
    }

    fn fetch(&self, path: &str) -> BoxFuture<'_, Result<String, SourceError>> {
        let found = self.files.get(path).cloned();
        let path = path.to_string();
        Box::pin(async move { found.ok_or_else(|| SourceError::new(path, "not found")) })
    }
}
