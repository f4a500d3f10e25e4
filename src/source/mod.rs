//! File access seam between the matchers and the filesystem.
//!
//! Matchers only ever ask two questions about a catalog path: does it exist,
//! and what bytes does it hold. Absence is a normal answer (`Ok(None)`), not
//! an error.

mod memory;

use std::io;
use std::path::{Path, PathBuf};

pub use memory::MemorySource;

/// Default per-file read cap (16 MiB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 16 * 1024 * 1024;

/// Yields file content for paths relative to a scan root.
pub trait ContentSource: Send + Sync {
    /// Whether `relative` names an existing file or directory.
    fn exists(&self, relative: &Path) -> bool;

    /// Read `relative`. `Ok(None)` when it does not exist; `Err` for any
    /// other failure.
    fn read(&self, relative: &Path) -> io::Result<Option<Vec<u8>>>;

    /// Human-readable location of `relative`, for log messages.
    fn describe(&self, relative: &Path) -> String {
        relative.display().to_string()
    }
}

/// Reads files below a root directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
    max_file_bytes: u64,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }

    pub fn with_max_file_bytes(mut self, max_file_bytes: u64) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join a catalog path under the root.
    ///
    /// Catalog paths are often written with a leading separator
    /// (`/wp-includes/version.php`) or with Windows separators; both stay
    /// inside the root.
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        let text = relative.to_string_lossy();
        let mut resolved = self.root.clone();
        for part in text.split(['/', '\\']) {
            if !part.is_empty() && part != "." {
                resolved.push(part);
            }
        }
        resolved
    }
}

impl ContentSource for DirSource {
    fn exists(&self, relative: &Path) -> bool {
        self.resolve(relative).exists()
    }

    fn read(&self, relative: &Path) -> io::Result<Option<Vec<u8>>> {
        let path = self.resolve(relative);
        let metadata = match std::fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a regular file",
            ));
        }
        if metadata.len() > self.max_file_bytes {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "file is {} bytes, over the {} byte limit",
                    metadata.len(),
                    self.max_file_bytes
                ),
            ));
        }
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn describe(&self, relative: &Path) -> String {
        self.resolve(relative).display().to_string()
    }
}
