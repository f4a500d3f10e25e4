use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use super::ContentSource;

/// In-memory file tree, keyed by `/`-separated relative path.
///
/// Directories exist implicitly as prefixes of stored files.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&mut self, path: &str, content: impl Into<Vec<u8>>) {
        self.files.insert(normalize_key(Path::new(path)), content.into());
    }
}

impl ContentSource for MemorySource {
    fn exists(&self, relative: &Path) -> bool {
        let key = normalize_key(relative);
        if self.files.contains_key(&key) {
            return true;
        }
        let prefix = format!("{key}/");
        self.files
            .range(prefix.clone()..)
            .next()
            .is_some_and(|(k, _)| k.starts_with(&prefix))
    }

    fn read(&self, relative: &Path) -> io::Result<Option<Vec<u8>>> {
        let key = normalize_key(relative);
        match self.files.get(&key) {
            Some(content) => Ok(Some(content.clone())),
            None if self.exists(relative) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a regular file",
            )),
            None => Ok(None),
        }
    }
}

fn normalize_key(path: &Path) -> String {
    path.to_string_lossy()
        .split(['/', '\\'])
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/")
}
