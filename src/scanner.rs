use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::rules::{fingerprint, version};
use crate::source::{ContentSource, DirSource, DEFAULT_MAX_FILE_BYTES};

/// A detected product. `version` is empty when presence was confirmed but
/// no version rule produced anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    pub name: String,
    pub version: String,
}

/// Runs a catalog against directory trees.
#[derive(Debug, Clone)]
pub struct Scanner {
    catalog: Catalog,
    ignored: HashSet<String>,
    max_file_bytes: u64,
}

impl Scanner {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            ignored: HashSet::new(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }

    /// Skip the named signatures entirely.
    pub fn with_ignored<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_max_file_bytes(mut self, max_file_bytes: u64) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Number of catalog signatures a scan evaluates, ignored ones excluded.
    pub fn checked_count(&self) -> usize {
        self.catalog
            .signatures()
            .iter()
            .filter(|signature| !self.ignored.contains(&signature.name))
            .count()
    }

    /// Scan a directory. Missing directories and files are not errors; they
    /// just confirm nothing.
    pub fn scan(&self, root: &Path) -> Vec<App> {
        let source = DirSource::new(root).with_max_file_bytes(self.max_file_bytes);
        self.scan_source(&source)
    }

    /// Scan any content source. Results follow catalog order; only products
    /// whose fingerprint matched appear.
    pub fn scan_source(&self, source: &dyn ContentSource) -> Vec<App> {
        let mut apps = Vec::new();

        for signature in self.catalog.signatures() {
            if self.ignored.contains(&signature.name) {
                tracing::debug!(signature = %signature.name, "ignored by configuration");
                continue;
            }
            if !fingerprint::matches(signature, source) {
                continue;
            }
            apps.push(App {
                name: signature.name.clone(),
                version: version::extract(signature, source),
            });
        }

        apps
    }
}
