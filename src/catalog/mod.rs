//! Signature catalog: the compiled, immutable rule set a scan runs against.
//!
//! A catalog is built in two phases. JSON is first deserialized into the
//! plain records of [`raw`], then every pattern is compiled by [`compile`]
//! into frozen [`Signature`] values. Loading is all-or-nothing: one invalid
//! pattern anywhere rejects the whole catalog.

pub mod compile;
pub mod dialect;
pub mod raw;

use std::path::{Path, PathBuf};

use regex::bytes::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::error::{FinderError, Result};
use raw::RawCatalog;

/// Ordered collection of compiled product signatures.
#[derive(Debug, Clone)]
pub struct Catalog {
    signatures: Vec<Signature>,
    digest: String,
}

/// Detection rules for one product.
#[derive(Debug, Clone)]
pub struct Signature {
    pub name: String,
    /// Presence rules, OR semantics, first match wins.
    pub fingerprints: Vec<FingerprintRule>,
    /// Version rules, first non-empty result wins.
    pub version_rules: Vec<VersionRule>,
    /// Informational only.
    pub supported_versions: Vec<String>,
    /// Informational only.
    pub end_of_life_versions: Vec<String>,
}

/// A presence rule: the file exists, contains `required` and lacks `excluded`.
#[derive(Debug, Clone)]
pub struct FingerprintRule {
    pub file: PathBuf,
    /// `None` means any content qualifies.
    pub required: Option<String>,
    /// `None` never disqualifies.
    pub excluded: Option<String>,
}

impl FingerprintRule {
    /// Whether evaluating this rule needs the file content at all.
    pub fn inspects_content(&self) -> bool {
        self.required.is_some() || self.excluded.is_some()
    }
}

/// One ordered attempt at extracting a version from a file.
#[derive(Debug, Clone)]
pub struct VersionRule {
    pub file: PathBuf,
    pub pattern: Option<VersionPattern>,
    /// Skips the rule when it matches anywhere in the file.
    pub exclude: Option<Regex>,
    /// Fall back to the first non-blank line of the file.
    pub flatten: bool,
    /// Every match in the extracted text is replaced with `.`.
    pub filter: Option<Regex>,
}

/// A compiled extraction pattern together with its designated version group.
#[derive(Debug, Clone)]
pub struct VersionPattern {
    pub regex: Regex,
    /// Capture group indexes that may hold the version, first participating
    /// one wins; 0 is the whole match.
    pub groups: Vec<usize>,
    pub source: String,
    pub multiline: bool,
}

impl VersionPattern {
    /// Span of the version group in the first match, if any.
    pub fn capture<'h>(&self, haystack: &'h [u8]) -> Option<&'h [u8]> {
        let caps = self.regex.captures(haystack)?;
        self.groups
            .iter()
            .find_map(|&group| caps.get(group))
            .map(|m| m.as_bytes())
    }
}

/// Catalog entry summary, used for `list` output.
#[derive(Debug, Clone, Serialize)]
pub struct SignatureInfo {
    pub name: String,
    pub fingerprints: usize,
    pub version_rules: usize,
    pub supports: Vec<String>,
    pub lasts: Vec<String>,
}

impl Catalog {
    /// Load a catalog from a JSON file, or from every `*.json` file below a
    /// directory (in file-name order, signatures concatenated).
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FinderError::CatalogNotFound(path.display().to_string()));
        }

        let documents = if path.is_dir() {
            collect_documents(path)?
        } else {
            vec![path.to_path_buf()]
        };

        let mut hasher = Sha256::new();
        let mut signatures = Vec::new();
        for document in &documents {
            let bytes = std::fs::read(document)?;
            hasher.update(&bytes);
            let raw = parse_document(&document.display().to_string(), &bytes)?;
            signatures.extend(compile_all(raw)?);
        }

        tracing::info!(
            path = %path.display(),
            documents = documents.len(),
            signatures = signatures.len(),
            "catalog loaded"
        );

        Ok(Self {
            signatures,
            digest: hex::encode(hasher.finalize()),
        })
    }

    /// Build a catalog from an in-memory JSON document.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let raw = parse_document("<inline>", bytes)?;
        Ok(Self {
            signatures: compile_all(raw)?,
            digest: hex::encode(Sha256::digest(bytes)),
        })
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn get(&self, name: &str) -> Option<&Signature> {
        self.signatures.iter().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Hex SHA-256 of the catalog source.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn describe(&self) -> Vec<SignatureInfo> {
        self.signatures
            .iter()
            .map(|s| SignatureInfo {
                name: s.name.clone(),
                fingerprints: s.fingerprints.len(),
                version_rules: s.version_rules.len(),
                supports: s.supported_versions.clone(),
                lasts: s.end_of_life_versions.clone(),
            })
            .collect()
    }
}

fn collect_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            e.into_io_error()
                .unwrap_or_else(|| std::io::Error::other("catalog directory loop"))
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|e| e == "json") {
            documents.push(path.to_path_buf());
        }
    }
    Ok(documents)
}

fn parse_document(label: &str, bytes: &[u8]) -> Result<RawCatalog> {
    serde_json::from_slice(bytes).map_err(|source| FinderError::CatalogParse {
        path: label.to_string(),
        source,
    })
}

fn compile_all(raw: RawCatalog) -> Result<Vec<Signature>> {
    raw.entries
        .iter()
        .map(|(name, signature)| compile::compile_signature(name, signature))
        .collect()
}
