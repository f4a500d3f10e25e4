use std::path::Path;

use super::normalize::{first_non_blank_line, normalize};
use super::{first_hit, read_content, CatalogRule};
use crate::catalog::{Signature, VersionRule};
use crate::source::ContentSource;

impl CatalogRule for VersionRule {
    type Hit = String;

    fn file(&self) -> &Path {
        &self.file
    }

    fn evaluate(&self, source: &dyn ContentSource) -> Option<String> {
        let content = read_content(self, source)?;

        if let Some(exclude) = &self.exclude {
            if exclude.is_match(&content) {
                tracing::debug!(file = %self.file.display(), "version rule excluded");
                return None;
            }
        }

        let mut raw: &[u8] = self
            .pattern
            .as_ref()
            .and_then(|pattern| pattern.capture(&content))
            .unwrap_or_default();

        if raw.is_empty() && self.flatten {
            raw = first_non_blank_line(&content).unwrap_or_default();
        }

        if raw.is_empty() {
            return None;
        }

        let version = normalize(raw, self.filter.as_ref());
        (!version.is_empty()).then_some(version)
    }
}

/// Best version string for a signature already confirmed present.
///
/// Empty when no rule yields anything.
pub fn extract(signature: &Signature, source: &dyn ContentSource) -> String {
    let version = first_hit(&signature.version_rules, source).unwrap_or_default();
    tracing::debug!(signature = %signature.name, version = %version, "version evaluated");
    version
}
