pub mod fingerprint;
pub mod normalize;
pub mod version;

use std::path::Path;

use crate::source::ContentSource;

/// A single catalog rule that can be tried against a content source.
///
/// Both fingerprint and version rules are evaluated the same way: in declared
/// order, stopping at the first one that yields a hit.
pub trait CatalogRule {
    type Hit;

    /// Catalog path this rule inspects.
    fn file(&self) -> &Path;

    /// Evaluate the rule. `None` means the rule contributes nothing.
    fn evaluate(&self, source: &dyn ContentSource) -> Option<Self::Hit>;
}

/// Evaluate `rules` in order and return the first hit.
pub fn first_hit<R: CatalogRule>(rules: &[R], source: &dyn ContentSource) -> Option<R::Hit> {
    rules.iter().find_map(|rule| rule.evaluate(source))
}

/// Whether the rule's path names an entry below the root. Paths made only of
/// separators and `.` (including the empty path) name nothing.
pub(crate) fn names_entry<R: CatalogRule + ?Sized>(rule: &R) -> bool {
    let named = rule
        .file()
        .to_string_lossy()
        .split(['/', '\\'])
        .any(|part| !part.is_empty() && part != ".");
    if !named {
        tracing::debug!(file = %rule.file().display(), "rule path names no entry, skipping rule");
    }
    named
}

/// Read the file a rule points at. Absence and read failures both yield
/// `None`; failures are logged.
pub(crate) fn read_content<R: CatalogRule + ?Sized>(
    rule: &R,
    source: &dyn ContentSource,
) -> Option<Vec<u8>> {
    if !names_entry(rule) {
        return None;
    }
    match source.read(rule.file()) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(
                file = %source.describe(rule.file()),
                error = %e,
                "failed to read rule file, skipping rule"
            );
            None
        }
    }
}
