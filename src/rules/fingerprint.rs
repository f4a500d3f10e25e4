use std::path::Path;

use memchr::memmem;

use super::{first_hit, names_entry, read_content, CatalogRule};
use crate::catalog::{FingerprintRule, Signature};
use crate::source::ContentSource;

impl CatalogRule for FingerprintRule {
    type Hit = ();

    fn file(&self) -> &Path {
        &self.file
    }

    fn evaluate(&self, source: &dyn ContentSource) -> Option<()> {
        if !self.inspects_content() {
            return (names_entry(self) && source.exists(&self.file)).then_some(());
        }

        let content = read_content(self, source)?;
        let required = self
            .required
            .as_deref()
            .map_or(true, |needle| contains(&content, needle));
        let excluded = self
            .excluded
            .as_deref()
            .is_some_and(|needle| contains(&content, needle));

        (required && !excluded).then_some(())
    }
}

/// Whether any fingerprint rule of `signature` confirms the product.
pub fn matches(signature: &Signature, source: &dyn ContentSource) -> bool {
    let found = first_hit(&signature.fingerprints, source).is_some();
    tracing::debug!(signature = %signature.name, found, "fingerprint evaluated");
    found
}

fn contains(haystack: &[u8], needle: &str) -> bool {
    memmem::find(haystack, needle.as_bytes()).is_some()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::source::MemorySource;

    fn rule(file: &str, required: Option<&str>, excluded: Option<&str>) -> FingerprintRule {
        FingerprintRule {
            file: PathBuf::from(file),
            required: required.map(Into::into),
            excluded: excluded.map(Into::into),
        }
    }

    fn signature(fingerprints: Vec<FingerprintRule>) -> Signature {
        Signature {
            name: "Test".into(),
            fingerprints,
            version_rules: vec![],
            supported_versions: vec![],
            end_of_life_versions: vec![],
        }
    }

    #[test]
    fn existence_alone_suffices_without_patterns() {
        let source = MemorySource::new().with_file("wp-login.php", "");
        assert!(matches(&signature(vec![rule("wp-login.php", None, None)]), &source));
    }

    #[test]
    fn directory_counts_as_existing() {
        let source = MemorySource::new().with_file("sites/all/modules/x.module", "");
        assert!(matches(&signature(vec![rule("sites/all", None, None)]), &source));
    }

    #[test]
    fn required_content_must_be_present() {
        let source = MemorySource::new().with_file("index.php", "<?php // Joomla! CMS");
        assert!(matches(
            &signature(vec![rule("index.php", Some("Joomla!"), None)]),
            &source
        ));
        assert!(!matches(
            &signature(vec![rule("index.php", Some("WordPress"), None)]),
            &source
        ));
    }

    #[test]
    fn excluded_content_disqualifies() {
        let source = MemorySource::new().with_file("index.php", "Joomla! fork: Mambo");
        let sig = signature(vec![rule("index.php", Some("Joomla!"), Some("Mambo"))]);
        assert!(!matches(&sig, &source));
    }

    #[test]
    fn later_rule_can_confirm() {
        let source = MemorySource::new().with_file("b.txt", "marker");
        let sig = signature(vec![
            rule("a.txt", None, None),
            rule("b.txt", Some("nope"), None),
            rule("b.txt", Some("marker"), None),
        ]);
        assert!(matches(&sig, &source));
    }

    #[test]
    fn unreadable_file_is_rule_failure() {
        let source = MemorySource::new().with_file("dir/file", "");
        let sig = signature(vec![rule("dir", Some("x"), None)]);
        assert!(!matches(&sig, &source));
    }

    #[test]
    fn empty_path_names_nothing() {
        let source = MemorySource::new().with_file("index.php", "<?php");
        for file in ["", ".", "/", "./", "\\"] {
            assert!(!matches(&signature(vec![rule(file, None, None)]), &source), "{file:?}");
            assert!(
                !matches(&signature(vec![rule(file, Some("<?php"), None)]), &source),
                "{file:?}"
            );
        }
    }

    #[test]
    fn required_literal_found_deep_in_large_file() {
        let mut content = "x".repeat(70_000);
        content.push_str("Drupal.settings");
        let source = MemorySource::new().with_file("misc/drupal.js", content);
        let sig = signature(vec![rule("misc/drupal.js", Some("Drupal.settings"), None)]);
        assert!(matches(&sig, &source));
        let sig = signature(vec![rule("misc/drupal.js", Some("Drupal.settingz"), None)]);
        assert!(!matches(&sig, &source));
    }

    #[test]
    fn no_rules_never_matches() {
        let source = MemorySource::new().with_file("a", "");
        assert!(!matches(&signature(vec![]), &source));
    }
}
