use std::path::PathBuf;

use regex::bytes::{Regex, RegexBuilder};

use super::dialect::{self, DUPLICATE_MARKER_PREFIX};
use super::raw::{RawFingerprint, RawSignature, RawVersionRule};
use super::{FingerprintRule, Signature, VersionPattern, VersionRule};
use crate::error::{FinderError, Result};

/// Name of the capture group that designates the version text.
pub const VERSION_GROUP: &str = "version";

/// Upper bound on the compiled program size of any catalog pattern.
const PATTERN_SIZE_LIMIT: usize = 1 << 22;

/// Compile one raw catalog entry. Any invalid pattern fails the whole entry.
pub fn compile_signature(name: &str, raw: &RawSignature) -> Result<Signature> {
    let fingerprints = raw.fingerprints.iter().map(compile_fingerprint).collect();

    let version_rules = raw
        .versions
        .iter()
        .map(|rule| compile_version_rule(name, rule))
        .collect::<Result<Vec<_>>>()?;

    Ok(Signature {
        name: name.to_string(),
        fingerprints,
        version_rules,
        supported_versions: raw.supports.0.clone(),
        end_of_life_versions: raw.lasts.0.clone(),
    })
}

fn compile_fingerprint(raw: &RawFingerprint) -> FingerprintRule {
    FingerprintRule {
        file: PathBuf::from(&raw.file),
        required: non_empty(&raw.signature).map(str::to_string),
        excluded: non_empty(&raw.exclude).map(str::to_string),
    }
}

fn compile_version_rule(signature: &str, raw: &RawVersionRule) -> Result<VersionRule> {
    let pattern = match non_empty(&raw.regex) {
        Some(source) => {
            let regex = build_regex(signature, "regex", source, raw.multiline)?;
            Some(VersionPattern {
                groups: version_groups(&regex),
                source: source.to_string(),
                multiline: raw.multiline,
                regex,
            })
        }
        None => None,
    };

    let exclude = non_empty(&raw.exclude)
        .map(|source| build_regex(signature, "exclude", source, false))
        .transpose()?;
    let filter = non_empty(&raw.filter)
        .map(|source| build_regex(signature, "filter", source, false))
        .transpose()?;

    Ok(VersionRule {
        file: PathBuf::from(&raw.file),
        pattern,
        exclude,
        flatten: raw.flatfile,
        filter,
    })
}

fn build_regex(signature: &str, field: &'static str, source: &str, multiline: bool) -> Result<Regex> {
    RegexBuilder::new(&dialect::translate(source))
        .multi_line(multiline)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
        .map_err(|source_err| FinderError::Compile {
            signature: signature.to_string(),
            field,
            pattern: source.to_string(),
            source: source_err,
        })
}

/// Resolve which capture groups carry the version, in priority order.
///
/// Groups named `version` (including renamed duplicates) win; otherwise the
/// first group; a pattern without any group yields its whole match.
fn version_groups(regex: &Regex) -> Vec<usize> {
    let named: Vec<usize> = regex
        .capture_names()
        .enumerate()
        .filter(|(_, name)| {
            name.is_some_and(|n| n == VERSION_GROUP || n.starts_with(DUPLICATE_MARKER_PREFIX))
        })
        .map(|(index, _)| index)
        .collect();
    if !named.is_empty() {
        named
    } else if regex.captures_len() > 1 {
        vec![1]
    } else {
        vec![0]
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
