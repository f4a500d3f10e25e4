//! Plain deserialized catalog records, before any pattern is compiled.
//!
//! These mirror the on-disk JSON one-to-one. Every field is optional so that
//! sparse catalog entries load; the compiler decides what an empty field means.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// A whole catalog document: product name → signature, in document order.
#[derive(Debug, Clone, Default)]
pub struct RawCatalog {
    pub entries: Vec<(String, RawSignature)>,
}

impl<'de> Deserialize<'de> for RawCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawCatalog;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping product names to signatures")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawCatalog, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, signature)) = map.next_entry::<String, RawSignature>()? {
                    entries.push((name, signature));
                }
                Ok(RawCatalog { entries })
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSignature {
    #[serde(default)]
    pub fingerprints: Vec<RawFingerprint>,
    #[serde(default)]
    pub versions: Vec<RawVersionRule>,
    #[serde(default, alias = "support")]
    pub supports: VersionList,
    #[serde(default, alias = "last")]
    pub lasts: VersionList,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFingerprint {
    #[serde(default)]
    pub file: String,
    /// Content that must appear in the file.
    #[serde(default)]
    pub signature: Option<String>,
    /// Content that must not appear in the file.
    #[serde(default)]
    pub exclude: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVersionRule {
    #[serde(default)]
    pub regex: Option<String>,
    #[serde(default)]
    pub multiline: bool,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub exclude: Option<String>,
    #[serde(default)]
    pub flatfile: bool,
    #[serde(default)]
    pub filter: Option<String>,
}

/// A list of version strings.
///
/// Older catalogs store these as objects keyed by an arbitrary label; only the
/// values are kept, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionList(pub Vec<String>);

impl<'de> Deserialize<'de> for VersionList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            List(Vec<String>),
            Keyed(KeyedValues),
            Null(()),
        }

        Ok(match Shape::deserialize(deserializer)? {
            Shape::List(values) => VersionList(values),
            Shape::Keyed(keyed) => VersionList(keyed.0),
            Shape::Null(()) => VersionList::default(),
        })
    }
}

/// Values of a JSON object, in document order.
struct KeyedValues(Vec<String>);

impl<'de> Deserialize<'de> for KeyedValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValuesVisitor;

        impl<'de> Visitor<'de> for ValuesVisitor {
            type Value = KeyedValues;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of version strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<KeyedValues, A::Error> {
                let mut values = Vec::new();
                while let Some((_, value)) = map.next_entry::<String, String>()? {
                    values.push(value);
                }
                Ok(KeyedValues(values))
            }
        }

        deserializer.deserialize_map(ValuesVisitor)
    }
}
