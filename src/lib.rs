//! cmsfinder — offline detection of installed web applications.
//!
//! Matches a catalog of per-product file signatures against a directory tree
//! and reports which products are present, with a best-effort version for
//! each.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use cmsfinder::{scan, ScanOptions};
//!
//! let options = ScanOptions::default();
//! let report = scan(Path::new("signatures.json"), Path::new("/var/www/html"), &options).unwrap();
//! for app in &report.apps {
//!     println!("{} {}", app.name, app.version);
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod output;
pub mod rules;
pub mod scanner;
pub mod source;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use catalog::Catalog;
use config::Config;
use error::Result;
use output::OutputFormat;
pub use scanner::{App, Scanner};

/// Options for a scan invocation.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Path to config file (defaults to `.cmsfinder.toml` in the working directory).
    pub config_path: Option<PathBuf>,
}

/// Complete scan report.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub target: PathBuf,
    /// Hex SHA-256 of the catalog the scan ran with.
    pub catalog_digest: String,
    pub scanned_at: DateTime<Utc>,
    pub signatures_checked: usize,
    pub apps: Vec<App>,
}

/// Run a complete scan: load config and catalog, then match every signature
/// against `root`.
///
/// Fails only when the config or catalog cannot be loaded.
pub fn scan(catalog_path: &Path, root: &Path, options: &ScanOptions) -> Result<ScanReport> {
    let config_path = options
        .config_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(".cmsfinder.toml"));
    let config = Config::load(&config_path)?;

    let catalog = Catalog::load(catalog_path)?;
    let catalog_digest = catalog.digest().to_string();

    let scanner = Scanner::new(catalog)
        .with_ignored(config.scan.ignore.iter().cloned())
        .with_max_file_bytes(config.scan.max_file_bytes);
    let signatures_checked = scanner.checked_count();

    let scanned_at = Utc::now();
    let apps = scanner.scan(root);
    tracing::info!(
        target_dir = %root.display(),
        detected = apps.len(),
        "scan complete"
    );

    Ok(ScanReport {
        target: root.to_path_buf(),
        catalog_digest,
        scanned_at,
        signatures_checked,
        apps,
    })
}

/// Render a scan report in the specified format.
pub fn render_report(report: &ScanReport, format: OutputFormat) -> Result<String> {
    output::render(report, format)
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    const CATALOG: &str = "tests/fixtures/catalog.json";

    fn detected(site: &str) -> Vec<(String, String)> {
        let report = scan(
            Path::new(CATALOG),
            &Path::new("tests/fixtures/sites").join(site),
            &ScanOptions::default(),
        )
        .unwrap();
        report
            .apps
            .into_iter()
            .map(|app| (app.name, app.version))
            .collect()
    }

    fn pair(name: &str, version: &str) -> (String, String) {
        (name.into(), version.into())
    }

    #[test]
    fn wordpress_detected_with_version() {
        assert_eq!(detected("wordpress"), vec![pair("WordPress", "6.4.2")]);
    }

    #[test]
    fn joomla_version_from_manifest() {
        assert_eq!(detected("joomla"), vec![pair("Joomla", "3.10.12")]);
    }

    #[test]
    fn drupal_falls_back_to_changelog() {
        assert_eq!(detected("drupal"), vec![pair("Drupal", "7.98")]);
    }

    #[test]
    fn classicpress_excluded_from_wordpress_version() {
        assert_eq!(
            detected("classicpress"),
            vec![pair("WordPress", ""), pair("ClassicPress", "1.7.2")]
        );
    }

    #[test]
    fn discuz_filter_normalizes_version() {
        assert_eq!(detected("discuz"), vec![pair("Discuz", "3.4")]);
    }

    #[test]
    fn empty_site_detects_nothing() {
        assert!(detected("empty").is_empty());
    }

    #[test]
    fn missing_site_is_not_an_error() {
        assert!(detected("does-not-exist").is_empty());
    }

    #[test]
    fn bad_catalog_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("catalog.json");
        std::fs::write(&catalog, r#"{"X": {"versions": [{"file": "v", "regex": "(?P<version>"}]}}"#)
            .unwrap();
        let err = scan(&catalog, dir.path(), &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, error::FinderError::Compile { .. }));
    }

    #[test]
    fn config_ignore_list_applies() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join(".cmsfinder.toml");
        std::fs::write(&config, "[scan]\nignore = [\"WordPress\"]\n").unwrap();
        let options = ScanOptions {
            config_path: Some(config),
        };
        let report = scan(
            Path::new(CATALOG),
            Path::new("tests/fixtures/sites/classicpress"),
            &options,
        )
        .unwrap();
        let names: Vec<_> = report.apps.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["ClassicPress"]);
        assert_eq!(report.signatures_checked, 4);
    }

    #[test]
    fn acme_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("catalog.json");
        std::fs::write(
            &catalog,
            r#"{"Acme": {
                "fingerprints": [{"file": "readme.txt", "signature": ""}],
                "versions": [{"file": "version.txt", "regex": "VERSION=(?P<version>\\d+\\.\\d+)"}]
            }}"#,
        )
        .unwrap();
        let site = dir.path().join("site");
        std::fs::create_dir(&site).unwrap();
        std::fs::write(site.join("readme.txt"), "").unwrap();
        std::fs::write(site.join("version.txt"), "VERSION=2.5").unwrap();

        let report = scan(&catalog, &site, &ScanOptions::default()).unwrap();
        assert_eq!(
            report.apps,
            vec![App {
                name: "Acme".into(),
                version: "2.5".into()
            }]
        );
        assert_eq!(report.signatures_checked, 1);

        let rendered = render_report(&report, OutputFormat::Console).unwrap();
        assert!(rendered.contains("Acme"));
        assert!(rendered.contains("2.5"));
    }
}
