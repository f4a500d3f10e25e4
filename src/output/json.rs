use crate::error::Result;
use crate::ScanReport;

/// Render a scan report as pretty-printed JSON.
pub fn render(report: &ScanReport) -> Result<String> {
    let json = serde_json::to_string_pretty(report)?;
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::App;

    #[test]
    fn apps_keep_order_and_empty_versions() {
        let report = ScanReport {
            target: "/srv/www".into(),
            catalog_digest: "00".into(),
            scanned_at: chrono::Utc::now(),
            signatures_checked: 3,
            apps: vec![
                App {
                    name: "WordPress".into(),
                    version: "6.4.2".into(),
                },
                App {
                    name: "Akismet".into(),
                    version: String::new(),
                },
            ],
        };
        let rendered = render(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["apps"][0]["name"], "WordPress");
        assert_eq!(value["apps"][1]["version"], "");
        assert_eq!(value["signatures_checked"], 3);
    }
}
