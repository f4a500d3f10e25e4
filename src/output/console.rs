use crate::ScanReport;

/// Render a scan report as an aligned plain-text table, in detection order.
pub fn render(report: &ScanReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\n  Target: {} ({} signatures checked)\n\n",
        report.target.display(),
        report.signatures_checked
    ));

    if report.apps.is_empty() {
        output.push_str("  No known products detected.\n\n");
        return output;
    }

    let width = report
        .apps
        .iter()
        .map(|app| app.name.len())
        .max()
        .unwrap_or(0)
        .max("PRODUCT".len());

    output.push_str(&format!("  {:<width$}  VERSION\n", "PRODUCT"));
    for app in &report.apps {
        let version = if app.version.is_empty() {
            "-"
        } else {
            app.version.as_str()
        };
        output.push_str(&format!("  {:<width$}  {}\n", app.name, version));
    }
    output.push('\n');

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::App;

    fn report(apps: Vec<App>) -> ScanReport {
        ScanReport {
            target: "/srv/www".into(),
            catalog_digest: String::new(),
            scanned_at: chrono::Utc::now(),
            signatures_checked: 2,
            apps,
        }
    }

    #[test]
    fn empty_report() {
        let out = render(&report(vec![]));
        assert!(out.contains("No known products detected."));
    }

    #[test]
    fn unknown_version_shown_as_dash() {
        let out = render(&report(vec![
            App {
                name: "Drupal".into(),
                version: "10.1.6".into(),
            },
            App {
                name: "phpMyAdmin".into(),
                version: String::new(),
            },
        ]));
        assert!(out.contains("  Drupal      10.1.6\n"));
        assert!(out.contains("  phpMyAdmin  -\n"));
    }
}
