use crate::validation::verdict::ConfirmedParameter;
use serde::Serialize;

#[derive(Serialize)]
struct UrlReport<'a> {
    url: &'a str,
    scan_date: String,
    parameters: &'a [ConfirmedParameter],
}

/// One-line JSON record for a processed URL.
pub fn render(url: &str, confirmed: &[ConfirmedParameter]) -> serde_json::Result<String> {
    let report = UrlReport {
        url,
        scan_date: chrono::Utc::now().to_rfc3339(),
        parameters: confirmed,
    };

    serde_json::to_string(&report)
}
