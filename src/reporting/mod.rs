pub mod json;
pub mod text;

use crate::cli::args::OutputFormat;
use crate::validation::verdict::ConfirmedParameter;
use url::Url;

/// Format the result for one URL.
pub fn render(
    format: OutputFormat,
    url: &Url,
    confirmed: &[ConfirmedParameter],
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Request => Ok(text::render_request(url, confirmed)),
        OutputFormat::Url => Ok(text::render_url(url, confirmed)),
        OutputFormat::Json => json::render(url.as_str(), confirmed),
    }
}
