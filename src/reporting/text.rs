use crate::http::request::ProbeRequest;
use crate::payload::group::ParamSet;
use crate::payload::injector::inject_query_params;
use crate::validation::verdict::ConfirmedParameter;
use url::Url;

fn as_params(confirmed: &[ConfirmedParameter]) -> ParamSet {
    confirmed
        .iter()
        .map(|p| (p.name.clone(), p.value.clone()))
        .collect()
}

/// Target URL with the discovered parameters appended.
pub fn render_url(url: &Url, confirmed: &[ConfirmedParameter]) -> String {
    inject_query_params(url, &as_params(confirmed)).to_string()
}

/// Raw GET request naming the discovered parameters.
pub fn render_request(url: &Url, confirmed: &[ConfirmedParameter]) -> String {
    ProbeRequest::new(url.clone(), as_params(confirmed)).to_raw()
}
