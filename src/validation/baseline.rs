//! Noise signature: what a "no-op" response looks like for one target.

use crate::http::client::Probe;
use crate::http::response::HttpResponse;
use crate::payload::group::ParamSet;
use std::collections::HashSet;
use url::Url;

/// Nonsense parameter sent by both reference probes.
pub const NONSENSE_KEY: &str = "zabcde";
pub const NONSENSE_VALUE: &str = "edcbaz";

#[derive(Clone, Debug)]
pub struct NoiseSignature {
    /// Status both reference probes agreed on, if any.
    pub status: Option<u16>,
    pub body_len: usize,
    /// Length difference already present between the two reference bodies.
    pub length_tolerance: usize,
    /// Redirect path both probes agreed on ("" for no redirect); `None` if they differed.
    pub redirect: Option<String>,
    /// Lines present in both reference bodies.
    pub stable_lines: Vec<String>,
    /// Lines present in only one reference body: per-load noise.
    pub volatile_lines: Vec<String>,
    pub baseline_body: String,
    pub key_reflected: bool,
    pub value_reflected: bool,
}

impl NoiseSignature {
    pub fn from_pair(first: &HttpResponse, second: &HttpResponse) -> Self {
        let status = (first.status == second.status).then_some(first.status);

        let first_redirect = location_path(first.location.as_deref());
        let redirect =
            (first_redirect == location_path(second.location.as_deref())).then_some(first_redirect);

        let first_lines = content_lines(&first.body);
        let second_lines = content_lines(&second.body);
        let first_set: HashSet<&str> = first_lines.iter().copied().collect();
        let second_set: HashSet<&str> = second_lines.iter().copied().collect();

        let mut seen = HashSet::new();
        let stable_lines = first_lines
            .iter()
            .filter(|l| second_set.contains(*l))
            .filter(|l| !l.contains(NONSENSE_KEY) && !l.contains(NONSENSE_VALUE))
            .filter(|l| seen.insert(**l))
            .map(|l| l.to_string())
            .collect();

        let volatile_lines = first_lines
            .iter()
            .filter(|l| !second_set.contains(*l))
            .chain(second_lines.iter().filter(|l| !first_set.contains(*l)))
            .map(|l| l.to_string())
            .collect();

        Self {
            status,
            body_len: first.body_len,
            length_tolerance: first.body_len.abs_diff(second.body_len),
            redirect,
            stable_lines,
            volatile_lines,
            baseline_body: first.body.clone(),
            key_reflected: first.body.contains(NONSENSE_KEY) || second.body.contains(NONSENSE_KEY),
            value_reflected: first.body.contains(NONSENSE_VALUE)
                || second.body.contains(NONSENSE_VALUE),
        }
    }

    /// Same noise floor, re-anchored on a fresh parameterless response.
    pub fn rebased(&self, baseline: &HttpResponse) -> Self {
        let lines: HashSet<&str> = content_lines(&baseline.body).into_iter().collect();

        Self {
            status: Some(baseline.status),
            body_len: baseline.body_len,
            length_tolerance: self.length_tolerance,
            redirect: Some(location_path(baseline.location.as_deref())),
            stable_lines: self
                .stable_lines
                .iter()
                .filter(|l| lines.contains(l.as_str()))
                .cloned()
                .collect(),
            volatile_lines: self.volatile_lines.clone(),
            baseline_body: baseline.body.clone(),
            key_reflected: self.key_reflected,
            value_reflected: self.value_reflected,
        }
    }
}

/// Probe the target twice with the nonsense parameter.
///
/// Returns `None` when either probe fails: the target cannot be probed.
pub async fn define_signature(prober: &dyn Probe, url: &Url) -> Option<NoiseSignature> {
    let nonsense = ParamSet::single(NONSENSE_KEY, NONSENSE_VALUE);

    let first = prober.probe(url, &nonsense).await;
    let second = prober.probe(url, &nonsense).await;

    match (first.response(), second.response()) {
        (Some(a), Some(b)) => {
            let signature = NoiseSignature::from_pair(a, b);
            tracing::debug!(
                "Signature for {}: status={:?} len={} tolerance={} stable={} volatile={}",
                url,
                signature.status,
                signature.body_len,
                signature.length_tolerance,
                signature.stable_lines.len(),
                signature.volatile_lines.len()
            );
            Some(signature)
        }
        _ => None,
    }
}

pub(crate) fn content_lines(body: &str) -> Vec<&str> {
    body.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}

/// Path component of a Location header, "" when absent.
pub(crate) fn location_path(location: Option<&str>) -> String {
    let Some(location) = location else {
        return String::new();
    };

    match Url::parse(location) {
        Ok(url) => url.path().to_string(),
        Err(_) => location
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_page_has_zero_tolerance() {
        let page = HttpResponse::new(200, "<h1>Hello</h1>\n<p>static</p>");
        let sig = NoiseSignature::from_pair(&page, &page);

        assert_eq!(sig.status, Some(200));
        assert_eq!(sig.length_tolerance, 0);
        assert_eq!(sig.stable_lines, vec!["<h1>Hello</h1>", "<p>static</p>"]);
        assert!(sig.volatile_lines.is_empty());
    }

    #[test]
    fn test_random_content_sets_noise_floor() {
        let a = HttpResponse::new(200, "Welcome\ntoken: abcdef");
        let b = HttpResponse::new(200, "Welcome\ntoken: qwertyuiop");
        let sig = NoiseSignature::from_pair(&a, &b);

        assert_eq!(sig.length_tolerance, 4);
        assert_eq!(sig.stable_lines, vec!["Welcome"]);
        assert_eq!(sig.volatile_lines, vec!["token: abcdef", "token: qwertyuiop"]);
    }

    #[test]
    fn test_disagreeing_status_disables_status_baseline() {
        let a = HttpResponse::new(200, "ok");
        let b = HttpResponse::new(503, "ok");
        assert_eq!(NoiseSignature::from_pair(&a, &b).status, None);
    }

    #[test]
    fn test_reflected_nonsense_is_recorded() {
        let page = HttpResponse::new(200, "You searched for edcbaz\nfooter");
        let sig = NoiseSignature::from_pair(&page, &page);

        assert!(sig.value_reflected);
        assert!(!sig.key_reflected);
        // lines echoing the nonsense value are not stable content
        assert_eq!(sig.stable_lines, vec!["footer"]);
    }

    #[test]
    fn test_redirect_paths() {
        let a = HttpResponse::new(302, "").with_location("https://example.com/login?next=1");
        let b = HttpResponse::new(302, "").with_location("/login?next=2");
        assert_eq!(NoiseSignature::from_pair(&a, &b).redirect.as_deref(), Some("/login"));

        let c = HttpResponse::new(302, "").with_location("/elsewhere");
        assert_eq!(NoiseSignature::from_pair(&a, &c).redirect, None);

        let plain = HttpResponse::new(200, "");
        assert_eq!(NoiseSignature::from_pair(&plain, &plain).redirect.as_deref(), Some(""));
    }

    #[test]
    fn test_rebased_keeps_tolerance() {
        let a = HttpResponse::new(200, "head\nbody one");
        let b = HttpResponse::new(200, "head\nbody three");
        let sig = NoiseSignature::from_pair(&a, &b);

        let fresh = HttpResponse::new(404, "head\nother");
        let rebased = sig.rebased(&fresh);
        assert_eq!(rebased.status, Some(404));
        assert_eq!(rebased.body_len, fresh.body_len);
        assert_eq!(rebased.length_tolerance, 2);
        assert_eq!(rebased.stable_lines, vec!["head"]);
    }
}
