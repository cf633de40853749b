use crate::core::context::DEFAULT_USER_AGENT;
use crate::payload::group::ParamSet;
use crate::payload::injector::inject_query_params;
use url::Url;

/// A GET probe: target URL plus the parameters applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub url: Url,
    pub params: ParamSet,
}

impl ProbeRequest {
    pub fn new(url: Url, params: ParamSet) -> Self {
        Self { url, params }
    }

    /// The URL actually requested.
    pub fn target(&self) -> Url {
        inject_query_params(&self.url, &self.params)
    }

    /// Render as raw HTTP/1.1 request text, terminated by a blank line.
    pub fn to_raw(&self) -> String {
        let target = self.target();
        let host = match (target.host_str(), target.port()) {
            (Some(h), Some(p)) => format!("{}:{}", h, p),
            (Some(h), None) => h.to_string(),
            (None, _) => String::new(),
        };

        let lines = [
            format!("GET {} HTTP/1.1", target),
            format!("Host: {}", host),
            format!("User-Agent: {}", DEFAULT_USER_AGENT),
            "Accept: text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8".to_string(),
            "Accept-Language: en-US,en;q=0.5".to_string(),
            "Accept-Encoding: gzip, deflate".to_string(),
            "Connection: close".to_string(),
            "Upgrade-Insecure-Requests: 1".to_string(),
            String::new(),
            String::new(),
        ];

        lines.join("\n")
    }
}
