/// Normalized successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body_len: usize,
    pub body: String,
    pub location: Option<String>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            status,
            body_len: body.len(),
            body,
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Build from raw body bytes (lossy UTF-8 conversion, byte length kept).
    pub fn from_bytes(status: u16, body: &[u8], location: Option<String>) -> Self {
        Self {
            status,
            body_len: body.len(),
            body: String::from_utf8_lossy(body).into_owned(),
            location,
        }
    }
}

/// Outcome of a single probe. Failures are values, never errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    Success(HttpResponse),
    Timeout,
    NetworkError(String),
}

impl ProbeResult {
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            ProbeResult::Success(resp) => Some(resp),
            ProbeResult::Timeout | ProbeResult::NetworkError(_) => None,
        }
    }
}
