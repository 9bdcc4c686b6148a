//! Request decoding.
//!
//! The controller never touches the transport's request type; it works from
//! this decoded view. The effective URL is the configured external base
//! joined with the request path, query and fragment dropped.

use axum::http::{HeaderMap, Uri};

/// The parts of an HTTP request the LDP state machine consumes.
#[derive(Debug, Clone, Default)]
pub struct LdpRequest {
    /// Effective absolute URL of the target resource.
    pub url: String,
    /// Raw body bytes.
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    pub accept: Option<String>,
    pub prefer: Option<String>,
    pub link: Option<String>,
    pub slug: Option<String>,
    pub if_match: Option<String>,
    pub if_none_match: Option<String>,
}

impl LdpRequest {
    /// Decode from transport parts. `base_url` is absolute with no trailing
    /// slash, e.g. `http://localhost:3030`.
    pub fn decode(uri: &Uri, headers: &HeaderMap, body: Vec<u8>, base_url: &str) -> Self {
        LdpRequest {
            url: format!("{}{}", base_url, uri.path()),
            body,
            content_type: header_str(headers, "content-type"),
            accept: header_str(headers, "accept"),
            prefer: header_str(headers, "prefer"),
            link: header_str(headers, "link"),
            slug: header_str(headers, "slug"),
            if_match: header_str(headers, "if-match"),
            if_none_match: header_str(headers, "if-none-match"),
        }
    }

    /// The body as UTF-8, for the parser.
    pub fn body_utf8(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.body)
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}
