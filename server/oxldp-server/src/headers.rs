//! Common LDP response headers and entity tags.

use axum::http::{header, HeaderName};

use oxldp_core::vocab::ldp;

use crate::config::ServerConfig;
use crate::response::LdpResponse;
use crate::store::InteractionModel;

/// `Allow` for containers.
pub const ALLOW_CONTAINER: &str = "GET,HEAD,DELETE,OPTIONS,POST";
/// `Allow` for plain RDF sources.
pub const ALLOW_RDF_SOURCE: &str = "GET,HEAD,PUT,DELETE,OPTIONS";
/// `Allow` while probing an unsupported method.
pub const ALLOW_PROBE: &str = "GET,HEAD,DELETE,OPTIONS";

/// The writable RDF media types, advertised via `Accept-Post`.
pub const ACCEPT_POST: &str = "text/turtle, application/ld+json, application/json";

pub const ACCEPT_POST_HEADER: HeaderName = HeaderName::from_static("accept-post");
pub const PREFERENCE_APPLIED: HeaderName = HeaderName::from_static("preference-applied");

pub fn allow_for(model: InteractionModel) -> &'static str {
    if model.is_container() {
        ALLOW_CONTAINER
    } else {
        ALLOW_RDF_SOURCE
    }
}

/// Weak entity tag over the serialized representation.
pub fn weak_etag(bytes: &[u8]) -> String {
    format!("W/\"{:x}\"", md5::compute(bytes))
}

/// Compare a conditional header against an entity tag. The header may list
/// several tags; `*` matches anything.
pub fn etag_matches(header_value: &str, etag: &str) -> bool {
    header_value
        .split(',')
        .map(str::trim)
        .any(|candidate| candidate == "*" || candidate == etag)
}

/// Attach the headers every LDP response carries: the `ldp:Resource` type
/// link, the `constrainedBy` link, and, when the interaction model is
/// known, the model-specific type link, `Allow`, and (for containers)
/// `Accept-Post`.
pub fn with_common_headers(
    mut response: LdpResponse,
    model: Option<InteractionModel>,
    config: &ServerConfig,
) -> LdpResponse {
    response = response.header(
        header::LINK,
        format!("<{}>; rel=\"type\"", ldp::RESOURCE.as_str()),
    );
    response = response.header(
        header::LINK,
        format!(
            "<{}>; rel=\"{}\"",
            config.constraints_url(),
            ldp::CONSTRAINED_BY.as_str()
        ),
    );
    if let Some(model) = model {
        if model.is_container() {
            response = response.header(
                header::LINK,
                format!("<{}>; rel=\"type\"", model.type_iri().as_str()),
            );
            response = response.header(ACCEPT_POST_HEADER, ACCEPT_POST);
        }
        response = response.header(header::ALLOW, allow_for(model));
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn weak_etags_are_md5_hex() {
        let etag = weak_etag(b"hello");
        assert_eq!(etag, "W/\"5d41402abc4b2a76b9719d911017c592\"");
    }

    #[test]
    fn etag_comparison_handles_lists_and_wildcard() {
        let etag = "W/\"abc\"";
        assert!(etag_matches("W/\"abc\"", etag));
        assert!(etag_matches("W/\"x\", W/\"abc\"", etag));
        assert!(etag_matches("*", etag));
        assert!(!etag_matches("W/\"x\"", etag));
    }

    #[test]
    fn containers_carry_model_link_and_accept_post() {
        let config = ServerConfig::default();
        let response = with_common_headers(
            LdpResponse::new(StatusCode::OK),
            Some(InteractionModel::BasicContainer),
            &config,
        );
        let links = response.header_values("link").join("\n");
        assert!(links.contains("ldp#Resource>; rel=\"type\""));
        assert!(links.contains("ldp#BasicContainer>; rel=\"type\""));
        assert!(links.contains("constrainedBy"));
        assert_eq!(response.header_value("accept-post"), Some(ACCEPT_POST));
        assert_eq!(response.header_value("allow"), Some(ALLOW_CONTAINER));
    }

    #[test]
    fn rdf_sources_allow_put() {
        let config = ServerConfig::default();
        let response = with_common_headers(
            LdpResponse::new(StatusCode::OK),
            Some(InteractionModel::RdfSource),
            &config,
        );
        assert_eq!(response.header_value("allow"), Some(ALLOW_RDF_SOURCE));
        assert_eq!(response.header_value("accept-post"), None);
    }
}
