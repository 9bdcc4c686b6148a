//! RDF codec: media types, content negotiation, parse and serialize.
//!
//! Three syntaxes are spoken. Turtle and JSON-LD go both ways; RDF/XML is
//! produced on the read path only.

use thiserror::Error;

use crate::graph::Graph;

pub mod jsonld;
pub mod rdfxml;
pub mod turtle;

pub const TEXT_TURTLE: &str = "text/turtle";
pub const APPLICATION_LD_JSON: &str = "application/ld+json";
pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_RDF_XML: &str = "application/rdf+xml";

/// A recognized RDF syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    Turtle,
    JsonLd,
    RdfXml,
}

impl RdfFormat {
    /// Canonical media type for responses.
    pub fn media_type(self) -> &'static str {
        match self {
            RdfFormat::Turtle => TEXT_TURTLE,
            RdfFormat::JsonLd => APPLICATION_LD_JSON,
            RdfFormat::RdfXml => APPLICATION_RDF_XML,
        }
    }

    /// Map a `Content-Type` value (parameters ignored, case-insensitive) to
    /// a format. `application/json` is accepted as JSON-LD.
    pub fn from_content_type(value: &str) -> Option<Self> {
        let media_type = value.split(';').next().unwrap_or("").trim().to_lowercase();
        match media_type.as_str() {
            TEXT_TURTLE => Some(RdfFormat::Turtle),
            APPLICATION_LD_JSON | APPLICATION_JSON => Some(RdfFormat::JsonLd),
            APPLICATION_RDF_XML => Some(RdfFormat::RdfXml),
            _ => None,
        }
    }

    /// Whether request bodies in this syntax are accepted.
    pub fn supports_parsing(self) -> bool {
        !matches!(self, RdfFormat::RdfXml)
    }

    /// Negotiate a response format from an `Accept` header.
    ///
    /// Candidates are ranked by q-value; among equally acceptable types the
    /// server prefers Turtle, then JSON-LD, then RDF/XML. A missing or empty
    /// header means "anything". `None` means nothing offered is acceptable.
    pub fn negotiate(accept: Option<&str>) -> Option<Self> {
        let accept = match accept {
            Some(value) if !value.trim().is_empty() => value,
            _ => return Some(RdfFormat::Turtle),
        };

        let mut best: Option<(f32, usize, RdfFormat)> = None;
        for part in accept.split(',') {
            let mut pieces = part.trim().split(';');
            let media_type = pieces.next().unwrap_or("").trim().to_lowercase();
            if media_type.is_empty() {
                continue;
            }
            let mut quality = 1.0f32;
            for param in pieces {
                if let Some(q) = param.trim().strip_prefix("q=") {
                    quality = q.trim().parse().unwrap_or(0.0);
                }
            }
            if quality <= 0.0 {
                continue;
            }
            let format = match media_type.as_str() {
                "*/*" | "text/*" => RdfFormat::Turtle,
                "application/*" => RdfFormat::JsonLd,
                other => match Self::from_content_type(other) {
                    Some(format) => format,
                    None => continue,
                },
            };
            // Equal quality resolves by the server's preference order, not
            // by the order the client listed the types.
            let rank = format.preference_rank();
            let better = match best {
                None => true,
                Some((best_quality, best_rank, _)) => {
                    quality > best_quality || (quality == best_quality && rank < best_rank)
                }
            };
            if better {
                best = Some((quality, rank, format));
            }
        }
        best.map(|(_, _, format)| format)
    }

    /// Position in the server's preference order; lower wins quality ties.
    fn preference_rank(self) -> usize {
        match self {
            RdfFormat::Turtle => 0,
            RdfFormat::JsonLd => 1,
            RdfFormat::RdfXml => 2,
        }
    }
}

/// Parse failures, mapped to 400 by the server (415 is caught earlier).
#[derive(Error, Debug)]
pub enum RdfParseError {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("invalid IRI: {0}")]
    InvalidIri(String),

    #[error("parsing {0:?} request bodies is not supported")]
    UnsupportedFormat(RdfFormat),
}

/// Serialization failures; server-internal.
#[derive(Error, Debug)]
pub enum RdfSerializeError {
    #[error("serialization error: {0}")]
    Serialize(String),
}

/// Parse a request body into a graph bound to `base_iri`.
pub fn parse_graph(body: &str, base_iri: &str, format: RdfFormat) -> Result<Graph, RdfParseError> {
    match format {
        RdfFormat::Turtle => turtle::parse(body, base_iri),
        RdfFormat::JsonLd => jsonld::parse(body, base_iri),
        RdfFormat::RdfXml => Err(RdfParseError::UnsupportedFormat(RdfFormat::RdfXml)),
    }
}

/// Serialize a graph. Output is deterministic for a given graph and format.
pub fn serialize_graph(graph: &Graph, format: RdfFormat) -> Result<Vec<u8>, RdfSerializeError> {
    match format {
        RdfFormat::Turtle => turtle::serialize(graph),
        RdfFormat::JsonLd => jsonld::serialize(graph),
        RdfFormat::RdfXml => rdfxml::serialize(graph),
    }
}
