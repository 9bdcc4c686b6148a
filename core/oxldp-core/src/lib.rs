//! # OxLDP Core
//!
//! RDF graph model and codec for the OxLDP Linked Data Platform server.
//!
//! This crate provides the pieces of the LDP protocol core that are
//! independent of HTTP: an indexed in-memory [`Graph`] of RDF triples,
//! the LDP vocabulary, and a codec that parses and serializes graphs in
//! the three syntaxes the server speaks (Turtle, JSON-LD, RDF/XML).
//!
//! The term model is [`oxrdf`]; parsing rides on the rio crates.

pub mod format;
pub mod graph;
pub mod model;
pub mod vocab;

pub use format::{parse_graph, serialize_graph, RdfFormat, RdfParseError, RdfSerializeError};
pub use graph::Graph;
pub use model::{BlankNode, Literal, NamedNode, NamedNodeRef, Subject, Term, Triple};
