//! Turtle parsing and serialization.
//!
//! Parsing rides on `rio_turtle` with relative IRIs resolved against the
//! target resource's URI. Serialization is written out by hand so the
//! output is deterministic (sorted triples, fixed prefix block); the ETag
//! of a representation is the hash of these bytes.

use std::io::Cursor;

use oxiri::Iri;
use rio_api::model as rio;
use rio_api::parser::TriplesParser;
use rio_turtle::{TurtleError, TurtleParser};

use super::{RdfParseError, RdfSerializeError};
use crate::graph::Graph;
use crate::model::{BlankNode, Literal, NamedNode, Subject, Term, Triple};
use crate::vocab::{ldp, rdf, xsd};

impl From<TurtleError> for RdfParseError {
    fn from(err: TurtleError) -> Self {
        RdfParseError::Syntax(err.to_string())
    }
}

/// Parse a Turtle document; relative IRIs resolve against `base_iri`.
pub fn parse(input: &str, base_iri: &str) -> Result<Graph, RdfParseError> {
    let base = Iri::parse(base_iri.to_owned())
        .map_err(|e| RdfParseError::InvalidIri(format!("{base_iri}: {e}")))?;
    let mut parser = TurtleParser::new(Cursor::new(input), Some(base));

    let mut graph = Graph::new();
    parser.parse_all(&mut |t: rio::Triple<'_>| -> Result<(), RdfParseError> {
        graph.insert(Triple::new(
            convert_subject(t.subject)?,
            convert_predicate(t.predicate)?,
            convert_object(t.object)?,
        ));
        Ok(())
    })?;
    Ok(graph)
}

fn convert_subject(subject: rio::Subject<'_>) -> Result<Subject, RdfParseError> {
    match subject {
        rio::Subject::NamedNode(n) => Ok(Subject::NamedNode(convert_iri(n.iri)?)),
        rio::Subject::BlankNode(b) => Ok(Subject::BlankNode(convert_blank(b.id)?)),
        rio::Subject::Triple(_) => Err(RdfParseError::Syntax(
            "RDF-star subjects are not supported".into(),
        )),
    }
}

fn convert_predicate(predicate: rio::NamedNode<'_>) -> Result<NamedNode, RdfParseError> {
    convert_iri(predicate.iri)
}

fn convert_object(object: rio::Term<'_>) -> Result<Term, RdfParseError> {
    match object {
        rio::Term::NamedNode(n) => Ok(Term::NamedNode(convert_iri(n.iri)?)),
        rio::Term::BlankNode(b) => Ok(Term::BlankNode(convert_blank(b.id)?)),
        rio::Term::Literal(l) => Ok(Term::Literal(convert_literal(l)?)),
        rio::Term::Triple(_) => Err(RdfParseError::Syntax(
            "RDF-star objects are not supported".into(),
        )),
    }
}

fn convert_literal(literal: rio::Literal<'_>) -> Result<Literal, RdfParseError> {
    match literal {
        rio::Literal::Simple { value } => Ok(Literal::new_simple_literal(value)),
        rio::Literal::LanguageTaggedString { value, language } => {
            Literal::new_language_tagged_literal(value, language)
                .map_err(|e| RdfParseError::Syntax(e.to_string()))
        }
        rio::Literal::Typed { value, datatype } => {
            Ok(Literal::new_typed_literal(value, convert_iri(datatype.iri)?))
        }
    }
}

fn convert_iri(iri: &str) -> Result<NamedNode, RdfParseError> {
    NamedNode::new(iri).map_err(|e| RdfParseError::InvalidIri(e.to_string()))
}

fn convert_blank(id: &str) -> Result<BlankNode, RdfParseError> {
    BlankNode::new(id).map_err(|e| RdfParseError::Syntax(e.to_string()))
}

/// Serialize a graph as Turtle, `@prefix` block first.
pub fn serialize(graph: &Graph) -> Result<Vec<u8>, RdfSerializeError> {
    let mut out = String::new();
    out.push_str("@prefix ldp: <http://www.w3.org/ns/ldp#> .\n");
    out.push_str("@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .\n\n");

    for triple in graph.triples_sorted() {
        out.push_str(&format_subject(&triple.subject));
        out.push(' ');
        if triple.predicate.as_str() == rdf::TYPE.as_str() {
            out.push('a');
        } else {
            out.push_str(&format_iri(triple.predicate.as_str()));
        }
        out.push(' ');
        out.push_str(&format_term(&triple.object));
        out.push_str(" .\n");
    }
    Ok(out.into_bytes())
}

fn format_subject(subject: &Subject) -> String {
    match subject {
        Subject::NamedNode(n) => format_iri(n.as_str()),
        Subject::BlankNode(b) => format!("_:{}", b.as_str()),
        other => other.to_string(),
    }
}

fn format_term(term: &Term) -> String {
    match term {
        Term::NamedNode(n) => format_iri(n.as_str()),
        Term::BlankNode(b) => format!("_:{}", b.as_str()),
        Term::Literal(l) => format_literal(l),
        other => other.to_string(),
    }
}

fn format_iri(iri: &str) -> String {
    if let Some(abbreviated) = abbreviate(iri) {
        return abbreviated;
    }
    format!("<{iri}>")
}

/// Abbreviate against the fixed prefix table when the local name is plain
/// enough to need no PN_LOCAL escaping.
fn abbreviate(iri: &str) -> Option<String> {
    for (prefix, ns) in [("ldp", ldp::NS), ("rdf", rdf::NS)] {
        if let Some(local) = iri.strip_prefix(ns) {
            if !local.is_empty() && local.bytes().all(|b| b.is_ascii_alphanumeric()) {
                return Some(format!("{prefix}:{local}"));
            }
        }
    }
    None
}

fn format_literal(literal: &Literal) -> String {
    let escaped = escape_literal(literal.value());
    if let Some(language) = literal.language() {
        return format!("\"{escaped}\"@{language}");
    }
    let datatype = literal.datatype();
    if datatype == xsd::STRING {
        format!("\"{escaped}\"")
    } else {
        format!("\"{escaped}\"^^<{}>", datatype.as_str())
    }
}

fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}
