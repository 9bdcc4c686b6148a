//! RDF/XML serialization.
//!
//! RDF/XML is offered on the read path only; request bodies in it are
//! rejected before parsing. The writer is `rio_xml`.

use std::io;

use rio_api::formatter::TriplesFormatter;
use rio_api::model as rio;
use rio_xml::RdfXmlFormatter;

use super::RdfSerializeError;
use crate::graph::Graph;
use crate::model::{Subject, Term, Triple};
use crate::vocab::xsd;

/// Serialize a graph as RDF/XML.
pub fn serialize(graph: &Graph) -> Result<Vec<u8>, RdfSerializeError> {
    let mut formatter = RdfXmlFormatter::new(Vec::new())
        .map_err(|e| RdfSerializeError::Serialize(e.to_string()))?;
    for triple in graph.triples_sorted() {
        format_triple(&mut formatter, triple)
            .map_err(|e| RdfSerializeError::Serialize(e.to_string()))?;
    }
    formatter
        .finish()
        .map_err(|e| RdfSerializeError::Serialize(e.to_string()))
}

fn format_triple(formatter: &mut RdfXmlFormatter<Vec<u8>>, triple: &Triple) -> io::Result<()> {
    let subject = match &triple.subject {
        Subject::NamedNode(n) => rio::Subject::NamedNode(rio::NamedNode { iri: n.as_str() }),
        Subject::BlankNode(b) => rio::Subject::BlankNode(rio::BlankNode { id: b.as_str() }),
        other => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unsupported subject: {other}"),
            ))
        }
    };
    let predicate = rio::NamedNode {
        iri: triple.predicate.as_str(),
    };
    let object = match &triple.object {
        Term::NamedNode(n) => rio::Term::NamedNode(rio::NamedNode { iri: n.as_str() }),
        Term::BlankNode(b) => rio::Term::BlankNode(rio::BlankNode { id: b.as_str() }),
        Term::Literal(l) => {
            if let Some(language) = l.language() {
                rio::Term::Literal(rio::Literal::LanguageTaggedString {
                    value: l.value(),
                    language,
                })
            } else if l.datatype() == xsd::STRING {
                rio::Term::Literal(rio::Literal::Simple { value: l.value() })
            } else {
                rio::Term::Literal(rio::Literal::Typed {
                    value: l.value(),
                    datatype: rio::NamedNode {
                        iri: l.datatype().as_str(),
                    },
                })
            }
        }
        other => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unsupported object: {other}"),
            ))
        }
    };
    formatter.format(&rio::Triple {
        subject,
        predicate,
        object,
    })
}
