//! RDF term model.
//!
//! The term types come straight from [`oxrdf`]; this module re-exports the
//! ones the rest of the workspace uses and adds a couple of accessors for
//! the common "give me the IRI behind this node" cases.

pub use oxrdf::{
    BlankNode, IriParseError, Literal, NamedNode, NamedNodeRef, Subject, Term, Triple,
};

/// The IRI behind a subject, if the subject is a named node.
pub fn subject_iri(subject: &Subject) -> Option<&str> {
    match subject {
        Subject::NamedNode(n) => Some(n.as_str()),
        _ => None,
    }
}

/// The IRI behind a term, if the term is a named node.
pub fn term_iri(term: &Term) -> Option<&str> {
    match term {
        Term::NamedNode(n) => Some(n.as_str()),
        _ => None,
    }
}

/// The named node behind a term, cloned out.
pub fn term_named_node(term: &Term) -> Option<NamedNode> {
    match term {
        Term::NamedNode(n) => Some(n.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_iri_ignores_blank_nodes() {
        let named = Subject::NamedNode(NamedNode::new("http://example.org/a").unwrap());
        assert_eq!(subject_iri(&named), Some("http://example.org/a"));

        let blank = Subject::BlankNode(BlankNode::default());
        assert_eq!(subject_iri(&blank), None);
    }

    #[test]
    fn term_named_node_ignores_literals() {
        let term = Term::Literal(Literal::new_simple_literal("x"));
        assert!(term_named_node(&term).is_none());
    }
}
