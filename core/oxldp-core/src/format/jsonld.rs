//! JSON-LD parsing and serialization.
//!
//! Expanded-form documents are handled: a top-level array of node objects,
//! an object with `@graph`, or a single node object. `@context` processing
//! is not implemented. Serialization produces expanded form with stable key
//! order, so equal graphs serialize to equal bytes.

use oxiri::Iri;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

use super::{RdfParseError, RdfSerializeError};
use crate::graph::Graph;
use crate::model::{BlankNode, Literal, NamedNode, Subject, Term, Triple};
use crate::vocab::{rdf, xsd};

/// Parse a JSON-LD document; relative IRIs resolve against `base_iri`.
pub fn parse(input: &str, base_iri: &str) -> Result<Graph, RdfParseError> {
    let value: Value =
        serde_json::from_str(input).map_err(|e| RdfParseError::Syntax(e.to_string()))?;
    let base = Iri::parse(base_iri.to_owned())
        .map_err(|e| RdfParseError::InvalidIri(format!("{base_iri}: {e}")))?;

    let mut parser = JsonLdReader {
        graph: Graph::new(),
        base,
    };
    match &value {
        Value::Array(items) => {
            for item in items {
                parser.read_node(as_node_object(item)?)?;
            }
        }
        Value::Object(obj) => match obj.get("@graph") {
            Some(Value::Array(items)) => {
                for item in items {
                    parser.read_node(as_node_object(item)?)?;
                }
            }
            Some(_) => {
                return Err(RdfParseError::Syntax("@graph must be an array".into()));
            }
            None => {
                parser.read_node(obj)?;
            }
        },
        _ => {
            return Err(RdfParseError::Syntax(
                "expected a JSON-LD node object or array of node objects".into(),
            ));
        }
    }
    Ok(parser.graph)
}

fn as_node_object(value: &Value) -> Result<&Map<String, Value>, RdfParseError> {
    value
        .as_object()
        .ok_or_else(|| RdfParseError::Syntax("node must be a JSON object".into()))
}

struct JsonLdReader {
    graph: Graph,
    base: Iri<String>,
}

impl JsonLdReader {
    fn read_node(&mut self, obj: &Map<String, Value>) -> Result<Subject, RdfParseError> {
        let subject = match obj.get("@id") {
            Some(Value::String(id)) => {
                if let Some(label) = id.strip_prefix("_:") {
                    Subject::BlankNode(
                        BlankNode::new(label).map_err(|e| RdfParseError::Syntax(e.to_string()))?,
                    )
                } else {
                    Subject::NamedNode(self.resolve(id)?)
                }
            }
            Some(_) => return Err(RdfParseError::Syntax("@id must be a string".into())),
            None => Subject::BlankNode(BlankNode::default()),
        };

        if let Some(types) = obj.get("@type") {
            for iri in string_or_strings(types, "@type")? {
                self.graph.insert(Triple::new(
                    subject.clone(),
                    rdf::TYPE.into_owned(),
                    self.resolve(&iri)?,
                ));
            }
        }

        for (key, value) in obj {
            if key.starts_with('@') {
                continue;
            }
            let predicate = self.resolve(key)?;
            let values: Vec<&Value> = match value {
                Value::Array(items) => items.iter().collect(),
                other => vec![other],
            };
            for item in values {
                if let Some(object) = self.read_object(item)? {
                    self.graph
                        .insert(Triple::new(subject.clone(), predicate.clone(), object));
                }
            }
        }
        Ok(subject)
    }

    fn read_object(&mut self, value: &Value) -> Result<Option<Term>, RdfParseError> {
        match value {
            Value::Object(obj) => {
                if obj.contains_key("@list") {
                    return Err(RdfParseError::Syntax("@list is not supported".into()));
                }
                if let Some(v) = obj.get("@value") {
                    return Ok(Some(Term::Literal(self.read_value_object(obj, v)?)));
                }
                // A nested node object; its subject becomes the object term.
                let nested = self.read_node(obj)?;
                Ok(Some(match nested {
                    Subject::NamedNode(n) => Term::NamedNode(n),
                    Subject::BlankNode(b) => Term::BlankNode(b),
                    other => {
                        return Err(RdfParseError::Syntax(format!(
                            "unsupported nested subject: {other}"
                        )))
                    }
                }))
            }
            Value::String(s) => Ok(Some(Term::Literal(Literal::new_simple_literal(s)))),
            Value::Bool(b) => Ok(Some(Term::Literal(Literal::new_typed_literal(
                if *b { "true" } else { "false" },
                xsd::BOOLEAN.into_owned(),
            )))),
            Value::Number(n) => {
                let datatype = if n.is_i64() || n.is_u64() {
                    xsd::INTEGER
                } else {
                    xsd::DOUBLE
                };
                Ok(Some(Term::Literal(Literal::new_typed_literal(
                    n.to_string(),
                    datatype.into_owned(),
                ))))
            }
            Value::Null => Ok(None),
            Value::Array(_) => Err(RdfParseError::Syntax(
                "nested arrays are not valid JSON-LD".into(),
            )),
        }
    }

    fn read_value_object(
        &self,
        obj: &Map<String, Value>,
        value: &Value,
    ) -> Result<Literal, RdfParseError> {
        let lexical = match value {
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            _ => return Err(RdfParseError::Syntax("@value must be a scalar".into())),
        };
        if let Some(Value::String(language)) = obj.get("@language") {
            return Literal::new_language_tagged_literal(lexical, language)
                .map_err(|e| RdfParseError::Syntax(e.to_string()));
        }
        if let Some(datatype) = obj.get("@type") {
            let datatype = datatype
                .as_str()
                .ok_or_else(|| RdfParseError::Syntax("@type must be a string".into()))?;
            return Ok(Literal::new_typed_literal(lexical, self.resolve(datatype)?));
        }
        Ok(Literal::new_simple_literal(lexical))
    }

    fn resolve(&self, iri: &str) -> Result<NamedNode, RdfParseError> {
        let resolved = self
            .base
            .resolve(iri)
            .map_err(|e| RdfParseError::InvalidIri(format!("{iri}: {e}")))?;
        NamedNode::new(resolved.into_inner()).map_err(|e| RdfParseError::InvalidIri(e.to_string()))
    }
}

fn string_or_strings(value: &Value, key: &str) -> Result<Vec<String>, RdfParseError> {
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| RdfParseError::Syntax(format!("{key} entries must be strings")))
            })
            .collect(),
        _ => Err(RdfParseError::Syntax(format!(
            "{key} must be a string or array of strings"
        ))),
    }
}

/// Serialize a graph to expanded JSON-LD with stable ordering.
pub fn serialize(graph: &Graph) -> Result<Vec<u8>, RdfSerializeError> {
    let mut nodes: BTreeMap<String, (Vec<String>, BTreeMap<String, Vec<Value>>)> = BTreeMap::new();

    for triple in graph.triples_sorted() {
        let subject_key = match &triple.subject {
            Subject::NamedNode(n) => n.as_str().to_owned(),
            Subject::BlankNode(b) => format!("_:{}", b.as_str()),
            other => {
                return Err(RdfSerializeError::Serialize(format!(
                    "unsupported subject: {other}"
                )))
            }
        };
        let entry = nodes.entry(subject_key).or_default();

        if triple.predicate.as_str() == rdf::TYPE.as_str() {
            if let Term::NamedNode(class) = &triple.object {
                entry.0.push(class.as_str().to_owned());
                continue;
            }
        }
        entry
            .1
            .entry(triple.predicate.as_str().to_owned())
            .or_default()
            .push(term_value(&triple.object)?);
    }

    let mut out = Vec::new();
    for (id, (types, properties)) in nodes {
        let mut node = Map::new();
        node.insert("@id".into(), Value::String(id));
        if !types.is_empty() {
            node.insert("@type".into(), json!(types));
        }
        for (predicate, values) in properties {
            node.insert(predicate, Value::Array(values));
        }
        out.push(Value::Object(node));
    }
    serde_json::to_vec_pretty(&Value::Array(out))
        .map_err(|e| RdfSerializeError::Serialize(e.to_string()))
}

fn term_value(term: &Term) -> Result<Value, RdfSerializeError> {
    Ok(match term {
        Term::NamedNode(n) => json!({ "@id": n.as_str() }),
        Term::BlankNode(b) => json!({ "@id": format!("_:{}", b.as_str()) }),
        Term::Literal(l) => {
            if let Some(language) = l.language() {
                json!({ "@language": language, "@value": l.value() })
            } else if l.datatype() == xsd::STRING {
                json!({ "@value": l.value() })
            } else {
                json!({ "@type": l.datatype().as_str(), "@value": l.value() })
            }
        }
        other => {
            return Err(RdfSerializeError::Serialize(format!(
                "unsupported term: {other}"
            )))
        }
    })
}
