//! Interaction model analysis.
//!
//! Classifies a graph as plain RDF source, Basic Container, or Direct
//! Container from its `rdf:type` triples, honors the client's
//! `Link: <…ldp#Resource>; rel="type"` override, and extracts and validates
//! the Direct-Container membership pattern.

use oxldp_core::model::term_named_node;
use oxldp_core::vocab::{ldp, rdf};
use oxldp_core::{Graph, NamedNode, NamedNodeRef, Subject, Term};

use crate::error::{LdpError, LdpResult};
use crate::store::{InteractionModel, Membership, MembershipRelation};

/// Classify a graph, honoring any `Link` type override.
pub fn classify(graph: &Graph, uri: &NamedNode, link: Option<&str>) -> InteractionModel {
    if link.is_some_and(link_forces_rdf_source) {
        return InteractionModel::RdfSource;
    }
    let subject = Subject::NamedNode(uri.clone());
    if has_type(graph, &subject, ldp::DIRECT_CONTAINER) {
        InteractionModel::DirectContainer
    } else if has_type(graph, &subject, ldp::BASIC_CONTAINER) {
        InteractionModel::BasicContainer
    } else {
        InteractionModel::RdfSource
    }
}

/// Classify and, for Direct Containers, extract the validated membership
/// pattern. The analyzer for PUT on an existing resource is the persisted
/// model, never this function.
pub fn analyze(
    graph: &Graph,
    uri: &NamedNode,
    link: Option<&str>,
) -> LdpResult<(InteractionModel, Option<Membership>)> {
    let model = classify(graph, uri, link);
    let membership = if model == InteractionModel::DirectContainer {
        Some(extract_membership(graph, uri)?)
    } else {
        None
    };
    Ok((model, membership))
}

fn has_type(graph: &Graph, subject: &Subject, class: NamedNodeRef<'_>) -> bool {
    graph
        .objects(subject, rdf::TYPE)
        .iter()
        .any(|t| matches!(t, Term::NamedNode(n) if n.as_ref() == class))
}

/// Whether a `Link` header value asks for plain-resource semantics.
///
/// Per RFC 8288: comma-separated link-values, each `<target>` followed by
/// `;`-separated parameters; a `rel` value may carry several
/// whitespace-separated relation types. Whitespace around separators is
/// tolerated.
fn link_forces_rdf_source(link: &str) -> bool {
    for link_value in link.split(',') {
        let mut parts = link_value.split(';');
        let target = parts.next().unwrap_or("").trim();
        let target = target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .unwrap_or("");
        if target != ldp::RESOURCE.as_str() {
            continue;
        }
        for param in parts {
            let mut kv = param.splitn(2, '=');
            let key = kv.next().unwrap_or("").trim().to_ascii_lowercase();
            if key != "rel" {
                continue;
            }
            let value = kv.next().unwrap_or("").trim().trim_matches('"');
            if value.split_whitespace().any(|token| token == "type") {
                return true;
            }
        }
    }
    false
}

/// Extract a Direct Container's membership pattern, enforcing that
/// `membershipResource` is present and exactly one of the two relations is
/// declared.
pub fn extract_membership(graph: &Graph, uri: &NamedNode) -> LdpResult<Membership> {
    let subject = Subject::NamedNode(uri.clone());

    let membership_resource = graph
        .any_object(&subject, ldp::MEMBERSHIP_RESOURCE)
        .and_then(term_named_node)
        .ok_or_else(|| {
            LdpError::invalid_container("a Direct Container must declare ldp:membershipResource")
        })?;

    let has_member = graph
        .any_object(&subject, ldp::HAS_MEMBER_RELATION)
        .and_then(term_named_node);
    let is_member_of = graph
        .any_object(&subject, ldp::IS_MEMBER_OF_RELATION)
        .and_then(term_named_node);

    let relation = match (has_member, is_member_of) {
        (Some(relation), None) => MembershipRelation::HasMember(relation),
        (None, Some(relation)) => MembershipRelation::IsMemberOf(relation),
        (Some(_), Some(_)) => {
            return Err(LdpError::invalid_container(
                "a Direct Container must declare only one of ldp:hasMemberRelation and ldp:isMemberOfRelation",
            ))
        }
        (None, None) => {
            return Err(LdpError::invalid_container(
                "a Direct Container must declare ldp:hasMemberRelation or ldp:isMemberOfRelation",
            ))
        }
    };

    Ok(Membership {
        membership_resource,
        relation,
    })
}
