//! Calculated triples.
//!
//! Containment and membership statements are never stored in a resource's
//! graph. On the read path they are computed here from backend state and
//! injected into the response graph, subject to the client's `Prefer`
//! header; on the write path the inverse function strips them from
//! incoming graphs before anything is persisted.

use oxldp_core::vocab::ldp;
use oxldp_core::{Graph, NamedNode, Subject, Triple};

use crate::error::{LdpError, LdpResult};
use crate::prefer::Preferences;
use crate::store::{LdpBackend, Membership, MembershipRelation, StoredResource};

/// Inject containment and membership triples into a response graph.
///
/// Returns whether any representation preference was honored, which is what
/// decides the `Preference-Applied` response header.
pub fn insert_calculated_triples(
    graph: &mut Graph,
    stored: &StoredResource,
    backend: &dyn LdpBackend,
    prefs: &Preferences,
) -> LdpResult<bool> {
    let uri = member_node(&stored.resource.uri)?;
    let mut applied = false;

    if stored.resource.model.is_container() {
        let members = backend.members_of(&stored.resource.uri)?;

        if prefs.mentions_containment() || prefs.minimal {
            applied = true;
        }
        if prefs.emit_containment() {
            for member in &members {
                graph.insert(Triple::new(
                    uri.clone(),
                    ldp::CONTAINS.into_owned(),
                    member_node(member)?,
                ));
            }
        }

        if let Some(Membership {
            membership_resource,
            relation: MembershipRelation::HasMember(relation),
        }) = &stored.resource.membership
        {
            if prefs.mentions_membership() || prefs.minimal {
                applied = true;
            }
            if prefs.emit_membership() {
                for member in &members {
                    graph.insert(Triple::new(
                        membership_resource.clone(),
                        relation.clone(),
                        member_node(member)?,
                    ));
                }
            }
        }
    }

    // This resource is the membership target of one or more Direct
    // Containers: surface their membership triples here.
    if !stored.membership_resource_for.is_empty() {
        if prefs.mentions_membership() {
            applied = true;
        }
        let emit = if stored.resource.model.is_container() {
            prefs.emit_membership()
        } else {
            !prefs.omit_membership
        };
        if emit {
            for (container_uri, relation) in &stored.membership_resource_for {
                for member in backend.members_of(container_uri)? {
                    graph.insert(Triple::new(
                        uri.clone(),
                        relation.clone(),
                        member_node(&member)?,
                    ));
                }
            }
        }
    }

    Ok(applied)
}

/// Remove derived triples from an incoming graph before it is persisted:
/// all `(u, ldp:contains, _)`, and `(u, r, _)` for every relation `r` some
/// Direct Container derives onto `u`. Returns how many triples went.
pub fn strip_derived_triples(
    graph: &mut Graph,
    uri: &NamedNode,
    reverse_membership: &[(String, NamedNode)],
) -> usize {
    let subject = Subject::NamedNode(uri.clone());
    let mut removed = graph.remove_matching(Some(&subject), Some(ldp::CONTAINS), None);
    for (_, relation) in reverse_membership {
        removed += graph.remove_matching(Some(&subject), Some(relation.as_ref()), None);
    }
    removed
}

fn member_node(uri: &str) -> LdpResult<NamedNode> {
    NamedNode::new(uri).map_err(|e| LdpError::store(format!("invalid stored URI {uri}: {e}")))
}
