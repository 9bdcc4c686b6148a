//! In-memory reference backend.
//!
//! Resources live in a `RwLock`-guarded map keyed by URI, next to the set
//! of outstanding reservations. Membership is bookkeeping: every entry
//! carries an explicit member set, fed solely by the diverted containment
//! and membership triples `insert_data` receives. Creating a resource at a
//! URI that merely sits under a container's path adds nothing to that
//! container's members.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::RwLock;

use oxldp_core::model::{subject_iri, term_iri};
use oxldp_core::vocab::ldp;
use oxldp_core::{NamedNode, Triple};

use super::{LdpBackend, Membership, MembershipRelation, Resource, StoredResource};
use crate::error::{LdpError, LdpResult};

#[derive(Debug)]
struct Entry {
    resource: Resource,
    members: BTreeSet<String>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    reserved: HashSet<String>,
}

/// An in-memory [`LdpBackend`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn trim_slash(uri: &str) -> &str {
    uri.trim_end_matches('/')
}

impl Inner {
    /// Entry key for a container URI, tolerating the trailing-slash variant.
    fn container_key(&self, uri: &str) -> Option<String> {
        if self.entries.contains_key(uri) {
            return Some(uri.to_owned());
        }
        let trimmed = trim_slash(uri);
        if self.entries.contains_key(trimmed) {
            return Some(trimmed.to_owned());
        }
        let slashed = format!("{trimmed}/");
        if self.entries.contains_key(&slashed) {
            return Some(slashed);
        }
        None
    }

    fn reverse_membership_of(&self, uri: &str) -> Vec<(String, NamedNode)> {
        let mut hits: Vec<(String, NamedNode)> = self
            .entries
            .values()
            .filter_map(|entry| match &entry.resource.membership {
                Some(Membership {
                    membership_resource,
                    relation: MembershipRelation::HasMember(relation),
                }) if membership_resource.as_str() == uri => {
                    Some((entry.resource.uri.clone(), relation.clone()))
                }
                _ => None,
            })
            .collect();
        hits.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.as_str().cmp(b.1.as_str())));
        hits
    }
}

fn lock_err<T>(err: T) -> LdpError
where
    T: std::fmt::Display,
{
    LdpError::store(format!("failed to acquire store lock: {err}"))
}

impl LdpBackend for MemoryStore {
    fn reserve_uri(&self, uri: &str) -> LdpResult<()> {
        let mut inner = self.inner.write().map_err(lock_err)?;
        if inner.entries.contains_key(uri) || inner.reserved.contains(uri) {
            return Err(LdpError::conflict(format!("URI is occupied: {uri}")));
        }
        inner.reserved.insert(uri.to_owned());
        Ok(())
    }

    fn release_uri(&self, uri: &str) {
        if let Ok(mut inner) = self.inner.write() {
            inner.reserved.remove(uri);
        }
    }

    fn read(&self, uri: &str) -> LdpResult<Option<StoredResource>> {
        let inner = self.inner.read().map_err(lock_err)?;
        Ok(inner.entries.get(uri).map(|entry| StoredResource {
            resource: entry.resource.clone(),
            membership_resource_for: inner.reverse_membership_of(uri),
        }))
    }

    fn update(&self, resource: Resource) -> LdpResult<()> {
        let mut inner = self.inner.write().map_err(lock_err)?;
        let uri = resource.uri.clone();
        let members = inner
            .entries
            .get(&uri)
            .map(|existing| existing.members.clone())
            .unwrap_or_default();
        inner.entries.insert(uri.clone(), Entry { resource, members });
        inner.reserved.remove(&uri);
        Ok(())
    }

    fn insert_data(&self, target_uri: &str, triples: Vec<Triple>) -> LdpResult<()> {
        let mut inner = self.inner.write().map_err(lock_err)?;
        let target_key = inner
            .container_key(target_uri)
            .ok_or_else(|| LdpError::store(format!("no such resource: {target_uri}")))?;

        enum Action {
            AddMember { container: String, member: String },
            AddTriple(Triple),
        }

        let mut actions = Vec::with_capacity(triples.len());
        for triple in triples {
            let subject = subject_iri(&triple.subject).map(str::to_owned);
            let object = term_iri(&triple.object).map(str::to_owned);

            // Containment on the target itself: membership bookkeeping.
            if triple.predicate.as_str() == ldp::CONTAINS.as_str() {
                if let (Some(s), Some(member)) = (subject.as_deref(), object.clone()) {
                    if trim_slash(s) == trim_slash(target_uri) {
                        actions.push(Action::AddMember {
                            container: target_key.clone(),
                            member,
                        });
                        continue;
                    }
                }
            }

            // A membership triple of some Direct Container naming the target
            // as its membership resource: bookkeeping on that container.
            let diverted = subject.as_deref().and_then(|s| {
                let object = object.clone()?;
                inner.entries.values().find_map(|entry| {
                    match &entry.resource.membership {
                        Some(Membership {
                            membership_resource,
                            relation: MembershipRelation::HasMember(relation),
                        }) if membership_resource.as_str() == s
                            && relation.as_str() == triple.predicate.as_str() =>
                        {
                            Some(Action::AddMember {
                                container: entry.resource.uri.clone(),
                                member: object.clone(),
                            })
                        }
                        _ => None,
                    }
                })
            });
            match diverted {
                Some(action) => actions.push(action),
                None => actions.push(Action::AddTriple(triple)),
            }
        }

        for action in actions {
            match action {
                Action::AddMember { container, member } => {
                    if let Some(entry) = inner.entries.get_mut(&container) {
                        entry.members.insert(member);
                    }
                }
                Action::AddTriple(triple) => {
                    if let Some(entry) = inner.entries.get_mut(&target_key) {
                        entry.resource.graph.insert(triple);
                    }
                }
            }
        }
        Ok(())
    }

    fn remove(&self, uri: &str) -> LdpResult<bool> {
        let mut inner = self.inner.write().map_err(lock_err)?;
        inner.reserved.remove(uri);
        let removed = inner.entries.remove(uri).is_some();
        if removed {
            for entry in inner.entries.values_mut() {
                entry.members.remove(uri);
            }
        }
        Ok(removed)
    }

    fn members_of(&self, container_uri: &str) -> LdpResult<Vec<String>> {
        let inner = self.inner.read().map_err(lock_err)?;
        Ok(inner
            .container_key(container_uri)
            .and_then(|key| inner.entries.get(&key))
            .map(|entry| entry.members.iter().cloned().collect())
            .unwrap_or_default())
    }

    fn reverse_membership(&self, uri: &str) -> LdpResult<Vec<(String, NamedNode)>> {
        let inner = self.inner.read().map_err(lock_err)?;
        Ok(inner.reverse_membership_of(uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InteractionModel;
    use oxldp_core::Graph;

    fn resource(uri: &str, model: InteractionModel) -> Resource {
        Resource {
            uri: uri.to_owned(),
            graph: Graph::new(),
            model,
            membership: None,
        }
    }

    #[test]
    fn reservation_blocks_and_releases() {
        let store = MemoryStore::new();
        store.reserve_uri("http://h/r/a").unwrap();
        assert!(store.reserve_uri("http://h/r/a").is_err());
        store.release_uri("http://h/r/a");
        store.reserve_uri("http://h/r/a").unwrap();
    }

    #[test]
    fn update_clears_reservation_without_touching_containment() {
        let store = MemoryStore::new();
        store
            .update(resource("http://h/r/", InteractionModel::BasicContainer))
            .unwrap();
        store.reserve_uri("http://h/r/c1").unwrap();
        store
            .update(resource("http://h/r/c1", InteractionModel::RdfSource))
            .unwrap();

        assert!(store.reserve_uri("http://h/r/c1").is_err());
        // Membership only moves through insert_data; sitting under the
        // container's path is not enough.
        assert!(store.members_of("http://h/r/").unwrap().is_empty());
    }

    #[test]
    fn insert_data_diverts_containment() {
        let store = MemoryStore::new();
        store
            .update(resource("http://h/r/c1", InteractionModel::BasicContainer))
            .unwrap();

        let contains = Triple::new(
            NamedNode::new("http://h/r/c1").unwrap(),
            ldp::CONTAINS.into_owned(),
            NamedNode::new("http://h/r/c1/a").unwrap(),
        );
        store.insert_data("http://h/r/c1", vec![contains]).unwrap();

        let stored = store.read("http://h/r/c1").unwrap().unwrap();
        assert!(stored.resource.graph.is_empty());
        assert_eq!(
            store.members_of("http://h/r/c1").unwrap(),
            vec!["http://h/r/c1/a".to_owned()]
        );
    }

    #[test]
    fn insert_data_diverts_direct_membership() {
        let store = MemoryStore::new();
        let mr = NamedNode::new("http://h/r/mr").unwrap();
        let relation = NamedNode::new("http://ex/has").unwrap();
        store
            .update(Resource {
                uri: "http://h/r/c2".to_owned(),
                graph: Graph::new(),
                model: InteractionModel::DirectContainer,
                membership: Some(Membership {
                    membership_resource: mr.clone(),
                    relation: MembershipRelation::HasMember(relation.clone()),
                }),
            })
            .unwrap();
        store
            .update(resource("http://h/r/mr", InteractionModel::RdfSource))
            .unwrap();

        let membership_triple = Triple::new(
            mr.clone(),
            relation.clone(),
            NamedNode::new("http://h/r/c2/m1").unwrap(),
        );
        store
            .insert_data("http://h/r/mr", vec![membership_triple])
            .unwrap();

        let stored = store.read("http://h/r/mr").unwrap().unwrap();
        assert!(stored.resource.graph.is_empty());
        assert!(store
            .members_of("http://h/r/c2")
            .unwrap()
            .contains(&"http://h/r/c2/m1".to_owned()));
        assert_eq!(
            stored.membership_resource_for,
            vec![("http://h/r/c2".to_owned(), relation)]
        );
    }

    #[test]
    fn remove_unregisters_membership() {
        let store = MemoryStore::new();
        store
            .update(resource("http://h/r/c1", InteractionModel::BasicContainer))
            .unwrap();
        store
            .update(resource("http://h/r/c1/a", InteractionModel::RdfSource))
            .unwrap();
        let contains = Triple::new(
            NamedNode::new("http://h/r/c1").unwrap(),
            ldp::CONTAINS.into_owned(),
            NamedNode::new("http://h/r/c1/a").unwrap(),
        );
        store.insert_data("http://h/r/c1", vec![contains]).unwrap();
        assert_eq!(
            store.members_of("http://h/r/c1").unwrap(),
            vec!["http://h/r/c1/a".to_owned()]
        );

        assert!(store.remove("http://h/r/c1/a").unwrap());
        assert!(!store.remove("http://h/r/c1/a").unwrap());
        assert!(store.members_of("http://h/r/c1").unwrap().is_empty());
    }
}
