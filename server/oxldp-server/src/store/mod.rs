//! The pluggable storage surface the protocol core consumes.
//!
//! Backends persist resource graphs and the metadata derived from them.
//! Containment and membership facts are bookkeeping, never graph triples:
//! a backend must answer `members_of` without `ldp:contains` statements
//! appearing in any stored graph.

use oxldp_core::{Graph, NamedNode, NamedNodeRef, Triple};
use serde::{Deserialize, Serialize};

use crate::error::LdpResult;
use oxldp_core::vocab::ldp;

pub mod memory;

pub use memory::MemoryStore;

/// How a resource behaves under the protocol. Fixed once persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionModel {
    RdfSource,
    BasicContainer,
    DirectContainer,
}

impl InteractionModel {
    pub fn is_container(self) -> bool {
        matches!(
            self,
            InteractionModel::BasicContainer | InteractionModel::DirectContainer
        )
    }

    /// The LDP class IRI advertised for this model.
    pub fn type_iri(self) -> NamedNodeRef<'static> {
        match self {
            InteractionModel::RdfSource => ldp::RESOURCE,
            InteractionModel::BasicContainer => ldp::BASIC_CONTAINER,
            InteractionModel::DirectContainer => ldp::DIRECT_CONTAINER,
        }
    }
}

/// A Direct Container's membership predicate, exactly one of the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipRelation {
    /// Membership triples go `(membershipResource, relation, member)`.
    HasMember(NamedNode),
    /// Membership triples go `(member, relation, membershipResource)`.
    IsMemberOf(NamedNode),
}

/// A Direct Container's membership pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub membership_resource: NamedNode,
    pub relation: MembershipRelation,
}

/// A fully formed resource as handed to `update`.
#[derive(Debug, Clone)]
pub struct Resource {
    pub uri: String,
    pub graph: Graph,
    pub model: InteractionModel,
    pub membership: Option<Membership>,
}

/// A resource as read back, with derived metadata.
#[derive(Debug, Clone)]
pub struct StoredResource {
    pub resource: Resource,
    /// Direct Containers with a `hasMemberRelation` that name this resource
    /// as their membership resource: `(container uri, relation)`.
    pub membership_resource_for: Vec<(String, NamedNode)>,
}

/// Storage contract. One resource per URI; a reserved URI counts as taken.
pub trait LdpBackend: Send + Sync {
    /// Atomically claim a URI. Fails with a conflict if it is occupied,
    /// whether by a resource or an outstanding reservation.
    fn reserve_uri(&self, uri: &str) -> LdpResult<()>;

    /// Release a reservation. Idempotent; unknown URIs are ignored.
    fn release_uri(&self, uri: &str);

    /// Read a resource and its derived metadata.
    fn read(&self, uri: &str) -> LdpResult<Option<StoredResource>>;

    /// Persist a resource, creating or replacing it. Clears any
    /// reservation on the URI.
    fn update(&self, resource: Resource) -> LdpResult<()>;

    /// Additive write into an existing resource. Containment and membership
    /// triples are absorbed into the backend's membership bookkeeping
    /// rather than stored.
    fn insert_data(&self, target_uri: &str, triples: Vec<Triple>) -> LdpResult<()>;

    /// Delete a resource. Returns whether anything was removed.
    fn remove(&self, uri: &str) -> LdpResult<bool>;

    /// URIs of a container's direct members.
    fn members_of(&self, container_uri: &str) -> LdpResult<Vec<String>>;

    /// Direct Containers with a `hasMemberRelation` whose membership
    /// resource is `uri`. Also answers for URIs that do not (yet) resolve
    /// to a resource, so creates can strip membership triples too.
    fn reverse_membership(&self, uri: &str) -> LdpResult<Vec<(String, NamedNode)>>;
}
