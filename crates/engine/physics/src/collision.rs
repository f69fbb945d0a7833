//! Contact classification
//!
//! Extracts contact points from engine manifolds and tells terrain contacts
//! apart from everything else by the partner's name tag.

use glam::Vec3;
use rapier3d::prelude::*;

use crate::convert::from_point;

/// Name tag carried by the terrain body
pub const TERRAIN_TAG: &str = "terrain";

/// Indexable solver contact points of one contact manifold
pub trait ContactManifoldView {
    /// Number of solver contacts in the manifold
    fn solver_contact_count(&self) -> usize;

    /// World-space point of the solver contact at `index`.
    ///
    /// # Panics
    /// Implementations panic when `index >= solver_contact_count()`.
    fn solver_contact_point(&self, index: usize) -> Vec3;
}

impl ContactManifoldView for ContactManifold {
    fn solver_contact_count(&self) -> usize {
        self.data.solver_contacts.len()
    }

    fn solver_contact_point(&self, index: usize) -> Vec3 {
        from_point(&self.data.solver_contacts[index].point)
    }
}

/// Something that may carry a name tag
pub trait ContactPartner {
    fn partner_name(&self) -> Option<&str>;
}

impl ContactPartner for str {
    fn partner_name(&self) -> Option<&str> {
        Some(self)
    }
}

impl ContactPartner for Option<&str> {
    fn partner_name(&self) -> Option<&str> {
        *self
    }
}

impl ContactPartner for Option<String> {
    fn partner_name(&self) -> Option<&str> {
        self.as_deref()
    }
}

/// Contact point at `index`.
///
/// No bounds check is made here; an out-of-range index is a caller bug and
/// panics inside the manifold.
pub fn contact_point_at<M: ContactManifoldView + ?Sized>(manifold: &M, index: usize) -> Vec3 {
    manifold.solver_contact_point(index)
}

/// First contact point of the manifold
pub fn contact_point<M: ContactManifoldView + ?Sized>(manifold: &M) -> Vec3 {
    contact_point_at(manifold, 0)
}

/// True iff the partner is tagged [`TERRAIN_TAG`]; untagged partners are not terrain.
pub fn is_terrain_contact<P: ContactPartner + ?Sized>(partner: &P) -> bool {
    partner.partner_name() == Some(TERRAIN_TAG)
}

/// Whether a contact pair began or ended touching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Started,
    Stopped,
}

/// The other side of a contact as seen from one body
#[derive(Debug, Clone, PartialEq)]
pub struct ContactPartnerInfo {
    pub collider: ColliderHandle,
    pub body: Option<RigidBodyHandle>,
    pub name: Option<String>,
}

impl ContactPartner for ContactPartnerInfo {
    fn partner_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// A contact change reported for one body, with the manifolds of the pair
#[derive(Clone)]
pub struct ContactEvent {
    pub kind: ContactKind,
    pub collider: ColliderHandle,
    pub body: Option<RigidBodyHandle>,
    pub other: ContactPartnerInfo,
    pub manifolds: Vec<ContactManifold>,
}

impl ContactEvent {
    pub fn is_started(&self) -> bool {
        self.kind == ContactKind::Started
    }

    pub fn involves(&self, body: RigidBodyHandle) -> bool {
        self.body == Some(body)
    }

    pub fn is_terrain_contact(&self) -> bool {
        is_terrain_contact(&self.other)
    }

    /// First contact point of the first manifold that has solver contacts
    pub fn first_contact_point(&self) -> Option<Vec3> {
        self.manifolds
            .iter()
            .find(|m| m.solver_contact_count() > 0)
            .map(contact_point)
    }
}

impl std::fmt::Debug for ContactEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactEvent")
            .field("kind", &self.kind)
            .field("collider", &self.collider)
            .field("body", &self.body)
            .field("other", &self.other)
            .field("manifolds", &self.manifolds.len())
            .finish()
    }
}
