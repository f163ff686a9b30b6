//! View access evaluation and the collaborators it depends on.
//!
//! The evaluator itself is stateless. Everything it needs from the host
//! system is injected through three traits: who the current session actor is,
//! whether an actor holds a capability, and which groups an actor belongs to.

use std::collections::BTreeSet;

use crate::types::{Actor, Capability, GroupId};

mod directory;
mod editor;
mod evaluator;
mod filter;

pub use directory::PermissionDirectory;
pub use evaluator::ViewAccessEvaluator;
pub use filter::ViewFilterStats;

/// Supplies the actor of the current request when the caller passes none.
pub trait SessionResolver {
    fn current_actor(&self) -> Option<Actor>;
}

/// Answers capability checks for an actor.
pub trait CapabilityChecker {
    fn has_capability(&self, actor: &Actor, capability: Capability) -> bool;
}

/// Resolves the groups an actor counts as a member of.
pub trait GroupMembership {
    fn group_ids(&self, actor: &Actor) -> BTreeSet<GroupId>;

    fn in_any_group(&self, actor: &Actor, groups: &BTreeSet<GroupId>) -> bool {
        !self.group_ids(actor).is_disjoint(groups)
    }
}

impl<T: SessionResolver + ?Sized> SessionResolver for &T {
    fn current_actor(&self) -> Option<Actor> {
        (**self).current_actor()
    }
}

impl<T: CapabilityChecker + ?Sized> CapabilityChecker for &T {
    fn has_capability(&self, actor: &Actor, capability: Capability) -> bool {
        (**self).has_capability(actor, capability)
    }
}

impl<T: GroupMembership + ?Sized> GroupMembership for &T {
    fn group_ids(&self, actor: &Actor) -> BTreeSet<GroupId> {
        (**self).group_ids(actor)
    }

    fn in_any_group(&self, actor: &Actor, groups: &BTreeSet<GroupId>) -> bool {
        (**self).in_any_group(actor, groups)
    }
}

/// No ambient session: an absent actor stays anonymous.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSession;

impl SessionResolver for NoSession {
    fn current_actor(&self) -> Option<Actor> {
        None
    }
}

/// A session pinned to one actor, e.g. the logged-in user of a request.
#[derive(Debug, Clone, Default)]
pub struct FixedSession(pub Option<Actor>);

impl FixedSession {
    #[must_use]
    pub fn new(actor: Actor) -> Self {
        Self(Some(actor))
    }
}

impl SessionResolver for FixedSession {
    fn current_actor(&self) -> Option<Actor> {
        self.0.clone()
    }
}

/// Reads capabilities and groups straight off the [`Actor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectGrants;

impl CapabilityChecker for DirectGrants {
    fn has_capability(&self, actor: &Actor, capability: Capability) -> bool {
        actor.capabilities.contains(&capability) || actor.capabilities.contains(&Capability::Admin)
    }
}

impl GroupMembership for DirectGrants {
    fn group_ids(&self, actor: &Actor) -> BTreeSet<GroupId> {
        actor.group_ids.clone()
    }

    fn in_any_group(&self, actor: &Actor, groups: &BTreeSet<GroupId>) -> bool {
        actor.in_any_group(groups)
    }
}
