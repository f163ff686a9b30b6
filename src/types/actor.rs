//! The requesting identity whose view access is evaluated.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::access::Capability;
use super::common::{GroupId, MemberId};

/// A visitor, possibly anonymous.
///
/// An actor without a valid [`MemberId`] counts as not logged in even when it
/// carries groups or capabilities.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Default)]
pub struct Actor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MemberId>,
    /// Groups the actor belongs to directly.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub group_ids: BTreeSet<GroupId>,
    /// Capabilities granted to the actor itself rather than through a group.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub capabilities: BTreeSet<Capability>,
}

impl Actor {
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn member(id: impl Into<MemberId>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn builder() -> ActorBuilder {
        ActorBuilder::default()
    }

    /// Whether the actor is logged in with a persisted account.
    #[must_use]
    pub fn has_identity(&self) -> bool {
        self.id.is_some_and(MemberId::is_valid)
    }

    #[must_use]
    pub fn in_any_group(&self, groups: &BTreeSet<GroupId>) -> bool {
        !self.group_ids.is_disjoint(groups)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActorBuilder {
    inner: Actor,
}

impl ActorBuilder {
    pub fn id(mut self, id: impl Into<MemberId>) -> Self {
        self.inner.id = Some(id.into());
        self
    }

    pub fn group(mut self, group: impl Into<GroupId>) -> Self {
        self.inner.group_ids.insert(group.into());
        self
    }

    pub fn groups<I, G>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: Into<GroupId>,
    {
        self.inner
            .group_ids
            .extend(groups.into_iter().map(Into::into));
        self
    }

    pub fn capability(mut self, capability: Capability) -> Self {
        self.inner.capabilities.insert(capability);
        self
    }

    #[must_use]
    pub fn build(self) -> Actor {
        self.inner
    }
}
