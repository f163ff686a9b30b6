use std::collections::{BTreeMap, BTreeSet};

use crate::types::{Actor, Capability, GroupId, GroupSummary};
use crate::{CanViewError, Result};

use super::{CapabilityChecker, GroupMembership};

#[derive(Debug, Clone)]
struct GroupRecord {
    title: String,
    parent: Option<GroupId>,
    capabilities: BTreeSet<Capability>,
}

/// In-memory group tree with per-group capability grants.
///
/// Membership is hierarchical: an actor in a group also counts as a member of
/// every ancestor of that group, and inherits the ancestors' capabilities.
/// [`Capability::Admin`] implies every other capability.
#[derive(Debug, Clone, Default)]
pub struct PermissionDirectory {
    groups: BTreeMap<GroupId, GroupRecord>,
}

impl PermissionDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a group. The parent, when given, must already exist.
    pub fn add_group(
        &mut self,
        id: impl Into<GroupId>,
        title: impl Into<String>,
        parent: Option<GroupId>,
    ) -> Result<()> {
        let id = id.into();
        if self.groups.contains_key(&id) {
            return Err(CanViewError::DuplicateGroup { group: id });
        }
        if let Some(parent) = parent {
            if !self.groups.contains_key(&parent) {
                return Err(CanViewError::UnknownGroup { group: parent });
            }
        }
        self.groups.insert(
            id,
            GroupRecord {
                title: title.into(),
                parent,
                capabilities: BTreeSet::new(),
            },
        );
        Ok(())
    }

    pub fn grant(&mut self, group: impl Into<GroupId>, capability: Capability) -> Result<()> {
        let group = group.into();
        let record = self
            .groups
            .get_mut(&group)
            .ok_or(CanViewError::UnknownGroup { group })?;
        record.capabilities.insert(capability);
        Ok(())
    }

    #[must_use]
    pub fn group_title(&self, id: GroupId) -> Option<&str> {
        self.groups.get(&id).map(|record| record.title.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The actor's direct groups plus all of their ancestors. Groups unknown
    /// to the directory are kept as-is.
    #[must_use]
    pub fn effective_groups(&self, actor: &Actor) -> BTreeSet<GroupId> {
        let mut seen = BTreeSet::new();
        for &group in &actor.group_ids {
            let mut current = Some(group);
            while let Some(id) = current {
                if !seen.insert(id) {
                    break;
                }
                current = self.groups.get(&id).and_then(|record| record.parent);
            }
        }
        seen
    }

    /// Groups granted any of `capabilities` directly, sorted by title. Groups
    /// granted [`Capability::Admin`] are always included since it implies
    /// every capability. Grants inherited from ancestor groups do not count.
    #[must_use]
    pub fn groups_with_any(&self, capabilities: &[Capability]) -> Vec<GroupSummary> {
        let mut matches: Vec<GroupSummary> = self
            .groups
            .iter()
            .filter(|(_, record)| {
                record.capabilities.contains(&Capability::Admin)
                    || capabilities
                        .iter()
                        .any(|capability| record.capabilities.contains(capability))
            })
            .map(|(id, record)| GroupSummary {
                id: *id,
                title: record.title.clone(),
            })
            .collect();
        matches.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        matches
    }

    fn group_grants(&self, group: GroupId, capability: Capability) -> bool {
        self.groups.get(&group).is_some_and(|record| {
            record.capabilities.contains(&capability)
                || record.capabilities.contains(&Capability::Admin)
        })
    }
}

impl CapabilityChecker for PermissionDirectory {
    fn has_capability(&self, actor: &Actor, capability: Capability) -> bool {
        if actor.capabilities.contains(&capability)
            || actor.capabilities.contains(&Capability::Admin)
        {
            return true;
        }
        self.effective_groups(actor)
            .into_iter()
            .any(|group| self.group_grants(group, capability))
    }
}

impl GroupMembership for PermissionDirectory {
    fn group_ids(&self, actor: &Actor) -> BTreeSet<GroupId> {
        self.effective_groups(actor)
    }
}
