//! Content blocks and their stored view rule.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};

use super::access::{AccessMode, CAN_VIEW_TYPE_KEY, VIEWER_GROUPS_KEY};
use super::common::{BlockId, GroupId};

/// The view rule attached to a single content block.
///
/// `viewer_groups` only matters when `access_mode` is
/// [`AccessMode::OnlyTheseGroups`]; it is kept as-is otherwise so switching
/// modes in the editor does not lose the selection.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Default)]
pub struct ContentBlock {
    #[serde(default)]
    pub id: BlockId,
    #[serde(default, deserialize_with = "lenient_access_mode")]
    pub access_mode: AccessMode,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub viewer_groups: BTreeSet<GroupId>,
}

impl ContentBlock {
    #[must_use]
    pub fn new(id: impl Into<BlockId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: AccessMode) -> Self {
        self.access_mode = mode;
        self
    }

    /// Restrict the block to the given groups.
    #[must_use]
    pub fn only_groups<I, G>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: Into<GroupId>,
    {
        self.access_mode = AccessMode::OnlyTheseGroups;
        self.viewer_groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Viewer groups that take part in evaluation; empty unless the block is
    /// restricted to groups.
    #[must_use]
    pub fn effective_viewer_groups(&self) -> Option<&BTreeSet<GroupId>> {
        self.access_mode
            .uses_viewer_groups()
            .then_some(&self.viewer_groups)
    }

    /// Read the rule from a host record. Never fails: a missing or damaged
    /// mode reads as [`AccessMode::Anyone`] and a damaged group list as empty.
    #[must_use]
    pub fn from_record(id: impl Into<BlockId>, record: &BTreeMap<String, String>) -> Self {
        let id = id.into();
        let access_mode = record
            .get(CAN_VIEW_TYPE_KEY)
            .map(|raw| AccessMode::from_raw(raw))
            .unwrap_or_default();
        let viewer_groups = match record.get(VIEWER_GROUPS_KEY) {
            Some(raw) => parse_group_list(raw).unwrap_or_else(|| {
                tracing::warn!(
                    target: "canview::types",
                    block = %id,
                    value = %raw,
                    "malformed viewer group list; treating as empty"
                );
                BTreeSet::new()
            }),
            None => BTreeSet::new(),
        };
        Self {
            id,
            access_mode,
            viewer_groups,
        }
    }

    /// Write the rule back into record fields.
    #[must_use]
    pub fn to_record(&self) -> BTreeMap<String, String> {
        let groups: Vec<u64> = self.viewer_groups.iter().map(|group| group.0).collect();
        let mut record = BTreeMap::new();
        record.insert(
            CAN_VIEW_TYPE_KEY.to_string(),
            self.access_mode.code().to_string(),
        );
        record.insert(
            VIEWER_GROUPS_KEY.to_string(),
            serde_json::Value::from(groups).to_string(),
        );
        record
    }
}

fn parse_group_list(raw: &str) -> Option<BTreeSet<GroupId>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(BTreeSet::new());
    }
    let values: Vec<u64> = serde_json::from_str(trimmed).ok()?;
    Some(values.into_iter().map(GroupId).collect())
}

fn lenient_access_mode<'de, D>(deserializer: D) -> Result<AccessMode, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().map(AccessMode::from_raw).unwrap_or_default())
}
