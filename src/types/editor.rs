//! Framework-free description of the view-rule editing surface.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::access::AccessMode;
use super::common::GroupId;

/// Note shown under the mode selector.
pub const ADMIN_VISIBILITY_NOTE: &str = "As an Administrator, you can always see ALL blocks - no matter what - otherwise you could not edit them.";
/// Heading of the mode selector.
pub const ACCESS_HEADER: &str = "Who can view this elemental block?";
/// Heading of the viewer group selector.
pub const VIEWER_GROUPS_HEADER: &str = "Viewer Groups";

/// How an editor may interact with a field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FieldState {
    Editable,
    ReadOnly,
    Hidden,
}

/// A selectable access mode.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct AccessModeOption {
    pub mode: AccessMode,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct AccessModeField {
    pub title: String,
    pub options: Vec<AccessModeOption>,
    pub selected: AccessMode,
    pub description: String,
    pub read_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct ViewerGroupsField {
    pub title: String,
    pub selected: BTreeSet<GroupId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub state: FieldState,
}

/// Both fields of the "Permissions" tab for one block.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct AccessEditorView {
    pub mode: AccessModeField,
    pub viewer_groups: ViewerGroupsField,
}

/// A group as listed for administrative display.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct GroupSummary {
    pub id: GroupId,
    pub title: String,
}
