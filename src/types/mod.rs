//! Public types exposed by the `canview-core` crate.

pub mod access;
pub mod actor;
pub mod block;
pub mod common;
pub mod editor;

pub use access::{AccessMode, CAN_VIEW_TYPE_KEY, Capability, Decision, VIEWER_GROUPS_KEY};
pub use actor::{Actor, ActorBuilder};
pub use block::ContentBlock;
pub use common::{BlockId, GroupId, MemberId};
pub use editor::{
    ACCESS_HEADER, ADMIN_VISIBILITY_NOTE, AccessEditorView, AccessModeField, AccessModeOption,
    FieldState, GroupSummary, VIEWER_GROUPS_HEADER, ViewerGroupsField,
};
