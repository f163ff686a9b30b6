use crate::types::{
    ACCESS_HEADER, ADMIN_VISIBILITY_NOTE, AccessEditorView, AccessMode, AccessModeField,
    AccessModeOption, Actor, ContentBlock, FieldState, GroupSummary, VIEWER_GROUPS_HEADER,
    ViewerGroupsField,
};

use super::{CapabilityChecker, GroupMembership, SessionResolver, ViewAccessEvaluator};

impl<S, P> ViewAccessEvaluator<S, P>
where
    S: SessionResolver,
    P: CapabilityChecker + GroupMembership,
{
    /// Whether `editor` (or the session actor) may change view rules.
    pub fn can_grant_access(&self, editor: Option<&Actor>) -> bool {
        self.resolve_actor(editor).is_some_and(|editor| {
            self.permissions()
                .has_capability(&editor, self.config().grant_capability)
        })
    }

    /// Describe the view-rule fields for `block` as seen by `editor`.
    ///
    /// `view_all_groups` lists groups that see every block anyway; it is shown
    /// as a note under the group selector.
    pub fn editor_view(
        &self,
        editor: Option<&Actor>,
        block: &ContentBlock,
        view_all_groups: &[GroupSummary],
    ) -> AccessEditorView {
        let can_grant = self.can_grant_access(editor);

        let options = AccessMode::ALL
            .iter()
            .map(|&mode| AccessModeOption {
                mode,
                label: mode.label().to_string(),
            })
            .collect();

        let description = if view_all_groups.is_empty() {
            None
        } else {
            let titles: Vec<&str> = view_all_groups
                .iter()
                .map(|group| group.title.as_str())
                .collect();
            Some(format!(
                "Groups with global view permissions: {}",
                titles.join(", ")
            ))
        };

        let state = if can_grant {
            FieldState::Editable
        } else if block.access_mode == AccessMode::OnlyTheseGroups {
            FieldState::ReadOnly
        } else {
            FieldState::Hidden
        };

        AccessEditorView {
            mode: AccessModeField {
                title: ACCESS_HEADER.to_string(),
                options,
                selected: block.access_mode,
                description: ADMIN_VISIBILITY_NOTE.to_string(),
                read_only: !can_grant,
            },
            viewer_groups: ViewerGroupsField {
                title: VIEWER_GROUPS_HEADER.to_string(),
                selected: block.viewer_groups.clone(),
                description,
                state,
            },
        }
    }
}
