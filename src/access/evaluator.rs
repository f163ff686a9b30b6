use std::borrow::Cow;

use crate::Result;
use crate::config::EvaluatorConfig;
use crate::types::{AccessMode, Actor, ContentBlock, Decision};

use super::{CapabilityChecker, DirectGrants, GroupMembership, NoSession, SessionResolver};

/// Decides whether an actor may view a content block.
///
/// The only terminal grant it ever issues is the administrative override.
/// Every restrictive mode either vetoes ([`Decision::Deny`]) or steps aside
/// ([`Decision::Defer`]) so that the parent page's visibility stays in charge.
#[derive(Debug, Clone, Default)]
pub struct ViewAccessEvaluator<S = NoSession, P = DirectGrants> {
    session: S,
    permissions: P,
    config: EvaluatorConfig,
}

impl ViewAccessEvaluator {
    /// Evaluator with no ambient session that reads grants off the actor.
    #[must_use]
    pub fn standalone() -> Self {
        Self::default()
    }
}

impl<S, P> ViewAccessEvaluator<S, P>
where
    S: SessionResolver,
    P: CapabilityChecker + GroupMembership,
{
    pub fn new(session: S, permissions: P) -> Self {
        Self {
            session,
            permissions,
            config: EvaluatorConfig::default(),
        }
    }

    /// Replace the configuration after validating it.
    pub fn with_config(mut self, config: EvaluatorConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn permissions(&self) -> &P {
        &self.permissions
    }

    /// Evaluate `block`'s view rule for `actor`, falling back to the session
    /// actor when none is given.
    pub fn evaluate(&self, actor: Option<&Actor>, block: &ContentBlock) -> Decision {
        let actor = self.resolve_actor(actor);
        self.evaluate_resolved(actor.as_deref(), block)
    }

    pub(crate) fn resolve_actor<'a>(&self, actor: Option<&'a Actor>) -> Option<Cow<'a, Actor>> {
        match actor {
            Some(actor) => Some(Cow::Borrowed(actor)),
            None if self.config.resolve_session_actor => {
                self.session.current_actor().map(Cow::Owned)
            }
            None => None,
        }
    }

    pub(crate) fn evaluate_resolved(
        &self,
        actor: Option<&Actor>,
        block: &ContentBlock,
    ) -> Decision {
        if let Some(actor) = actor {
            if self.has_override(actor) {
                tracing::debug!(
                    target: "canview::access",
                    block = %block.id,
                    "view override capability present"
                );
                return Decision::Allow;
            }
        }

        let identified = actor.is_some_and(Actor::has_identity);
        let denied = match block.access_mode {
            AccessMode::Anyone => false,
            AccessMode::NotLoggedIn => identified,
            AccessMode::LoggedIn => !identified,
            AccessMode::OnlyTheseGroups => match (actor, block.effective_viewer_groups()) {
                (Some(actor), Some(groups)) => !self.permissions.in_any_group(actor, groups),
                _ => true,
            },
        };

        if denied {
            tracing::debug!(
                target: "canview::access",
                block = %block.id,
                mode = %block.access_mode,
                identified,
                "view denied"
            );
            Decision::Deny
        } else {
            tracing::trace!(
                target: "canview::access",
                block = %block.id,
                mode = %block.access_mode,
                "deferring to parent visibility"
            );
            Decision::Defer
        }
    }

    pub(crate) fn has_override(&self, actor: &Actor) -> bool {
        self.config
            .override_capabilities
            .iter()
            .any(|&capability| self.permissions.has_capability(actor, capability))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::access::{FixedSession, PermissionDirectory};
    use crate::types::{Capability, GroupId};

    fn block(mode: AccessMode) -> ContentBlock {
        ContentBlock::new(1).with_mode(mode)
    }

    fn admin() -> Actor {
        Actor::builder()
            .id(1)
            .group(9)
            .capability(Capability::Admin)
            .build()
    }

    #[test]
    fn anyone_always_defers() {
        let evaluator = ViewAccessEvaluator::standalone();
        let target = block(AccessMode::Anyone);
        assert_eq!(evaluator.evaluate(None, &target), Decision::Defer);
        assert_eq!(
            evaluator.evaluate(Some(&Actor::member(4)), &target),
            Decision::Defer
        );
    }

    #[test]
    fn override_allows_every_mode() {
        let evaluator = ViewAccessEvaluator::standalone();
        let viewer = Actor::builder()
            .id(2)
            .capability(Capability::ViewAll)
            .build();
        for mode in AccessMode::ALL {
            let target = ContentBlock::new(1).with_mode(mode);
            assert_eq!(evaluator.evaluate(Some(&admin()), &target), Decision::Allow);
            assert_eq!(evaluator.evaluate(Some(&viewer), &target), Decision::Allow);
        }
    }

    #[test]
    fn logged_in_modes() {
        let evaluator = ViewAccessEvaluator::standalone();
        let member = Actor::member(7);
        let anonymous = Actor::anonymous();

        let logged_out = block(AccessMode::NotLoggedIn);
        assert_eq!(evaluator.evaluate(Some(&member), &logged_out), Decision::Deny);
        assert_eq!(
            evaluator.evaluate(Some(&anonymous), &logged_out),
            Decision::Defer
        );
        assert_eq!(evaluator.evaluate(None, &logged_out), Decision::Defer);

        let logged_in = block(AccessMode::LoggedIn);
        assert_eq!(evaluator.evaluate(Some(&member), &logged_in), Decision::Defer);
        assert_eq!(evaluator.evaluate(Some(&anonymous), &logged_in), Decision::Deny);
        assert_eq!(evaluator.evaluate(None, &logged_in), Decision::Deny);
    }

    #[test]
    fn zero_member_id_is_anonymous() {
        let evaluator = ViewAccessEvaluator::standalone();
        let ghost = Actor::member(0);
        assert_eq!(
            evaluator.evaluate(Some(&ghost), &block(AccessMode::LoggedIn)),
            Decision::Deny
        );
        assert_eq!(
            evaluator.evaluate(Some(&ghost), &block(AccessMode::NotLoggedIn)),
            Decision::Defer
        );
    }

    #[test]
    fn group_restriction() {
        let evaluator = ViewAccessEvaluator::standalone();
        let target = ContentBlock::new(1).only_groups([1, 2]);
        let in_g1 = Actor::builder().id(3).group(1).build();
        let in_g3 = Actor::builder().id(4).group(3).build();
        assert_eq!(evaluator.evaluate(Some(&in_g1), &target), Decision::Defer);
        assert_eq!(evaluator.evaluate(Some(&in_g3), &target), Decision::Deny);
        assert_eq!(evaluator.evaluate(None, &target), Decision::Deny);
    }

    #[test]
    fn empty_group_list_denies_all_but_overrides() {
        let evaluator = ViewAccessEvaluator::standalone();
        let target = block(AccessMode::OnlyTheseGroups);
        let member = Actor::builder().id(3).group(1).build();
        assert_eq!(evaluator.evaluate(Some(&member), &target), Decision::Deny);
        assert_eq!(evaluator.evaluate(Some(&admin()), &target), Decision::Allow);
    }

    #[test]
    fn viewer_groups_ignored_outside_group_mode() {
        let evaluator = ViewAccessEvaluator::standalone();
        let mut target = ContentBlock::new(1).only_groups([5]);
        target.access_mode = AccessMode::LoggedIn;
        let outsider = Actor::builder().id(3).group(6).build();
        assert_eq!(evaluator.evaluate(Some(&outsider), &target), Decision::Defer);
    }

    #[test]
    fn absent_actor_falls_back_to_session() {
        let session = FixedSession::new(Actor::builder().id(5).group(7).build());
        let evaluator = ViewAccessEvaluator::new(session, DirectGrants);
        let target = ContentBlock::new(1).only_groups([5, 7]);
        assert_eq!(evaluator.evaluate(None, &target), Decision::Defer);

        // An explicit actor wins over the session.
        let stranger = Actor::builder().id(6).group(9).build();
        assert_eq!(evaluator.evaluate(Some(&stranger), &target), Decision::Deny);
    }

    #[test]
    fn session_lookup_can_be_disabled() {
        let session = FixedSession::new(admin());
        let config = EvaluatorConfig::builder()
            .resolve_session_actor(false)
            .build()
            .unwrap();
        let evaluator = ViewAccessEvaluator::new(session, DirectGrants)
            .with_config(config)
            .unwrap();
        assert_eq!(
            evaluator.evaluate(None, &block(AccessMode::LoggedIn)),
            Decision::Deny
        );
    }

    #[test]
    fn override_list_is_configurable() {
        let config = EvaluatorConfig::builder()
            .override_capabilities([Capability::Admin])
            .build()
            .unwrap();
        let evaluator = ViewAccessEvaluator::new(NoSession, DirectGrants)
            .with_config(config)
            .unwrap();
        let viewer = Actor::builder()
            .id(2)
            .capability(Capability::ViewAll)
            .build();
        assert_eq!(
            evaluator.evaluate(Some(&viewer), &block(AccessMode::NotLoggedIn)),
            Decision::Deny
        );
        assert_eq!(
            evaluator.evaluate(Some(&admin()), &block(AccessMode::NotLoggedIn)),
            Decision::Allow
        );
    }

    #[test]
    fn config_without_overrides_is_rejected() {
        let mut config = EvaluatorConfig::default();
        config.override_capabilities.clear();
        let err = ViewAccessEvaluator::new(NoSession, DirectGrants)
            .with_config(config)
            .unwrap_err();
        assert!(matches!(err, crate::CanViewError::InvalidConfig { .. }));

        // The evaluator keeps the default override when no config was applied.
        let evaluator = ViewAccessEvaluator::new(NoSession, DirectGrants);
        assert_eq!(
            evaluator.evaluate(Some(&admin()), &block(AccessMode::NotLoggedIn)),
            Decision::Allow
        );
    }

    #[test]
    fn directory_membership_includes_parent_groups() {
        let mut dir = PermissionDirectory::new();
        dir.add_group(5, "Members", None).unwrap();
        dir.add_group(6, "Premium", Some(GroupId(5))).unwrap();
        let evaluator = ViewAccessEvaluator::new(NoSession, &dir);

        let target = ContentBlock::new(1).only_groups([5]);
        let premium = Actor::builder().id(3).group(6).build();
        assert_eq!(evaluator.evaluate(Some(&premium), &target), Decision::Defer);

        let parent_only = ContentBlock::new(2).only_groups([6]);
        let member = Actor::builder().id(4).group(5).build();
        assert_eq!(
            evaluator.evaluate(Some(&member), &parent_only),
            Decision::Deny
        );
        assert_eq!(
            dir.effective_groups(&premium),
            BTreeSet::from([GroupId(5), GroupId(6)])
        );
    }
}
