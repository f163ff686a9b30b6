//! Visibility pipeline helpers: resolve deferred decisions and filter batches.

use crate::types::{Actor, ContentBlock, Decision};

use super::{CapabilityChecker, GroupMembership, SessionResolver, ViewAccessEvaluator};

/// Counters collected while filtering a batch of blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewFilterStats {
    pub allowed_count: usize,
    pub denied_count: usize,
    pub deferred_count: usize,
    /// Blocks that ended up visible after deferred ones were resolved.
    pub visible_count: usize,
}

impl ViewFilterStats {
    fn record(&mut self, decision: Decision, visible: bool) {
        match decision {
            Decision::Allow => self.allowed_count += 1,
            Decision::Deny => self.denied_count += 1,
            Decision::Defer => self.deferred_count += 1,
        }
        if visible {
            self.visible_count += 1;
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.allowed_count + self.denied_count + self.deferred_count
    }
}

impl<S, P> ViewAccessEvaluator<S, P>
where
    S: SessionResolver,
    P: CapabilityChecker + GroupMembership,
{
    /// Final answer for one block: terminal decisions stand, deferred ones are
    /// handed to `parent_visible`.
    pub fn can_view<F>(
        &self,
        actor: Option<&Actor>,
        block: &ContentBlock,
        parent_visible: F,
    ) -> bool
    where
        F: FnOnce(&ContentBlock) -> bool,
    {
        self.evaluate(actor, block).resolve(|| parent_visible(block))
    }

    /// Keep the visible blocks, in order. The session actor is resolved once
    /// for the whole batch.
    pub fn filter_visible<'b, F>(
        &self,
        actor: Option<&Actor>,
        blocks: &'b [ContentBlock],
        mut parent_visible: F,
    ) -> (Vec<&'b ContentBlock>, ViewFilterStats)
    where
        F: FnMut(&ContentBlock) -> bool,
    {
        let actor = self.resolve_actor(actor);
        let mut stats = ViewFilterStats::default();
        let mut visible = Vec::with_capacity(blocks.len());
        for block in blocks {
            let decision = self.evaluate_resolved(actor.as_deref(), block);
            let shown = decision.resolve(|| parent_visible(block));
            stats.record(decision, shown);
            if shown {
                visible.push(block);
            }
        }
        tracing::debug!(
            target: "canview::access",
            total = stats.total(),
            allowed = stats.allowed_count,
            denied = stats.denied_count,
            deferred = stats.deferred_count,
            visible = stats.visible_count,
            "filtered blocks by view rule"
        );
        (visible, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{DirectGrants, FixedSession};
    use crate::types::{AccessMode, BlockId, Capability};

    fn blocks() -> Vec<ContentBlock> {
        vec![
            ContentBlock::new(1),
            ContentBlock::new(2).with_mode(AccessMode::LoggedIn),
            ContentBlock::new(3).with_mode(AccessMode::NotLoggedIn),
            ContentBlock::new(4).only_groups([5, 7]),
        ]
    }

    fn ids(visible: &[&ContentBlock]) -> Vec<u64> {
        visible.iter().map(|block| block.id.0).collect()
    }

    #[test]
    fn anonymous_visitor_sees_public_and_logged_out_blocks() {
        let evaluator = ViewAccessEvaluator::standalone();
        let all = blocks();
        let (visible, stats) = evaluator.filter_visible(None, &all, |_| true);
        assert_eq!(ids(&visible), vec![1, 3]);
        assert_eq!(stats.denied_count, 2);
        assert_eq!(stats.deferred_count, 2);
        assert_eq!(stats.visible_count, 2);
    }

    #[test]
    fn deferred_blocks_follow_parent_rule() {
        let evaluator = ViewAccessEvaluator::standalone();
        let all = blocks();
        let member = Actor::builder().id(2).group(7).build();
        let (visible, stats) =
            evaluator.filter_visible(Some(&member), &all, |block| block.id != BlockId(4));
        assert_eq!(ids(&visible), vec![1, 2]);
        assert_eq!(stats.deferred_count, 3);
        assert_eq!(stats.visible_count, 2);
    }

    #[test]
    fn override_ignores_parent_rule() {
        let admin = Actor::builder().id(1).capability(Capability::Admin).build();
        let evaluator = ViewAccessEvaluator::new(FixedSession::new(admin), DirectGrants);
        let all = blocks();
        let (visible, stats) = evaluator.filter_visible(None, &all, |_| false);
        assert_eq!(visible.len(), all.len());
        assert_eq!(stats.allowed_count, all.len());
    }

    #[test]
    fn can_view_consults_parent_only_when_deferred() {
        let evaluator = ViewAccessEvaluator::standalone();
        let member = Actor::member(3);
        let public = ContentBlock::new(1);
        let hidden = ContentBlock::new(2).with_mode(AccessMode::NotLoggedIn);
        assert!(evaluator.can_view(Some(&member), &public, |_| true));
        assert!(!evaluator.can_view(Some(&member), &public, |_| false));
        assert!(!evaluator.can_view(Some(&member), &hidden, |_| {
            panic!("parent rule consulted for a terminal decision")
        }));
    }
}
