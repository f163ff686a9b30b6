#![deny(clippy::all, clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![cfg_attr(test, allow(clippy::uninlined_format_args))]
#![allow(clippy::module_name_repetitions)]
//
// Documentation lints: many small accessors are self-describing.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
//
// Builders take owned values and return `Self` by design of the fluent API.
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::must_use_candidate)]

//! Per-block view access rules for content management systems.
//!
//! A [`ContentBlock`] carries an [`AccessMode`] and, for group-restricted
//! blocks, a set of viewer groups. [`ViewAccessEvaluator`] turns that rule and
//! a requesting [`Actor`] into a [`Decision`]:
//!
//! - [`Decision::Allow`] only for actors holding an override capability,
//! - [`Decision::Deny`] when the block's rule excludes the actor,
//! - [`Decision::Defer`] otherwise, leaving the call to the parent page.
//!
//! ```
//! use canview_core::{Actor, ContentBlock, Decision, ViewAccessEvaluator};
//!
//! let evaluator = ViewAccessEvaluator::standalone();
//! let block = ContentBlock::new(1).only_groups([5, 7]);
//!
//! let member = Actor::builder().id(10).group(7).build();
//! let outsider = Actor::builder().id(11).group(9).build();
//!
//! assert_eq!(evaluator.evaluate(Some(&member), &block), Decision::Defer);
//! assert_eq!(evaluator.evaluate(Some(&outsider), &block), Decision::Deny);
//! ```

/// The canview-core crate version (matches `Cargo.toml`).
pub const CANVIEW_CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod access;
pub mod config;
pub mod error;
pub mod types;

pub use access::{
    CapabilityChecker, DirectGrants, FixedSession, GroupMembership, NoSession,
    PermissionDirectory, SessionResolver, ViewAccessEvaluator, ViewFilterStats,
};
pub use config::{EvaluatorConfig, EvaluatorConfigBuilder};
pub use error::{CanViewError, Result};
pub use types::{
    AccessEditorView, AccessMode, AccessModeField, AccessModeOption, Actor, ActorBuilder, BlockId,
    CAN_VIEW_TYPE_KEY, Capability, ContentBlock, Decision, FieldState, GroupId, GroupSummary,
    MemberId, VIEWER_GROUPS_KEY, ViewerGroupsField,
};
