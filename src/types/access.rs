//! View rule vocabulary: access modes, decisions, and capability codes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CanViewError, Result};

/// Record field holding the block's access mode code.
pub const CAN_VIEW_TYPE_KEY: &str = "CanViewType";
/// Record field holding the viewer group ids (canonical JSON integer array).
pub const VIEWER_GROUPS_KEY: &str = "ViewerGroups";

/// Who may view a content block.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash, Default)]
pub enum AccessMode {
    /// No restriction of its own; visibility is decided by the parent page.
    #[default]
    #[serde(rename = "Anyone")]
    Anyone,
    /// Only visitors without an account session.
    #[serde(rename = "NotLoggedInUsers")]
    NotLoggedIn,
    /// Only visitors with an account session.
    #[serde(rename = "LoggedInUsers")]
    LoggedIn,
    /// Only members of the block's viewer groups.
    #[serde(rename = "OnlyTheseUsers")]
    OnlyTheseGroups,
}

impl AccessMode {
    /// Every mode in editor display order.
    pub const ALL: [AccessMode; 4] = [
        AccessMode::Anyone,
        AccessMode::NotLoggedIn,
        AccessMode::LoggedIn,
        AccessMode::OnlyTheseGroups,
    ];

    /// Stored code for this mode.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            AccessMode::Anyone => "Anyone",
            AccessMode::NotLoggedIn => "NotLoggedInUsers",
            AccessMode::LoggedIn => "LoggedInUsers",
            AccessMode::OnlyTheseGroups => "OnlyTheseUsers",
        }
    }

    /// Label shown next to the option in the editing surface.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AccessMode::Anyone => "Anyone who can view the parent page",
            AccessMode::NotLoggedIn => "Logged-out users",
            AccessMode::LoggedIn => "Logged-in users",
            AccessMode::OnlyTheseGroups => "Only these groups (choose from list)",
        }
    }

    /// Whether the viewer group list takes part in evaluation.
    #[must_use]
    pub fn uses_viewer_groups(self) -> bool {
        self == AccessMode::OnlyTheseGroups
    }

    /// Lenient parse used when reading stored rules.
    ///
    /// Empty values mean "unset" and map to [`AccessMode::Anyone`]. Unknown
    /// values also map to `Anyone` so a damaged record falls back to the
    /// parent page's visibility instead of hiding or erroring.
    #[must_use]
    pub fn from_raw(raw: &str) -> AccessMode {
        let Some(value) = normalize_code(raw) else {
            return AccessMode::Anyone;
        };
        match parse_code(&value) {
            Some(mode) => mode,
            None => {
                tracing::warn!(
                    target: "canview::types",
                    value = %raw,
                    "unknown access mode; treating as Anyone"
                );
                AccessMode::Anyone
            }
        }
    }
}

impl FromStr for AccessMode {
    type Err = CanViewError;

    fn from_str(s: &str) -> Result<Self> {
        normalize_code(s)
            .and_then(|value| parse_code(&value))
            .ok_or_else(|| CanViewError::InvalidAccessMode {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

fn parse_code(value: &str) -> Option<AccessMode> {
    match value {
        "anyone" => Some(AccessMode::Anyone),
        "notloggedinusers" | "notloggedin" => Some(AccessMode::NotLoggedIn),
        "loggedinusers" | "loggedin" => Some(AccessMode::LoggedIn),
        "onlytheseusers" | "onlythesegroups" => Some(AccessMode::OnlyTheseGroups),
        _ => None,
    }
}

fn normalize_code(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    // Some writers store the code JSON-quoted, e.g. "\"LoggedInUsers\"".
    let unwrapped = match serde_json::from_str::<String>(trimmed) {
        Ok(parsed) => parsed.trim().to_string(),
        Err(_) => trimmed.to_string(),
    };
    if unwrapped.is_empty() {
        None
    } else {
        Some(unwrapped.to_ascii_lowercase())
    }
}

/// Outcome of evaluating a block's view rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Terminal grant.
    Allow,
    /// Terminal refusal.
    Deny,
    /// No opinion; consult the next rule (usually the parent page).
    Defer,
}

impl Decision {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self != Decision::Defer
    }

    /// Chain to the next rule when this one has no opinion.
    #[must_use]
    pub fn or_else<F>(self, next: F) -> Decision
    where
        F: FnOnce() -> Decision,
    {
        match self {
            Decision::Defer => next(),
            terminal => terminal,
        }
    }

    /// Collapse into a final answer, asking `fallback` only when deferred.
    #[must_use]
    pub fn resolve<F>(self, fallback: F) -> bool
    where
        F: FnOnce() -> bool,
    {
        match self {
            Decision::Allow => true,
            Decision::Deny => false,
            Decision::Defer => fallback(),
        }
    }
}

/// Permission codes consulted by the view rule and its editor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Capability {
    /// Full administrator; implies every other capability in a directory.
    #[serde(rename = "ADMIN")]
    Admin,
    /// May view every page and block regardless of rules.
    #[serde(rename = "SITETREE_VIEW_ALL")]
    ViewAll,
    /// May change who can view a page or block.
    #[serde(rename = "SITETREE_GRANT_ACCESS")]
    GrantAccess,
}

impl Capability {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Capability::Admin => "ADMIN",
            Capability::ViewAll => "SITETREE_VIEW_ALL",
            Capability::GrantAccess => "SITETREE_GRANT_ACCESS",
        }
    }
}

impl FromStr for Capability {
    type Err = CanViewError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Capability::Admin),
            "SITETREE_VIEW_ALL" => Ok(Capability::ViewAll),
            "SITETREE_GRANT_ACCESS" => Ok(Capability::GrantAccess),
            _ => Err(CanViewError::InvalidCapability {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
