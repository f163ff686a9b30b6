//! Evaluator configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::Capability;
use crate::{CanViewError, Result};

fn default_override_capabilities() -> Vec<Capability> {
    vec![Capability::Admin, Capability::ViewAll]
}

fn default_grant_capability() -> Capability {
    Capability::GrantAccess
}

fn default_true() -> bool {
    true
}

/// Tunables for [`crate::ViewAccessEvaluator`].
///
/// ```json
/// {
///   "override_capabilities": ["ADMIN", "SITETREE_VIEW_ALL"],
///   "grant_capability": "SITETREE_GRANT_ACCESS",
///   "resolve_session_actor": true
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EvaluatorConfig {
    /// Holding any one of these grants view access to every block.
    #[serde(default = "default_override_capabilities")]
    pub override_capabilities: Vec<Capability>,
    /// Required to change a block's view rule in the editor.
    #[serde(default = "default_grant_capability")]
    pub grant_capability: Capability,
    /// Fall back to the session's current actor when none is supplied.
    #[serde(default = "default_true")]
    pub resolve_session_actor: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            override_capabilities: default_override_capabilities(),
            grant_capability: default_grant_capability(),
            resolve_session_actor: true,
        }
    }
}

impl EvaluatorConfig {
    #[must_use]
    pub fn builder() -> EvaluatorConfigBuilder {
        EvaluatorConfigBuilder::default()
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs_err::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&raw)?;
        tracing::debug!(
            target: "canview::config",
            path = %path.as_ref().display(),
            overrides = ?config.override_capabilities,
            "loaded evaluator config"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.override_capabilities.is_empty() {
            // Editors must always be able to see what they edit.
            return Err(CanViewError::InvalidConfig {
                reason: "override_capabilities must name at least one capability".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct EvaluatorConfigBuilder {
    inner: EvaluatorConfig,
}

impl EvaluatorConfigBuilder {
    /// Replace the override list.
    pub fn override_capabilities<I>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = Capability>,
    {
        self.inner.override_capabilities = capabilities.into_iter().collect();
        self
    }

    pub fn grant_capability(mut self, capability: Capability) -> Self {
        self.inner.grant_capability = capability;
        self
    }

    pub fn resolve_session_actor(mut self, enabled: bool) -> Self {
        self.inner.resolve_session_actor = enabled;
        self
    }

    pub fn build(self) -> Result<EvaluatorConfig> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}
