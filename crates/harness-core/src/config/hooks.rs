//! Hook enablement configuration.

use serde::{Deserialize, Serialize};

/// Hooks to enable at worker startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HooksConfig {
    /// Hooks enabled in listed order. A name listed twice is enabled twice,
    /// the later entry replacing the earlier one.
    #[serde(default)]
    pub enabled: Vec<HookSpecConfig>,
}

/// A single hook to enable, with the options forwarded to its factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookSpecConfig {
    /// Registered hook name.
    pub name: String,
    /// Free-form options; the hook factory parses them.
    #[serde(default)]
    pub options: Vec<String>,
}
