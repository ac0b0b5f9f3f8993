//! Enumeration types for the Sweep simulation.

use serde::{Deserialize, Serialize};

/// The cleaning policies that can be run in an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    /// Memoryless: clean if dirty, otherwise pick any direction at random.
    Reactive,
    /// Builds a knowledge map, explores frontiers, then returns home.
    ModelBased,
}

impl AgentKind {
    /// Snake-case name as used in configuration files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reactive => "reactive",
            Self::ModelBased => "model_based",
        }
    }
}

impl core::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_kind_uses_config_names() {
        let parsed: Result<Vec<AgentKind>, _> =
            serde_json::from_str(r#"["reactive", "model_based"]"#);
        assert_eq!(
            parsed.ok(),
            Some(vec![AgentKind::Reactive, AgentKind::ModelBased])
        );
        assert_eq!(AgentKind::ModelBased.to_string(), "model_based");
    }
}
