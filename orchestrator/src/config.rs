use crate::error::OrchestratorError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrchestratorConfig {
    /// Hosted table that mirrors loan requests.
    pub table: String,
    /// Extra attempts after a failed mirror write.
    pub mirror_retries: u32,
    pub network: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        OrchestratorConfig {
            table: "loans".to_string(),
            mirror_retries: 1,
            network: "testnet".to_string(),
        }
    }
}

impl OrchestratorConfig {
    pub fn from_json(raw: &str) -> Result<Self, OrchestratorError> {
        serde_json::from_str(raw).map_err(OrchestratorError::Config)
    }
}
