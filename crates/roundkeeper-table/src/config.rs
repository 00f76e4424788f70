//! Table configuration.

use roundkeeper_engine::EngineConfig;
use serde::{Deserialize, Serialize};

/// Configuration for a table instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Capacity of the actor's command channel. Senders wait when it is
    /// full.
    pub channel_size: usize,

    /// Settings for the session the table runs.
    pub engine: EngineConfig,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            channel_size: 64,
            engine: EngineConfig::default(),
        }
    }
}
