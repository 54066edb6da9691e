//! Agent behavior knobs.

/// Default per-user save count limit.
pub const DEFAULT_MAX_SAVES: usize = 100;
/// Default per-user storage quota in bytes (1 GiB).
pub const DEFAULT_STORAGE_QUOTA_BYTES: u64 = 1024 * 1024 * 1024;

/// Configuration for an in-process agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    /// Identity reported for the signed-in user.
    pub open_id: String,
    /// Maximum number of saves per user.
    pub max_saves: usize,
    /// Maximum total stored bytes per user.
    pub storage_quota_bytes: u64,
}

impl AgentConfig {
    /// Creates a config with default quotas.
    pub fn new(open_id: impl Into<String>) -> Self {
        Self {
            open_id: open_id.into(),
            max_saves: DEFAULT_MAX_SAVES,
            storage_quota_bytes: DEFAULT_STORAGE_QUOTA_BYTES,
        }
    }

    /// Sets the save count limit.
    pub fn with_max_saves(mut self, max_saves: usize) -> Self {
        self.max_saves = max_saves;
        self
    }

    /// Sets the storage quota.
    pub fn with_storage_quota_bytes(mut self, quota: u64) -> Self {
        self.storage_quota_bytes = quota;
        self
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new("open-id-local")
    }
}
