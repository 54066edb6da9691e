//! Configuration for the SDK runtime.

/// Maximum save name length in bytes.
pub const MAX_NAME_BYTES: usize = 60;
/// Maximum summary length in bytes.
pub const MAX_SUMMARY_BYTES: usize = 500;
/// Maximum extra-blob length in bytes.
pub const MAX_EXTRA_BYTES: usize = 1000;
/// Maximum save data file size in bytes (10 MiB).
pub const MAX_SAVE_BYTES: u64 = 10 * 1024 * 1024;
/// Maximum cover file size in bytes (512 KiB).
pub const MAX_COVER_BYTES: u64 = 512 * 1024;
/// Default capacity of the event queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 8192;

/// Configuration for an SDK instance.
#[derive(Debug, Clone)]
pub struct SdkConfig {
    /// Client id issued by the developer portal.
    pub client_id: String,
    /// Public key issued by the developer portal, handed to the platform
    /// during initialization.
    pub pub_key: String,
    /// Maximum number of undrained events held between pumps. Events
    /// arriving while the queue is full are dropped and counted.
    pub queue_capacity: usize,
    /// Maximum save data file size in bytes.
    pub max_save_bytes: u64,
    /// Maximum cover file size in bytes.
    pub max_cover_bytes: u64,
}

impl SdkConfig {
    /// Creates a configuration with default limits.
    pub fn new(client_id: impl Into<String>, pub_key: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            pub_key: pub_key.into(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_save_bytes: MAX_SAVE_BYTES,
            max_cover_bytes: MAX_COVER_BYTES,
        }
    }

    /// Sets the event queue capacity.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Sets the save data file size limit.
    pub fn with_max_save_bytes(mut self, limit: u64) -> Self {
        self.max_save_bytes = limit;
        self
    }

    /// Sets the cover file size limit.
    pub fn with_max_cover_bytes(mut self, limit: u64) -> Self {
        self.max_cover_bytes = limit;
        self
    }
}
