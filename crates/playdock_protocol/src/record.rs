//! Cloud-save record metadata.

use serde::{Deserialize, Serialize};

/// Metadata describing one cloud save as the platform stores it.
///
/// `file_id` changes on every successful update. A fetch must use the
/// `file_id` obtained from the most recent list/create/update response for
/// the same `uuid`; a stale id resolves to missing data on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudSaveRecord {
    /// Stable identifier of the save.
    pub uuid: String,
    /// Identifier of the current data/cover file pair. Rotates on update.
    pub file_id: String,
    /// Save name.
    pub name: String,
    /// Size of the data file in bytes.
    pub save_size: u32,
    /// Size of the cover file in bytes, 0 when there is no cover.
    pub cover_size: u32,
    /// Optional description.
    pub summary: Option<String>,
    /// Optional developer-defined blob.
    pub extra: Option<String>,
    /// Recorded playtime in seconds.
    pub playtime: u32,
    /// Creation time, seconds since the Unix epoch.
    pub created_at: u32,
    /// Last modification time, seconds since the Unix epoch.
    pub modified_at: u32,
}

impl CloudSaveRecord {
    /// Returns true if the save carries a cover image.
    pub fn has_cover(&self) -> bool {
        self.cover_size > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CloudSaveRecord {
        CloudSaveRecord {
            uuid: "u-1".into(),
            file_id: "f-1".into(),
            name: "slot1".into(),
            save_size: 128,
            cover_size: 0,
            summary: Some("before the boss".into()),
            extra: None,
            playtime: 3600,
            created_at: 1_700_000_000,
            modified_at: 1_700_000_100,
        }
    }

    #[test]
    fn cover_presence() {
        let mut record = sample();
        assert!(!record.has_cover());
        record.cover_size = 42;
        assert!(record.has_cover());
    }

    #[test]
    fn serde_round_trip() {
        let record = sample();
        let json = serde_json::to_string(&record).unwrap();
        let back: CloudSaveRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
