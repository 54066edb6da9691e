//! In-memory save storage with file-id versioning.

use playdock_protocol::{error_code, CloudSaveRecord, SavePayload, ServiceError};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// One stored save: its record plus the raw bytes behind it.
#[derive(Debug, Clone)]
struct StoredSave {
    record: CloudSaveRecord,
    data: Vec<u8>,
    cover: Vec<u8>,
}

/// Keyed save storage for one user.
///
/// Every rewrite of a save's content rotates its file id, so a file id
/// names one immutable version of the content. Fetches must present the
/// id they obtained from a record; a stale id means the content it named
/// is gone and the fetch fails with not-found, exactly as if the save
/// had been deleted.
#[derive(Debug, Default)]
pub struct SaveStore {
    saves: HashMap<String, StoredSave>,
}

impl SaveStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All records, ordered by creation time then uuid for a stable
    /// listing.
    pub fn list(&self) -> Vec<CloudSaveRecord> {
        let mut records: Vec<CloudSaveRecord> =
            self.saves.values().map(|s| s.record.clone()).collect();
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.uuid.cmp(&b.uuid))
        });
        records
    }

    /// Number of stored saves.
    pub fn len(&self) -> usize {
        self.saves.len()
    }

    /// True when no saves are stored.
    pub fn is_empty(&self) -> bool {
        self.saves.is_empty()
    }

    /// Total bytes of save data and covers currently stored.
    pub fn stored_bytes(&self) -> u64 {
        self.saves
            .values()
            .map(|s| s.data.len() as u64 + s.cover.len() as u64)
            .sum()
    }

    /// Inserts a new save and returns its record.
    pub fn create(&mut self, payload: SavePayload) -> CloudSaveRecord {
        let now = unix_seconds();
        let uuid = Uuid::new_v4().to_string();
        let record = CloudSaveRecord {
            uuid: uuid.clone(),
            file_id: Uuid::new_v4().to_string(),
            name: payload.name,
            save_size: payload.data.len() as u32,
            cover_size: payload.cover.as_ref().map_or(0, |c| c.len() as u32),
            summary: Some(payload.summary),
            extra: payload.extra,
            playtime: payload.playtime,
            created_at: now,
            modified_at: now,
        };
        tracing::debug!(uuid = %record.uuid, file_id = %record.file_id, "save created");
        self.saves.insert(
            uuid,
            StoredSave {
                record: record.clone(),
                data: payload.data,
                cover: payload.cover.unwrap_or_default(),
            },
        );
        record
    }

    /// Rewrites an existing save wholesale, rotating its file id.
    pub fn update(
        &mut self,
        uuid: &str,
        payload: SavePayload,
    ) -> Result<CloudSaveRecord, ServiceError> {
        let save = self
            .saves
            .get_mut(uuid)
            .ok_or_else(|| ServiceError::not_found(format!("no save with uuid {uuid}")))?;

        let record = CloudSaveRecord {
            uuid: uuid.to_owned(),
            file_id: Uuid::new_v4().to_string(),
            name: payload.name,
            save_size: payload.data.len() as u32,
            cover_size: payload.cover.as_ref().map_or(0, |c| c.len() as u32),
            summary: Some(payload.summary),
            extra: payload.extra,
            playtime: payload.playtime,
            created_at: save.record.created_at,
            modified_at: unix_seconds(),
        };
        tracing::debug!(uuid, file_id = %record.file_id, "save rewritten");
        save.record = record.clone();
        save.data = payload.data;
        save.cover = payload.cover.unwrap_or_default();
        Ok(record)
    }

    /// Removes a save.
    pub fn delete(&mut self, uuid: &str) -> Result<(), ServiceError> {
        self.saves
            .remove(uuid)
            .map(|_| ())
            .ok_or_else(|| ServiceError::not_found(format!("no save with uuid {uuid}")))
    }

    /// Save data for the version named by `file_id`.
    pub fn data(&self, uuid: &str, file_id: &str) -> Result<Vec<u8>, ServiceError> {
        self.versioned(uuid, file_id).map(|s| s.data.clone())
    }

    /// Cover bytes for the version named by `file_id`. A save without a
    /// cover reports not-found.
    pub fn cover(&self, uuid: &str, file_id: &str) -> Result<Vec<u8>, ServiceError> {
        let save = self.versioned(uuid, file_id)?;
        if save.cover.is_empty() {
            return Err(ServiceError::not_found(format!(
                "save {uuid} has no cover"
            )));
        }
        Ok(save.cover.clone())
    }

    fn versioned(&self, uuid: &str, file_id: &str) -> Result<&StoredSave, ServiceError> {
        let save = self
            .saves
            .get(uuid)
            .ok_or_else(|| ServiceError::not_found(format!("no save with uuid {uuid}")))?;
        if save.record.file_id != file_id {
            return Err(ServiceError::not_found(format!(
                "file id {file_id} is stale for save {uuid}"
            )));
        }
        Ok(save)
    }

    /// Quota check for an incoming create or update.
    pub fn check_quota(
        &self,
        payload: &SavePayload,
        replacing: Option<&str>,
        max_saves: usize,
        quota_bytes: u64,
    ) -> Result<(), ServiceError> {
        if replacing.is_none() && self.saves.len() >= max_saves {
            return Err(ServiceError::new(
                error_code::CLOUD_SAVE_FILE_COUNT_LIMIT,
                format!("save count limit of {max_saves} reached"),
            ));
        }

        let incoming =
            payload.data.len() as u64 + payload.cover.as_ref().map_or(0, |c| c.len() as u64);
        let freed = replacing
            .and_then(|uuid| self.saves.get(uuid))
            .map_or(0, |s| s.data.len() as u64 + s.cover.len() as u64);
        if self.stored_bytes() - freed + incoming > quota_bytes {
            return Err(ServiceError::new(
                error_code::CLOUD_SAVE_STORAGE_SIZE_LIMIT,
                format!("storage quota of {quota_bytes} bytes reached"),
            ));
        }
        Ok(())
    }
}

fn unix_seconds() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs() as u32)
}
