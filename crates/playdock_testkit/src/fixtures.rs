//! Ready-made saves and on-disk file fixtures.

use playdock_protocol::{CloudSaveRecord, SavePayload};
use std::path::PathBuf;
use tempfile::TempDir;

/// A sample payload with small but non-trivial content.
pub fn sample_payload(name: &str) -> SavePayload {
    SavePayload {
        name: name.to_owned(),
        summary: "autosave before chapter 2".to_owned(),
        extra: Some(r#"{"chapter":2,"difficulty":"hard"}"#.to_owned()),
        playtime: 5400,
        data: vec![0xde, 0xad, 0xbe, 0xef],
        cover: Some(vec![0x89, 0x50, 0x4e, 0x47]),
    }
}

/// A sample record as the platform would return it.
pub fn sample_record(uuid: &str, file_id: &str) -> CloudSaveRecord {
    CloudSaveRecord {
        uuid: uuid.to_owned(),
        file_id: file_id.to_owned(),
        name: "slot 1".to_owned(),
        save_size: 4,
        cover_size: 4,
        summary: Some("autosave before chapter 2".to_owned()),
        extra: None,
        playtime: 5400,
        created_at: 1_700_000_000,
        modified_at: 1_700_000_000,
    }
}

/// A temporary directory holding a save file and a cover file.
///
/// The directory lives as long as the fixture; paths are valid for
/// disk-backed readers.
pub struct SaveFiles {
    dir: TempDir,
    /// Path of the save data file.
    pub save_path: PathBuf,
    /// Path of the cover image file.
    pub cover_path: PathBuf,
}

impl SaveFiles {
    /// Writes `data` and `cover` into a fresh temporary directory.
    ///
    /// # Panics
    ///
    /// Panics if the files cannot be created.
    pub fn new(data: &[u8], cover: &[u8]) -> Self {
        let dir = TempDir::new().expect("failed to create temp directory");
        let save_path = dir.path().join("save.bin");
        let cover_path = dir.path().join("cover.png");
        std::fs::write(&save_path, data).expect("failed to write save file");
        std::fs::write(&cover_path, cover).expect("failed to write cover file");
        Self {
            dir,
            save_path,
            cover_path,
        }
    }

    /// Path of a file that does not exist in the fixture directory.
    pub fn missing_path(&self) -> PathBuf {
        self.dir.path().join("missing.bin")
    }
}
