//! Cloud-save submission surface.
//!
//! Every operation here is asynchronous in the request/response sense: a
//! successful return means the request was admitted, and the result
//! arrives later as an event carrying the same caller-supplied id.
//! Admission failures (bad arguments, unreadable files, duplicate ids,
//! transport refusal) are returned directly and produce no event.

use crate::config::{SdkConfig, MAX_EXTRA_BYTES, MAX_NAME_BYTES, MAX_SUMMARY_BYTES};
use crate::error::{SdkResult, SubmitError};
use crate::fs::SaveFileReader;
use crate::tracker::{Rejection, RequestTracker};
use crate::transport::PlatformTransport;
use playdock_protocol::{AgentRequest, FileRef, SavePayload};
use std::path::PathBuf;

/// Describes a save to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSaveRequest {
    /// Display name, ASCII, at most 60 bytes.
    pub name: String,
    /// Short description, at most 500 bytes.
    pub summary: String,
    /// Free-form metadata, at most 1000 bytes.
    pub extra: Option<String>,
    /// Accumulated play time in seconds.
    pub playtime: u32,
    /// Path of the save data file.
    pub save_path: PathBuf,
    /// Path of an optional cover image.
    pub cover_path: Option<PathBuf>,
}

impl CreateSaveRequest {
    /// Creates a request with the required fields.
    pub fn new(name: impl Into<String>, summary: impl Into<String>, save_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            summary: summary.into(),
            extra: None,
            playtime: 0,
            save_path: save_path.into(),
            cover_path: None,
        }
    }

    /// Attaches free-form metadata.
    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }

    /// Records play time in seconds.
    pub fn with_playtime(mut self, playtime: u32) -> Self {
        self.playtime = playtime;
        self
    }

    /// Attaches a cover image.
    pub fn with_cover(mut self, cover_path: impl Into<PathBuf>) -> Self {
        self.cover_path = Some(cover_path.into());
        self
    }
}

/// Describes the replacement content for an existing save.
///
/// Same shape as [`CreateSaveRequest`]; an update rewrites the save's
/// data and metadata wholesale and rotates its file id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSaveRequest {
    /// Display name, ASCII, at most 60 bytes.
    pub name: String,
    /// Short description, at most 500 bytes.
    pub summary: String,
    /// Free-form metadata, at most 1000 bytes.
    pub extra: Option<String>,
    /// Accumulated play time in seconds.
    pub playtime: u32,
    /// Path of the save data file.
    pub save_path: PathBuf,
    /// Path of an optional cover image.
    pub cover_path: Option<PathBuf>,
}

impl UpdateSaveRequest {
    /// Creates a request with the required fields.
    pub fn new(name: impl Into<String>, summary: impl Into<String>, save_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            summary: summary.into(),
            extra: None,
            playtime: 0,
            save_path: save_path.into(),
            cover_path: None,
        }
    }

    /// Attaches free-form metadata.
    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }

    /// Records play time in seconds.
    pub fn with_playtime(mut self, playtime: u32) -> Self {
        self.playtime = playtime;
        self
    }

    /// Attaches a cover image.
    pub fn with_cover(mut self, cover_path: impl Into<PathBuf>) -> Self {
        self.cover_path = Some(cover_path.into());
        self
    }
}

/// Cloud-save operations, scoped view over the runtime.
pub struct CloudSaves<'a, T: PlatformTransport, R: SaveFileReader> {
    pub(crate) config: &'a SdkConfig,
    pub(crate) reader: &'a R,
    pub(crate) tracker: &'a RequestTracker,
    pub(crate) transport: &'a T,
}

impl<T: PlatformTransport, R: SaveFileReader> CloudSaves<'_, T, R> {
    /// Requests the list of all saves for the current user. Completes
    /// with a [`CloudSaveList`](playdock_protocol::EventKind::CloudSaveList)
    /// event.
    pub fn list(&self, request_id: i64) -> SdkResult<()> {
        self.admit(request_id, AgentRequest::List)
    }

    /// Uploads a new save. Completes with a
    /// [`CloudSaveCreate`](playdock_protocol::EventKind::CloudSaveCreate)
    /// event carrying the stored record.
    pub fn create(&self, request_id: i64, request: CreateSaveRequest) -> SdkResult<()> {
        let payload = self.load_payload(
            request.name,
            request.summary,
            request.extra,
            request.playtime,
            request.save_path,
            request.cover_path,
        )?;
        self.admit(request_id, AgentRequest::Create(payload))
    }

    /// Replaces an existing save's content and metadata. Completes with a
    /// [`CloudSaveUpdate`](playdock_protocol::EventKind::CloudSaveUpdate)
    /// event carrying the rewritten record, including its new file id.
    pub fn update(
        &self,
        request_id: i64,
        uuid: impl Into<String>,
        request: UpdateSaveRequest,
    ) -> SdkResult<()> {
        let uuid = uuid.into();
        if uuid.is_empty() {
            return Err(SubmitError::invalid_argument("save uuid must not be empty"));
        }
        let payload = self.load_payload(
            request.name,
            request.summary,
            request.extra,
            request.playtime,
            request.save_path,
            request.cover_path,
        )?;
        self.admit(request_id, AgentRequest::Update { uuid, payload })
    }

    /// Deletes a save. Completes with a
    /// [`CloudSaveDelete`](playdock_protocol::EventKind::CloudSaveDelete)
    /// event echoing the uuid.
    pub fn delete(&self, request_id: i64, uuid: impl Into<String>) -> SdkResult<()> {
        let uuid = uuid.into();
        if uuid.is_empty() {
            return Err(SubmitError::invalid_argument("save uuid must not be empty"));
        }
        self.admit(request_id, AgentRequest::Delete { uuid })
    }

    /// Downloads a save's data. The file id pins the content version: if
    /// the save was rewritten since the id was obtained, the agent
    /// reports not-found in the completion.
    pub fn get_data(&self, request_id: i64, file: FileRef) -> SdkResult<()> {
        Self::check_file_ref(&file)?;
        self.admit(request_id, AgentRequest::GetData(file))
    }

    /// Downloads a save's cover image. Same file-id pinning as
    /// [`get_data`](Self::get_data).
    pub fn get_cover(&self, request_id: i64, file: FileRef) -> SdkResult<()> {
        Self::check_file_ref(&file)?;
        self.admit(request_id, AgentRequest::GetCover(file))
    }

    fn check_file_ref(file: &FileRef) -> SdkResult<()> {
        if file.uuid.is_empty() {
            return Err(SubmitError::invalid_argument("save uuid must not be empty"));
        }
        if file.file_id.is_empty() {
            return Err(SubmitError::invalid_argument("file id must not be empty"));
        }
        Ok(())
    }

    /// Validates metadata and reads the save and cover files.
    fn load_payload(
        &self,
        name: String,
        summary: String,
        extra: Option<String>,
        playtime: u32,
        save_path: PathBuf,
        cover_path: Option<PathBuf>,
    ) -> Result<SavePayload, SubmitError> {
        if name.is_empty() {
            return Err(SubmitError::invalid_argument("save name must not be empty"));
        }
        if name.len() > MAX_NAME_BYTES {
            return Err(SubmitError::invalid_argument(format!(
                "save name exceeds {MAX_NAME_BYTES} bytes"
            )));
        }
        if !name.is_ascii() {
            return Err(SubmitError::invalid_argument(
                "save name must be ASCII",
            ));
        }
        if summary.is_empty() {
            return Err(SubmitError::invalid_argument(
                "save summary must not be empty",
            ));
        }
        if summary.len() > MAX_SUMMARY_BYTES {
            return Err(SubmitError::invalid_argument(format!(
                "save summary exceeds {MAX_SUMMARY_BYTES} bytes"
            )));
        }
        if let Some(extra) = &extra {
            if extra.len() > MAX_EXTRA_BYTES {
                return Err(SubmitError::invalid_argument(format!(
                    "save extra exceeds {MAX_EXTRA_BYTES} bytes"
                )));
            }
        }

        let data = self
            .reader
            .read(&save_path)
            .map_err(SubmitError::SaveFileRead)?;
        if data.len() as u64 > self.config.max_save_bytes {
            return Err(SubmitError::SaveFileTooLarge {
                size: data.len() as u64,
                limit: self.config.max_save_bytes,
            });
        }

        let cover = match cover_path {
            Some(path) => {
                let bytes = self.reader.read(&path).map_err(SubmitError::CoverFileRead)?;
                if bytes.len() as u64 > self.config.max_cover_bytes {
                    return Err(SubmitError::CoverFileTooLarge {
                        size: bytes.len() as u64,
                        limit: self.config.max_cover_bytes,
                    });
                }
                Some(bytes)
            }
            None => None,
        };

        Ok(SavePayload {
            name,
            summary,
            extra,
            playtime,
            data,
            cover,
        })
    }

    /// Reserves the id, then hands the request to the agent. A transport
    /// refusal releases the id so the caller can retry with it.
    fn admit(&self, request_id: i64, request: AgentRequest) -> SdkResult<()> {
        let kind = request.kind();
        match self.tracker.submit(request_id, kind) {
            Ok(()) => {}
            Err(Rejection::NotReady) => return Err(SubmitError::Uninitialized),
            Err(Rejection::DuplicateInFlight) => {
                return Err(SubmitError::DuplicateRequestId(request_id))
            }
        }
        if let Err(failure) = self.transport.submit(request_id, request) {
            self.tracker.rollback(request_id);
            tracing::warn!(request_id, ?kind, %failure, "transport refused request");
            return Err(failure.into());
        }
        tracing::debug!(request_id, ?kind, "request admitted");
        Ok(())
    }
}
