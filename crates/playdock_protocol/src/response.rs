//! Completion payloads delivered by the platform agent.

use crate::error::ServiceError;
use crate::event::Event;
use crate::record::CloudSaveRecord;
use crate::request::OperationKind;
use serde::{Deserialize, Serialize};

/// Completion of a list operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResponse {
    /// Set when the operation failed.
    pub error: Option<ServiceError>,
    /// All saves for the current user, empty on failure.
    pub saves: Vec<CloudSaveRecord>,
}

impl ListResponse {
    /// Creates a successful list response.
    pub fn ok(saves: Vec<CloudSaveRecord>) -> Self {
        Self { error: None, saves }
    }

    /// Creates a failed list response.
    pub fn err(error: ServiceError) -> Self {
        Self {
            error: Some(error),
            saves: Vec::new(),
        }
    }
}

/// Completion of a create or update operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    /// Set when the operation failed.
    pub error: Option<ServiceError>,
    /// The stored record, `None` on failure.
    pub save: Option<CloudSaveRecord>,
}

impl SaveResponse {
    /// Creates a successful save response.
    pub fn ok(save: CloudSaveRecord) -> Self {
        Self {
            error: None,
            save: Some(save),
        }
    }

    /// Creates a failed save response.
    pub fn err(error: ServiceError) -> Self {
        Self {
            error: Some(error),
            save: None,
        }
    }
}

/// Completion of a delete operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Set when the operation failed.
    pub error: Option<ServiceError>,
    /// The deleted save's identifier.
    pub uuid: String,
}

impl DeleteResponse {
    /// Creates a successful delete response.
    pub fn ok(uuid: impl Into<String>) -> Self {
        Self {
            error: None,
            uuid: uuid.into(),
        }
    }

    /// Creates a failed delete response.
    pub fn err(uuid: impl Into<String>, error: ServiceError) -> Self {
        Self {
            error: Some(error),
            uuid: uuid.into(),
        }
    }
}

/// Completion of a data or cover fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileResponse {
    /// Set when the operation failed.
    pub error: Option<ServiceError>,
    /// File contents, empty on failure.
    pub data: Vec<u8>,
}

impl FileResponse {
    /// Creates a successful file response.
    pub fn ok(data: Vec<u8>) -> Self {
        Self { error: None, data }
    }

    /// Creates a failed file response.
    pub fn err(error: ServiceError) -> Self {
        Self {
            error: Some(error),
            data: Vec::new(),
        }
    }
}

/// A completion delivered by the agent, routed by tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationResponse {
    /// List completion.
    List(ListResponse),
    /// Create completion.
    Create(SaveResponse),
    /// Update completion.
    Update(SaveResponse),
    /// Delete completion.
    Delete(DeleteResponse),
    /// Data fetch completion.
    GetData(FileResponse),
    /// Cover fetch completion.
    GetCover(FileResponse),
}

impl OperationResponse {
    /// The operation kind this response completes.
    pub fn kind(&self) -> OperationKind {
        match self {
            OperationResponse::List(_) => OperationKind::List,
            OperationResponse::Create(_) => OperationKind::Create,
            OperationResponse::Update(_) => OperationKind::Update,
            OperationResponse::Delete(_) => OperationKind::Delete,
            OperationResponse::GetData(_) => OperationKind::GetData,
            OperationResponse::GetCover(_) => OperationKind::GetCover,
        }
    }

    /// The service error carried by this response, if any.
    pub fn error(&self) -> Option<&ServiceError> {
        match self {
            OperationResponse::List(r) => r.error.as_ref(),
            OperationResponse::Create(r) | OperationResponse::Update(r) => r.error.as_ref(),
            OperationResponse::Delete(r) => r.error.as_ref(),
            OperationResponse::GetData(r) | OperationResponse::GetCover(r) => r.error.as_ref(),
        }
    }

    /// Converts this completion into the event delivered to listeners,
    /// echoing the caller-supplied request id.
    pub fn into_event(self, request_id: i64) -> Event {
        match self {
            OperationResponse::List(response) => Event::CloudSaveList {
                request_id,
                response,
            },
            OperationResponse::Create(response) => Event::CloudSaveCreate {
                request_id,
                response,
            },
            OperationResponse::Update(response) => Event::CloudSaveUpdate {
                request_id,
                response,
            },
            OperationResponse::Delete(response) => Event::CloudSaveDelete {
                request_id,
                response,
            },
            OperationResponse::GetData(response) => Event::CloudSaveGetData {
                request_id,
                response,
            },
            OperationResponse::GetCover(response) => Event::CloudSaveGetCover {
                request_id,
                response,
            },
        }
    }
}
