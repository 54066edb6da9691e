//! Requests the runtime hands to the platform agent.

use crate::event::EventKind;
use serde::{Deserialize, Serialize};

/// The kind of an asynchronous cloud-save operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// List all saves.
    List,
    /// Create a new save.
    Create,
    /// Update an existing save.
    Update,
    /// Delete a save.
    Delete,
    /// Fetch a save's data file.
    GetData,
    /// Fetch a save's cover file.
    GetCover,
}

impl OperationKind {
    /// The event kind a completion of this operation is delivered under.
    pub fn event_kind(&self) -> EventKind {
        match self {
            OperationKind::List => EventKind::CloudSaveList,
            OperationKind::Create => EventKind::CloudSaveCreate,
            OperationKind::Update => EventKind::CloudSaveUpdate,
            OperationKind::Delete => EventKind::CloudSaveDelete,
            OperationKind::GetData => EventKind::CloudSaveGetData,
            OperationKind::GetCover => EventKind::CloudSaveGetCover,
        }
    }
}

/// Validated save content as sent to the agent.
///
/// File contents are read by the runtime during the synchronous call; the
/// agent never sees host paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavePayload {
    /// Save name.
    pub name: String,
    /// Save description.
    pub summary: String,
    /// Optional developer-defined blob.
    pub extra: Option<String>,
    /// Playtime in seconds.
    pub playtime: u32,
    /// Contents of the data file.
    pub data: Vec<u8>,
    /// Contents of the cover file, if any.
    pub cover: Option<Vec<u8>>,
}

/// Reference to one stored file pair: a save plus its current file id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// Stable save identifier.
    pub uuid: String,
    /// File id from the most recent list/create/update response.
    pub file_id: String,
}

impl FileRef {
    /// Creates a new file reference.
    pub fn new(uuid: impl Into<String>, file_id: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            file_id: file_id.into(),
        }
    }
}

/// A request the runtime submits to the platform agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentRequest {
    /// List all saves for the current user and title.
    List,
    /// Create a new save from the payload.
    Create(SavePayload),
    /// Replace the identified save with the payload.
    Update {
        /// Save to replace.
        uuid: String,
        /// New content.
        payload: SavePayload,
    },
    /// Delete the identified save.
    Delete {
        /// Save to delete.
        uuid: String,
    },
    /// Fetch the data file behind the reference.
    GetData(FileRef),
    /// Fetch the cover file behind the reference.
    GetCover(FileRef),
}

impl AgentRequest {
    /// The operation kind of this request.
    pub fn kind(&self) -> OperationKind {
        match self {
            AgentRequest::List => OperationKind::List,
            AgentRequest::Create(_) => OperationKind::Create,
            AgentRequest::Update { .. } => OperationKind::Update,
            AgentRequest::Delete { .. } => OperationKind::Delete,
            AgentRequest::GetData(_) => OperationKind::GetData,
            AgentRequest::GetCover(_) => OperationKind::GetCover,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_maps_to_event_kind() {
        assert_eq!(
            AgentRequest::List.kind().event_kind(),
            EventKind::CloudSaveList
        );
        assert_eq!(
            AgentRequest::Delete { uuid: "u".into() }.kind().event_kind(),
            EventKind::CloudSaveDelete
        );
        assert_eq!(
            AgentRequest::GetCover(FileRef::new("u", "f")).kind().event_kind(),
            EventKind::CloudSaveGetCover
        );
    }
}
