//! Event kinds and the event union delivered to host callbacks.

use crate::response::{DeleteResponse, FileResponse, ListResponse, SaveResponse};
use serde::{Deserialize, Serialize};

/// The kind of an event, with a stable numeric code.
///
/// Codes are partitioned into reserved bands and never change across
/// versions:
///
/// - `[1, 2000)` platform/session events
/// - `[2001, 4000)` user/auth events
/// - `[4001, 6000)` ownership events
/// - `[6001, 8000)` cloud-save events
///
/// Hosts must ignore codes they do not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Platform connectivity changed.
    SystemStateChanged,
    /// An authorization flow finished.
    AuthorizeFinished,
    /// The base game became playable or unplayable.
    GamePlayableChanged,
    /// A DLC became playable or unplayable.
    DlcPlayableChanged,
    /// A list operation completed.
    CloudSaveList,
    /// A create operation completed.
    CloudSaveCreate,
    /// An update operation completed.
    CloudSaveUpdate,
    /// A delete operation completed.
    CloudSaveDelete,
    /// A data fetch completed.
    CloudSaveGetData,
    /// A cover fetch completed.
    CloudSaveGetCover,
}

impl EventKind {
    /// Returns the stable numeric code of this kind.
    pub fn code(&self) -> u32 {
        match self {
            EventKind::SystemStateChanged => 1,
            EventKind::AuthorizeFinished => 2002,
            EventKind::GamePlayableChanged => 4001,
            EventKind::DlcPlayableChanged => 4002,
            EventKind::CloudSaveList => 6001,
            EventKind::CloudSaveCreate => 6002,
            EventKind::CloudSaveUpdate => 6003,
            EventKind::CloudSaveDelete => 6004,
            EventKind::CloudSaveGetData => 6005,
            EventKind::CloudSaveGetCover => 6006,
        }
    }

    /// Resolves a numeric code back to a kind. Unknown codes yield `None`
    /// and must be ignored by listeners.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(EventKind::SystemStateChanged),
            2002 => Some(EventKind::AuthorizeFinished),
            4001 => Some(EventKind::GamePlayableChanged),
            4002 => Some(EventKind::DlcPlayableChanged),
            6001 => Some(EventKind::CloudSaveList),
            6002 => Some(EventKind::CloudSaveCreate),
            6003 => Some(EventKind::CloudSaveUpdate),
            6004 => Some(EventKind::CloudSaveDelete),
            6005 => Some(EventKind::CloudSaveGetData),
            6006 => Some(EventKind::CloudSaveGetCover),
            _ => None,
        }
    }

    /// Returns true if this kind sits in the cloud-save band.
    pub fn is_cloud_save(&self) -> bool {
        (6001..8000).contains(&self.code())
    }
}

/// Platform connectivity as reported by the platform client.
///
/// Only meaningful once the SDK is ready. `ShuttingDown` is advisory: the
/// platform process is about to exit and the host should persist state and
/// exit promptly, but the SDK session itself stays alive until the host
/// shuts it down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemState {
    /// Connectivity has not been reported yet.
    Unknown,
    /// The platform client can reach its service.
    Online,
    /// The platform client cannot reach its service; entitlement change
    /// notifications (e.g. refunds) are not delivered in this state.
    Offline,
    /// The platform client is about to exit.
    ShuttingDown,
}

/// Token material handed out after a successful authorization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    /// Token type, e.g. `mac`.
    pub token_type: String,
    /// Key identifier.
    pub kid: String,
    /// MAC key.
    pub mac_key: String,
    /// MAC algorithm name.
    pub mac_algorithm: String,
    /// Granted scopes.
    pub scope: String,
}

/// Outcome of an authorization flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizeOutcome {
    /// The user dismissed the flow.
    pub cancelled: bool,
    /// Failure description, `None` on success or cancel.
    pub error: Option<String>,
    /// Token material, present only on success.
    pub token: Option<AuthToken>,
}

/// Playable status of the base game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayableStatus {
    /// Whether the game is currently playable.
    pub is_playable: bool,
}

/// Playable status of one DLC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DlcPlayableStatus {
    /// The DLC in question.
    pub dlc_id: String,
    /// Whether the DLC is currently playable.
    pub is_playable: bool,
}

/// A push notification from the platform that is not tied to a request id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    /// Connectivity changed.
    SystemState(SystemState),
    /// An authorization flow finished.
    AuthorizeFinished(AuthorizeOutcome),
    /// The base game's playable status changed.
    GamePlayable(PlayableStatus),
    /// A DLC's playable status changed.
    DlcPlayable(DlcPlayableStatus),
}

/// An event delivered to registered host callbacks.
///
/// Events are immutable once enqueued and are consumed exactly once, on the
/// thread that pumps the SDK. Cloud-save events echo the caller-supplied
/// request id of the operation they complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Platform connectivity changed.
    SystemStateChanged(SystemState),
    /// An authorization flow finished.
    AuthorizeFinished(AuthorizeOutcome),
    /// The base game's playable status changed.
    GamePlayableChanged(PlayableStatus),
    /// A DLC's playable status changed.
    DlcPlayableChanged(DlcPlayableStatus),
    /// A list operation completed.
    CloudSaveList {
        /// Caller-supplied id of the completed request.
        request_id: i64,
        /// Completion payload.
        response: ListResponse,
    },
    /// A create operation completed.
    CloudSaveCreate {
        /// Caller-supplied id of the completed request.
        request_id: i64,
        /// Completion payload.
        response: SaveResponse,
    },
    /// An update operation completed.
    CloudSaveUpdate {
        /// Caller-supplied id of the completed request.
        request_id: i64,
        /// Completion payload.
        response: SaveResponse,
    },
    /// A delete operation completed.
    CloudSaveDelete {
        /// Caller-supplied id of the completed request.
        request_id: i64,
        /// Completion payload.
        response: DeleteResponse,
    },
    /// A data fetch completed.
    CloudSaveGetData {
        /// Caller-supplied id of the completed request.
        request_id: i64,
        /// Completion payload.
        response: FileResponse,
    },
    /// A cover fetch completed.
    CloudSaveGetCover {
        /// Caller-supplied id of the completed request.
        request_id: i64,
        /// Completion payload.
        response: FileResponse,
    },
}

impl Event {
    /// The kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::SystemStateChanged(_) => EventKind::SystemStateChanged,
            Event::AuthorizeFinished(_) => EventKind::AuthorizeFinished,
            Event::GamePlayableChanged(_) => EventKind::GamePlayableChanged,
            Event::DlcPlayableChanged(_) => EventKind::DlcPlayableChanged,
            Event::CloudSaveList { .. } => EventKind::CloudSaveList,
            Event::CloudSaveCreate { .. } => EventKind::CloudSaveCreate,
            Event::CloudSaveUpdate { .. } => EventKind::CloudSaveUpdate,
            Event::CloudSaveDelete { .. } => EventKind::CloudSaveDelete,
            Event::CloudSaveGetData { .. } => EventKind::CloudSaveGetData,
            Event::CloudSaveGetCover { .. } => EventKind::CloudSaveGetCover,
        }
    }

    /// The request id this event completes, `None` for push notifications.
    pub fn request_id(&self) -> Option<i64> {
        match self {
            Event::CloudSaveList { request_id, .. }
            | Event::CloudSaveCreate { request_id, .. }
            | Event::CloudSaveUpdate { request_id, .. }
            | Event::CloudSaveDelete { request_id, .. }
            | Event::CloudSaveGetData { request_id, .. }
            | Event::CloudSaveGetCover { request_id, .. } => Some(*request_id),
            _ => None,
        }
    }
}

impl From<Notice> for Event {
    fn from(notice: Notice) -> Self {
        match notice {
            Notice::SystemState(state) => Event::SystemStateChanged(state),
            Notice::AuthorizeFinished(outcome) => Event::AuthorizeFinished(outcome),
            Notice::GamePlayable(status) => Event::GamePlayableChanged(status),
            Notice::DlcPlayable(status) => Event::DlcPlayableChanged(status),
        }
    }
}
