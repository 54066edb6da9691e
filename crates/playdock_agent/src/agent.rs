//! Request handling for the in-process agent.

use crate::config::AgentConfig;
use crate::store::SaveStore;
use parking_lot::Mutex;
use playdock_protocol::{
    AgentRequest, AuthToken, AuthorizeOutcome, DeleteResponse, FileResponse, ListResponse,
    OperationResponse, SaveResponse,
};
use std::collections::HashSet;

/// An in-process platform agent.
///
/// Serves the same request surface a real platform client would, backed
/// by in-memory storage. Handlers are synchronous and return the
/// completion directly; callers that want asynchronous delivery wrap the
/// agent in their own transport.
pub struct Agent {
    config: AgentConfig,
    store: Mutex<SaveStore>,
    game_owned: Mutex<bool>,
    owned_dlcs: Mutex<HashSet<String>>,
}

impl Agent {
    /// Creates an agent with empty storage.
    pub fn new(config: AgentConfig) -> Self {
        Self {
            config,
            store: Mutex::new(SaveStore::new()),
            game_owned: Mutex::new(true),
            owned_dlcs: Mutex::new(HashSet::new()),
        }
    }

    /// Identity of the signed-in user.
    pub fn open_id(&self) -> &str {
        &self.config.open_id
    }

    /// Serves one cloud-save request.
    pub fn handle(&self, request: AgentRequest) -> OperationResponse {
        match request {
            AgentRequest::List => OperationResponse::List(self.handle_list()),
            AgentRequest::Create(payload) => {
                OperationResponse::Create(self.handle_create(payload))
            }
            AgentRequest::Update { uuid, payload } => {
                OperationResponse::Update(self.handle_update(&uuid, payload))
            }
            AgentRequest::Delete { uuid } => OperationResponse::Delete(self.handle_delete(&uuid)),
            AgentRequest::GetData(file) => {
                OperationResponse::GetData(self.handle_get_data(&file.uuid, &file.file_id))
            }
            AgentRequest::GetCover(file) => {
                OperationResponse::GetCover(self.handle_get_cover(&file.uuid, &file.file_id))
            }
        }
    }

    fn handle_list(&self) -> ListResponse {
        ListResponse::ok(self.store.lock().list())
    }

    fn handle_create(&self, payload: playdock_protocol::SavePayload) -> SaveResponse {
        let mut store = self.store.lock();
        if let Err(err) = store.check_quota(
            &payload,
            None,
            self.config.max_saves,
            self.config.storage_quota_bytes,
        ) {
            return SaveResponse::err(err);
        }
        SaveResponse::ok(store.create(payload))
    }

    fn handle_update(&self, uuid: &str, payload: playdock_protocol::SavePayload) -> SaveResponse {
        let mut store = self.store.lock();
        if let Err(err) = store.check_quota(
            &payload,
            Some(uuid),
            self.config.max_saves,
            self.config.storage_quota_bytes,
        ) {
            return SaveResponse::err(err);
        }
        match store.update(uuid, payload) {
            Ok(record) => SaveResponse::ok(record),
            Err(err) => SaveResponse::err(err),
        }
    }

    fn handle_delete(&self, uuid: &str) -> DeleteResponse {
        match self.store.lock().delete(uuid) {
            Ok(()) => DeleteResponse::ok(uuid),
            Err(err) => DeleteResponse::err(uuid, err),
        }
    }

    fn handle_get_data(&self, uuid: &str, file_id: &str) -> FileResponse {
        match self.store.lock().data(uuid, file_id) {
            Ok(data) => FileResponse::ok(data),
            Err(err) => FileResponse::err(err),
        }
    }

    fn handle_get_cover(&self, uuid: &str, file_id: &str) -> FileResponse {
        match self.store.lock().cover(uuid, file_id) {
            Ok(data) => FileResponse::ok(data),
            Err(err) => FileResponse::err(err),
        }
    }

    /// Serves an authorization request, granting every scope asked for.
    pub fn handle_authorize(&self, scopes: &[&str]) -> AuthorizeOutcome {
        AuthorizeOutcome {
            cancelled: false,
            error: None,
            token: Some(AuthToken {
                token_type: "mac".to_owned(),
                kid: format!("kid-{}", self.config.open_id),
                mac_key: "test-mac-key".to_owned(),
                mac_algorithm: "hmac-sha-256".to_owned(),
                scope: scopes.join(" "),
            }),
        }
    }

    /// Sets whether the user owns the base game.
    pub fn set_game_owned(&self, owned: bool) {
        *self.game_owned.lock() = owned;
    }

    /// Whether the user owns the base game.
    pub fn is_game_owned(&self) -> bool {
        *self.game_owned.lock()
    }

    /// Grants the user a DLC.
    pub fn grant_dlc(&self, dlc_id: impl Into<String>) {
        self.owned_dlcs.lock().insert(dlc_id.into());
    }

    /// Revokes a previously granted DLC.
    pub fn revoke_dlc(&self, dlc_id: &str) {
        self.owned_dlcs.lock().remove(dlc_id);
    }

    /// Whether the user owns the given DLC.
    pub fn is_dlc_owned(&self, dlc_id: &str) -> bool {
        self.owned_dlcs.lock().contains(dlc_id)
    }

    /// Number of saves currently stored.
    pub fn save_count(&self) -> usize {
        self.store.lock().len()
    }
}
