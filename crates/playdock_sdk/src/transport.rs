//! The boundary between the runtime and the platform agent.

use crate::error::{InitError, SubmitFailure};
use crate::queue::EventQueue;
use crate::session::SessionState;
use crate::tracker::RequestTracker;
use parking_lot::Mutex;
use playdock_protocol::{AgentRequest, Notice, OperationResponse};
use std::sync::Arc;

/// Facts established during the connection handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectInfo {
    /// Platform identity of the signed-in user.
    pub open_id: String,
}

/// Hand-off point for agent deliveries.
///
/// The runtime attaches one sink to the transport after a successful
/// connect. Delivery threads push through it; the sink routes correlated
/// completions through the tracker and uncorrelated notices straight to
/// the queue. Nothing here calls back into user code, so deliveries never
/// block on a listener.
#[derive(Clone)]
pub struct DeliverySink {
    session: Arc<SessionState>,
    tracker: Arc<RequestTracker>,
    queue: Arc<EventQueue>,
}

impl DeliverySink {
    /// Creates a sink over the runtime's shared state.
    pub fn new(
        session: Arc<SessionState>,
        tracker: Arc<RequestTracker>,
        queue: Arc<EventQueue>,
    ) -> Self {
        Self {
            session,
            tracker,
            queue,
        }
    }

    /// Delivers a correlated completion. Ignored if the runtime has shut
    /// down or the id matches no pending request.
    pub fn complete(&self, request_id: i64, response: OperationResponse) {
        if self.session.phase().is_terminal() {
            tracing::debug!(request_id, "dropping completion after shutdown");
            return;
        }
        self.tracker.complete(request_id, response);
    }

    /// Delivers an uncorrelated notice.
    pub fn notify(&self, notice: Notice) {
        if self.session.phase().is_terminal() {
            return;
        }
        self.queue.push(notice.into());
    }
}

/// Connection to the platform agent.
///
/// Implementations own their delivery mechanism (a socket reader thread,
/// an in-process worker, a test double) and push everything they receive
/// into the attached [`DeliverySink`].
pub trait PlatformTransport: Send + Sync {
    /// True when the process was not started by the platform and must be
    /// relaunched through it. Checked before any handshake.
    fn relaunch_required(&self, client_id: &str) -> bool;

    /// Performs the handshake with the agent.
    fn connect(&self, client_id: &str, pub_key: &str) -> Result<ConnectInfo, InitError>;

    /// Installs the sink deliveries flow through. Called once, between a
    /// successful `connect` and the first `submit`.
    fn attach(&self, sink: DeliverySink);

    /// Hands an admitted cloud-save request to the agent. Failure here is
    /// an admission failure; the request will produce no completion.
    fn submit(&self, request_id: i64, request: AgentRequest) -> Result<(), SubmitFailure>;

    /// Starts the interactive authorization flow. The outcome arrives as
    /// a [`Notice::AuthorizeFinished`] delivery.
    fn begin_authorize(&self, scopes: &[&str]) -> Result<(), SubmitFailure>;

    /// Platform identity of the signed-in user.
    fn open_id(&self) -> Option<String>;

    /// Whether the current user owns the base game.
    fn is_game_owned(&self) -> bool;

    /// Whether the current user owns the given DLC.
    fn is_dlc_owned(&self, dlc_id: &str) -> bool;

    /// Opens the platform's store page for the given DLC.
    fn show_dlc_store(&self, dlc_id: &str) -> Result<(), SubmitFailure>;

    /// Tears the connection down. Deliveries after this are discarded.
    fn close(&self);
}

/// Scripted transport for unit tests.
///
/// Each agent-facing call records its arguments and returns whatever the
/// test configured. Deliveries are pushed manually with
/// [`deliver`](MockTransport::deliver) and
/// [`deliver_notice`](MockTransport::deliver_notice).
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<MockInner>,
}

struct MockInner {
    relaunch: Mutex<bool>,
    connect_response: Mutex<Option<Result<ConnectInfo, InitError>>>,
    submit_response: Mutex<Result<(), SubmitFailure>>,
    authorize_response: Mutex<Result<(), SubmitFailure>>,
    game_owned: Mutex<bool>,
    owned_dlcs: Mutex<Vec<String>>,
    sink: Mutex<Option<DeliverySink>>,
    submitted: Mutex<Vec<(i64, AgentRequest)>>,
    closed: Mutex<bool>,
}

impl Default for MockInner {
    fn default() -> Self {
        Self {
            relaunch: Mutex::new(false),
            connect_response: Mutex::new(None),
            submit_response: Mutex::new(Ok(())),
            authorize_response: Mutex::new(Ok(())),
            game_owned: Mutex::new(false),
            owned_dlcs: Mutex::new(Vec::new()),
            sink: Mutex::new(None),
            submitted: Mutex::new(Vec::new()),
            closed: Mutex::new(false),
        }
    }
}

impl MockTransport {
    /// Creates a mock that connects successfully and accepts every submit.
    pub fn new() -> Self {
        let mock = Self::default();
        mock.set_connect_response(Ok(ConnectInfo {
            open_id: "open-id-test".to_owned(),
        }));
        mock
    }

    /// Scripts the next `connect` result.
    pub fn set_connect_response(&self, response: Result<ConnectInfo, InitError>) {
        *self.inner.connect_response.lock() = Some(response);
    }

    /// Scripts every subsequent `submit` result.
    pub fn set_submit_response(&self, response: Result<(), SubmitFailure>) {
        *self.inner.submit_response.lock() = response;
    }

    /// Scripts every subsequent `begin_authorize` result.
    pub fn set_authorize_response(&self, response: Result<(), SubmitFailure>) {
        *self.inner.authorize_response.lock() = response;
    }

    /// Scripts `relaunch_required`.
    pub fn set_relaunch_required(&self, required: bool) {
        *self.inner.relaunch.lock() = required;
    }

    /// Scripts `is_game_owned`.
    pub fn set_game_owned(&self, owned: bool) {
        *self.inner.game_owned.lock() = owned;
    }

    /// Scripts `is_dlc_owned` for one DLC id.
    pub fn add_owned_dlc(&self, dlc_id: impl Into<String>) {
        self.inner.owned_dlcs.lock().push(dlc_id.into());
    }

    /// Pushes a correlated completion through the attached sink.
    ///
    /// # Panics
    ///
    /// Panics if no sink has been attached.
    pub fn deliver(&self, request_id: i64, response: OperationResponse) {
        let sink = self.inner.sink.lock();
        sink.as_ref()
            .expect("no sink attached")
            .complete(request_id, response);
    }

    /// Pushes an uncorrelated notice through the attached sink.
    ///
    /// # Panics
    ///
    /// Panics if no sink has been attached.
    pub fn deliver_notice(&self, notice: Notice) {
        let sink = self.inner.sink.lock();
        sink.as_ref().expect("no sink attached").notify(notice);
    }

    /// Requests handed over so far, in submission order.
    pub fn submitted(&self) -> Vec<(i64, AgentRequest)> {
        self.inner.submitted.lock().clone()
    }

    /// True once `close` has been called.
    pub fn is_closed(&self) -> bool {
        *self.inner.closed.lock()
    }
}

impl PlatformTransport for MockTransport {
    fn relaunch_required(&self, _client_id: &str) -> bool {
        *self.inner.relaunch.lock()
    }

    fn connect(&self, _client_id: &str, _pub_key: &str) -> Result<ConnectInfo, InitError> {
        self.inner
            .connect_response
            .lock()
            .take()
            .unwrap_or_else(|| {
                Ok(ConnectInfo {
                    open_id: "open-id-test".to_owned(),
                })
            })
    }

    fn attach(&self, sink: DeliverySink) {
        *self.inner.sink.lock() = Some(sink);
    }

    fn submit(&self, request_id: i64, request: AgentRequest) -> Result<(), SubmitFailure> {
        self.inner.submit_response.lock().clone()?;
        self.inner.submitted.lock().push((request_id, request));
        Ok(())
    }

    fn begin_authorize(&self, _scopes: &[&str]) -> Result<(), SubmitFailure> {
        self.inner.authorize_response.lock().clone()
    }

    fn open_id(&self) -> Option<String> {
        Some("open-id-test".to_owned())
    }

    fn is_game_owned(&self) -> bool {
        *self.inner.game_owned.lock()
    }

    fn is_dlc_owned(&self, dlc_id: &str) -> bool {
        self.inner.owned_dlcs.lock().iter().any(|d| d == dlc_id)
    }

    fn show_dlc_store(&self, _dlc_id: &str) -> Result<(), SubmitFailure> {
        Ok(())
    }

    fn close(&self) {
        *self.inner.closed.lock() = true;
    }
}
