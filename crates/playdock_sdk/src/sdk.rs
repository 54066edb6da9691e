//! The top-level runtime handle.

use crate::cloudsave::CloudSaves;
use crate::config::SdkConfig;
use crate::error::{AuthorizeError, InitError, InitFailure, SdkResult, SubmitError};
use crate::fs::{DiskReader, SaveFileReader};
use crate::queue::EventQueue;
use crate::registry::{CallbackRegistry, Listener, ListenerId};
use crate::session::SessionState;
use crate::tracker::RequestTracker;
use crate::transport::{DeliverySink, PlatformTransport};
use playdock_protocol::{Event, EventKind, SystemState};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Handle to an initialized platform session.
///
/// Construction performs the agent handshake; the handle is the proof
/// that it succeeded. All event delivery happens inside [`pump`](Sdk::pump),
/// on whichever thread calls it. The handle itself is `Send + Sync`, so
/// submissions may come from any thread, but listeners only ever run
/// under `pump`.
pub struct Sdk<T: PlatformTransport, R: SaveFileReader = DiskReader> {
    config: SdkConfig,
    transport: T,
    reader: R,
    session: Arc<SessionState>,
    queue: Arc<EventQueue>,
    tracker: Arc<RequestTracker>,
    registry: CallbackRegistry,
    authorize_in_flight: AtomicBool,
    open_id: String,
}

impl<T: PlatformTransport> Sdk<T> {
    /// True when the process must be relaunched through the platform.
    /// Games check this before [`init`](Sdk::init) and exit if set.
    pub fn relaunch_required(transport: &T, config: &SdkConfig) -> bool {
        transport.relaunch_required(&config.client_id)
    }

    /// Connects to the platform agent and starts the session, reading
    /// save files from the local filesystem.
    pub fn init(config: SdkConfig, transport: T) -> Result<Self, InitError> {
        Self::init_with_reader(config, transport, DiskReader)
    }
}

impl<T: PlatformTransport, R: SaveFileReader> Sdk<T, R> {
    /// Connects to the platform agent with a custom file reader.
    pub fn init_with_reader(
        config: SdkConfig,
        transport: T,
        reader: R,
    ) -> Result<Self, InitError> {
        if transport.relaunch_required(&config.client_id) {
            return Err(InitError::failed(
                InitFailure::NotLaunchedByPlatform,
                "process was not started by the platform",
            ));
        }

        let info = transport.connect(&config.client_id, &config.pub_key)?;
        tracing::info!(client_id = %config.client_id, open_id = %info.open_id, "connected to platform agent");

        let session = Arc::new(SessionState::new());
        let queue = Arc::new(EventQueue::new(config.queue_capacity));
        let tracker = Arc::new(RequestTracker::new(
            Arc::clone(&session),
            Arc::clone(&queue),
        ));
        transport.attach(DeliverySink::new(
            Arc::clone(&session),
            Arc::clone(&tracker),
            Arc::clone(&queue),
        ));
        session.mark_ready();

        Ok(Self {
            config,
            transport,
            reader,
            session,
            queue,
            tracker,
            registry: CallbackRegistry::new(),
            authorize_in_flight: AtomicBool::new(false),
            open_id: info.open_id,
        })
    }

    /// Drains and dispatches every event queued since the previous call.
    /// Returns the number of events dispatched.
    ///
    /// The batch is a snapshot: events that arrive while listeners run
    /// wait for the next pump. Registration changes made by listeners
    /// take effect at the start of the next pump.
    ///
    /// Listeners must not call `pump` themselves. The dispatch table is
    /// locked for the duration of the batch and the lock is not
    /// reentrant, so a nested pump deadlocks. [`register`](Sdk::register)
    /// and [`unregister`](Sdk::unregister) remain safe from listeners.
    pub fn pump(&self) -> usize {
        if !self.session.is_ready() {
            return 0;
        }
        self.registry.apply_pending();
        let batch = self.queue.drain();
        for event in &batch {
            self.apply_side_effects(event);
            self.registry.dispatch(event);
        }
        batch.len()
    }

    /// State updates an event implies, applied before listeners see it
    /// so accessors reflect the event being dispatched.
    fn apply_side_effects(&self, event: &Event) {
        match event {
            Event::SystemStateChanged(state) => self.session.set_connectivity(*state),
            Event::AuthorizeFinished(_) => {
                self.authorize_in_flight.store(false, Ordering::SeqCst);
            }
            _ => {}
        }
    }

    /// Registers a listener for one event kind. The listener starts
    /// receiving events at the next pump.
    pub fn register(&self, kind: EventKind, listener: Listener) -> ListenerId {
        self.registry.register(kind, listener)
    }

    /// Removes a listener. Unknown tokens are ignored. Takes effect at
    /// the next pump.
    pub fn unregister(&self, id: ListenerId) {
        self.registry.unregister(id);
    }

    /// Cloud-save operations.
    pub fn cloud_saves(&self) -> CloudSaves<'_, T, R> {
        CloudSaves {
            config: &self.config,
            reader: &self.reader,
            tracker: &self.tracker,
            transport: &self.transport,
        }
    }

    /// Starts the interactive authorization flow. At most one flow may be
    /// in flight; the outcome arrives as an
    /// [`AuthorizeFinished`](EventKind::AuthorizeFinished) event, which
    /// also releases the single-flight guard.
    pub fn authorize(&self, scopes: &[&str]) -> Result<(), AuthorizeError> {
        if !self.session.is_ready() {
            return Err(AuthorizeError::NotReady);
        }
        if self
            .authorize_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AuthorizeError::AlreadyInFlight);
        }
        if let Err(failure) = self.transport.begin_authorize(scopes) {
            self.authorize_in_flight.store(false, Ordering::SeqCst);
            return Err(AuthorizeError::Transport(failure));
        }
        Ok(())
    }

    /// Platform identity of the signed-in user.
    pub fn open_id(&self) -> &str {
        &self.open_id
    }

    /// Client id the session was started with.
    pub fn client_id(&self) -> &str {
        &self.config.client_id
    }

    /// Whether the current user owns the base game. Synchronous; answered
    /// from the agent's local entitlement cache.
    pub fn is_game_owned(&self) -> bool {
        self.session.is_ready() && self.transport.is_game_owned()
    }

    /// Whether the current user owns the given DLC.
    pub fn is_dlc_owned(&self, dlc_id: &str) -> bool {
        self.session.is_ready() && self.transport.is_dlc_owned(dlc_id)
    }

    /// Opens the platform's store page for the given DLC.
    pub fn show_dlc_store(&self, dlc_id: &str) -> SdkResult<()> {
        if !self.session.is_ready() {
            return Err(SubmitError::Uninitialized);
        }
        self.transport.show_dlc_store(dlc_id).map_err(Into::into)
    }

    /// Last connectivity state reported by the agent.
    pub fn connectivity(&self) -> SystemState {
        self.session.connectivity()
    }

    /// Number of events dropped because the queue was full.
    pub fn dropped_events(&self) -> u64 {
        self.queue.dropped()
    }

    /// Client configuration the session was started with.
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Ends the session. Returns true if this call performed the
    /// shutdown, false if the session was already shut down.
    ///
    /// Pending requests are abandoned and never complete, undispatched
    /// events are discarded, and listeners are dropped. Subsequent
    /// submissions fail with [`SubmitError::Uninitialized`]; subsequent
    /// pumps dispatch nothing.
    pub fn shutdown(&self) -> bool {
        if !self.session.mark_shut_down() {
            return false;
        }
        self.transport.close();
        let abandoned = self.tracker.abandon_all();
        self.queue.clear();
        self.registry.clear();
        tracing::info!(abandoned, "session shut down");
        true
    }
}

impl<T: PlatformTransport, R: SaveFileReader> Drop for Sdk<T, R> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SubmitFailure;
    use crate::transport::MockTransport;
    use playdock_protocol::{
        AuthorizeOutcome, ListResponse, Notice, OperationResponse, PlayableStatus,
    };
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex as StdMutex;

    fn sdk() -> Sdk<MockTransport> {
        Sdk::init(SdkConfig::new("client-1", "pubkey"), MockTransport::new()).unwrap()
    }

    #[test]
    fn init_fails_when_relaunch_required() {
        let transport = MockTransport::new();
        transport.set_relaunch_required(true);
        assert!(Sdk::relaunch_required(
            &transport,
            &SdkConfig::new("client-1", "pubkey")
        ));

        let err = Sdk::init(SdkConfig::new("client-1", "pubkey"), transport)
            .err()
            .unwrap();
        assert_eq!(err.reason(), InitFailure::NotLaunchedByPlatform);
    }

    #[test]
    fn init_surfaces_handshake_failure() {
        let transport = MockTransport::new();
        transport.set_connect_response(Err(InitError::failed(
            InitFailure::NoPlatform,
            "agent not running",
        )));

        let err = Sdk::init(SdkConfig::new("client-1", "pubkey"), transport)
            .err()
            .unwrap();
        assert_eq!(err.reason(), InitFailure::NoPlatform);
    }

    #[test]
    fn pump_dispatches_queued_events_in_order() {
        let sdk = sdk();
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        sdk.register(
            EventKind::CloudSaveList,
            Box::new(move |event| sink.lock().unwrap().push(event.request_id())),
        );

        sdk.cloud_saves().list(1).unwrap();
        sdk.cloud_saves().list(2).unwrap();
        sdk.transport
            .deliver(1, OperationResponse::List(ListResponse::ok(Vec::new())));
        sdk.transport
            .deliver(2, OperationResponse::List(ListResponse::ok(Vec::new())));

        assert_eq!(sdk.pump(), 2);
        assert_eq!(*seen.lock().unwrap(), vec![Some(1), Some(2)]);

        // Nothing left for the next pump.
        assert_eq!(sdk.pump(), 0);
    }

    #[test]
    fn connectivity_updates_before_listeners_run() {
        let sdk = Arc::new(sdk());
        assert_eq!(sdk.connectivity(), SystemState::Unknown);

        let observed = Arc::new(StdMutex::new(None));
        let sink = Arc::clone(&observed);
        let handle = Arc::clone(&sdk);
        sdk.register(
            EventKind::SystemStateChanged,
            Box::new(move |_| *sink.lock().unwrap() = Some(handle.connectivity())),
        );

        sdk.transport
            .deliver_notice(Notice::SystemState(SystemState::Offline));
        sdk.pump();

        assert_eq!(*observed.lock().unwrap(), Some(SystemState::Offline));
        assert_eq!(sdk.connectivity(), SystemState::Offline);
    }

    #[test]
    fn authorize_is_single_flight() {
        let sdk = sdk();
        sdk.authorize(&["public_profile"]).unwrap();
        assert!(matches!(
            sdk.authorize(&["public_profile"]),
            Err(AuthorizeError::AlreadyInFlight)
        ));

        // The finished event releases the guard.
        sdk.transport
            .deliver_notice(Notice::AuthorizeFinished(AuthorizeOutcome {
                cancelled: true,
                error: None,
                token: None,
            }));
        sdk.pump();
        sdk.authorize(&["public_profile"]).unwrap();
    }

    #[test]
    fn authorize_transport_failure_releases_the_guard() {
        let sdk = sdk();
        sdk.transport
            .set_authorize_response(Err(SubmitFailure::NoPlatformClient));
        assert!(matches!(
            sdk.authorize(&[]),
            Err(AuthorizeError::Transport(_))
        ));

        sdk.transport.set_authorize_response(Ok(()));
        sdk.authorize(&[]).unwrap();
    }

    #[test]
    fn entitlement_queries_pass_through() {
        let sdk = sdk();
        assert!(!sdk.is_game_owned());
        sdk.transport.set_game_owned(true);
        assert!(sdk.is_game_owned());

        assert!(!sdk.is_dlc_owned("dlc-1"));
        sdk.transport.add_owned_dlc("dlc-1");
        assert!(sdk.is_dlc_owned("dlc-1"));

        sdk.show_dlc_store("dlc-1").unwrap();
    }

    #[test]
    fn listener_changes_from_inside_a_listener_defer() {
        let sdk = Arc::new(sdk());
        let hits = Arc::new(AtomicUsize::new(0));

        let handle = Arc::clone(&sdk);
        let counter = Arc::clone(&hits);
        sdk.register(
            EventKind::GamePlayableChanged,
            Box::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                let inner = Arc::new(AtomicUsize::new(0));
                // Registered mid-batch, must not see this batch.
                let probe = Arc::clone(&inner);
                handle.register(
                    EventKind::GamePlayableChanged,
                    Box::new(move |_| {
                        probe.fetch_add(1, Ordering::SeqCst);
                    }),
                );
            }),
        );

        sdk.transport
            .deliver_notice(Notice::GamePlayable(PlayableStatus { is_playable: false }));
        sdk.pump();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn shutdown_abandons_pending_and_clears_events() {
        let sdk = sdk();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        sdk.register(
            EventKind::CloudSaveList,
            Box::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        sdk.cloud_saves().list(1).unwrap();
        sdk.transport
            .deliver(1, OperationResponse::List(ListResponse::ok(Vec::new())));

        assert!(sdk.shutdown());
        assert!(sdk.transport.is_closed());
        assert_eq!(sdk.pump(), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        assert!(matches!(
            sdk.cloud_saves().list(2),
            Err(SubmitError::Uninitialized)
        ));
        assert!(matches!(sdk.authorize(&[]), Err(AuthorizeError::NotReady)));

        // Idempotent; repeat calls report the session already gone.
        assert!(!sdk.shutdown());
    }

    #[test]
    fn identity_accessors() {
        let sdk = sdk();
        assert_eq!(sdk.client_id(), "client-1");
        assert_eq!(sdk.open_id(), sdk.transport.open_id().unwrap());
    }
}
