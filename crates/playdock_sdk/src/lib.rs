//! Poll-driven client runtime for the Playdock platform.
//!
//! The runtime connects a game to the platform agent and exposes its
//! services over a single-threaded callback model: asynchronous
//! operations are submitted with a caller-chosen request id, their
//! results queue up as [`Event`](playdock_protocol::Event)s, and the game
//! drains the queue once per frame with [`Sdk::pump`], which invokes
//! registered listeners on the pumping thread. No listener ever runs on
//! a background thread.
//!
//! ```no_run
//! use playdock_sdk::{Sdk, SdkConfig, MockTransport};
//! use playdock_protocol::EventKind;
//!
//! let config = SdkConfig::new("my-client-id", "my-pub-key");
//! let sdk = Sdk::init(config, MockTransport::new())?;
//!
//! sdk.register(EventKind::CloudSaveList, Box::new(|event| {
//!     println!("saves listed: {event:?}");
//! }));
//! sdk.cloud_saves().list(1)?;
//!
//! // Once per frame:
//! sdk.pump();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cloudsave;
mod config;
mod error;
mod fs;
mod queue;
mod registry;
mod sdk;
mod session;
mod tracker;
mod transport;

pub use cloudsave::{CloudSaves, CreateSaveRequest, UpdateSaveRequest};
pub use config::{
    SdkConfig, DEFAULT_QUEUE_CAPACITY, MAX_COVER_BYTES, MAX_EXTRA_BYTES, MAX_NAME_BYTES,
    MAX_SAVE_BYTES, MAX_SUMMARY_BYTES,
};
pub use error::{
    AuthorizeError, FileReadError, InitError, InitFailure, SdkResult, SubmitError, SubmitFailure,
};
pub use fs::{DiskReader, MemoryReader, SaveFileReader};
pub use queue::EventQueue;
pub use registry::{CallbackRegistry, Listener, ListenerId};
pub use sdk::Sdk;
pub use session::{SessionPhase, SessionState};
pub use tracker::{Rejection, RequestTracker};
pub use transport::{ConnectInfo, DeliverySink, MockTransport, PlatformTransport};
