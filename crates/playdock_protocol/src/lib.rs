//! # Playdock Protocol
//!
//! Event and protocol types for the Playdock PC SDK.
//!
//! This crate provides:
//! - [`EventKind`] with stable numeric codes in reserved bands
//! - [`Event`], the tagged union delivered to host callbacks
//! - Cloud-save records, request and response payloads
//! - [`ServiceError`] and the platform error-code constants
//!
//! This is a pure protocol crate with no I/O operations. All types derive
//! `serde::{Serialize, Deserialize}` so a concrete transport can pick its
//! own encoding; this crate does not fix wire bytes.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod event;
mod record;
mod request;
mod response;

pub use error::{error_code, ServiceError};
pub use event::{
    AuthToken, AuthorizeOutcome, DlcPlayableStatus, Event, EventKind, Notice, PlayableStatus,
    SystemState,
};
pub use record::CloudSaveRecord;
pub use request::{AgentRequest, FileRef, OperationKind, SavePayload};
pub use response::{DeleteResponse, FileResponse, ListResponse, OperationResponse, SaveResponse};
