//! In-process platform agent.
//!
//! A self-contained stand-in for the real platform client, serving the
//! full cloud-save surface from in-memory storage plus authorization and
//! entitlement stubs. Integration tests drive an SDK against it without
//! any external process.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod agent;
mod config;
mod store;

pub use agent::Agent;
pub use config::{AgentConfig, DEFAULT_MAX_SAVES, DEFAULT_STORAGE_QUOTA_BYTES};
pub use store::SaveStore;
