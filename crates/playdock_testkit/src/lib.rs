//! Test utilities for the Playdock SDK workspace.
//!
//! Provides ready-made payloads, on-disk save file fixtures, and
//! proptest strategies for protocol types.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

pub use fixtures::{sample_payload, sample_record, SaveFiles};
