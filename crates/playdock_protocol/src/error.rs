//! Service errors reported by the platform on completed operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An error the platform attached to a completed operation.
///
/// A completion either succeeds with a populated payload or fails with a
/// `ServiceError`; the two are never mixed. Codes come from the
/// [`error_code`] constants.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("service error {code}: {message}")]
pub struct ServiceError {
    /// Platform error code, see [`error_code`].
    pub code: i64,
    /// Human-readable description.
    pub message: String,
}

impl ServiceError {
    /// Creates a new service error.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Creates a "save not found" error (unknown uuid or stale file id).
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(error_code::CLOUD_SAVE_FILE_NOT_FOUND, message)
    }

    /// Returns true if this is a "save not found" error.
    pub fn is_not_found(&self) -> bool {
        self.code == error_code::CLOUD_SAVE_FILE_NOT_FOUND
    }

    /// Returns true if this error sits in the cloud-save code band.
    pub fn is_cloud_save(&self) -> bool {
        (error_code::CLOUD_SAVE_BAND_START..error_code::CLOUD_SAVE_BAND_END).contains(&self.code)
    }
}

/// Platform error codes.
///
/// Values are part of the public contract and never change across versions.
/// The range 400000–499999 is reserved for cloud-save errors; other bands
/// are reserved for future features.
pub mod error_code {
    /// Request executed successfully.
    pub const SUCCESS: i64 = 0;
    /// Unknown error.
    pub const UNKNOWN: i64 = 1;
    /// User credentials expired; re-authentication required.
    pub const UNAUTHORIZED: i64 = 2;
    /// The request is not allowed.
    pub const METHOD_NOT_ALLOWED: i64 = 3;
    /// The endpoint is not implemented.
    pub const UNIMPLEMENTED: i64 = 4;
    /// Malformed arguments.
    pub const INVALID_ARGUMENTS: i64 = 5;
    /// The user lacks permission for this action.
    pub const FORBIDDEN: i64 = 6;
    /// The user account is deactivated.
    pub const USER_IS_DEACTIVATED: i64 = 7;
    /// Platform-side internal error.
    pub const INTERNAL_SERVER_ERROR: i64 = 8;
    /// SDK-side internal error.
    pub const INTERNAL_SDK_ERROR: i64 = 9;
    /// Network failure between the platform client and its service.
    pub const NETWORK_ERROR: i64 = 10;

    /// First code of the cloud-save band.
    pub const CLOUD_SAVE_BAND_START: i64 = 400_000;
    /// One past the last code of the cloud-save band.
    pub const CLOUD_SAVE_BAND_END: i64 = 500_000;

    /// Save or cover file size rejected by the service.
    pub const CLOUD_SAVE_INVALID_FILE_SIZE: i64 = 400_000;
    /// Upload rate limit exceeded.
    pub const CLOUD_SAVE_UPLOAD_RATE_LIMIT: i64 = 400_001;
    /// Save does not exist (unknown uuid or stale file id).
    pub const CLOUD_SAVE_FILE_NOT_FOUND: i64 = 400_002;
    /// Per-user save count limit reached for this title.
    pub const CLOUD_SAVE_FILE_COUNT_LIMIT: i64 = 400_003;
    /// Per-user storage quota reached for this title.
    pub const CLOUD_SAVE_STORAGE_SIZE_LIMIT: i64 = 400_004;
    /// Total storage quota reached across titles.
    pub const CLOUD_SAVE_TOTAL_STORAGE_SIZE_LIMIT: i64 = 400_005;
    /// Request timed out inside the platform.
    pub const CLOUD_SAVE_TIMEOUT: i64 = 400_006;
    /// Concurrent calls disallowed for this operation.
    pub const CLOUD_SAVE_CONCURRENT_CALL_DISALLOWED: i64 = 400_007;
    /// Storage backend fault.
    pub const CLOUD_SAVE_STORAGE_SERVER_ERROR: i64 = 400_008;
    /// Save name rejected by the service.
    pub const CLOUD_SAVE_INVALID_NAME: i64 = 400_009;
}
