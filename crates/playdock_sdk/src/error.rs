//! Error types for the SDK runtime.
//!
//! Errors come in two tiers. *Admission* errors ([`SubmitError`],
//! [`InitError`], [`AuthorizeError`]) are returned synchronously from the
//! call that tried to start something; no completion event ever follows
//! them, and the caller can retry after fixing the condition. *Completion*
//! errors arrive asynchronously inside a response event's
//! [`ServiceError`](playdock_protocol::ServiceError) and cover everything
//! the platform rejected. The runtime never retries on its own.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for admission of asynchronous operations.
pub type SdkResult<T> = Result<T, SubmitError>;

/// Diagnostic reason for a failed initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitFailure {
    /// Unclassified failure.
    Generic,
    /// The platform client is not installed or could not be found.
    NoPlatform,
    /// The game was started directly instead of through the platform.
    NotLaunchedByPlatform,
    /// The platform client and game disagree on protocol versions; the
    /// user should update both.
    VersionMismatch,
}

/// Errors returned by [`Sdk::init`](crate::Sdk::init).
///
/// A failed init leaves the process uninitialized; the host may fix the
/// condition and try again.
#[derive(Debug, Error)]
pub enum InitError {
    /// The platform rejected or could not complete initialization.
    #[error("platform initialization failed ({reason:?}): {message}")]
    Failed {
        /// Diagnostic reason.
        reason: InitFailure,
        /// Message reported by the platform client.
        message: String,
    },
}

impl InitError {
    /// Creates a failed-init error.
    pub fn failed(reason: InitFailure, message: impl Into<String>) -> Self {
        Self::Failed {
            reason,
            message: message.into(),
        }
    }

    /// The diagnostic reason of this error.
    pub fn reason(&self) -> InitFailure {
        match self {
            InitError::Failed { reason, .. } => *reason,
        }
    }
}

/// Failure reported by a transport when asked to carry a request.
#[derive(Debug, Clone, Error)]
pub enum SubmitFailure {
    /// The platform client process is not running.
    #[error("platform client is not running")]
    NoPlatformClient,
    /// The platform client is too old to carry this request.
    #[error("platform client is outdated")]
    ClientOutdated,
    /// Transport-internal failure.
    #[error("transport failure: {0}")]
    Internal(String),
}

/// Errors reading a save or cover file during request validation.
#[derive(Debug, Error)]
pub enum FileReadError {
    /// The file does not exist.
    #[error("file not found: {path}")]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },
    /// The file exists but could not be read.
    #[error("failed to read {path}")]
    Io {
        /// The unreadable path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl FileReadError {
    /// The path the read failed on.
    pub fn path(&self) -> &PathBuf {
        match self {
            FileReadError::NotFound { path } | FileReadError::Io { path, .. } => path,
        }
    }
}

/// Admission errors for asynchronous operations.
///
/// Any of these is terminal for the call that produced it: no completion
/// event will ever be delivered for that request id.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The SDK has not been initialized, or has been shut down.
    #[error("SDK not initialized")]
    Uninitialized,
    /// The platform client process is not running.
    #[error("platform client is not running")]
    NoPlatformClient,
    /// The platform client is outdated; the user should update it.
    #[error("platform client is outdated")]
    PlatformClientOutdated,
    /// A request argument failed local validation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The given request id already has an operation in flight.
    #[error("request id {0} is already in flight")]
    DuplicateRequestId(i64),
    /// Internal runtime failure.
    #[error("internal SDK failure: {0}")]
    Internal(String),
    /// The save data file could not be read.
    #[error("failed to read save file")]
    SaveFileRead(#[source] FileReadError),
    /// The save data file exceeds the size limit.
    #[error("save file is {size} bytes, limit is {limit}")]
    SaveFileTooLarge {
        /// Observed size in bytes.
        size: u64,
        /// Maximum allowed size in bytes.
        limit: u64,
    },
    /// The cover file could not be read.
    #[error("failed to read cover file")]
    CoverFileRead(#[source] FileReadError),
    /// The cover file exceeds the size limit.
    #[error("cover file is {size} bytes, limit is {limit}")]
    CoverFileTooLarge {
        /// Observed size in bytes.
        size: u64,
        /// Maximum allowed size in bytes.
        limit: u64,
    },
}

impl SubmitError {
    /// Creates an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Returns true if the condition is local and fixable by the caller
    /// (as opposed to a platform/runtime state problem).
    pub fn is_caller_fixable(&self) -> bool {
        matches!(
            self,
            SubmitError::InvalidArgument(_)
                | SubmitError::DuplicateRequestId(_)
                | SubmitError::SaveFileRead(_)
                | SubmitError::SaveFileTooLarge { .. }
                | SubmitError::CoverFileRead(_)
                | SubmitError::CoverFileTooLarge { .. }
        )
    }
}

impl From<SubmitFailure> for SubmitError {
    fn from(failure: SubmitFailure) -> Self {
        match failure {
            SubmitFailure::NoPlatformClient => SubmitError::NoPlatformClient,
            SubmitFailure::ClientOutdated => SubmitError::PlatformClientOutdated,
            SubmitFailure::Internal(message) => SubmitError::Internal(message),
        }
    }
}

/// Errors returned by [`Sdk::authorize`](crate::Sdk::authorize).
#[derive(Debug, Error)]
pub enum AuthorizeError {
    /// The SDK has not been initialized, or has been shut down.
    #[error("SDK not initialized")]
    NotReady,
    /// An authorization flow is already in progress.
    #[error("authorization already in flight")]
    AlreadyInFlight,
    /// The transport could not start the flow.
    #[error("failed to start authorization")]
    Transport(#[source] SubmitFailure),
}
