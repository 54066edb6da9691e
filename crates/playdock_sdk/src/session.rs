//! Session lifecycle state machine.

use parking_lot::RwLock;
use playdock_protocol::SystemState;

/// The lifecycle phase of the SDK.
///
/// `Uninitialized → Ready → ShutDown`; `ShutDown` is terminal. Re-init is
/// not supported: a new process is required after shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// `init` has not succeeded yet.
    Uninitialized,
    /// `init` succeeded; operations are admitted.
    Ready,
    /// `shutdown` was called. Terminal.
    ShutDown,
}

impl SessionPhase {
    /// Returns true if operations may be admitted in this phase.
    pub fn can_submit(&self) -> bool {
        matches!(self, SessionPhase::Ready)
    }

    /// Returns true if this phase cannot be left.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::ShutDown)
    }
}

/// Process-wide session state: lifecycle phase plus the orthogonal
/// platform connectivity sub-state.
///
/// Connectivity is only meaningful while `Ready`; it is updated on the
/// pumping thread when a `SystemStateChanged` notification is dispatched.
#[derive(Debug)]
pub struct SessionState {
    phase: RwLock<SessionPhase>,
    connectivity: RwLock<SystemState>,
}

impl SessionState {
    /// Creates a new, uninitialized session.
    pub fn new() -> Self {
        Self {
            phase: RwLock::new(SessionPhase::Uninitialized),
            connectivity: RwLock::new(SystemState::Unknown),
        }
    }

    /// The current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        *self.phase.read()
    }

    /// Returns true if the session is ready for operations.
    pub fn is_ready(&self) -> bool {
        self.phase().can_submit()
    }

    /// The last reported platform connectivity.
    pub fn connectivity(&self) -> SystemState {
        *self.connectivity.read()
    }

    /// Transitions `Uninitialized → Ready`. Returns false if the session
    /// was not uninitialized.
    pub fn mark_ready(&self) -> bool {
        let mut phase = self.phase.write();
        if *phase == SessionPhase::Uninitialized {
            *phase = SessionPhase::Ready;
            tracing::info!("session ready");
            true
        } else {
            false
        }
    }

    /// Transitions `Ready → ShutDown`. Returns false if the session was
    /// not ready.
    pub fn mark_shut_down(&self) -> bool {
        let mut phase = self.phase.write();
        if *phase == SessionPhase::Ready {
            *phase = SessionPhase::ShutDown;
            tracing::info!("session shut down");
            true
        } else {
            false
        }
    }

    /// Records a connectivity change. Ignored unless the session is ready;
    /// `ShuttingDown` is advisory and does not change the phase.
    pub fn set_connectivity(&self, state: SystemState) {
        if !self.is_ready() {
            tracing::debug!(?state, "ignoring connectivity change outside ready phase");
            return;
        }
        let mut connectivity = self.connectivity.write();
        if *connectivity != state {
            tracing::info!(from = ?*connectivity, to = ?state, "connectivity changed");
            *connectivity = state;
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_predicates() {
        assert!(!SessionPhase::Uninitialized.can_submit());
        assert!(SessionPhase::Ready.can_submit());
        assert!(!SessionPhase::ShutDown.can_submit());
        assert!(SessionPhase::ShutDown.is_terminal());
        assert!(!SessionPhase::Ready.is_terminal());
    }

    #[test]
    fn lifecycle_transitions() {
        let session = SessionState::new();
        assert_eq!(session.phase(), SessionPhase::Uninitialized);

        assert!(session.mark_ready());
        assert_eq!(session.phase(), SessionPhase::Ready);

        // Ready is not re-enterable.
        assert!(!session.mark_ready());

        assert!(session.mark_shut_down());
        assert_eq!(session.phase(), SessionPhase::ShutDown);

        // ShutDown is terminal.
        assert!(!session.mark_ready());
        assert!(!session.mark_shut_down());
    }

    #[test]
    fn shutdown_requires_ready() {
        let session = SessionState::new();
        assert!(!session.mark_shut_down());
        assert_eq!(session.phase(), SessionPhase::Uninitialized);
    }

    #[test]
    fn connectivity_only_while_ready() {
        let session = SessionState::new();
        assert_eq!(session.connectivity(), SystemState::Unknown);

        // Ignored before init.
        session.set_connectivity(SystemState::Online);
        assert_eq!(session.connectivity(), SystemState::Unknown);

        session.mark_ready();
        session.set_connectivity(SystemState::Online);
        assert_eq!(session.connectivity(), SystemState::Online);

        session.set_connectivity(SystemState::Offline);
        assert_eq!(session.connectivity(), SystemState::Offline);
    }

    #[test]
    fn shutting_down_is_advisory() {
        let session = SessionState::new();
        session.mark_ready();
        session.set_connectivity(SystemState::ShuttingDown);
        assert_eq!(session.connectivity(), SystemState::ShuttingDown);
        // Phase machine is untouched.
        assert_eq!(session.phase(), SessionPhase::Ready);
    }
}
