//! Driver lifecycle and reload state machine
//!
//! ```text
//!                init            start          request
//! Uninitialized ------> Stopped ------> Ready --------> Reloading
//!                          ^              |  ^              |
//!                          +---- stop ----+  +-- complete --+
//! ```
//!
//! Transitions are pure: [`DriverState::next`] says where an event leads,
//! or why it is not allowed, and the driver commits the result inside a
//! critical section.

use crate::error::Error;

/// Lifecycle state of the controller driver
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum DriverState {
    /// Constructed, not yet initialized
    #[default]
    Uninitialized,
    /// Initialized, controller disabled
    Stopped,
    /// Running, no reload pending
    Ready,
    /// Running, a shadow-register reload is pending
    Reloading,
}

/// Event driving a [`DriverState`] change
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Transition {
    /// Second phase of construction
    Init,
    /// Controller programmed and enabled
    Start,
    /// Shadow-register reload requested
    RequestReload,
    /// Hardware reported the reload as done
    CompleteReload,
    /// Controller disabled
    Stop,
}

impl DriverState {
    /// State reached by applying `transition`
    ///
    /// A completion observed while already [`Ready`](Self::Ready) is
    /// accepted: the same reload may be seen both by a polling caller and by
    /// the interrupt handler.
    ///
    /// # Errors
    ///
    /// - [`Error::ReloadInProgress`] for a reload request while reloading
    /// - [`Error::InvalidState`] for any other transition not in the diagram
    pub const fn next(self, transition: Transition) -> Result<Self, Error> {
        match (self, transition) {
            (Self::Uninitialized, Transition::Init) => Ok(Self::Stopped),
            (Self::Stopped, Transition::Start) => Ok(Self::Ready),
            (Self::Ready, Transition::RequestReload) => Ok(Self::Reloading),
            (Self::Reloading, Transition::RequestReload) => Err(Error::ReloadInProgress),
            (Self::Reloading | Self::Ready, Transition::CompleteReload) => Ok(Self::Ready),
            (Self::Ready, Transition::Stop) => Ok(Self::Stopped),
            (state, transition) => Err(Error::InvalidState { state, transition }),
        }
    }

    /// Whether the controller is running (Ready or Reloading)
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Ready | Self::Reloading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_lifecycle() {
        let state = DriverState::default();
        let state = state.next(Transition::Init).unwrap();
        assert_eq!(state, DriverState::Stopped);
        let state = state.next(Transition::Start).unwrap();
        assert_eq!(state, DriverState::Ready);
        let state = state.next(Transition::RequestReload).unwrap();
        assert_eq!(state, DriverState::Reloading);
        let state = state.next(Transition::CompleteReload).unwrap();
        assert_eq!(state, DriverState::Ready);
        let state = state.next(Transition::Stop).unwrap();
        assert_eq!(state, DriverState::Stopped);
        assert_eq!(state.next(Transition::Start), Ok(DriverState::Ready));
    }

    #[test]
    fn test_second_reload_request_rejected() {
        assert_eq!(
            DriverState::Reloading.next(Transition::RequestReload),
            Err(Error::ReloadInProgress)
        );
    }

    #[test]
    fn test_late_completion_is_noop() {
        assert_eq!(
            DriverState::Ready.next(Transition::CompleteReload),
            Ok(DriverState::Ready)
        );
    }

    #[test]
    fn test_stop_requires_ready() {
        assert_eq!(
            DriverState::Reloading.next(Transition::Stop),
            Err(Error::InvalidState {
                state: DriverState::Reloading,
                transition: Transition::Stop
            })
        );
        assert!(DriverState::Stopped.next(Transition::Stop).is_err());
    }

    #[test]
    fn test_start_requires_stopped() {
        assert!(DriverState::Uninitialized.next(Transition::Start).is_err());
        assert!(DriverState::Ready.next(Transition::Start).is_err());
    }

    #[test]
    fn test_init_only_once() {
        assert!(DriverState::Stopped.next(Transition::Init).is_err());
    }

    #[test]
    fn test_completion_outside_running_rejected() {
        assert!(DriverState::Stopped.next(Transition::CompleteReload).is_err());
    }
}
