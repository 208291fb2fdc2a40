//! Link state machine for one analyzer connection

use crate::error::{Lis2Error, Lis2Result};

/// Handshake state of the analyzer link
///
/// # State Transitions
/// ```text
/// Idle -> Receiving   (ENQ acknowledged)
/// Receiving -> Terminated (EOT acknowledged)
/// Receiving -> Idle   (timeout or retry exhaustion)
/// Terminated -> Idle  (fresh session opened, immediate)
/// ```
///
/// `Terminated` is transient: the receiver passes through it while the
/// completed transmission is finalized and drops straight back to `Idle`
/// for the next ENQ. The protocol is strictly sequential, so there is never
/// more than one transmission in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    /// Waiting for ENQ; nothing in progress (initial state)
    #[default]
    Idle,
    /// ENQ acknowledged; data frames are expected
    Receiving,
    /// EOT acknowledged; transient while the session is handed off
    Terminated,
}

impl LinkState {
    /// Check if data frames are currently expected
    pub fn is_receiving(&self) -> bool {
        matches!(self, LinkState::Receiving)
    }

    /// Validate a state transition
    ///
    /// # Returns
    /// `Ok(())` if the transition is valid, `Err` otherwise
    pub fn validate_transition(&self, new_state: LinkState) -> Lis2Result<()> {
        let valid = match (*self, new_state) {
            (LinkState::Idle, LinkState::Receiving) => true,
            (LinkState::Receiving, LinkState::Terminated) => true,
            (LinkState::Receiving, LinkState::Idle) => true, // Timeout / retry exhaustion
            (LinkState::Terminated, LinkState::Idle) => true,
            // Self-transition (stray byte discarded in idle)
            (LinkState::Idle, LinkState::Idle) => true,
            _ => false,
        };

        if valid {
            Ok(())
        } else {
            Err(Lis2Error::InvalidData(format!(
                "Invalid state transition: {:?} -> {:?}",
                self, new_state
            )))
        }
    }

    /// Get human-readable state name
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkState::Idle => "Idle",
            LinkState::Receiving => "Receiving",
            LinkState::Terminated => "Terminated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        assert!(LinkState::Idle
            .validate_transition(LinkState::Receiving)
            .is_ok());
        assert!(LinkState::Receiving
            .validate_transition(LinkState::Terminated)
            .is_ok());
        assert!(LinkState::Receiving
            .validate_transition(LinkState::Idle)
            .is_ok());
        assert!(LinkState::Terminated
            .validate_transition(LinkState::Idle)
            .is_ok());
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(LinkState::Idle
            .validate_transition(LinkState::Terminated)
            .is_err());
        assert!(LinkState::Terminated
            .validate_transition(LinkState::Receiving)
            .is_err());
    }

    #[test]
    fn test_default_is_idle() {
        assert_eq!(LinkState::default(), LinkState::Idle);
        assert!(!LinkState::default().is_receiving());
    }
}
