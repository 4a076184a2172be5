//! Gate lifecycle phases

use std::fmt;

/// Lifecycle phase of a gate.
///
/// The gate's internal state carries the live data (stored handle, in-flight
/// attempt); this enum is its shape, exposed for observability and used to
/// check transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    /// No handle stored and no connect attempt in flight.
    Empty,

    /// A connect attempt is in flight; arriving callers join it.
    Connecting,

    /// A handle is stored and handed to every caller.
    Connected,
}

impl GatePhase {
    /// Check if transition is valid
    pub fn can_transition_to(&self, next: GatePhase) -> bool {
        use GatePhase::*;

        matches!(
            (self, next),
            (Empty, Connecting)
                | (Connecting, Connected)
                | (Connecting, Empty)
                | (Connecting, Connecting)
                | (Connected, Connecting)
                | (Connected, Empty)
        )
    }
}

impl fmt::Display for GatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
        }
    }
}
