/// Worker lifecycle states for the fetch loop
///
/// A worker starts `Running`, moves to `Stopping` once it observes
/// cancellation or a drained frontier, and ends `Stopped`.
use std::fmt;

/// Represents the current state of a fetch worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerState {
    /// Pulling entries from the frontier and fetching them
    Running,

    /// Cancellation or exhaustion observed; leaving the loop
    Stopping,

    /// Loop exited; the worker holds no more work
    Stopped,
}

impl WorkerState {
    /// Returns true if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Returns true if the transition to `next` is allowed
    ///
    /// `Running -> Running` is the normal per-iteration step.
    pub fn can_transition_to(&self, next: WorkerState) -> bool {
        matches!(
            (self, next),
            (Self::Running, Self::Running)
                | (Self::Running, Self::Stopping)
                | (Self::Stopping, Self::Stopped)
        )
    }

    /// Returns a string representation for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a crawl run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The configured document cap was reached
    DocumentLimit,

    /// Frontier empty, workers exited and no payload left to index
    Exhausted,

    /// Stopped from outside (Ctrl-C) before either of the above
    Interrupted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DocumentLimit => f.write_str("document limit reached"),
            Self::Exhausted => f.write_str("frontier exhausted"),
            Self::Interrupted => f.write_str("interrupted"),
        }
    }
}
