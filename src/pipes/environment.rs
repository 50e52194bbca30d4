//! The execution environment threaded into stream operations.

use super::CancellationToken;

/// Execution environment for pipes operations.
///
/// Carries the cancellation token observed by [`merge`](super::merge()).
#[derive(Debug, Clone, Default)]
pub struct Environment {
    cancellation: CancellationToken,
}

impl Environment {
    /// An environment with a fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// An environment observing `cancellation`.
    pub const fn with_cancellation(cancellation: CancellationToken) -> Self {
        Self { cancellation }
    }

    /// The cancellation token of this environment.
    pub const fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Requests cancellation of everything running in this environment.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }
}
