//! services/summarizer/src/workflow/cancellation.rs
//!
//! Owns the cancellation token of the one in-flight summarization request.

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// The token armed for one attempt, tagged with that attempt's id.
#[derive(Debug, Clone)]
pub struct ArmedToken {
    pub attempt: Uuid,
    pub token: CancellationToken,
}

/// Keeps at most one live token. Cancelling a stale or settled attempt does nothing.
#[derive(Debug, Default)]
pub struct CancellationController {
    live: Mutex<Option<ArmedToken>>,
}

impl CancellationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a fresh token for `attempt`, replacing any previous one.
    pub fn arm(&self, attempt: Uuid) -> ArmedToken {
        let armed = ArmedToken {
            attempt,
            token: CancellationToken::new(),
        };
        *self.live.lock() = Some(armed.clone());
        armed
    }

    /// Signals cancellation if `attempt` still owns the live token.
    /// Returns whether a token was signalled.
    pub fn cancel(&self, attempt: Uuid) -> bool {
        match self.live.lock().as_ref() {
            Some(armed) if armed.attempt == attempt => {
                armed.token.cancel();
                true
            }
            _ => false,
        }
    }

    /// Discards the token once `attempt` has settled.
    pub fn disarm(&self, attempt: Uuid) {
        let mut live = self.live.lock();
        if live.as_ref().is_some_and(|armed| armed.attempt == attempt) {
            *live = None;
        }
    }

    #[cfg(test)]
    fn live_attempt(&self) -> Option<Uuid> {
        self.live.lock().as_ref().map(|armed| armed.attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_signals_only_the_live_attempt() {
        let controller = CancellationController::new();
        let first = controller.arm(Uuid::new_v4());
        controller.disarm(first.attempt);

        let second = controller.arm(Uuid::new_v4());
        assert!(!controller.cancel(first.attempt));
        assert!(!second.token.is_cancelled());

        assert!(controller.cancel(second.attempt));
        assert!(second.token.is_cancelled());
    }

    #[test]
    fn cancel_is_idempotent() {
        let controller = CancellationController::new();
        let armed = controller.arm(Uuid::new_v4());
        assert!(controller.cancel(armed.attempt));
        assert!(controller.cancel(armed.attempt));
        assert!(armed.token.is_cancelled());
    }

    #[test]
    fn disarm_ignores_other_attempts() {
        let controller = CancellationController::new();
        let armed = controller.arm(Uuid::new_v4());
        controller.disarm(Uuid::new_v4());
        assert_eq!(controller.live_attempt(), Some(armed.attempt));

        controller.disarm(armed.attempt);
        assert_eq!(controller.live_attempt(), None);
        assert!(!controller.cancel(armed.attempt));
        assert!(!armed.token.is_cancelled());
    }
}
