//! Play-session termination hook.

use std::sync::Arc;

use parking_lot::Mutex;

/// Cause reported when intoxication reaches the critical tier.
pub const INTOXICATION_CAUSE: &str = "intoxication";

/// Owner of the play session (day cycle, run, level).
pub trait SessionController {
    /// Ends the current session. Called once per critical crossing.
    fn end_session(&mut self, cause: &str);
}

/// Session controller that ignores every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedSession;

impl SessionController for DetachedSession {
    fn end_session(&mut self, _cause: &str) {}
}

/// Session controller that records the causes it was ended with.
#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    causes: Arc<Mutex<Vec<String>>>,
}

impl SessionLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every recorded cause, oldest first.
    #[must_use]
    pub fn causes(&self) -> Vec<String> {
        self.causes.lock().clone()
    }

    /// Checks if the session was ended at least once.
    #[must_use]
    pub fn has_ended(&self) -> bool {
        !self.causes.lock().is_empty()
    }
}

impl SessionController for SessionLog {
    fn end_session(&mut self, cause: &str) {
        self.causes.lock().push(cause.to_owned());
    }
}
