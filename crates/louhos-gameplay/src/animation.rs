//! Cues for the animation layer.
//!
//! Animation timing is external. The controller only announces what
//! started or changed; the dig animation later answers through
//! `PlayerController::break_block` and `PlayerController::end_dig`.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// A state change the animator should reflect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationCue {
    /// A jump input was accepted
    JumpTriggered,
    /// Horizontal input is (or stopped being) non-zero
    Moving(bool),
    /// Climbing started or stopped
    Climbing(bool),
    /// Climbing with vertical input started or stopped
    ClimbingMoving(bool),
    /// A dig session started with a tool of this tier
    DigStarted {
        /// Tool tier
        tier: u8,
    },
}

/// Receiver of animation cues.
pub trait Animator {
    /// Applies a cue.
    fn cue(&mut self, cue: AnimationCue);
}

/// Animator that discards every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAnimator;

impl Animator for NullAnimator {
    fn cue(&mut self, _cue: AnimationCue) {}
}

/// Animator that records cues into a shared list.
#[derive(Debug, Clone, Default)]
pub struct CueRecorder {
    cues: Arc<Mutex<Vec<AnimationCue>>>,
}

impl CueRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded cues.
    #[must_use]
    pub fn cues(&self) -> Vec<AnimationCue> {
        self.cues.lock().clone()
    }
}

impl Animator for CueRecorder {
    fn cue(&mut self, cue: AnimationCue) {
        self.cues.lock().push(cue);
    }
}
