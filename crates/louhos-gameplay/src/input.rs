//! Per-frame input sample.
//!
//! Device mapping is done elsewhere; the controller only sees two signed
//! axes, the jump/dig/torch/potion buttons and a world-space aim point.

use louhos_common::Vec2;
use serde::{Deserialize, Serialize};

/// Raw input sampled once per rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameInput {
    /// Horizontal axis in [-1, 1] (positive = right)
    pub horizontal: f32,
    /// Vertical axis in [-1, 1] (positive = up)
    pub vertical: f32,
    /// Jump button went down this frame
    pub jump_pressed: bool,
    /// Jump button went up this frame
    pub jump_released: bool,
    /// Primary (dig) button is held
    pub dig_held: bool,
    /// Secondary (torch) button went down this frame
    pub torch_pressed: bool,
    /// Tertiary (potion) button went down this frame
    pub potion_pressed: bool,
    /// Pointer position in world space
    pub aim: Vec2,
}

impl FrameInput {
    /// Creates an empty input sample.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets both movement axes, clamped to [-1, 1].
    #[must_use]
    pub fn with_axes(mut self, horizontal: f32, vertical: f32) -> Self {
        self.horizontal = horizontal.clamp(-1.0, 1.0);
        self.vertical = vertical.clamp(-1.0, 1.0);
        self
    }

    /// Sets the world-space aim point.
    #[must_use]
    pub fn aiming_at(mut self, aim: Vec2) -> Self {
        self.aim = aim;
        self
    }

    /// Checks if either movement axis is non-zero.
    #[must_use]
    pub fn has_movement(&self) -> bool {
        self.horizontal != 0.0 || self.vertical != 0.0
    }
}
