//! Fixed-timestep accumulator.
//!
//! Frames arrive with arbitrary delta times; physics runs at a fixed rate.
//! The accumulator converts one into the other.

/// Maximum physics steps per frame before the backlog is dropped.
const MAX_STEPS_PER_FRAME: u32 = 10;

/// Fixed-timestep accumulator for physics ticks.
#[derive(Debug, Clone)]
pub struct FixedStep {
    /// Unconsumed frame time
    accumulator: f32,
    /// Physics timestep
    fixed_dt: f32,
    /// Total ticks produced
    ticks: u64,
}

impl FixedStep {
    /// Creates an accumulator for the given timestep.
    #[must_use]
    pub fn new(fixed_dt: f32) -> Self {
        Self {
            accumulator: 0.0,
            fixed_dt: fixed_dt.max(0.001),
            ticks: 0,
        }
    }

    /// Get the fixed timestep value.
    #[must_use]
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Total physics ticks produced so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Accumulate frame time.
    /// Returns the number of physics ticks to run this frame.
    pub fn accumulate(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.max(0.0);
        let mut count = 0;

        while self.accumulator >= self.fixed_dt && count < MAX_STEPS_PER_FRAME {
            self.accumulator -= self.fixed_dt;
            count += 1;
        }

        // Still behind: drop the backlog instead of spiralling
        if self.accumulator > self.fixed_dt * 2.0 {
            self.accumulator = 0.0;
        }

        self.ticks += u64::from(count);
        count
    }
}
