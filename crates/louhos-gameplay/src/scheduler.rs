//! Logical-clock scheduler for fixed-interval tasks.
//!
//! Tasks are identified by a caller-chosen key. [`IntervalScheduler::advance`]
//! moves the clock forward and returns every firing that became due, in
//! chronological order (ties resolve in registration order), so a caller
//! can dispatch them without holding a borrow on the scheduler.

use serde::{Deserialize, Serialize};

/// Smallest accepted repeat interval in seconds.
pub const MIN_INTERVAL: f64 = 0.001;

/// One registered repeating task.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScheduledTask<K> {
    key: K,
    interval: f64,
    next_due: f64,
}

/// A firing returned by [`IntervalScheduler::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Firing<K> {
    /// Task key
    pub key: K,
    /// Logical time the task was due at
    pub at: f64,
}

/// Repeating-task scheduler driven by explicit time steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalScheduler<K> {
    tasks: Vec<ScheduledTask<K>>,
    elapsed: f64,
}

impl<K> Default for IntervalScheduler<K> {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            elapsed: 0.0,
        }
    }
}

impl<K: Copy + PartialEq> IntervalScheduler<K> {
    /// Creates an empty scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a task that first fires `first_delay` seconds from now and
    /// then every `interval` seconds. Re-registering a key replaces it.
    pub fn schedule(&mut self, key: K, first_delay: f64, interval: f64) {
        self.cancel(key);
        self.tasks.push(ScheduledTask {
            key,
            interval: interval.max(MIN_INTERVAL),
            next_due: self.elapsed + first_delay.max(0.0),
        });
    }

    /// Removes a task, returning whether it was registered.
    pub fn cancel(&mut self, key: K) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.key != key);
        self.tasks.len() != before
    }

    /// Checks if a task is registered.
    #[must_use]
    pub fn is_scheduled(&self, key: K) -> bool {
        self.tasks.iter().any(|task| task.key == key)
    }

    /// Returns the logical time in seconds.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Advances the clock and returns all firings that became due.
    pub fn advance(&mut self, dt: f64) -> Vec<Firing<K>> {
        if dt.is_finite() {
            self.elapsed += dt.max(0.0);
        }
        let now = self.elapsed;
        let mut firings = Vec::new();

        loop {
            let next = self
                .tasks
                .iter_mut()
                .filter(|task| task.next_due <= now)
                .fold(None::<&mut ScheduledTask<K>>, |earliest, task| match earliest {
                    Some(best) if best.next_due <= task.next_due => Some(best),
                    _ => Some(task),
                });

            let Some(task) = next else {
                break;
            };
            firings.push(Firing {
                key: task.key,
                at: task.next_due,
            });
            task.next_due += task.interval;
        }

        firings
    }
}
