//! Semantic action events and their fan-out.
//!
//! Delivery is synchronous and in-process: [`EventBroadcaster::broadcast`]
//! calls every subscribed sink before returning. Sinks that want to consume
//! events later (UI, tile bookkeeping) can subscribe a [`ChannelSink`].

use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender};
use louhos_common::{CellCoord, Vec2};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Events emitted by the player controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A jump was executed
    Jump {
        /// Character position
        position: Vec2,
        /// Upward impulse applied
        force: f32,
    },
    /// The character touched down after being airborne
    Land {
        /// Character position
        position: Vec2,
        /// Downward speed at impact
        force: f32,
    },
    /// Periodic footstep sample while grounded and moving
    Walk {
        /// Character position
        position: Vec2,
        /// Velocity magnitude
        speed: f32,
    },
    /// Periodic climb sample while climbing
    Climb {
        /// Character position
        position: Vec2,
        /// Absolute vertical input
        vertical_speed: f32,
    },
    /// A dig strike landed on a tile
    Dig {
        /// Struck cell
        cell: CellCoord,
        /// Damage of the equipped tool
        damage: f32,
    },
    /// A torch was placed or picked up
    PlaceTorch,
}

impl GameEvent {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Jump { .. } => "jump",
            Self::Land { .. } => "land",
            Self::Walk { .. } => "walk",
            Self::Climb { .. } => "climb",
            Self::Dig { .. } => "dig",
            Self::PlaceTorch => "place_torch",
        }
    }
}

/// Receiver of controller events.
pub trait EventSink {
    /// Handles an event. Must return promptly.
    fn on_event(&mut self, event: &GameEvent);
}

/// Synchronous fan-out to every subscribed sink.
#[derive(Default)]
pub struct EventBroadcaster {
    sinks: Vec<Box<dyn EventSink>>,
}

impl std::fmt::Debug for EventBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBroadcaster")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl EventBroadcaster {
    /// Creates a broadcaster with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sink. Sinks are called in subscription order.
    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Returns the number of subscribed sinks.
    #[must_use]
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Delivers an event to every sink.
    pub fn broadcast(&mut self, event: &GameEvent) {
        tracing::trace!(event = event.name(), "broadcast");
        for sink in &mut self.sinks {
            sink.on_event(event);
        }
    }
}

/// Sink that forwards events into a bounded channel.
///
/// Events are dropped when the channel is full.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<GameEvent>,
}

impl ChannelSink {
    /// Creates a sink and the receiver that drains it.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, Receiver<GameEvent>) {
        let (sender, receiver) = bounded(capacity);
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelSink {
    fn on_event(&mut self, event: &GameEvent) {
        // Non-blocking send - if full, event is dropped
        let _ = self.sender.try_send(event.clone());
    }
}

/// Sink that records every event into a shared list.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl EventRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<GameEvent> {
        self.events.lock().clone()
    }

    /// Removes and returns the recorded events.
    pub fn take(&self) -> Vec<GameEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Counts recorded events with the given name.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.events.lock().iter().filter(|e| e.name() == name).count()
    }
}

impl EventSink for EventRecorder {
    fn on_event(&mut self, event: &GameEvent) {
        self.events.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_reaches_every_sink() {
        let first = EventRecorder::new();
        let second = EventRecorder::new();
        let mut broadcaster = EventBroadcaster::new();
        broadcaster.subscribe(Box::new(first.clone()));
        broadcaster.subscribe(Box::new(second.clone()));

        broadcaster.broadcast(&GameEvent::PlaceTorch);

        assert_eq!(first.events(), vec![GameEvent::PlaceTorch]);
        assert_eq!(second.count("place_torch"), 1);
        assert_eq!(broadcaster.sink_count(), 2);
    }

    #[test]
    fn test_channel_sink_drops_when_full() {
        let (sink, receiver) = ChannelSink::new(1);
        let mut broadcaster = EventBroadcaster::new();
        broadcaster.subscribe(Box::new(sink));

        broadcaster.broadcast(&GameEvent::PlaceTorch);
        broadcaster.broadcast(&GameEvent::Dig {
            cell: CellCoord::new(1, 2),
            damage: 1.0,
        });

        let drained: Vec<GameEvent> = receiver.try_iter().collect();
        assert_eq!(drained, vec![GameEvent::PlaceTorch]);
    }

    #[test]
    fn test_recorder_take_clears() {
        let mut recorder = EventRecorder::new();
        recorder.on_event(&GameEvent::Walk {
            position: Vec2::ZERO,
            speed: 2.0,
        });
        assert_eq!(recorder.take().len(), 1);
        assert!(recorder.events().is_empty());
    }
}
