//! Audio cues for controller events.
//!
//! The headless build has no mixer. [`AudioCueSink`] turns controller
//! events into [`SoundEvent`]s on a shared queue, and [`AmbienceDepth`]
//! reports the depth parameter the ambience and music tracks follow.

use std::sync::Arc;

use louhos_common::Vec2;
use louhos_gameplay::{EventSink, GameEvent, IntervalScheduler};
use parking_lot::Mutex;
use tracing::debug;

/// Depth parameter range; the character's y is clamped into it.
pub const DEPTH_RANGE: (f32, f32) = (-256.0, 32.0);

/// One-shot sounds the controller can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// Footstep
    Footsteps,
    /// Hand-over-hand climbing
    Climbing,
    /// Jump takeoff
    Jump,
    /// Touchdown
    Land,
    /// Tool strike
    Digging,
    /// Torch placed or picked up
    ItemPlace,
}

/// A queued one-shot sound.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundEvent {
    /// Which sound
    pub cue: AudioCue,
    /// Spatial position; `None` plays at the listener
    pub position: Option<Vec2>,
    /// Volume multiplier
    pub volume: f32,
}

impl SoundEvent {
    /// Creates a sound at the listener.
    #[must_use]
    pub fn new(cue: AudioCue) -> Self {
        Self {
            cue,
            position: None,
            volume: 1.0,
        }
    }

    /// Sets the spatial position.
    #[must_use]
    pub fn at_position(mut self, position: Vec2) -> Self {
        self.position = Some(position);
        self
    }

    /// Sets the volume multiplier.
    #[must_use]
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 2.0);
        self
    }
}

/// Event sink that queues one-shot sounds.
#[derive(Debug, Clone, Default)]
pub struct AudioCueSink {
    queue: Arc<Mutex<Vec<SoundEvent>>>,
}

impl AudioCueSink {
    /// Creates a sink with an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every queued sound.
    pub fn drain(&self) -> Vec<SoundEvent> {
        std::mem::take(&mut *self.queue.lock())
    }

    /// Maps an event to its sound. Walk and climb samples without speed
    /// stay silent.
    #[must_use]
    pub fn sound_for(event: &GameEvent) -> Option<SoundEvent> {
        let sound = match *event {
            GameEvent::Walk { position, speed } => {
                if speed <= 0.0 {
                    return None;
                }
                SoundEvent::new(AudioCue::Footsteps).at_position(position)
            },
            GameEvent::Climb {
                position,
                vertical_speed,
            } => {
                if vertical_speed <= 0.0 {
                    return None;
                }
                SoundEvent::new(AudioCue::Climbing).at_position(position)
            },
            GameEvent::Jump { position, .. } => SoundEvent::new(AudioCue::Jump).at_position(position),
            GameEvent::Land { position, force } => SoundEvent::new(AudioCue::Land)
                .at_position(position)
                .with_volume(force / 10.0),
            GameEvent::Dig { cell, .. } => SoundEvent::new(AudioCue::Digging).at_position(cell.center()),
            GameEvent::PlaceTorch => SoundEvent::new(AudioCue::ItemPlace),
        };
        Some(sound)
    }
}

impl EventSink for AudioCueSink {
    fn on_event(&mut self, event: &GameEvent) {
        if let Some(sound) = Self::sound_for(event) {
            self.queue.lock().push(sound);
        }
    }
}

/// Ambience depth parameter, refreshed on a fixed interval.
#[derive(Debug, Clone)]
pub struct AmbienceDepth {
    scheduler: IntervalScheduler<()>,
    depth: Option<f32>,
}

impl AmbienceDepth {
    /// Creates a driver whose first update is due after one interval.
    #[must_use]
    pub fn new(interval: f64) -> Self {
        let mut scheduler = IntervalScheduler::new();
        scheduler.schedule((), interval, interval);
        Self {
            scheduler,
            depth: None,
        }
    }

    /// Maps a y coordinate to the depth parameter.
    #[must_use]
    pub fn parameter(y: f32) -> f32 {
        y.clamp(DEPTH_RANGE.0, DEPTH_RANGE.1)
    }

    /// Last reported depth.
    #[must_use]
    pub fn depth(&self) -> Option<f32> {
        self.depth
    }

    /// Advances time. Returns the new parameter when an update was due.
    pub fn update(&mut self, dt: f32, position: Vec2) -> Option<f32> {
        if self.scheduler.advance(f64::from(dt)).is_empty() {
            return None;
        }
        let depth = Self::parameter(position.y);
        debug!(depth, "PlayerDepth");
        self.depth = Some(depth);
        Some(depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use louhos_common::CellCoord;

    #[test]
    fn test_silent_samples_are_skipped() {
        let mut sink = AudioCueSink::new();

        sink.on_event(&GameEvent::Walk {
            position: Vec2::ZERO,
            speed: 0.0,
        });
        sink.on_event(&GameEvent::Climb {
            position: Vec2::ZERO,
            vertical_speed: 0.0,
        });
        sink.on_event(&GameEvent::Climb {
            position: Vec2::ZERO,
            vertical_speed: 1.0,
        });

        let sounds = sink.drain();
        assert_eq!(sounds.len(), 1);
        assert_eq!(sounds[0].cue, AudioCue::Climbing);
        assert!(sink.drain().is_empty());
    }

    #[test]
    fn test_dig_sound_plays_at_cell() {
        let sound = AudioCueSink::sound_for(&GameEvent::Dig {
            cell: CellCoord::new(2, -3),
            damage: 1.0,
        });

        assert_eq!(
            sound,
            Some(SoundEvent::new(AudioCue::Digging).at_position(Vec2::new(2.5, -2.5)))
        );
    }

    #[test]
    fn test_depth_parameter_clamps() {
        assert_eq!(AmbienceDepth::parameter(100.0), 32.0);
        assert_eq!(AmbienceDepth::parameter(-500.0), -256.0);
        assert_eq!(AmbienceDepth::parameter(-12.5), -12.5);
    }

    #[test]
    fn test_depth_updates_on_interval() {
        let mut ambience = AmbienceDepth::new(0.5);

        assert_eq!(ambience.update(0.25, Vec2::new(0.0, -4.0)), None);
        assert_eq!(ambience.update(0.25, Vec2::new(0.0, -4.0)), Some(-4.0));
        assert_eq!(ambience.update(0.25, Vec2::new(0.0, 50.0)), None);
        assert_eq!(ambience.depth(), Some(-4.0));
        assert_eq!(ambience.update(0.25, Vec2::new(0.0, 50.0)), Some(32.0));
    }
}
