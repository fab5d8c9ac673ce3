//! Scripted headless run.
//!
//! Drives a [`PlayerController`] over a small cave with a fixed input
//! script: walk, jump, dig a hole, mount a torch, climb a wall and drink
//! potions until the session ends. The script stands in for a player, the
//! [`DigAnimation`] for the animator's strike/end callbacks and the tile
//! bookkeeping for the terrain system.

use std::collections::HashMap;

use crossbeam_channel::Receiver;
use louhos_common::{CellCoord, LayerMask, Vec2};
use louhos_gameplay::{
    ChannelSink, FrameInput, GameEvent, GridWorld, Inventory, InventoryLedger, Item, PlayerController,
    SessionLog,
};
use tracing::{debug, info, trace};

use crate::audio::{AmbienceDepth, AudioCueSink};
use crate::config::EngineConfig;
use crate::timing::FixedStep;

/// Damage a tile absorbs before it breaks.
const TILE_HARDNESS: f32 = 2.0;
/// Capacity of the event channel drained every frame.
const EVENT_CAPACITY: usize = 256;

/// One scripted input held for a duration.
#[derive(Debug, Clone, Copy)]
pub struct ScriptStep {
    /// How long the step lasts, in seconds
    pub duration: f32,
    /// Input for the step; button edges fire on its first frame only
    pub input: FrameInput,
    /// Aim point relative to the character
    pub aim_offset: Vec2,
}

impl ScriptStep {
    fn hold(duration: f32, input: FrameInput) -> Self {
        Self {
            duration,
            input,
            aim_offset: Vec2::new(1.0, 0.0),
        }
    }

    fn aim(mut self, offset: Vec2) -> Self {
        self.aim_offset = offset;
        self
    }
}

/// Plays script steps back frame by frame.
#[derive(Debug, Clone)]
pub struct InputScript {
    steps: Vec<ScriptStep>,
    index: usize,
    step_time: f32,
}

impl InputScript {
    /// Creates a script from its steps.
    #[must_use]
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self {
            steps,
            index: 0,
            step_time: 0.0,
        }
    }

    /// Checks if every step has played.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.index >= self.steps.len()
    }

    /// Produces the input for a frame of `dt` seconds.
    pub fn next(&mut self, dt: f32, position: Vec2) -> FrameInput {
        let Some(step) = self.steps.get(self.index).copied() else {
            return FrameInput::new();
        };

        let mut input = step.input;
        input.aim = position + step.aim_offset;
        if self.step_time > 0.0 {
            input.jump_pressed = false;
            input.jump_released = false;
            input.torch_pressed = false;
            input.potion_pressed = false;
        }

        self.step_time += dt;
        if self.step_time >= step.duration {
            self.index += 1;
            self.step_time = 0.0;
        }
        input
    }
}

/// The default play-through.
#[must_use]
pub fn default_script() -> InputScript {
    let walk_right = FrameInput::new().with_axes(1.0, 0.0);
    let jump = FrameInput {
        jump_pressed: true,
        ..walk_right
    };
    let release = FrameInput {
        jump_released: true,
        ..FrameInput::new()
    };
    let dig = FrameInput {
        dig_held: true,
        ..FrameInput::new()
    };
    let torch = FrameInput {
        torch_pressed: true,
        ..FrameInput::new()
    };
    let climb_right = FrameInput::new().with_axes(1.0, 1.0);
    let potion = FrameInput {
        potion_pressed: true,
        ..FrameInput::new()
    };

    let mut steps = vec![
        ScriptStep::hold(0.8, walk_right),
        ScriptStep::hold(0.25, jump),
        ScriptStep::hold(0.1, release),
        ScriptStep::hold(0.6, FrameInput::new()),
        ScriptStep::hold(2.0, dig).aim(Vec2::new(0.0, -3.0)),
        ScriptStep::hold(0.2, torch),
        ScriptStep::hold(3.5, climb_right),
        ScriptStep::hold(0.5, FrameInput::new()),
    ];
    steps.extend((0..7).map(|_| ScriptStep::hold(0.3, potion)));
    InputScript::new(steps)
}

/// Stand-in for the animator's dig callbacks: one strike, then the end
/// signal, per swing.
#[derive(Debug, Clone)]
pub struct DigAnimation {
    strike_at: f32,
    end_at: f32,
    timer: f32,
    struck: bool,
}

/// Signals produced by one [`DigAnimation::advance`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwingSignals {
    /// The strike point was reached
    pub strike: bool,
    /// The swing finished
    pub end: bool,
}

impl DigAnimation {
    /// Creates a swing with the given strike and end times.
    #[must_use]
    pub fn new(strike_at: f32, end_at: f32) -> Self {
        Self {
            strike_at,
            end_at: end_at.max(strike_at),
            timer: 0.0,
            struck: false,
        }
    }

    /// Advances the swing while a dig session is live.
    pub fn advance(&mut self, digging: bool, dt: f32) -> SwingSignals {
        if !digging {
            self.timer = 0.0;
            self.struck = false;
            return SwingSignals::default();
        }

        self.timer += dt;
        let mut signals = SwingSignals::default();
        if !self.struck && self.timer >= self.strike_at {
            self.struck = true;
            signals.strike = true;
        }
        if self.timer >= self.end_at {
            self.timer = 0.0;
            self.struck = false;
            signals.end = true;
        }
        signals
    }
}

/// Outcome of a scripted run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemoSummary {
    /// Frames simulated
    pub frames: u64,
    /// Physics ticks simulated
    pub ticks: u64,
    /// Events received, by name
    pub events: HashMap<&'static str, usize>,
    /// Sounds queued
    pub sounds: usize,
    /// Tiles broken
    pub tiles_broken: usize,
    /// Stamina at the end
    pub stamina: u32,
    /// Intoxication at the end
    pub intoxication: f32,
    /// Final position
    pub position: Vec2,
    /// Last ambience depth reported
    pub depth: Option<f32>,
    /// Why the session ended, if it did
    pub session_end: Option<String>,
}

impl DemoSummary {
    /// Number of received events with a given name.
    #[cfg(test)]
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.events.get(name).copied().unwrap_or(0)
    }
}

/// A small cave: a diggable floor six tiles deep and a wall to the right.
#[must_use]
pub fn build_cave() -> GridWorld {
    let mut world = GridWorld::new();
    world.fill_rect(
        CellCoord::new(-16, -6),
        CellCoord::new(16, -1),
        LayerMask::GROUND | LayerMask::DIGGABLE,
    );
    world.fill_rect(CellCoord::new(12, 0), CellCoord::new(12, 5), LayerMask::GROUND);
    world
}

/// Breaks tiles once they absorb enough damage.
#[derive(Debug, Default)]
struct TileDamage {
    damage: HashMap<CellCoord, f32>,
    broken: usize,
}

impl TileDamage {
    fn strike(&mut self, world: &mut GridWorld, cell: CellCoord, damage: f32) {
        let total = self.damage.entry(cell).or_insert(0.0);
        *total += damage;
        if *total >= TILE_HARDNESS {
            self.damage.remove(&cell);
            if world.clear_cell(cell) {
                self.broken += 1;
                debug!(x = cell.x, y = cell.y, "Tile broken");
            }
        }
    }
}

/// Runs the default script with the given configuration.
pub fn run(config: &EngineConfig) -> DemoSummary {
    run_script(config, default_script())
}

/// Runs a script until it finishes, the duration elapses or the session
/// ends.
pub fn run_script(config: &EngineConfig, mut script: InputScript) -> DemoSummary {
    let inventory = Inventory::new(config.max_stamina)
        .with_item(Item::StaminaPotion, config.starting_potions)
        .with_item(Item::Torch, config.starting_torches);

    let session = SessionLog::new();
    let audio = AudioCueSink::new();
    let (sink, receiver) = ChannelSink::new(EVENT_CAPACITY);

    let mut controller = PlayerController::new(
        config.controller.clone(),
        build_cave(),
        inventory,
        Vec2::new(0.5, 0.9),
    )
    .with_session(Box::new(session.clone()));
    controller.subscribe(Box::new(sink));
    controller.subscribe(Box::new(audio.clone()));
    controller.equip_tool(config.starting_tool.descriptor());

    let mut timing = FixedStep::new(config.fixed_timestep);
    let mut ambience = AmbienceDepth::new(config.ambience_interval);
    let mut swing = DigAnimation::new(0.3, 0.45);
    let mut tiles = TileDamage::default();
    let mut summary = DemoSummary::default();

    let dt = config.frame_time;
    let mut time = 0.0;
    info!(duration = config.demo_duration, "Starting scripted run");

    while time < config.demo_duration && !script.is_finished() && !session.has_ended() {
        let input = script.next(dt, controller.state().position);
        controller.update(&input, dt);

        for _ in 0..timing.accumulate(dt) {
            controller.fixed_update(timing.fixed_dt());
            controller.integrate(timing.fixed_dt());
        }

        let signals = swing.advance(controller.is_digging(), dt);
        if signals.strike {
            controller.break_block();
        }
        if signals.end {
            controller.end_dig();
        }

        drain_events(&receiver, &mut controller, &mut tiles, &mut summary);
        play_sounds(&audio, &mut summary);
        ambience.update(dt, controller.state().position);

        time += dt;
        summary.frames += 1;
    }

    summary.ticks = timing.ticks();
    summary.tiles_broken = tiles.broken;
    summary.stamina = controller.inventory().stamina();
    summary.intoxication = controller.economy().intoxication();
    summary.position = controller.state().position;
    summary.depth = ambience.depth();
    summary.session_end = session.causes().into_iter().next();

    info!(
        frames = summary.frames,
        ticks = summary.ticks,
        tiles = summary.tiles_broken,
        stamina = summary.stamina,
        "Scripted run finished"
    );
    summary
}

/// Stands in for the mixer: logs and counts every queued sound.
fn play_sounds(audio: &AudioCueSink, summary: &mut DemoSummary) {
    for sound in audio.drain() {
        trace!(
            cue = ?sound.cue,
            x = sound.position.map(|p| p.x),
            y = sound.position.map(|p| p.y),
            volume = sound.volume,
            "Play sound"
        );
        summary.sounds += 1;
    }
}

fn drain_events(
    receiver: &Receiver<GameEvent>,
    controller: &mut PlayerController<GridWorld, Inventory>,
    tiles: &mut TileDamage,
    summary: &mut DemoSummary,
) {
    for event in receiver.try_iter() {
        *summary.events.entry(event.name()).or_insert(0) += 1;
        if let GameEvent::Dig { cell, damage } = event {
            tiles.strike(controller.world_mut(), cell, damage);
        }
    }
}
