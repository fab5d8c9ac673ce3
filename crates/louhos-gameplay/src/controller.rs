//! The player controller.
//!
//! [`PlayerController`] owns the character's kinematic state and wires the
//! movement, climb, dig and resource rules to the world, the inventory and
//! the outward collaborators (event sinks, animator, session owner).
//!
//! The host drives it with three cadences:
//!
//! - [`PlayerController::update`] once per rendered frame. Advances the
//!   scheduler, then runs aim, dig, torch, potion and movement input.
//! - [`PlayerController::fixed_update`] once per physics tick. Refreshes the
//!   ground probe before anything reads it, then resolves jumps, walking,
//!   climbing, facing and screen effects.
//! - [`PlayerController::break_block`] and [`PlayerController::end_dig`]
//!   whenever the dig animation reaches its strike and end points.
//!
//! Hosts without their own rigid body call [`PlayerController::integrate`]
//! after each physics tick.

use std::fmt;

use louhos_common::{CellCoord, Vec2};
use tracing::{debug, info, trace};

use crate::animation::{AnimationCue, Animator, NullAnimator};
use crate::climb::Climb;
use crate::config::ControllerConfig;
use crate::dig::{BreakOutcome, Dig, DigStart};
use crate::events::{EventBroadcaster, EventSink, GameEvent};
use crate::input::FrameInput;
use crate::inventory::InventoryLedger;
use crate::movement::{JumpOutcome, Movement};
use crate::physics::{step_body, BodyContact, World};
use crate::resources::{PotionOutcome, ResourceEconomy};
use crate::scheduler::IntervalScheduler;
use crate::screen_effects::{ScreenEffectDriver, ScreenEffects};
use crate::session::{DetachedSession, SessionController, INTOXICATION_CAUSE};
use crate::state::KinematicState;
use crate::tool::ToolDescriptor;
use crate::torch::{use_torch, TorchOutcome};

/// Periodic controller tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerTask {
    /// Stamina drain and intoxication decay
    SlowTick,
    /// Walk/climb event sampling
    ActionSample,
}

/// What a frame pass did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Cell under the aim highlight
    pub highlight: Option<CellCoord>,
    /// Dig start attempt
    pub dig: DigStart,
    /// Torch button result, if pressed
    pub torch: Option<TorchOutcome>,
    /// Potion button result, if pressed
    pub potion: Option<PotionOutcome>,
    /// Jump input result
    pub jump: JumpOutcome,
}

impl FrameReport {
    fn idle() -> Self {
        Self {
            highlight: None,
            dig: DigStart::NotHeld,
            torch: None,
            potion: None,
            jump: JumpOutcome::NotPressed,
        }
    }
}

/// What a physics tick did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickReport {
    /// Ground probe result
    pub grounded: bool,
    /// Touched down this tick
    pub landed: bool,
    /// Impulse of a jump executed this tick
    pub jumped: Option<f32>,
    /// Screen effect parameters
    pub effects: ScreenEffects,
    /// The session was ended this tick
    pub session_ended: bool,
}

/// Player controller over a world `W` and an inventory `L`.
pub struct PlayerController<W, L> {
    config: ControllerConfig,
    world: W,
    inventory: L,
    state: KinematicState,
    movement: Movement,
    climb: Climb,
    dig: Dig,
    tool: ToolDescriptor,
    economy: ResourceEconomy,
    effect_driver: ScreenEffectDriver,
    effects: ScreenEffects,
    scheduler: IntervalScheduler<ControllerTask>,
    events: EventBroadcaster,
    session: Box<dyn SessionController>,
    animator: Box<dyn Animator>,
    threats: Vec<Vec2>,
    enabled: bool,
    moving: bool,
    impact_speed: Option<f32>,
}

impl<W, L> fmt::Debug for PlayerController<W, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerController")
            .field("state", &self.state)
            .field("tool", &self.tool)
            .field("intoxication", &self.economy.intoxication())
            .field("digging", &self.dig.is_digging())
            .field("enabled", &self.enabled)
            .field("elapsed", &self.scheduler.elapsed())
            .finish_non_exhaustive()
    }
}

impl<W: World, L: InventoryLedger> PlayerController<W, L> {
    /// Creates an enabled controller with the character standing at
    /// `position`, the default tool equipped and no collaborators attached.
    #[must_use]
    pub fn new(config: ControllerConfig, world: W, inventory: L, position: Vec2) -> Self {
        let mut scheduler = IntervalScheduler::new();
        let schedule = &config.schedule;
        scheduler.schedule(
            ControllerTask::SlowTick,
            schedule.slow_tick_delay,
            schedule.slow_tick_interval,
        );
        scheduler.schedule(
            ControllerTask::ActionSample,
            schedule.action_sample_delay,
            schedule.action_sample_interval,
        );

        Self {
            movement: Movement::new(config.movement.clone()),
            climb: Climb::new(config.movement.climb_speed, &config.probes, config.layers.ground),
            dig: Dig::new(config.probes.dig_bias, config.layers.dig),
            economy: ResourceEconomy::new(config.stamina.clone(), config.intoxication.clone()),
            effect_driver: ScreenEffectDriver::new(config.effects.clone()),
            effects: ScreenEffects::default(),
            tool: ToolDescriptor::default(),
            state: KinematicState::new(position),
            events: EventBroadcaster::new(),
            session: Box::new(DetachedSession),
            animator: Box::new(NullAnimator),
            threats: Vec::new(),
            enabled: true,
            moving: false,
            impact_speed: None,
            scheduler,
            world,
            inventory,
            config,
        }
    }

    /// Attaches the session owner notified on critical intoxication.
    #[must_use]
    pub fn with_session(mut self, session: Box<dyn SessionController>) -> Self {
        self.session = session;
        self
    }

    /// Attaches the animator receiving cues.
    #[must_use]
    pub fn with_animator(mut self, animator: Box<dyn Animator>) -> Self {
        self.animator = animator;
        self
    }

    /// Adds an event sink.
    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.events.subscribe(sink);
    }

    // === Frame pass ===

    /// Runs one frame: due periodic tasks first, then aim, dig, torch,
    /// potion and movement input. Disabled controllers only run the
    /// periodic tasks.
    pub fn update(&mut self, input: &FrameInput, dt: f32) -> FrameReport {
        for firing in self.scheduler.advance(f64::from(dt)) {
            trace!(task = ?firing.key, at = firing.at, "Periodic task");
            self.run_task(firing.key);
        }

        if !self.enabled {
            return FrameReport::idle();
        }

        let highlight = self.dig.aim(&self.world, &self.state, input.aim, &self.tool);

        let dig = self
            .dig
            .try_start(&self.state, input.dig_held, &self.tool, self.scheduler.elapsed());
        if let DigStart::Started { tier, .. } = dig {
            self.animator.cue(AnimationCue::DigStarted { tier });
        }

        let torch = input.torch_pressed.then(|| self.use_torch());
        let potion = input
            .potion_pressed
            .then(|| self.economy.consume_potion(&mut self.inventory));

        let jump = self.movement.handle_input(&mut self.state, input, dt);
        if jump == JumpOutcome::Accepted {
            debug!("Jump accepted");
            self.animator.cue(AnimationCue::JumpTriggered);
        }

        FrameReport {
            highlight,
            dig,
            torch,
            potion,
            jump,
        }
    }

    fn use_torch(&mut self) -> TorchOutcome {
        let outcome = use_torch(
            &mut self.world,
            &mut self.inventory,
            self.state.position,
            self.config.probes.torch_checker,
        );
        if outcome.changed_world() {
            self.events.broadcast(&GameEvent::PlaceTorch);
        }
        outcome
    }

    fn run_task(&mut self, task: ControllerTask) {
        match task {
            ControllerTask::SlowTick => {
                let report = self.economy.slow_tick(&mut self.inventory, self.state.climbing);
                trace!(
                    drained = report.drained,
                    intoxication = report.intoxication,
                    "Slow tick"
                );
            },
            ControllerTask::ActionSample => self.sample_action(),
        }
    }

    fn sample_action(&mut self) {
        let position = self.state.position;
        if self.state.climbing {
            let vertical_speed = self.state.vertical.abs();
            self.events.broadcast(&GameEvent::Climb {
                position,
                vertical_speed,
            });
        } else {
            let speed = self.state.velocity.length();
            if speed > 0.0 && self.probe_ground() {
                self.events.broadcast(&GameEvent::Walk { position, speed });
            }
        }
    }

    // === Physics pass ===

    /// Runs one physics tick.
    pub fn fixed_update(&mut self, _dt: f32) -> TickReport {
        if !self.enabled {
            return TickReport {
                grounded: self.state.grounded,
                effects: self.effects,
                ..TickReport::default()
            };
        }

        let was_grounded = self.state.grounded;
        let was_climbing = self.state.climbing;
        self.state.grounded = self.probe_ground();

        let landed = self.state.grounded && !was_grounded && !was_climbing;
        if landed {
            let force = self
                .impact_speed
                .take()
                .unwrap_or_else(|| (-self.state.velocity.y).max(0.0));
            debug!(force, "Landed");
            if self.config.movement.emit_land_events {
                self.events.broadcast(&GameEvent::Land {
                    position: self.state.position,
                    force,
                });
            }
        }

        let jumped = self.movement.apply(&mut self.state);
        if let Some(force) = jumped {
            let cost = self.economy.stamina_config().jump_cost;
            self.economy.drain_stamina(&mut self.inventory, cost);
            self.events.broadcast(&GameEvent::Jump {
                position: self.state.position,
                force,
            });
        }

        let moving = self.state.horizontal != 0.0;
        if moving != self.moving {
            self.moving = moving;
            self.animator.cue(AnimationCue::Moving(moving));
        }

        let change = self.climb.step(&self.world, &mut self.state);
        if change.climbing {
            self.animator.cue(AnimationCue::Climbing(self.state.climbing));
        }
        if change.climbing_moving {
            self.animator
                .cue(AnimationCue::ClimbingMoving(self.state.climbing_moving));
        }

        self.movement.update_facing(&mut self.state);

        self.effects = self.effect_driver.update(
            self.economy.intoxication_tier(),
            self.economy.intensity(),
            self.scheduler.elapsed() as f32,
            self.state.position,
            &self.threats,
        );

        let session_ended = self.economy.take_critical_crossing();
        if session_ended {
            info!(cause = INTOXICATION_CAUSE, "Ending session");
            self.session.end_session(INTOXICATION_CAUSE);
        }

        TickReport {
            grounded: self.state.grounded,
            landed,
            jumped,
            effects: self.effects,
            session_ended,
        }
    }

    /// Moves the body by its velocity with gravity and tile collision.
    ///
    /// Gravity is skipped while climbing, and while resting on the ground.
    pub fn integrate(&mut self, dt: f32) -> BodyContact {
        if !self.enabled {
            return BodyContact::default();
        }

        let movement = &self.config.movement;
        let resting = self.state.grounded && self.state.velocity.y <= 0.0;
        if !self.state.climbing && !resting {
            self.state.velocity.y =
                (self.state.velocity.y - movement.gravity * dt).max(-movement.terminal_velocity);
        }

        let falling_speed = (-self.state.velocity.y).max(0.0);
        let contact = step_body(
            &self.world,
            &mut self.state.position,
            &mut self.state.velocity,
            movement.body_size,
            self.config.layers.ground,
            dt,
        );
        if contact.hit_ground {
            self.impact_speed = Some(falling_speed);
        }
        contact
    }

    fn probe_ground(&self) -> bool {
        let probes = &self.config.probes;
        let origin = self.state.position - Vec2::new(0.0, probes.ground_distance * 0.5);
        self.world.box_cast(
            origin,
            probes.ground_box,
            0.0,
            Vec2::NEG_Y,
            probes.ground_distance,
            self.config.layers.ground,
        )
    }

    // === Dig signals ===

    /// Break signal from the dig animation. Emits `Dig` when a strike lands.
    pub fn break_block(&mut self) -> BreakOutcome {
        let outcome = self
            .dig
            .break_block(&mut self.inventory, &self.economy, &self.tool);
        if let BreakOutcome::Struck { cell, damage } = outcome {
            self.events.broadcast(&GameEvent::Dig { cell, damage });
        }
        outcome
    }

    /// End signal from the dig animation. Returns whether a session closed.
    pub fn end_dig(&mut self) -> bool {
        self.dig.end_dig()
    }

    // === Equipment and modifiers ===

    /// Swaps the equipped tool. Takes effect on the next aim.
    pub fn equip_tool(&mut self, tool: ToolDescriptor) {
        debug!(tier = tool.tier, range = tool.range, "Equipped tool");
        self.tool = tool;
    }

    /// Returns the equipped tool.
    #[must_use]
    pub fn tool(&self) -> &ToolDescriptor {
        &self.tool
    }

    /// Permanently raises walk speed.
    pub fn activate_run_boost(&mut self) {
        self.movement.activate_run_boost();
    }

    /// Replaces the positions of nearby threats.
    pub fn set_threats(&mut self, threats: Vec<Vec2>) {
        self.threats = threats;
    }

    // === Lifecycle ===

    /// Re-enables the controller. Any dig session is dropped.
    pub fn enable(&mut self) {
        self.enabled = true;
        self.dig.end_dig();
        self.economy.set_passive_drain_active(true);
        info!("Player controller enabled");
    }

    /// Freezes the character and suspends passive stamina drain.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.state.velocity = Vec2::ZERO;
        if self.moving {
            self.moving = false;
            self.animator.cue(AnimationCue::Moving(false));
        }
        self.economy.set_passive_drain_active(false);
        info!("Player controller disabled");
    }

    /// Checks if the controller reacts to input.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // === Accessors ===

    /// Returns the kinematic state.
    #[must_use]
    pub fn state(&self) -> &KinematicState {
        &self.state
    }

    /// Returns the kinematic state for hosts that move the body themselves.
    pub fn state_mut(&mut self) -> &mut KinematicState {
        &mut self.state
    }

    /// Returns the world.
    #[must_use]
    pub fn world(&self) -> &W {
        &self.world
    }

    /// Returns the world mutably.
    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// Returns the inventory.
    #[must_use]
    pub fn inventory(&self) -> &L {
        &self.inventory
    }

    /// Returns the inventory mutably.
    pub fn inventory_mut(&mut self) -> &mut L {
        &mut self.inventory
    }

    /// Returns the resource economy.
    #[must_use]
    pub fn economy(&self) -> &ResourceEconomy {
        &self.economy
    }

    /// Returns the resource economy mutably.
    pub fn economy_mut(&mut self) -> &mut ResourceEconomy {
        &mut self.economy
    }

    /// Cell under the aim highlight.
    #[must_use]
    pub fn highlight(&self) -> Option<CellCoord> {
        self.dig.highlight()
    }

    /// Checks if a dig session is live.
    #[must_use]
    pub fn is_digging(&self) -> bool {
        self.dig.is_digging()
    }

    /// Screen effects from the last physics tick.
    #[must_use]
    pub fn effects(&self) -> ScreenEffects {
        self.effects
    }

    /// Scheduler time in seconds.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.scheduler.elapsed()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }
}
