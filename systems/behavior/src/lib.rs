#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-species actor behaviour.
//!
//! Every actor is a single [`Actor`] record holding a body, an animation and a
//! [`Behavior`] variant with the species-specific state. [`Actor::update`]
//! dispatches on that variant. Side effects that touch other actors or the
//! projectile lists are returned as [`BehaviorRequest`]s for the world to apply
//! after the traversal.

mod animation;

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use robotron_core::{
    actions, ActorId, ControlState, DirectionFlags, ProjectileKind, Rect, Size, SoundCue,
    Species, SpriteRef, SpriteSnapshot,
};
use robotron_system_movement::{Body, DirectionStacks, UNIT_STEP};

pub use robotron_system_movement::AxisLock;

use self::animation::{
    Animation, FIRST_FRAME, FOUR_FRAMES, SECOND_FRAME, SEVEN_FRAMES, SIX_FRAMES,
    STAGE_FRAME_DELAY, WALK_CYCLE, WALK_FRAME_DELAY,
};

/// Hero displacement per held axis per tick.
pub const HERO_SPEED: f32 = 2.0;
/// Ticks between hero shots.
pub const HERO_RELOAD_TICKS: u32 = 20;
/// Reload progress the hero starts with, so the first shot comes sooner.
pub const HERO_INITIAL_RELOAD: u32 = 10;
/// Invulnerability granted after a respawn.
pub const HERO_RESPAWN_INVULNERABILITY: u32 = 120;

/// Ticks between grunt steps.
pub const GRUNT_MOVE_INTERVAL: u32 = 20;
/// Size multiplier of a single grunt step.
pub const GRUNT_SCALER: f32 = 3.0;

/// Hulk speed when undisturbed.
pub const HULK_SCALER: f32 = 0.6;
/// Hulk speed while recovering from a hit.
pub const HULK_STAGGERED_SCALER: f32 = 0.2;
/// Ticks a hit hulk stays slowed.
pub const HULK_STAGGER_TICKS: u32 = 300;
/// Distance a hit hulk is pushed along the shot direction.
pub const HULK_KNOCKBACK: f32 = 4.0;
/// Distance under which a hulk switches to its other axis.
const HULK_AXIS_TOLERANCE: f32 = 2.0;

/// Ticks that remain before a release when the full telegraph animation starts.
pub const PREGNANT_TELEGRAPH_TICKS: u32 = 180;
/// Ticks that remain before a release when a pregnant enemy halts.
pub const PREGNANT_PAUSE_WINDOW: u32 = 30;
/// Ticks a pregnant enemy stands still once the pause window opens.
pub const PREGNANT_PAUSE_TICKS: u32 = 60;

/// Enforcer wandering speed.
pub const ENFORCER_SCALER: f32 = 0.7;
/// Ticks between enforcer shots.
pub const ENFORCER_FIRE_INTERVAL: u32 = 60;
/// Tank wandering speed.
pub const TANK_SCALER: f32 = 0.4;
/// Ticks between tank shots.
pub const TANK_FIRE_INTERVAL: u32 = 120;
/// Brain pursuit speed.
pub const BRAIN_SCALER: f32 = 0.2;
/// Ticks between brain shots.
pub const BRAIN_FIRE_INTERVAL: u32 = 60;
/// Prog wandering speed.
pub const PROG_SCALER: f32 = 0.7;
/// Positions remembered for the prog afterimage trail.
pub const PROG_TRAIL_LENGTH: usize = 15;
/// Only every n-th remembered position is drawn.
pub const PROG_TRAIL_STRIDE: usize = 5;
/// Rescuable wandering speed.
pub const FAMILY_SCALER: f32 = 0.2;

/// World facts an actor may look at while updating.
#[derive(Clone, Copy, Debug)]
pub struct BehaviorContext<'a> {
    /// Top-left position of the hero.
    pub hero: Vec2,
    /// Top-left positions of every living rescuable, in spawn order.
    pub rescuables: &'a [Vec2],
    /// Region random wander targets are drawn from.
    pub bounds: Rect,
}

/// Side effects an actor asks the world to perform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BehaviorRequest {
    /// Fire a straight hero shot.
    FireHeroShot {
        /// Point the shot starts from.
        origin: Vec2,
        /// Resolved shooting direction, at most one per axis.
        direction: DirectionFlags,
    },
    /// Fire an enemy projectile.
    FireEnemyShot {
        /// Kind of projectile.
        kind: ProjectileKind,
        /// Point the shot starts from.
        origin: Vec2,
    },
    /// Place a child actor on the play field.
    Release {
        /// Species of the child.
        child: Species,
        /// Top-left position of the child.
        position: Vec2,
    },
    /// Remove the requesting actor without scoring it.
    Retire,
    /// Play a sound.
    Sound(SoundCue),
}

/// Species-specific state carried by an actor.
#[derive(Clone, Debug, PartialEq)]
pub enum Behavior {
    /// Player state.
    Hero(HeroState),
    /// Steps toward the hero every few ticks.
    Grunt {
        /// Ticks until the next step.
        move_timer: u32,
    },
    /// Orthogonal wanderer.
    Hulk(HulkState),
    /// Wanderer that periodically releases a child.
    Pregnant(PregnantState),
    /// Wanderer that fires homing shots.
    Enforcer(ShooterState),
    /// Wanderer that fires bouncing shots.
    Tank(ShooterState),
    /// Rescuable hunter.
    Brain {
        /// Ticks until the next shot.
        fire_timer: u32,
    },
    /// Converted rescuable.
    Prog(ProgState),
    /// Rescuable family member.
    Family {
        /// Current wander target.
        target: Vec2,
    },
    /// Stationary hazard.
    Electrode,
}

/// Hero control state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeroState {
    movement: DirectionStacks,
    shooting: DirectionStacks,
    reload: u32,
    invulnerable: u32,
}

/// Hulk wandering state.
#[derive(Clone, Debug, PartialEq)]
pub struct HulkState {
    target: Vec2,
    lock: AxisLock,
    staggered: u32,
}

/// Release cycle of spheroids and quarks.
#[derive(Clone, Debug, PartialEq)]
pub struct PregnantState {
    child: Species,
    scaler: f32,
    target: Vec2,
    countdown: u32,
    paused: Option<u32>,
    children_left: u32,
}

/// Shared state of enforcers and tanks.
#[derive(Clone, Debug, PartialEq)]
pub struct ShooterState {
    spawn_in: Option<u32>,
    target: Vec2,
    fire_timer: u32,
}

/// Prog state.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgState {
    spawn_in: Option<u32>,
    target: Vec2,
    trail: VecDeque<Vec2>,
}

/// A single simulated actor.
#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    id: ActorId,
    species: Species,
    body: Body,
    animation: Animation,
    behavior: Behavior,
}

impl Actor {
    /// Starts a hulk on `lock` instead of a random axis.
    ///
    /// [`AxisLock::Free`] keeps the random choice, as do other species.
    #[must_use]
    pub fn with_hulk_axis(mut self, lock: AxisLock) -> Self {
        if let Behavior::Hulk(state) = &mut self.behavior {
            if lock != AxisLock::Free {
                state.lock = lock;
            }
        }
        self
    }

    /// Creates an actor of `species` with its top-left corner at `position`.
    #[must_use]
    pub fn spawn<R: Rng + ?Sized>(
        id: ActorId,
        species: Species,
        position: Vec2,
        bounds: Rect,
        rng: &mut R,
    ) -> Self {
        let body = Body::new(position, species.profile().size);
        let walk = Animation::new(actions::WALK, WALK_CYCLE, WALK_FRAME_DELAY);
        let spawn_in = |stages: &'static [usize]| {
            (
                Animation::new(actions::SPAWN, stages, STAGE_FRAME_DELAY),
                Some(stages.len() as u32 * STAGE_FRAME_DELAY),
            )
        };

        let (animation, behavior) = match species {
            Species::Hero => (
                Animation::new(actions::IDLE, FIRST_FRAME, WALK_FRAME_DELAY),
                Behavior::Hero(HeroState {
                    reload: HERO_INITIAL_RELOAD,
                    ..HeroState::default()
                }),
            ),
            Species::Grunt => (
                walk,
                Behavior::Grunt {
                    move_timer: GRUNT_MOVE_INTERVAL,
                },
            ),
            Species::Hulk => {
                let lock = if rng.gen_bool(0.5) {
                    AxisLock::Horizontal
                } else {
                    AxisLock::Vertical
                };
                (
                    walk,
                    Behavior::Hulk(HulkState {
                        target: body.random_target(bounds, rng),
                        lock,
                        staggered: 0,
                    }),
                )
            }
            Species::Spheroid | Species::Quark => {
                let (child, scaler, children) = if species == Species::Spheroid {
                    (Species::Enforcer, 0.7, rng.gen_range(2..=5))
                } else {
                    (Species::Tank, 1.0, rng.gen_range(1..=3))
                };
                (
                    Animation::new(actions::PULSE, FOUR_FRAMES, STAGE_FRAME_DELAY),
                    Behavior::Pregnant(PregnantState {
                        child,
                        scaler,
                        target: body.random_target(bounds, rng),
                        countdown: rng.gen_range(480..=600),
                        paused: None,
                        children_left: children,
                    }),
                )
            }
            Species::Enforcer | Species::Tank => {
                let (animation, spawn_in) = spawn_in(FOUR_FRAMES);
                let fire_timer = if species == Species::Enforcer {
                    ENFORCER_FIRE_INTERVAL
                } else {
                    TANK_FIRE_INTERVAL
                };
                let state = ShooterState {
                    spawn_in,
                    target: body.random_target(bounds, rng),
                    fire_timer,
                };
                let behavior = if species == Species::Enforcer {
                    Behavior::Enforcer(state)
                } else {
                    Behavior::Tank(state)
                };
                (animation, behavior)
            }
            Species::Brain => (
                walk,
                Behavior::Brain {
                    fire_timer: BRAIN_FIRE_INTERVAL,
                },
            ),
            Species::Prog => {
                let (animation, spawn_in) = spawn_in(SIX_FRAMES);
                (
                    animation,
                    Behavior::Prog(ProgState {
                        spawn_in,
                        target: body.random_target(bounds, rng),
                        trail: VecDeque::with_capacity(PROG_TRAIL_LENGTH),
                    }),
                )
            }
            Species::Dad | Species::Mom | Species::Mike => (
                walk,
                Behavior::Family {
                    target: body.random_target(bounds, rng),
                },
            ),
            Species::Electrode => {
                let variant = actions::ELECTRODE_VARIANTS
                    [rng.gen_range(0..actions::ELECTRODE_VARIANTS.len())];
                let frame = if rng.gen_bool(0.5) {
                    FIRST_FRAME
                } else {
                    SECOND_FRAME
                };
                (
                    Animation::new(variant, frame, WALK_FRAME_DELAY),
                    Behavior::Electrode,
                )
            }
        };

        Self {
            id,
            species,
            body,
            animation,
            behavior,
        }
    }

    /// Identifier of the actor.
    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.id
    }

    /// Species of the actor.
    #[must_use]
    pub const fn species(&self) -> Species {
        self.species
    }

    /// Top-left position with sub-pixel precision.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.body.position()
    }

    /// Hitbox derived from the rounded position.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.body.rect()
    }

    /// Species-specific state.
    #[must_use]
    pub const fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    /// Frame currently displayed.
    #[must_use]
    pub fn sprite(&self) -> SpriteRef {
        SpriteRef::new(self.species, self.animation.action(), self.animation.frame())
            .flipped(self.animation.flip_x())
    }

    /// Copy of the current appearance, detached from the actor.
    #[must_use]
    pub fn snapshot(&self) -> SpriteSnapshot {
        SpriteSnapshot {
            sprite: self.sprite(),
            position: self.body.position(),
            size: self.body.size(),
        }
    }

    /// Reports whether the actor is still playing its spawn-in stages.
    #[must_use]
    pub fn is_spawning_in(&self) -> bool {
        match &self.behavior {
            Behavior::Enforcer(state) | Behavior::Tank(state) => state.spawn_in.is_some(),
            Behavior::Prog(state) => state.spawn_in.is_some(),
            _ => false,
        }
    }

    /// Reports whether the hero currently ignores damage.
    #[must_use]
    pub fn is_invulnerable(&self) -> bool {
        matches!(&self.behavior, Behavior::Hero(state) if state.invulnerable > 0)
    }

    /// Positions where prog afterimages are drawn, oldest first.
    pub fn afterimages(&self) -> impl Iterator<Item = Vec2> + '_ {
        let trail = match &self.behavior {
            Behavior::Prog(state) => Some(&state.trail),
            _ => None,
        };
        trail
            .into_iter()
            .flat_map(|trail| trail.iter().copied().step_by(PROG_TRAIL_STRIDE))
    }

    /// Teleports the actor.
    pub fn place_at(&mut self, position: Vec2) {
        self.body.set_position(position);
    }

    /// Makes the hero ignore damage for `ticks` ticks.
    pub fn grant_invulnerability(&mut self, ticks: u32) {
        if let Behavior::Hero(state) = &mut self.behavior {
            state.invulnerable = ticks;
        }
    }

    /// Slows a hulk and knocks it along the unit `direction` of the shot.
    ///
    /// Other species ignore the call.
    pub fn stagger(&mut self, direction: Vec2) {
        if let Behavior::Hulk(state) = &mut self.behavior {
            state.staggered = HULK_STAGGER_TICKS;
            self.body.translate(direction * HULK_KNOCKBACK);
        }
    }

    /// Moves and fires the hero according to the held controls.
    ///
    /// Non-hero actors ignore the call.
    pub fn update_hero(
        &mut self,
        controls: &ControlState,
        area: Rect,
        out: &mut Vec<BehaviorRequest>,
    ) {
        let Behavior::Hero(state) = &mut self.behavior else {
            return;
        };

        state.invulnerable = state.invulnerable.saturating_sub(1);

        let movement = state.movement.resolve(controls.movement);
        let delta = movement.axis_steps() * HERO_SPEED;
        if delta != Vec2::ZERO {
            self.body.translate(delta);
            self.body.clamp_within(area);
            self.animation.play(hero_walk_action(movement), WALK_CYCLE);
            self.animation.advance();
        }

        if state.reload < HERO_RELOAD_TICKS {
            state.reload += 1;
        }
        let aim = state.shooting.resolve(controls.shooting);
        if !aim.is_empty() && state.reload >= HERO_RELOAD_TICKS {
            state.reload = 0;
            out.push(BehaviorRequest::FireHeroShot {
                origin: self.body.rect().center(),
                direction: aim,
            });
        }
    }

    /// Runs one tick of the species behaviour.
    ///
    /// The hero is driven by [`Actor::update_hero`] and ignores this call.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        ctx: &BehaviorContext<'_>,
        rng: &mut R,
        out: &mut Vec<BehaviorRequest>,
    ) {
        let Self {
            body,
            animation,
            behavior,
            ..
        } = self;

        match behavior {
            Behavior::Hero(_) | Behavior::Electrode => {}
            Behavior::Grunt { move_timer } => {
                *move_timer = move_timer.saturating_sub(1);
                if *move_timer == 0 {
                    *move_timer = GRUNT_MOVE_INTERVAL;
                    body.move_to_target(ctx.hero, UNIT_STEP, GRUNT_SCALER, AxisLock::Free);
                    animation.step();
                    out.push(BehaviorRequest::Sound(SoundCue::GruntWalk));
                }
            }
            Behavior::Hulk(state) => update_hulk(state, body, animation, ctx, rng),
            Behavior::Pregnant(state) => {
                update_pregnant(state, body, animation, ctx, rng, out);
            }
            Behavior::Enforcer(state) => {
                if advance_spawn_in(&mut state.spawn_in, animation, actions::IDLE, FIRST_FRAME) {
                    return;
                }
                wander(&mut state.target, body, ENFORCER_SCALER, ctx, rng);
                fire_when_ready(
                    &mut state.fire_timer,
                    ENFORCER_FIRE_INTERVAL,
                    ProjectileKind::EnforcerShot,
                    body,
                    out,
                );
            }
            Behavior::Tank(state) => {
                if advance_spawn_in(&mut state.spawn_in, animation, actions::WALK, FOUR_FRAMES) {
                    return;
                }
                state.target = body.reached_target(state.target, ctx.bounds, rng);
                animation.set_flip_x(body.position().x - state.target.x > 0.0);
                body.move_to_target(state.target, UNIT_STEP, TANK_SCALER, AxisLock::Free);
                animation.advance();
                fire_when_ready(
                    &mut state.fire_timer,
                    TANK_FIRE_INTERVAL,
                    ProjectileKind::TankShot,
                    body,
                    out,
                );
            }
            Behavior::Brain { fire_timer } => {
                let target = nearest_rescuable(body.position(), ctx.rescuables).unwrap_or(ctx.hero);
                body.move_to_target(target, UNIT_STEP, BRAIN_SCALER, AxisLock::Free);
                animation.advance();
                fire_when_ready(
                    fire_timer,
                    BRAIN_FIRE_INTERVAL,
                    ProjectileKind::BrainShot,
                    body,
                    out,
                );
            }
            Behavior::Prog(state) => {
                if advance_spawn_in(&mut state.spawn_in, animation, actions::WALK, WALK_CYCLE) {
                    return;
                }
                if state.trail.len() == PROG_TRAIL_LENGTH {
                    let _ = state.trail.pop_front();
                }
                state.trail.push_back(body.position());
                wander(&mut state.target, body, PROG_SCALER, ctx, rng);
                animation.advance();
            }
            Behavior::Family { target } => {
                wander(target, body, FAMILY_SCALER, ctx, rng);
                animation.advance();
            }
        }
    }
}

fn hero_walk_action(direction: DirectionFlags) -> &'static str {
    if direction.left {
        actions::WALK_LEFT
    } else if direction.right {
        actions::WALK_RIGHT
    } else if direction.up {
        actions::WALK_UP
    } else {
        actions::WALK_DOWN
    }
}

fn wander<R: Rng + ?Sized>(
    target: &mut Vec2,
    body: &mut Body,
    scaler: f32,
    ctx: &BehaviorContext<'_>,
    rng: &mut R,
) {
    *target = body.reached_target(*target, ctx.bounds, rng);
    body.move_to_target(*target, UNIT_STEP, scaler, AxisLock::Free);
}

/// Plays spawn-in stages and reports whether the actor is still blocked.
fn advance_spawn_in(
    spawn_in: &mut Option<u32>,
    animation: &mut Animation,
    next_action: &'static str,
    next_flipbook: &'static [usize],
) -> bool {
    let Some(remaining) = spawn_in else {
        return false;
    };
    animation.advance();
    *remaining = remaining.saturating_sub(1);
    if *remaining == 0 {
        *spawn_in = None;
        animation.play(next_action, next_flipbook);
    }
    true
}

fn fire_when_ready(
    timer: &mut u32,
    interval: u32,
    kind: ProjectileKind,
    body: &Body,
    out: &mut Vec<BehaviorRequest>,
) {
    *timer = timer.saturating_sub(1);
    if *timer == 0 {
        *timer = interval;
        out.push(BehaviorRequest::FireEnemyShot {
            kind,
            origin: body.rect().center(),
        });
    }
}

fn update_hulk<R: Rng + ?Sized>(
    state: &mut HulkState,
    body: &mut Body,
    animation: &mut Animation,
    ctx: &BehaviorContext<'_>,
    rng: &mut R,
) {
    let scaler = if state.staggered > 0 {
        state.staggered -= 1;
        HULK_STAGGERED_SCALER
    } else {
        HULK_SCALER
    };

    let delta = (state.target - body.position()).abs();
    if delta.x < HULK_AXIS_TOLERANCE && delta.y < HULK_AXIS_TOLERANCE {
        state.target = body.random_target(ctx.bounds, rng);
    } else if state.lock == AxisLock::Horizontal && delta.x < HULK_AXIS_TOLERANCE {
        state.lock = AxisLock::Vertical;
    } else if state.lock == AxisLock::Vertical && delta.y < HULK_AXIS_TOLERANCE {
        state.lock = AxisLock::Horizontal;
    }

    body.move_to_target(state.target, UNIT_STEP, scaler, state.lock);
    animation.advance();
}

fn update_pregnant<R: Rng + ?Sized>(
    state: &mut PregnantState,
    body: &mut Body,
    animation: &mut Animation,
    ctx: &BehaviorContext<'_>,
    rng: &mut R,
    out: &mut Vec<BehaviorRequest>,
) {
    state.countdown = state.countdown.saturating_sub(1);

    if let Some(paused) = state.paused.as_mut() {
        *paused += 1;
        if *paused >= PREGNANT_PAUSE_TICKS {
            state.paused = None;
        }
    }
    if state.countdown <= PREGNANT_PAUSE_WINDOW && state.paused.is_none() {
        state.paused = Some(0);
    }

    let flipbook = if state.countdown <= PREGNANT_TELEGRAPH_TICKS {
        SEVEN_FRAMES
    } else {
        FOUR_FRAMES
    };
    animation.play(actions::PULSE, flipbook);
    animation.advance();

    if state.countdown == 0 {
        let child_size = state.child.profile().size;
        let offset = child_size.as_vec2() / 2.0;
        out.push(BehaviorRequest::Release {
            child: state.child,
            position: clamp_top_left(body.position() + offset, child_size, ctx.bounds),
        });
        out.push(BehaviorRequest::Sound(SoundCue::QuarkSpawn));
        state.children_left = state.children_left.saturating_sub(1);
        state.countdown = rng.gen_range(120..=360);
        if state.children_left == 0 {
            out.push(BehaviorRequest::Retire);
        }
    }

    state.target = body.reached_target(state.target, ctx.bounds, rng);
    if state.paused.is_none() {
        body.move_to_target(state.target, UNIT_STEP, state.scaler, AxisLock::Free);
    }
}

/// Keeps a hitbox of `size` placed at `position` inside `bounds`.
fn clamp_top_left(position: Vec2, size: Size, bounds: Rect) -> Vec2 {
    let min = Vec2::new(bounds.left() as f32, bounds.top() as f32);
    let max = Vec2::new(
        (bounds.right() - size.width()).max(bounds.left()) as f32,
        (bounds.bottom() - size.height()).max(bounds.top()) as f32,
    );
    position.clamp(min, max)
}

/// Closest rescuable by Manhattan distance; ties go to the later one.
fn nearest_rescuable(from: Vec2, rescuables: &[Vec2]) -> Option<Vec2> {
    let mut best: Option<(f32, Vec2)> = None;
    for &candidate in rescuables {
        let distance = (candidate.x - from.x).abs() + (candidate.y - from.y).abs();
        match best {
            Some((closest, _)) if distance > closest => {}
            _ => best = Some((distance, candidate)),
        }
    }
    best.map(|(_, position)| position)
}
