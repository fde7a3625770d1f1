#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Projectile trajectories.
//!
//! Every projectile keeps a floating point position and derives an integer
//! hitbox after each step. Three trajectory kinds exist: straight hero bolts,
//! homing enemy shots that drift between targets, and tank shells that bounce
//! off the play-area walls.

use glam::Vec2;
use rand::Rng;
use robotron_core::{
    DirectionFlags, ExplodeOrientation, ProjectileId, ProjectileKind, ProjectileSnapshot, Rect,
    Size,
};
use robotron_system_movement::{random_point, Body};

/// Distance a hero bolt travels per tick on each active axis.
pub const HERO_SHOT_SPEED: f32 = 16.0;
/// Upper bound of the random delay between homing retargets.
pub const HOMING_RETARGET_MAX_TICKS: u32 = 20;
/// Speed of enforcer shots right after firing.
pub const ENFORCER_SHOT_SPEED: f32 = 2.0;
/// Number of times an enforcer shot slows down.
pub const ENFORCER_SLOWDOWN_STEPS: u32 = 4;
/// Ticks between enforcer shot slow-downs.
pub const ENFORCER_SLOWDOWN_INTERVAL: u32 = 20;
/// Factor applied to the speed of an enforcer shot at each slow-down.
pub const ENFORCER_SLOW_RATE: f32 = 0.8;
/// Speed of brain shots.
pub const BRAIN_SHOT_SPEED: f32 = 1.0;
/// Dominant-axis speed of tank shells.
pub const TANK_SHOT_SPEED: f32 = 2.0;
/// Ticks a tank shell survives.
pub const TANK_SHOT_LIFETIME: u32 = 600;
/// Distance from a wall at which a tank shell counts as touching it.
pub const TANK_WALL_BUFFER: i32 = 2;
/// Ticks after a bounce during which the same axis cannot flip again.
pub const TANK_FLIP_COOLDOWN: u32 = 60;

const HERO_SHOT_HORIZONTAL: Size = Size::new(6, 1);
const HERO_SHOT_VERTICAL: Size = Size::new(1, 6);
const HERO_SHOT_DIAGONAL: Size = Size::new(4, 4);
const HOMING_SHOT_SIZE: Size = Size::new(13, 13);
const TANK_SHOT_SIZE: Size = Size::new(10, 10);

/// World facts a projectile may look at while moving.
#[derive(Clone, Copy, Debug)]
pub struct ProjectileContext {
    /// Point homing shots aim for when targeting the hero.
    pub hero: Vec2,
    /// Walls for enemy shots and source of random homing targets.
    pub area: Rect,
    /// Edges hero bolts may not cross.
    pub display: Rect,
}

/// Outcome of advancing a projectile by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileStatus {
    /// Still travelling.
    Flying,
    /// Still travelling after reflecting off a wall this tick.
    Bounced,
    /// Left its bounds or ran out of lifetime and must be removed.
    Expired,
}

/// Homing shot state.
#[derive(Clone, Debug, PartialEq)]
pub struct Homing {
    velocity: Vec2,
    speed: f32,
    retarget_in: u32,
    slowdown_steps: u32,
    slowdown_counter: u32,
}

/// Tank shell state.
#[derive(Clone, Debug, PartialEq)]
pub struct Bouncing {
    velocity: Vec2,
    lifetime: u32,
    flip_cooldown: [u32; 2],
}

/// How a projectile moves.
#[derive(Clone, Debug, PartialEq)]
pub enum Trajectory {
    /// Constant velocity, removed when leaving the display.
    Straight {
        /// Displacement per tick.
        velocity: Vec2,
    },
    /// Periodically retargets towards the hero or a random point.
    Homing(Homing),
    /// Reflects off walls until its lifetime runs out.
    Bouncing(Bouncing),
}

/// A live projectile.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    id: ProjectileId,
    kind: ProjectileKind,
    body: Body,
    direction: DirectionFlags,
    trajectory: Trajectory,
}

impl Projectile {
    /// Creates a hero bolt travelling along the held shooting directions.
    #[must_use]
    pub fn hero_shot(id: ProjectileId, origin: Vec2, direction: DirectionFlags) -> Self {
        let steps = direction.axis_steps();
        let size = if steps.x != 0.0 && steps.y != 0.0 {
            HERO_SHOT_DIAGONAL
        } else if steps.y != 0.0 {
            HERO_SHOT_VERTICAL
        } else {
            HERO_SHOT_HORIZONTAL
        };
        Self {
            id,
            kind: ProjectileKind::HeroShot,
            body: Body::new(origin, size),
            direction,
            trajectory: Trajectory::Straight {
                velocity: steps * HERO_SHOT_SPEED,
            },
        }
    }

    /// Creates an enemy shot aimed at `hero` from `origin`.
    ///
    /// `kind` selects the trajectory. Passing [`ProjectileKind::HeroShot`]
    /// produces a stationary straight shot.
    #[must_use]
    pub fn enemy_shot<R: Rng + ?Sized>(
        id: ProjectileId,
        kind: ProjectileKind,
        origin: Vec2,
        hero: Vec2,
        rng: &mut R,
    ) -> Self {
        let (size, trajectory) = match kind {
            ProjectileKind::EnforcerShot | ProjectileKind::BrainShot => {
                let (speed, slowdown_steps) = if kind == ProjectileKind::EnforcerShot {
                    (ENFORCER_SHOT_SPEED, ENFORCER_SLOWDOWN_STEPS)
                } else {
                    (BRAIN_SHOT_SPEED, 0)
                };
                let velocity = unit_direction(origin, hero).unwrap_or(Vec2::ZERO) * speed;
                (
                    HOMING_SHOT_SIZE,
                    Trajectory::Homing(Homing {
                        velocity,
                        speed,
                        retarget_in: rng.gen_range(0..=HOMING_RETARGET_MAX_TICKS),
                        slowdown_steps,
                        slowdown_counter: 0,
                    }),
                )
            }
            ProjectileKind::TankShot => {
                let velocity = dominant_axis_direction(origin, hero).unwrap_or(Vec2::ZERO)
                    * TANK_SHOT_SPEED;
                (
                    TANK_SHOT_SIZE,
                    Trajectory::Bouncing(Bouncing {
                        velocity,
                        lifetime: TANK_SHOT_LIFETIME,
                        flip_cooldown: [0; 2],
                    }),
                )
            }
            ProjectileKind::HeroShot => (
                HERO_SHOT_HORIZONTAL,
                Trajectory::Straight {
                    velocity: Vec2::ZERO,
                },
            ),
        };

        let half = size.as_vec2() / 2.0;
        Self {
            id,
            kind,
            body: Body::new(origin - half, size),
            direction: DirectionFlags::NONE,
            trajectory,
        }
    }

    /// Identifier of the projectile.
    #[must_use]
    pub const fn id(&self) -> ProjectileId {
        self.id
    }

    /// Kind of projectile.
    #[must_use]
    pub const fn kind(&self) -> ProjectileKind {
        self.kind
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

    /// Current trajectory state.
    #[must_use]
    pub const fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Displacement applied on the next tick.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        match &self.trajectory {
            Trajectory::Straight { velocity } => *velocity,
            Trajectory::Homing(homing) => homing.velocity,
            Trajectory::Bouncing(bouncing) => bouncing.velocity,
        }
    }

    /// Unit vector of the travel direction, or zero when stationary.
    #[must_use]
    pub fn heading(&self) -> Vec2 {
        self.velocity().normalize_or_zero()
    }

    /// Strip layout used when this shot destroys an enemy.
    #[must_use]
    pub const fn explode_orientation(&self) -> ExplodeOrientation {
        ExplodeOrientation::from_direction(self.direction)
    }

    /// Read-only view for collision resolution.
    #[must_use]
    pub const fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            kind: self.kind,
            rect: self.body.rect(),
        }
    }

    /// Advances the projectile by one tick.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        ctx: &ProjectileContext,
        rng: &mut R,
    ) -> ProjectileStatus {
        match &mut self.trajectory {
            Trajectory::Straight { velocity } => {
                self.body.translate(*velocity);
                if leaves_display(self.body.rect(), ctx.display) {
                    ProjectileStatus::Expired
                } else {
                    ProjectileStatus::Flying
                }
            }
            Trajectory::Homing(homing) => advance_homing(homing, &mut self.body, ctx, rng),
            Trajectory::Bouncing(bouncing) => advance_bouncing(bouncing, &mut self.body, ctx),
        }
    }
}

fn leaves_display(rect: Rect, display: Rect) -> bool {
    rect.left() < display.left()
        || rect.right() > display.right()
        || rect.top() > display.bottom()
        || rect.bottom() < display.top()
}

fn outside_area(rect: Rect, area: Rect) -> bool {
    rect.left() < area.left()
        || rect.right() > area.right()
        || rect.top() < area.top()
        || rect.bottom() > area.bottom()
}

fn advance_homing<R: Rng + ?Sized>(
    homing: &mut Homing,
    body: &mut Body,
    ctx: &ProjectileContext,
    rng: &mut R,
) -> ProjectileStatus {
    if homing.slowdown_steps > 0 {
        homing.slowdown_counter += 1;
        if homing.slowdown_counter >= ENFORCER_SLOWDOWN_INTERVAL {
            homing.slowdown_counter = 0;
            homing.slowdown_steps -= 1;
            homing.speed *= ENFORCER_SLOW_RATE;
            homing.velocity *= ENFORCER_SLOW_RATE;
        }
    }

    if homing.retarget_in == 0 {
        homing.retarget_in = rng.gen_range(0..=HOMING_RETARGET_MAX_TICKS);
        let target = if rng.gen_bool(0.5) {
            ctx.hero
        } else {
            random_point(ctx.area, rng)
        };
        match unit_direction(body.rect().center(), target) {
            Some(direction) => homing.velocity = direction * homing.speed,
            None => return ProjectileStatus::Flying,
        }
    } else {
        homing.retarget_in -= 1;
    }

    body.translate(homing.velocity);
    if outside_area(body.rect(), ctx.area) {
        ProjectileStatus::Expired
    } else {
        ProjectileStatus::Flying
    }
}

fn advance_bouncing(
    bouncing: &mut Bouncing,
    body: &mut Body,
    ctx: &ProjectileContext,
) -> ProjectileStatus {
    bouncing.lifetime = bouncing.lifetime.saturating_sub(1);
    if bouncing.lifetime == 0 {
        return ProjectileStatus::Expired;
    }
    for cooldown in &mut bouncing.flip_cooldown {
        *cooldown = cooldown.saturating_sub(1);
    }

    body.translate(bouncing.velocity);

    let rect = body.rect();
    let area = ctx.area;
    let touches_side = rect.left() - TANK_WALL_BUFFER < area.left()
        || rect.right() + TANK_WALL_BUFFER > area.right();
    let touches_floor = rect.top() - TANK_WALL_BUFFER < area.top()
        || rect.bottom() + TANK_WALL_BUFFER > area.bottom();

    let mut bounced = false;
    if touches_side && bouncing.flip_cooldown[0] == 0 {
        bouncing.velocity.x = -bouncing.velocity.x;
        bouncing.flip_cooldown[0] = TANK_FLIP_COOLDOWN;
        bounced = true;
    }
    if touches_floor && bouncing.flip_cooldown[1] == 0 {
        bouncing.velocity.y = -bouncing.velocity.y;
        bouncing.flip_cooldown[1] = TANK_FLIP_COOLDOWN;
        bounced = true;
    }

    if bounced {
        ProjectileStatus::Bounced
    } else {
        ProjectileStatus::Flying
    }
}

/// Unit vector from `from` to `to`, or `None` when the points coincide.
fn unit_direction(from: Vec2, to: Vec2) -> Option<Vec2> {
    (to - from).try_normalize()
}

/// Direction scaled so its dominant axis has length one.
fn dominant_axis_direction(from: Vec2, to: Vec2) -> Option<Vec2> {
    let delta = to - from;
    let dominant = delta.x.abs().max(delta.y.abs());
    if dominant == 0.0 {
        None
    } else {
        Some(delta / dominant)
    }
}
