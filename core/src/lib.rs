#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared by every crate of the Robotron arcade simulation.
//!
//! The world is the only writer of game state. Systems observe [`Event`]s and
//! read-only snapshots, then describe the mutations they want as [`Command`]s.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Width of the low-resolution drawing surface in pixels.
pub const DISPLAY_WIDTH: i32 = 640;

/// Height of the low-resolution drawing surface in pixels.
pub const DISPLAY_HEIGHT: i32 = 480;

/// Integer factor applied when the drawing surface is presented on screen.
pub const DISPLAY_SCALE: i32 = 2;

/// Distance between the display edge and the outside of the HUD border.
pub const HUD_BORDER_PADDING: i32 = 15;

/// Thickness of the HUD border line.
pub const HUD_BORDER_THICKNESS: i32 = 5;

/// Number of simulation ticks per second.
pub const TICK_RATE: u32 = 60;

/// Duration of a single fixed simulation tick.
pub const TICK: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Rectangle covering the entire drawing surface.
#[must_use]
pub const fn display_rect() -> Rect {
    Rect::new(0, 0, DISPLAY_WIDTH, DISPLAY_HEIGHT)
}

/// Rectangle enclosed by the HUD border where projectiles may travel.
#[must_use]
pub const fn play_area() -> Rect {
    let top = HUD_BORDER_PADDING + HUD_BORDER_THICKNESS;
    Rect::new(
        HUD_BORDER_THICKNESS,
        top,
        DISPLAY_WIDTH - 2 * HUD_BORDER_THICKNESS,
        DISPLAY_HEIGHT - 2 * top,
    )
}

/// Centre of the drawing surface, used as the hero spawn point.
#[must_use]
pub fn display_center() -> Vec2 {
    Vec2::new((DISPLAY_WIDTH / 2) as f32, (DISPLAY_HEIGHT / 2) as f32)
}

/// Integer rectangle used for hitboxes and sprite source regions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and dimensions.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Derives a hitbox whose top-left corner is the rounded position.
    #[must_use]
    pub fn from_position(position: Vec2, size: Size) -> Self {
        Self::new(
            position.x.round() as i32,
            position.y.round() as i32,
            size.width(),
            size.height(),
        )
    }

    /// Horizontal coordinate of the left edge.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate of the top edge.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Left edge, identical to [`Rect::x`].
    #[must_use]
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// First column past the right edge.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Top edge, identical to [`Rect::y`].
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// First row past the bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Dimensions of the rectangle.
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Top-left corner as a vector.
    #[must_use]
    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    /// Geometric centre of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    /// Reports whether the two rectangles share at least one pixel.
    ///
    /// Rectangles that merely touch along an edge do not overlap.
    #[must_use]
    pub const fn intersects(&self, other: &Rect) -> bool {
        if self.width <= 0 || self.height <= 0 || other.width <= 0 || other.height <= 0 {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Reports whether the point lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x as f32
            && point.x < self.right() as f32
            && point.y >= self.y as f32
            && point.y < self.bottom() as f32
    }
}

/// Pixel dimensions of a sprite or hitbox.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    width: i32,
    height: i32,
}

impl Size {
    /// Creates a new size.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Dimensions expressed as a floating point vector.
    #[must_use]
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Every kind of actor that can appear on the play field.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    /// Player-controlled hero.
    Hero,
    /// Slow, jerky pursuer.
    Grunt,
    /// Indestructible wanderer that crushes rescuables.
    Hulk,
    /// Pregnant enemy that releases enforcers.
    Spheroid,
    /// Wanderer that fires homing shots.
    Enforcer,
    /// Pregnant enemy that releases tanks.
    Quark,
    /// Wanderer that fires bouncing shots.
    Tank,
    /// Seeks rescuables and converts them into progs.
    Brain,
    /// Converted rescuable that leaves an afterimage trail.
    Prog,
    /// Stationary hazard.
    Electrode,
    /// Rescuable father.
    Dad,
    /// Rescuable mother.
    Mom,
    /// Rescuable child.
    Mike,
}

impl Species {
    /// Every species in declaration order.
    pub const ALL: [Species; 13] = [
        Species::Hero,
        Species::Grunt,
        Species::Hulk,
        Species::Spheroid,
        Species::Enforcer,
        Species::Quark,
        Species::Tank,
        Species::Brain,
        Species::Prog,
        Species::Electrode,
        Species::Dad,
        Species::Mom,
        Species::Mike,
    ];

    /// Stable lowercase name used by data files and sprite sheets.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Species::Hero => "hero",
            Species::Grunt => "grunt",
            Species::Hulk => "hulk",
            Species::Spheroid => "spheroid",
            Species::Enforcer => "enforcer",
            Species::Quark => "quark",
            Species::Tank => "tank",
            Species::Brain => "brain",
            Species::Prog => "prog",
            Species::Electrode => "electrode",
            Species::Dad => "dad",
            Species::Mom => "mom",
            Species::Mike => "mike",
        }
    }

    /// Resolves a species from its data-file name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|species| species.name() == name)
    }

    /// Canonical per-species data.
    #[must_use]
    pub const fn profile(self) -> SpeciesProfile {
        let (width, height, points) = match self {
            Species::Hero => (20, 27, None),
            Species::Grunt => (29, 27, Some(100)),
            Species::Hulk => (29, 27, None),
            Species::Spheroid => (16, 16, Some(1_000)),
            Species::Enforcer => (18, 22, Some(200)),
            Species::Quark => (16, 16, Some(1_000)),
            Species::Tank => (20, 22, Some(200)),
            Species::Brain => (22, 27, Some(500)),
            Species::Prog => (20, 27, Some(100)),
            Species::Electrode => (14, 14, Some(0)),
            Species::Dad | Species::Mom | Species::Mike => (29, 27, None),
        };
        SpeciesProfile {
            size: Size::new(width, height),
            points,
        }
    }

    /// Side of the conflict the species fights on.
    #[must_use]
    pub const fn faction(self) -> Faction {
        match self {
            Species::Hero => Faction::Hero,
            Species::Dad | Species::Mom | Species::Mike => Faction::Rescuable,
            _ => Faction::Enemy,
        }
    }

    /// Reports whether hero shots merely stagger this species.
    #[must_use]
    pub const fn is_invulnerable(self) -> bool {
        matches!(self, Species::Hulk)
    }

    /// Reports whether touching a rescuable kills it.
    #[must_use]
    pub const fn captures_rescuables(self) -> bool {
        matches!(self, Species::Hulk | Species::Brain)
    }

    /// Reports whether the wave continues while an actor of this species lives.
    #[must_use]
    pub const fn blocks_wave_clear(self) -> bool {
        matches!(
            self,
            Species::Grunt
                | Species::Spheroid
                | Species::Quark
                | Species::Enforcer
                | Species::Tank
                | Species::Brain
                | Species::Prog
        )
    }
}

/// Static facts shared by every actor of a species.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpeciesProfile {
    /// Sprite and hitbox dimensions.
    pub size: Size,
    /// Points awarded when the species is destroyed, if it can be scored.
    pub points: Option<u32>,
}

/// Membership group an actor belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Faction {
    /// The player.
    Hero,
    /// Anything hostile to the hero.
    Enemy,
    /// Family members waiting to be saved.
    Rescuable,
}

/// Unique identifier assigned to every actor.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ActorId(u32);

impl ActorId {
    /// Creates a new actor identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying numeric representation.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to every projectile.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying numeric representation.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Four boolean direction intents, one per screen edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirectionFlags {
    /// Towards the left edge.
    pub left: bool,
    /// Towards the right edge.
    pub right: bool,
    /// Towards the top edge.
    pub up: bool,
    /// Towards the bottom edge.
    pub down: bool,
}

impl DirectionFlags {
    /// No direction held.
    pub const NONE: Self = Self::new(false, false, false, false);

    /// Creates a new flag set in left, right, up, down order.
    #[must_use]
    pub const fn new(left: bool, right: bool, up: bool, down: bool) -> Self {
        Self {
            left,
            right,
            up,
            down,
        }
    }

    /// Reports whether no direction is held.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.left || self.right || self.up || self.down)
    }

    /// Unit step per axis: `right - left` and `down - up`.
    ///
    /// The result is not normalised, so diagonals are longer than axial steps.
    #[must_use]
    pub fn axis_steps(&self) -> Vec2 {
        let x = i32::from(self.right) - i32::from(self.left);
        let y = i32::from(self.down) - i32::from(self.up);
        Vec2::new(x as f32, y as f32)
    }
}

/// Input intents sampled once per tick by the presentation layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ControlState {
    /// Movement keys currently held.
    pub movement: DirectionFlags,
    /// Shooting keys currently held.
    pub shooting: DirectionFlags,
    /// Whether the restart key was pressed this frame.
    pub restart: bool,
}

/// Layout of the strips an exploding sprite breaks into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExplodeOrientation {
    /// Vertical strips flying apart horizontally.
    Horizontal,
    /// Horizontal strips flying apart vertically.
    Vertical,
    /// Horizontal strips flying apart along a diagonal.
    Diagonal {
        /// Whether strips travel along the top-right/bottom-left diagonal.
        mirrored: bool,
    },
}

impl ExplodeOrientation {
    /// Resolves the orientation from the direction a hero shot was travelling.
    #[must_use]
    pub const fn from_direction(direction: DirectionFlags) -> Self {
        let horizontal = direction.left || direction.right;
        let vertical = direction.up || direction.down;
        if horizontal && vertical {
            let mirrored = (direction.left && direction.up) || (direction.right && direction.down);
            return Self::Diagonal { mirrored };
        }
        if vertical {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }
}

/// Reference to a single animation frame in the sprite library.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpriteRef {
    /// Species whose sheet holds the frame.
    pub species: Species,
    /// Named animation within the sheet.
    pub action: &'static str,
    /// Frame index within the animation.
    pub frame: usize,
    /// Whether the frame is mirrored horizontally.
    pub flip_x: bool,
}

impl SpriteRef {
    /// Creates an unmirrored frame reference.
    #[must_use]
    pub const fn new(species: Species, action: &'static str, frame: usize) -> Self {
        Self {
            species,
            action,
            frame,
            flip_x: false,
        }
    }

    /// Returns the same frame with the requested mirroring.
    #[must_use]
    pub const fn flipped(mut self, flip_x: bool) -> Self {
        self.flip_x = flip_x;
        self
    }
}

/// Animation names requested from sprite sheets.
pub mod actions {
    /// Standing still.
    pub const IDLE: &str = "idle";
    /// Generic walk cycle.
    pub const WALK: &str = "walk";
    /// Hero walking left.
    pub const WALK_LEFT: &str = "walk_left";
    /// Hero walking right.
    pub const WALK_RIGHT: &str = "walk_right";
    /// Hero walking up.
    pub const WALK_UP: &str = "walk_up";
    /// Hero walking down.
    pub const WALK_DOWN: &str = "walk_down";
    /// Growth stages shown while an actor spawns in.
    pub const SPAWN: &str = "spawn";
    /// Pregnant enemy telegraph cycle.
    pub const PULSE: &str = "pulse";
    /// Marker left behind by a killed rescuable.
    pub const SKULL: &str = "skull";
    /// Electrode shapes.
    pub const ELECTRODE_VARIANTS: [&str; 3] = ["type_0", "type_1", "type_2"];
}

/// One animation a sprite sheet must provide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationSpec {
    /// Species owning the sheet.
    pub species: Species,
    /// Animation name.
    pub action: &'static str,
    /// Minimum number of frames.
    pub frames: usize,
}

const fn anim(species: Species, action: &'static str, frames: usize) -> AnimationSpec {
    AnimationSpec {
        species,
        action,
        frames,
    }
}

/// Every animation the simulation can request.
pub const ANIMATIONS: [AnimationSpec; 25] = [
    anim(Species::Hero, actions::IDLE, 1),
    anim(Species::Hero, actions::WALK_LEFT, 3),
    anim(Species::Hero, actions::WALK_RIGHT, 3),
    anim(Species::Hero, actions::WALK_UP, 3),
    anim(Species::Hero, actions::WALK_DOWN, 3),
    anim(Species::Grunt, actions::WALK, 3),
    anim(Species::Hulk, actions::WALK, 3),
    anim(Species::Spheroid, actions::PULSE, 7),
    anim(Species::Quark, actions::PULSE, 7),
    anim(Species::Enforcer, actions::SPAWN, 4),
    anim(Species::Enforcer, actions::IDLE, 1),
    anim(Species::Tank, actions::SPAWN, 4),
    anim(Species::Tank, actions::WALK, 4),
    anim(Species::Brain, actions::WALK, 3),
    anim(Species::Prog, actions::SPAWN, 6),
    anim(Species::Prog, actions::WALK, 3),
    anim(Species::Dad, actions::WALK, 3),
    anim(Species::Dad, actions::SKULL, 1),
    anim(Species::Mom, actions::WALK, 3),
    anim(Species::Mom, actions::SKULL, 1),
    anim(Species::Mike, actions::WALK, 3),
    anim(Species::Mike, actions::SKULL, 1),
    anim(Species::Electrode, actions::ELECTRODE_VARIANTS[0], 2),
    anim(Species::Electrode, actions::ELECTRODE_VARIANTS[1], 2),
    anim(Species::Electrode, actions::ELECTRODE_VARIANTS[2], 2),
];

/// Opaque colour used for transition squares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);

    /// Creates a colour from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Immutable copy of what an actor looked like at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteSnapshot {
    /// Frame being displayed.
    pub sprite: SpriteRef,
    /// Top-left corner in display pixels.
    pub position: Vec2,
    /// Dimensions in display pixels.
    pub size: Size,
}

/// Named sound effects understood by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Enforcer fired a shot.
    EnforcerFire,
    /// Grunts took a step.
    GruntWalk,
    /// The hero lost a life.
    HeroDeath,
    /// The hero fired a shot.
    HeroLazer,
    /// A rescuable was killed.
    HumanDie,
    /// A rescuable was saved.
    HumanSave,
    /// A wave transition started.
    LevelTransition,
    /// A brain converted a rescuable.
    ProgTransformation,
    /// A pregnant enemy released a child.
    QuarkSpawn,
    /// A tank was destroyed.
    TankExplode,
    /// A tank fired a shot.
    TankFire,
    /// A tank shot bounced off a wall.
    TankProjectileBounce,
}

impl SoundCue {
    /// Asset name of the sound.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            SoundCue::EnforcerFire => "enforcer_fire",
            SoundCue::GruntWalk => "grunt_walk",
            SoundCue::HeroDeath => "hero_death",
            SoundCue::HeroLazer => "hero_lazer",
            SoundCue::HumanDie => "human_die",
            SoundCue::HumanSave => "human_save",
            SoundCue::LevelTransition => "level_transition",
            SoundCue::ProgTransformation => "prog_transformation",
            SoundCue::QuarkSpawn => "quark_spawn",
            SoundCue::TankExplode => "tank_explode",
            SoundCue::TankFire => "tank_fire",
            SoundCue::TankProjectileBounce => "tank_projectile_bounce",
        }
    }
}

/// Phase currently driving the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The expanding-squares wipe is covering the screen.
    TransitionIn,
    /// Actors assemble into place while movement stays frozen.
    SpawnConverge,
    /// Normal play.
    Active,
    /// All lives are gone; only a restart is accepted.
    GameOver,
}

/// Kind of projectile, used for trajectory selection and presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    /// Straight laser bolt fired by the hero.
    HeroShot,
    /// Homing shot fired by enforcers.
    EnforcerShot,
    /// Homing shot fired by brains.
    BrainShot,
    /// Bouncing shell fired by tanks.
    TankShot,
}

/// What struck the hero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HitCause {
    /// Contact with an enemy body.
    Body(ActorId),
    /// Contact with an enemy projectile.
    Projectile(ProjectileId),
}

/// Commands that mutate the authoritative world state.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by one tick.
    Tick {
        /// Duration of the tick.
        dt: Duration,
    },
    /// Purges the play field, recentres the hero and begins the next wave.
    StartWave,
    /// Places a new actor on the play field.
    SpawnActor {
        /// Species of the new actor.
        species: Species,
        /// Top-left position of the new actor.
        position: Vec2,
    },
    /// Moves from the transition wipe into the convergence pause.
    BeginConvergence,
    /// Releases the convergence pause and starts normal play.
    Activate,
    /// Moves the hero and fires its weapon according to the held controls.
    StepHero {
        /// Controls held during this tick.
        controls: ControlState,
    },
    /// Runs the per-species behaviour of every non-hero actor.
    StepActors,
    /// Advances every projectile along its trajectory.
    StepProjectiles,
    /// Applies a hero shot hitting an enemy.
    StrikeEnemy {
        /// Shot that connected.
        projectile: ProjectileId,
        /// Enemy that was struck.
        enemy: ActorId,
    },
    /// Removes a hero shot that only overlapped enemies already resolved this frame.
    DiscardProjectile {
        /// Shot to remove.
        projectile: ProjectileId,
    },
    /// Destroys a hero shot together with the enemy shot it collided with.
    InterceptProjectile {
        /// Hero shot involved in the collision.
        hero_projectile: ProjectileId,
        /// Enemy shot involved in the collision.
        enemy_projectile: ProjectileId,
    },
    /// Costs the hero a life.
    HitHero {
        /// What touched the hero.
        cause: HitCause,
    },
    /// Kills a rescuable touched by a hostile actor.
    CaptureRescuable {
        /// Rescuable that was touched.
        rescuable: ActorId,
        /// Hostile actor that touched it.
        captor: ActorId,
    },
    /// Saves a rescuable touched by the hero.
    SaveRescuable {
        /// Rescuable that was touched.
        rescuable: ActorId,
    },
    /// Resets every counter after a game over.
    Restart,
}

/// Events broadcast by the world after applying commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The simulation clock advanced.
    TimeAdvanced {
        /// Duration of the tick.
        dt: Duration,
    },
    /// A new wave began and the play field was purged.
    WaveStarted {
        /// One-based wave number.
        wave: u32,
        /// Whether this is the first wave of a playthrough.
        first: bool,
    },
    /// The driving phase changed.
    PhaseChanged {
        /// Phase now in effect.
        phase: Phase,
    },
    /// An actor entered the play field.
    ActorSpawned {
        /// Identifier of the new actor.
        id: ActorId,
        /// Species of the new actor.
        species: Species,
        /// Top-left position of the new actor.
        position: Vec2,
    },
    /// An actor left the play field without being destroyed.
    ActorRetired {
        /// Identifier of the retired actor.
        id: ActorId,
        /// Species of the retired actor.
        species: Species,
    },
    /// A pregnant enemy released a child.
    ChildReleased {
        /// Parent species.
        parent: Species,
        /// Identifier of the child.
        child: ActorId,
    },
    /// A projectile was fired.
    ProjectileFired {
        /// Identifier of the new projectile.
        id: ProjectileId,
        /// Kind of projectile.
        kind: ProjectileKind,
    },
    /// A bouncing projectile reflected off a wall.
    ProjectileBounced {
        /// Identifier of the projectile.
        id: ProjectileId,
    },
    /// An enemy was destroyed by a hero shot.
    EnemyDestroyed {
        /// Identifier of the destroyed enemy.
        id: ActorId,
        /// Species of the destroyed enemy.
        species: Species,
        /// Appearance of the enemy at the moment of death.
        sprite: SpriteSnapshot,
        /// Strip layout derived from the shot direction.
        orientation: ExplodeOrientation,
    },
    /// A hulk was hit and slowed.
    HulkStaggered {
        /// Identifier of the hulk.
        id: ActorId,
        /// Unit direction the shot was travelling.
        direction: Vec2,
    },
    /// A hero shot destroyed an enemy shot.
    ProjectileIntercepted {
        /// Centre of the destroyed enemy shot.
        position: Vec2,
    },
    /// Points were added to the score.
    ScoreAwarded {
        /// Points added.
        points: u32,
        /// Score after the award.
        score: u32,
    },
    /// A bonus life was granted.
    LifeGained {
        /// Life count after the bonus.
        lives: u32,
    },
    /// The hero lost a life.
    HeroHit {
        /// Lives left after the hit.
        lives_remaining: u32,
    },
    /// The hero reappeared at the centre after losing a life.
    HeroRespawned {
        /// Identifier of the hero.
        hero: ActorId,
    },
    /// A hostile actor killed a rescuable.
    RescuableLost {
        /// Identifier of the rescuable.
        id: ActorId,
        /// Species of the rescuable.
        species: Species,
        /// Top-left position where it died.
        position: Vec2,
        /// Species responsible.
        captor: Species,
    },
    /// A brain turned a rescuable into a prog.
    RescuableConverted {
        /// Identifier of the new prog.
        prog: ActorId,
    },
    /// The hero saved a rescuable.
    RescuableSaved {
        /// Identifier of the rescuable.
        id: ActorId,
        /// Top-left position where it was saved.
        position: Vec2,
        /// Points awarded for the save.
        points: u32,
    },
    /// No wave-blocking enemy remains.
    WaveCleared {
        /// Wave that was cleared.
        wave: u32,
    },
    /// The last life was lost.
    GameOver {
        /// Final score.
        score: u32,
    },
    /// Counters were reset after a game over.
    GameReset,
    /// An actor asked for a sound cue to be played.
    SoundRequested {
        /// Cue to play.
        cue: SoundCue,
    },
}

/// Read-only view of an actor used by collision resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorSnapshot {
    /// Identifier of the actor.
    pub id: ActorId,
    /// Species of the actor.
    pub species: Species,
    /// Hitbox at the time of the snapshot.
    pub rect: Rect,
}

/// Read-only view of a projectile used by collision resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier of the projectile.
    pub id: ProjectileId,
    /// Kind of projectile.
    pub kind: ProjectileKind,
    /// Hitbox at the time of the snapshot.
    pub rect: Rect,
}

/// Read-only view of the hero used by collision resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeroSnapshot {
    /// Identifier of the hero.
    pub id: ActorId,
    /// Hitbox at the time of the snapshot.
    pub rect: Rect,
    /// Whether damage is currently ignored.
    pub invulnerable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges_touching_do_not_intersect() {
        let left = Rect::new(0, 0, 10, 10);
        let touching = Rect::new(10, 0, 10, 10);
        let overlapping = Rect::new(9, 9, 10, 10);

        assert!(!left.intersects(&touching));
        assert!(left.intersects(&overlapping));
        assert!(overlapping.intersects(&left));
    }

    #[test]
    fn hitbox_rounds_position() {
        let rect = Rect::from_position(Vec2::new(10.6, 3.4), Size::new(4, 5));
        assert_eq!(rect, Rect::new(11, 3, 4, 5));
    }

    #[test]
    fn play_area_sits_inside_border() {
        let area = play_area();
        assert_eq!(area, Rect::new(5, 20, 630, 440));
        assert_eq!(area.right(), DISPLAY_WIDTH - HUD_BORDER_THICKNESS);
        assert_eq!(area.bottom(), DISPLAY_HEIGHT - 20);
    }

    #[test]
    fn species_names_resolve_back() {
        for species in Species::ALL {
            assert_eq!(Species::from_name(species.name()), Some(species));
        }
        assert_eq!(Species::from_name("grunts"), None);
    }

    #[test]
    fn explode_orientation_follows_shot_direction() {
        let north = DirectionFlags::new(false, false, true, false);
        let east = DirectionFlags::new(false, true, false, false);
        let north_west = DirectionFlags::new(true, false, true, false);
        let north_east = DirectionFlags::new(false, true, true, false);
        let south_east = DirectionFlags::new(false, true, false, true);

        assert_eq!(
            ExplodeOrientation::from_direction(north),
            ExplodeOrientation::Horizontal
        );
        assert_eq!(
            ExplodeOrientation::from_direction(east),
            ExplodeOrientation::Vertical
        );
        assert_eq!(
            ExplodeOrientation::from_direction(north_west),
            ExplodeOrientation::Diagonal { mirrored: true }
        );
        assert_eq!(
            ExplodeOrientation::from_direction(south_east),
            ExplodeOrientation::Diagonal { mirrored: true }
        );
        assert_eq!(
            ExplodeOrientation::from_direction(north_east),
            ExplodeOrientation::Diagonal { mirrored: false }
        );
    }

    #[test]
    fn diagonal_axis_steps_are_not_normalised() {
        let steps = DirectionFlags::new(false, true, false, true).axis_steps();
        assert_eq!(steps, Vec2::new(1.0, 1.0));
        assert!(steps.length() > 1.0);
    }
}
