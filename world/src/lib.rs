#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the arena.
//!
//! The world owns the hero, every other actor, both projectile groups and the
//! running progression. Nothing outside this crate mutates it: systems push
//! [`Command`]s, [`apply`] executes them one at a time and reports what
//! happened as [`Event`]s, and [`query`] exposes read-only views.

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use robotron_core::{
    display_center, display_rect, play_area, ActorId, Command, ControlState, Event, Faction,
    HitCause, Phase, ProjectileId, ProjectileKind, Rect, SoundCue, Species,
};
use robotron_system_behavior::{
    Actor, BehaviorContext, BehaviorRequest, HERO_RESPAWN_INVULNERABILITY,
};

pub use robotron_system_behavior::AxisLock;
use robotron_system_projectiles::{Projectile, ProjectileContext, ProjectileStatus};
use robotron_system_scoring::{Award, Progression, STARTING_LIVES};

const HERO_ID: ActorId = ActorId::new(0);

/// Start-up parameters of a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    rng_seed: u64,
    starting_lives: u32,
    hulk_axis: AxisLock,
}

impl Config {
    /// Creates a configuration seeded with `rng_seed` and the default life count.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            starting_lives: STARTING_LIVES,
            hulk_axis: AxisLock::Free,
        }
    }

    /// Overrides the number of lives a playthrough starts with.
    #[must_use]
    pub const fn with_starting_lives(mut self, starting_lives: u32) -> Self {
        self.starting_lives = starting_lives;
        self
    }

    /// Starts every hulk on `hulk_axis`; [`AxisLock::Free`] picks one per hulk.
    #[must_use]
    pub const fn with_hulk_axis(mut self, hulk_axis: AxisLock) -> Self {
        self.hulk_axis = hulk_axis;
        self
    }

    /// Seed of the behaviour and trajectory generator.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Lives granted at the start of every playthrough.
    #[must_use]
    pub const fn starting_lives(&self) -> u32 {
        self.starting_lives
    }
}

/// Represents the authoritative game state.
#[derive(Debug)]
pub struct World {
    area: Rect,
    hero: Actor,
    actors: Vec<Actor>,
    hero_projectiles: Vec<Projectile>,
    enemy_projectiles: Vec<Projectile>,
    progression: Progression,
    phase: Phase,
    wave_cleared: bool,
    next_actor: u32,
    next_projectile: u32,
    tick_index: u64,
    hulk_axis: AxisLock,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a world with the hero at the centre and no wave running.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        let area = play_area();
        let hero = Actor::spawn(HERO_ID, Species::Hero, hero_spawn_point(), area, &mut rng);
        Self {
            area,
            hero,
            actors: Vec::new(),
            hero_projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            progression: Progression::new(config.starting_lives),
            phase: Phase::TransitionIn,
            wave_cleared: false,
            next_actor: HERO_ID.get() + 1,
            next_projectile: 0,
            tick_index: 0,
            hulk_axis: config.hulk_axis,
            rng,
        }
    }

    fn allocate_actor(&mut self) -> ActorId {
        let id = ActorId::new(self.next_actor);
        self.next_actor = self.next_actor.wrapping_add(1);
        id
    }

    fn allocate_projectile(&mut self) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile);
        self.next_projectile = self.next_projectile.wrapping_add(1);
        id
    }

    fn actor_index(&self, id: ActorId) -> Option<usize> {
        self.actors.iter().position(|actor| actor.id() == id)
    }

    fn take_actor(&mut self, id: ActorId) -> Option<Actor> {
        self.actor_index(id).map(|index| self.actors.remove(index))
    }

    fn take_hero_projectile(&mut self, id: ProjectileId) -> Option<Projectile> {
        let index = self
            .hero_projectiles
            .iter()
            .position(|projectile| projectile.id() == id)?;
        Some(self.hero_projectiles.remove(index))
    }

    fn take_enemy_projectile(&mut self, id: ProjectileId) -> Option<Projectile> {
        let index = self
            .enemy_projectiles
            .iter()
            .position(|projectile| projectile.id() == id)?;
        Some(self.enemy_projectiles.remove(index))
    }

    fn purge(&mut self) {
        self.actors.clear();
        self.hero_projectiles.clear();
        self.enemy_projectiles.clear();
    }

    fn add_actor(&mut self, species: Species, position: Vec2) -> ActorId {
        let id = self.allocate_actor();
        let actor = Actor::spawn(id, species, position, self.area, &mut self.rng)
            .with_hulk_axis(self.hulk_axis);
        self.actors.push(actor);
        id
    }

    fn set_phase(&mut self, phase: Phase, out_events: &mut Vec<Event>) {
        if self.phase == phase {
            return;
        }
        self.phase = phase;
        tracing::debug!(?phase, "phase changed");
        out_events.push(Event::PhaseChanged { phase });
    }

    fn step_hero(&mut self, controls: &ControlState, out_events: &mut Vec<Event>) {
        let mut requests = Vec::new();
        self.hero.update_hero(controls, self.area, &mut requests);
        for request in requests {
            if let BehaviorRequest::FireHeroShot { origin, direction } = request {
                let id = self.allocate_projectile();
                self.hero_projectiles
                    .push(Projectile::hero_shot(id, origin, direction));
                out_events.push(Event::ProjectileFired {
                    id,
                    kind: ProjectileKind::HeroShot,
                });
                out_events.push(Event::SoundRequested {
                    cue: SoundCue::HeroLazer,
                });
            }
        }
    }

    fn step_actors(&mut self, out_events: &mut Vec<Event>) {
        let hero = self.hero.position();
        let rescuables: Vec<Vec2> = self
            .actors
            .iter()
            .filter(|actor| actor.species().faction() == Faction::Rescuable)
            .map(Actor::position)
            .collect();
        let ctx = BehaviorContext {
            hero,
            rescuables: &rescuables,
            bounds: self.area,
        };

        let mut births: Vec<(Species, Species, Vec2)> = Vec::new();
        let mut retired: Vec<ActorId> = Vec::new();
        let mut shots: Vec<(ProjectileKind, Vec2)> = Vec::new();
        let mut requests = Vec::new();

        for actor in &mut self.actors {
            requests.clear();
            actor.update(&ctx, &mut self.rng, &mut requests);
            for request in requests.drain(..) {
                match request {
                    BehaviorRequest::Release { child, position } => {
                        births.push((actor.species(), child, position));
                    }
                    BehaviorRequest::Retire => retired.push(actor.id()),
                    BehaviorRequest::FireEnemyShot { kind, origin } => shots.push((kind, origin)),
                    BehaviorRequest::Sound(cue) => {
                        out_events.push(Event::SoundRequested { cue });
                    }
                    BehaviorRequest::FireHeroShot { .. } => {}
                }
            }
        }

        for id in retired {
            if let Some(actor) = self.take_actor(id) {
                out_events.push(Event::ActorRetired {
                    id,
                    species: actor.species(),
                });
            }
        }

        for (parent, child, position) in births {
            let id = self.add_actor(child, position);
            out_events.push(Event::ChildReleased { parent, child: id });
        }

        let target = self.hero.rect().center();
        for (kind, origin) in shots {
            let id = self.allocate_projectile();
            let projectile = Projectile::enemy_shot(id, kind, origin, target, &mut self.rng);
            self.enemy_projectiles.push(projectile);
            out_events.push(Event::ProjectileFired { id, kind });
            let cue = match kind {
                ProjectileKind::TankShot => Some(SoundCue::TankFire),
                ProjectileKind::EnforcerShot => Some(SoundCue::EnforcerFire),
                ProjectileKind::BrainShot | ProjectileKind::HeroShot => None,
            };
            if let Some(cue) = cue {
                out_events.push(Event::SoundRequested { cue });
            }
        }
    }

    fn step_projectiles(&mut self, out_events: &mut Vec<Event>) {
        let ctx = ProjectileContext {
            hero: self.hero.rect().center(),
            area: self.area,
            display: display_rect(),
        };

        self.hero_projectiles.retain_mut(|projectile| {
            projectile.advance(&ctx, &mut self.rng) != ProjectileStatus::Expired
        });

        self.enemy_projectiles
            .retain_mut(|projectile| match projectile.advance(&ctx, &mut self.rng) {
                ProjectileStatus::Flying => true,
                ProjectileStatus::Bounced => {
                    out_events.push(Event::ProjectileBounced {
                        id: projectile.id(),
                    });
                    out_events.push(Event::SoundRequested {
                        cue: SoundCue::TankProjectileBounce,
                    });
                    true
                }
                ProjectileStatus::Expired => false,
            });
    }

    fn strike_enemy(
        &mut self,
        projectile: ProjectileId,
        enemy: ActorId,
        out_events: &mut Vec<Event>,
    ) {
        let Some(shot) = self.take_hero_projectile(projectile) else {
            return;
        };
        let Some(index) = self.actor_index(enemy) else {
            return;
        };

        let species = self.actors[index].species();
        if species.is_invulnerable() {
            let direction = shot.heading();
            self.actors[index].stagger(direction);
            out_events.push(Event::HulkStaggered {
                id: enemy,
                direction,
            });
            return;
        }

        let actor = self.actors.remove(index);
        out_events.push(Event::EnemyDestroyed {
            id: enemy,
            species,
            sprite: actor.snapshot(),
            orientation: shot.explode_orientation(),
        });
        if species == Species::Tank {
            out_events.push(Event::SoundRequested {
                cue: SoundCue::TankExplode,
            });
        }
        let _ = self.progression.award(Award::Kill(species), out_events);
    }

    fn intercept(
        &mut self,
        hero_projectile: ProjectileId,
        enemy_projectile: ProjectileId,
        out_events: &mut Vec<Event>,
    ) {
        let exists = self
            .hero_projectiles
            .iter()
            .any(|projectile| projectile.id() == hero_projectile);
        if !exists {
            return;
        }
        let Some(enemy_shot) = self.take_enemy_projectile(enemy_projectile) else {
            return;
        };
        let _ = self.take_hero_projectile(hero_projectile);
        out_events.push(Event::ProjectileIntercepted {
            position: enemy_shot.rect().center(),
        });
        let _ = self.progression.award(Award::Intercept, out_events);
    }

    fn hit_hero(&mut self, cause: HitCause, out_events: &mut Vec<Event>) {
        if self.phase != Phase::Active || self.hero.is_invulnerable() {
            return;
        }
        let cause_present = match cause {
            HitCause::Body(id) => self.actor_index(id).is_some(),
            HitCause::Projectile(id) => self.take_enemy_projectile(id).is_some(),
        };
        if !cause_present {
            return;
        }

        let lives_remaining = self.progression.lose_life();
        out_events.push(Event::HeroHit { lives_remaining });
        out_events.push(Event::SoundRequested {
            cue: SoundCue::HeroDeath,
        });

        if lives_remaining > 0 {
            self.hero.place_at(hero_spawn_point());
            self.hero
                .grant_invulnerability(HERO_RESPAWN_INVULNERABILITY);
            out_events.push(Event::HeroRespawned { hero: HERO_ID });
            return;
        }

        let score = self.progression.score();
        tracing::info!(score, wave = self.progression.wave(), "game over");
        self.set_phase(Phase::GameOver, out_events);
        out_events.push(Event::GameOver { score });
    }

    fn capture(&mut self, rescuable: ActorId, captor: ActorId, out_events: &mut Vec<Event>) {
        let Some((captor_species, captor_position)) = self
            .actor_index(captor)
            .map(|index| (self.actors[index].species(), self.actors[index].position()))
        else {
            return;
        };
        let Some(victim) = self.take_actor(rescuable) else {
            return;
        };

        out_events.push(Event::RescuableLost {
            id: rescuable,
            species: victim.species(),
            position: victim.position(),
            captor: captor_species,
        });
        out_events.push(Event::SoundRequested {
            cue: SoundCue::HumanDie,
        });

        if captor_species == Species::Brain {
            let prog = self.add_actor(Species::Prog, captor_position);
            out_events.push(Event::RescuableConverted { prog });
            out_events.push(Event::SoundRequested {
                cue: SoundCue::ProgTransformation,
            });
        }
    }

    fn save(&mut self, rescuable: ActorId, out_events: &mut Vec<Event>) {
        let Some(saved) = self.take_actor(rescuable) else {
            return;
        };
        let points = self.progression.award(Award::Rescue, out_events);
        out_events.push(Event::RescuableSaved {
            id: rescuable,
            position: saved.position(),
            points,
        });
        out_events.push(Event::SoundRequested {
            cue: SoundCue::HumanSave,
        });
    }

    fn check_wave_clear(&mut self, out_events: &mut Vec<Event>) {
        if self.phase != Phase::Active || self.wave_cleared {
            return;
        }
        let blocked = self
            .actors
            .iter()
            .any(|actor| actor.species().blocks_wave_clear());
        if !blocked {
            self.wave_cleared = true;
            out_events.push(Event::WaveCleared {
                wave: self.progression.wave(),
            });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::StartWave => {
            world.purge();
            world.hero.place_at(hero_spawn_point());
            world.wave_cleared = false;
            let wave = world.progression.begin_wave();
            tracing::info!(wave, "wave started");
            out_events.push(Event::WaveStarted {
                wave,
                first: wave == 1,
            });
            out_events.push(Event::SoundRequested {
                cue: SoundCue::LevelTransition,
            });
            world.set_phase(Phase::TransitionIn, out_events);
        }
        Command::SpawnActor { species, position } => {
            if species == Species::Hero {
                tracing::warn!("ignoring request to spawn a second hero");
                return;
            }
            let id = world.add_actor(species, position);
            out_events.push(Event::ActorSpawned {
                id,
                species,
                position,
            });
        }
        Command::BeginConvergence => {
            if world.phase == Phase::TransitionIn {
                world.set_phase(Phase::SpawnConverge, out_events);
            }
        }
        Command::Activate => {
            if world.phase == Phase::SpawnConverge {
                world.set_phase(Phase::Active, out_events);
            }
        }
        Command::StepHero { controls } => {
            if world.phase == Phase::Active {
                world.step_hero(&controls, out_events);
            }
        }
        Command::StepActors => {
            if world.phase == Phase::Active {
                world.step_actors(out_events);
            }
        }
        Command::StepProjectiles => {
            if world.phase == Phase::Active {
                world.step_projectiles(out_events);
            }
        }
        Command::StrikeEnemy { projectile, enemy } => {
            world.strike_enemy(projectile, enemy, out_events);
        }
        Command::DiscardProjectile { projectile } => {
            let _ = world.take_hero_projectile(projectile);
        }
        Command::InterceptProjectile {
            hero_projectile,
            enemy_projectile,
        } => world.intercept(hero_projectile, enemy_projectile, out_events),
        Command::HitHero { cause } => world.hit_hero(cause, out_events),
        Command::CaptureRescuable { rescuable, captor } => {
            world.capture(rescuable, captor, out_events);
        }
        Command::SaveRescuable { rescuable } => world.save(rescuable, out_events),
        Command::Restart => {
            if world.phase != Phase::GameOver {
                return;
            }
            tracing::info!(score = world.progression.score(), "restarting");
            world.progression.reset();
            world.purge();
            world.hero.place_at(hero_spawn_point());
            out_events.push(Event::GameReset);
        }
    }

    world.check_wave_clear(out_events);
}

fn hero_spawn_point() -> Vec2 {
    display_center() - Species::Hero.profile().size.as_vec2() / 2.0
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec2;
    use robotron_core::{
        ActorId, ActorSnapshot, HeroSnapshot, Phase, ProjectileSnapshot, Rect,
    };
    use robotron_system_behavior::Actor;
    use robotron_system_projectiles::Projectile;
    use robotron_system_scoring::Progression;

    use super::World;

    /// Phase currently driving the simulation.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// Score, lives and wave counters.
    #[must_use]
    pub fn progression(world: &World) -> &Progression {
        &world.progression
    }

    /// Number of ticks applied since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Region actors and enemy shots are confined to.
    #[must_use]
    pub fn play_area(world: &World) -> Rect {
        world.area
    }

    /// The hero actor.
    #[must_use]
    pub fn hero(world: &World) -> &Actor {
        &world.hero
    }

    /// Collision view of the hero.
    #[must_use]
    pub fn hero_snapshot(world: &World) -> HeroSnapshot {
        HeroSnapshot {
            id: world.hero.id(),
            rect: world.hero.rect(),
            invulnerable: world.hero.is_invulnerable(),
        }
    }

    /// Every actor except the hero, in spawn order.
    #[must_use]
    pub fn actors(world: &World) -> &[Actor] {
        &world.actors
    }

    /// Collision views of every actor except the hero.
    #[must_use]
    pub fn actor_snapshots(world: &World) -> Vec<ActorSnapshot> {
        world
            .actors
            .iter()
            .map(|actor| ActorSnapshot {
                id: actor.id(),
                species: actor.species(),
                rect: actor.rect(),
            })
            .collect()
    }

    /// Live top-left position of any actor, including the hero.
    #[must_use]
    pub fn actor_position(world: &World, id: ActorId) -> Option<Vec2> {
        if id == world.hero.id() {
            return Some(world.hero.position());
        }
        world
            .actors
            .iter()
            .find(|actor| actor.id() == id)
            .map(Actor::position)
    }

    /// Shots fired by the hero.
    #[must_use]
    pub fn hero_projectiles(world: &World) -> &[Projectile] {
        &world.hero_projectiles
    }

    /// Shots fired by enemies.
    #[must_use]
    pub fn enemy_projectiles(world: &World) -> &[Projectile] {
        &world.enemy_projectiles
    }

    /// Collision views of the hero's shots.
    #[must_use]
    pub fn hero_projectile_snapshots(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .hero_projectiles
            .iter()
            .map(Projectile::snapshot)
            .collect()
    }

    /// Collision views of the enemies' shots.
    #[must_use]
    pub fn enemy_projectile_snapshots(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .enemy_projectiles
            .iter()
            .map(Projectile::snapshot)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hero_spawns_centred_on_the_display() {
        let world = World::new(Config::new(1));
        let centre = query::hero(&world).rect().center();
        assert!((centre - display_center()).length() <= 1.0);
    }

    #[test]
    fn identifiers_never_collide_with_the_hero() {
        let mut world = World::new(Config::new(1));
        let first = world.allocate_actor();
        assert_ne!(first, HERO_ID);
        assert_ne!(world.allocate_actor(), first);
    }
}
