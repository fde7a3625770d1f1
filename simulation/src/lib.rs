#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame loop tying the world, the systems and the effects together.
//!
//! One tick runs in a fixed order: clock, phase director, hero, actors,
//! projectiles, collisions, then effects. Every batch of commands is applied
//! to the world before the systems react to the events it produced, so a
//! wave start and the spawns it triggers land in the same tick.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use robotron_core::{
    actions, display_rect, Command, ControlState, Event, ExplodeOrientation, Phase, SoundCue,
    Species, SpriteRef, TICK,
};
use robotron_rendering::{
    Color, HudPresentation, LabelPresentation, ProjectilePresentation, Scene, SpritePresentation,
};
use robotron_system_collision::{CollisionView, Collisions};
use robotron_system_effects::{ConvergeStyle, Effects, LabelContent, Transition};
use robotron_system_spawning::{Spawning, WaveTable, WaveTableError};
use robotron_system_waves::{DirectorView, WaveDirector};
use robotron_world::{apply, query, Config, World};

/// Most ticks run for a single rendered frame before time is dropped.
pub const MAX_CATCH_UP_TICKS: u32 = 5;

/// Errors that stop the frame loop.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// The wave table could not populate the wave that just started.
    #[error("wave table cannot populate the next wave")]
    WaveTable(#[from] WaveTableError),
}

/// Complete game state plus the systems that drive it.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    table: WaveTable,
    spawning: Spawning,
    collisions: Collisions,
    director: WaveDirector,
    effects: Effects,
    transition: Option<Transition>,
    rng: ChaCha8Rng,
    accumulator: Duration,
    restart_latched: bool,
    previous_events: Vec<Event>,
    tick_events: Vec<Event>,
    sounds: Vec<SoundCue>,
}

impl Simulation {
    /// Creates a simulation that starts the first wave on its first tick.
    #[must_use]
    pub fn new(config: Config, table: WaveTable) -> Self {
        let seed = config.rng_seed();
        Self {
            world: World::new(config),
            table,
            spawning: Spawning::new(robotron_system_spawning::Config::new(seed.wrapping_add(1))),
            collisions: Collisions::new(),
            director: WaveDirector::new(),
            effects: Effects::new(),
            transition: None,
            rng: ChaCha8Rng::seed_from_u64(seed.wrapping_add(2)),
            accumulator: Duration::ZERO,
            restart_latched: false,
            previous_events: Vec::new(),
            tick_events: Vec::new(),
            sounds: Vec::new(),
        }
    }

    /// Authoritative world state.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Effects currently playing.
    #[must_use]
    pub const fn effects(&self) -> &Effects {
        &self.effects
    }

    /// Screen wipe of the current wave, if one has started.
    #[must_use]
    pub const fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    /// Phase currently driving the world.
    #[must_use]
    pub fn phase(&self) -> Phase {
        query::phase(&self.world)
    }

    /// Feeds a real frame delta into the fixed-step accumulator.
    ///
    /// Runs every whole tick the accumulator holds, up to
    /// [`MAX_CATCH_UP_TICKS`], and returns how many ran. Time beyond the cap
    /// is discarded.
    pub fn advance(
        &mut self,
        frame_dt: Duration,
        controls: ControlState,
    ) -> Result<u32, SimulationError> {
        self.restart_latched |= controls.restart;
        self.accumulator += frame_dt;

        let mut ticks = 0;
        while self.accumulator >= TICK && ticks < MAX_CATCH_UP_TICKS {
            self.accumulator -= TICK;
            self.tick(controls)?;
            ticks += 1;
        }
        if self.accumulator >= TICK {
            tracing::debug!(dropped = ?self.accumulator, "frame loop fell behind");
            self.accumulator = Duration::ZERO;
        }
        Ok(ticks)
    }

    /// Runs exactly one tick with the given controls.
    pub fn tick(&mut self, controls: ControlState) -> Result<(), SimulationError> {
        let restart_requested = controls.restart || std::mem::take(&mut self.restart_latched);
        self.tick_events.clear();
        self.dispatch(vec![Command::Tick { dt: TICK }])?;

        let view = DirectorView {
            phase: query::phase(&self.world),
            transition_finished: self.transition.as_ref().map_or(true, Transition::finished),
            active_convergences: self.effects.active_convergences(),
            restart_requested,
        };
        let previous = std::mem::take(&mut self.previous_events);
        let mut commands = Vec::new();
        self.director.handle(&previous, view, &mut commands);
        self.dispatch(commands)?;

        if query::phase(&self.world) == Phase::Active {
            self.dispatch(vec![
                Command::StepHero { controls },
                Command::StepActors,
                Command::StepProjectiles,
            ])?;

            let actors = query::actor_snapshots(&self.world);
            let hero_projectiles = query::hero_projectile_snapshots(&self.world);
            let enemy_projectiles = query::enemy_projectile_snapshots(&self.world);
            let mut commands = Vec::new();
            self.collisions.handle(
                CollisionView {
                    hero: Some(query::hero_snapshot(&self.world)),
                    actors: &actors,
                    hero_projectiles: &hero_projectiles,
                    enemy_projectiles: &enemy_projectiles,
                },
                &mut commands,
            );
            self.dispatch(commands)?;
        }

        self.effects.advance(TICK);
        if let Some(transition) = &mut self.transition {
            transition.advance(TICK, &mut self.rng);
        }
        let world = &self.world;
        self.effects
            .forget_missing(|id| query::actor_position(world, id).is_some());

        self.previous_events = std::mem::take(&mut self.tick_events);
        Ok(())
    }

    /// Rebuilds `scene` from the current state and hands over queued sounds.
    pub fn populate_scene(&mut self, scene: &mut Scene) {
        scene.clear();
        let world = &self.world;

        let progression = query::progression(world);
        scene.hud = HudPresentation {
            score: progression.score(),
            wave: progression.wave(),
            lives: progression.lives(),
            game_over: query::phase(world) == Phase::GameOver,
        };

        for actor in query::actors(world) {
            for position in actor.afterimages() {
                scene.sprites.push(SpritePresentation {
                    sprite: actor.sprite(),
                    position,
                    size: actor.species().profile().size,
                    additive_tint: Some(Color::AFTERIMAGE),
                });
            }
        }
        let hero = query::hero(world);
        for actor in query::actors(world).iter().chain(std::iter::once(hero)) {
            if self.effects.is_converging(actor.id()) {
                continue;
            }
            let snapshot = actor.snapshot();
            scene.sprites.push(SpritePresentation {
                sprite: snapshot.sprite,
                position: snapshot.position,
                size: snapshot.size,
                additive_tint: None,
            });
        }

        let projectiles = query::hero_projectiles(world)
            .iter()
            .chain(query::enemy_projectiles(world));
        for projectile in projectiles {
            scene.projectiles.push(ProjectilePresentation {
                kind: projectile.kind(),
                rect: projectile.rect(),
            });
        }

        self.effects
            .draw(|id| query::actor_position(world, id), &mut scene.strips);
        for label in self.effects.labels().iter() {
            scene.labels.push(LabelPresentation {
                content: label.content.clone(),
                position: label.position,
            });
        }

        if let Some(transition) = &self.transition {
            transition.draw(&mut scene.overlay);
        }
        scene.sounds.append(&mut self.sounds);
    }

    fn dispatch(&mut self, mut commands: Vec<Command>) -> Result<(), SimulationError> {
        let mut events = Vec::new();
        while !commands.is_empty() {
            events.clear();
            for command in std::mem::take(&mut commands) {
                apply(&mut self.world, command, &mut events);
            }
            self.spawning.handle(&events, &self.table, &mut commands)?;
            self.observe(&events);
            self.tick_events.append(&mut events);
        }
        Ok(())
    }

    fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::WaveStarted { first, .. } => {
                    self.effects.clear();
                    self.transition =
                        Some(Transition::for_wave(*first, display_rect(), &mut self.rng));
                }
                Event::PhaseChanged {
                    phase: Phase::SpawnConverge,
                } => self.converge_everyone(),
                Event::EnemyDestroyed {
                    species,
                    sprite,
                    orientation,
                    ..
                } => {
                    if *species == Species::Electrode {
                        self.effects.shrink(*sprite);
                    } else {
                        self.effects.explode(*sprite, *orientation);
                    }
                }
                Event::HeroRespawned { hero } => {
                    let snapshot = query::hero(&self.world).snapshot();
                    self.effects.converge(*hero, snapshot, ConvergeStyle::All);
                }
                Event::RescuableSaved {
                    position, points, ..
                } => {
                    let _ = self
                        .effects
                        .float_label(LabelContent::Text(points.to_string()), *position);
                }
                Event::RescuableLost {
                    species, position, ..
                } => {
                    let skull = SpriteRef::new(*species, actions::SKULL, 0);
                    let _ = self
                        .effects
                        .float_label(LabelContent::Icon(skull), *position);
                }
                Event::SoundRequested { cue } => {
                    tracing::trace!(cue = cue.name(), "sound cue");
                    self.sounds.push(*cue);
                }
                Event::GameReset => self.effects.clear(),
                _ => {}
            }
        }
    }

    fn converge_everyone(&mut self) {
        let hero = query::hero(&self.world);
        self.effects
            .converge(hero.id(), hero.snapshot(), ConvergeStyle::All);
        for actor in query::actors(&self.world) {
            let orientation = if self.rng.gen_bool(0.5) {
                ExplodeOrientation::Horizontal
            } else {
                ExplodeOrientation::Vertical
            };
            self.effects.converge(
                actor.id(),
                actor.snapshot(),
                ConvergeStyle::Single(orientation),
            );
        }
    }
}
