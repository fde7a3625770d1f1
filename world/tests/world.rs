use glam::Vec2;
use robotron_core::{
    ActorId, Command, ControlState, DirectionFlags, Event, ExplodeOrientation, HitCause, Phase,
    ProjectileId, ProjectileKind, SoundCue, Species, TICK,
};
use robotron_system_behavior::{GRUNT_MOVE_INTERVAL, GRUNT_SCALER};
use robotron_world::{apply, query, Config, World};

#[test]
fn first_wave_starts_in_the_transition() {
    let mut world = World::new(Config::new(7));
    let mut events = Vec::new();

    apply(&mut world, Command::StartWave, &mut events);

    assert!(events.contains(&Event::WaveStarted {
        wave: 1,
        first: true
    }));
    assert!(events.contains(&Event::SoundRequested {
        cue: SoundCue::LevelTransition
    }));
    assert_eq!(query::phase(&world), Phase::TransitionIn);
    assert_eq!(query::progression(&world).wave(), 1);
}

#[test]
fn gameplay_steps_are_frozen_until_active() {
    let mut world = World::new(Config::new(7));
    let mut events = Vec::new();
    apply(&mut world, Command::StartWave, &mut events);
    let before = query::hero(&world).position();

    apply(
        &mut world,
        Command::StepHero {
            controls: moving_right(),
        },
        &mut events,
    );
    apply(&mut world, Command::Activate, &mut events);

    assert_eq!(query::hero(&world).position(), before);
    assert_eq!(query::phase(&world), Phase::TransitionIn);
}

#[test]
fn grunt_closes_in_on_the_hero() {
    let mut world = World::new(Config::new(7));
    let hero = query::hero(&world).position();
    let ids = start(&mut world, &[(Species::Grunt, hero + Vec2::new(50.0, 0.0))]);

    let mut events = Vec::new();
    for _ in 0..GRUNT_MOVE_INTERVAL - 1 {
        apply(&mut world, Command::StepActors, &mut events);
    }
    assert_eq!(position(&world, ids[0]), hero + Vec2::new(50.0, 0.0));

    apply(&mut world, Command::StepActors, &mut events);
    assert_eq!(
        position(&world, ids[0]),
        hero + Vec2::new(50.0 - GRUNT_SCALER, 0.0)
    );
    assert!(events.contains(&Event::SoundRequested {
        cue: SoundCue::GruntWalk
    }));
}

#[test]
fn striking_the_last_blocker_clears_the_wave() {
    let mut world = World::new(Config::new(7));
    let ids = start(
        &mut world,
        &[
            (Species::Grunt, Vec2::new(40.0, 40.0)),
            (Species::Hulk, Vec2::new(500.0, 400.0)),
        ],
    );
    let shot = fire_hero_shot(&mut world);
    let mut events = Vec::new();

    apply(
        &mut world,
        Command::StrikeEnemy {
            projectile: shot,
            enemy: ids[0],
        },
        &mut events,
    );

    let destroyed = events.iter().find_map(|event| match event {
        Event::EnemyDestroyed {
            id,
            species,
            orientation,
            ..
        } => Some((*id, *species, *orientation)),
        _ => None,
    });
    assert_eq!(
        destroyed,
        Some((ids[0], Species::Grunt, ExplodeOrientation::Vertical))
    );
    assert!(events.contains(&Event::ScoreAwarded {
        points: 100,
        score: 100
    }));
    assert!(events.contains(&Event::WaveCleared { wave: 1 }));
    assert!(query::hero_projectiles(&world).is_empty());
    assert_eq!(query::actors(&world).len(), 1, "hulks do not block the clear");

    events.clear();
    apply(&mut world, Command::StepActors, &mut events);
    assert!(
        !events.contains(&Event::WaveCleared { wave: 1 }),
        "a wave clears once"
    );
}

#[test]
fn hulk_absorbs_the_shot_and_staggers() {
    let mut world = World::new(Config::new(7));
    let ids = start(
        &mut world,
        &[
            (Species::Hulk, Vec2::new(40.0, 40.0)),
            (Species::Grunt, Vec2::new(500.0, 400.0)),
        ],
    );
    let start = position(&world, ids[0]);
    let shot = fire_hero_shot(&mut world);
    let mut events = Vec::new();

    apply(
        &mut world,
        Command::StrikeEnemy {
            projectile: shot,
            enemy: ids[0],
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::HulkStaggered {
            id: ids[0],
            direction: Vec2::X,
        }]
    );
    assert!(position(&world, ids[0]).x > start.x);
    assert_eq!(query::progression(&world).score(), 0);
}

#[test]
fn losing_a_life_recentres_the_hero_with_invulnerability() {
    let mut world = World::new(Config::new(7));
    let ids = start(&mut world, &[(Species::Grunt, Vec2::new(40.0, 40.0))]);
    let spawn = query::hero(&world).position();
    let mut events = Vec::new();
    for _ in 0..30 {
        apply(
            &mut world,
            Command::StepHero {
                controls: moving_right(),
            },
            &mut events,
        );
    }
    assert_ne!(query::hero(&world).position(), spawn);

    events.clear();
    let hit = Command::HitHero {
        cause: HitCause::Body(ids[0]),
    };
    apply(&mut world, hit.clone(), &mut events);

    assert!(events.contains(&Event::HeroHit { lives_remaining: 2 }));
    assert!(events.contains(&Event::HeroRespawned {
        hero: query::hero(&world).id()
    }));
    assert_eq!(query::hero(&world).position(), spawn);
    assert!(query::hero_snapshot(&world).invulnerable);

    events.clear();
    apply(&mut world, hit, &mut events);
    assert!(events.is_empty(), "invulnerable hero ignores contact");
    assert_eq!(query::progression(&world).lives(), 2);
}

#[test]
fn contact_from_a_destroyed_enemy_costs_nothing() {
    let mut world = World::new(Config::new(7));
    let ids = start(
        &mut world,
        &[
            (Species::Grunt, Vec2::new(40.0, 40.0)),
            (Species::Grunt, Vec2::new(500.0, 400.0)),
        ],
    );
    let shot = fire_hero_shot(&mut world);
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::StrikeEnemy {
            projectile: shot,
            enemy: ids[0],
        },
        &mut events,
    );

    events.clear();
    apply(
        &mut world,
        Command::HitHero {
            cause: HitCause::Body(ids[0]),
        },
        &mut events,
    );

    assert!(events.is_empty());
    assert_eq!(query::progression(&world).lives(), 3);
}

#[test]
fn last_life_ends_the_game_until_restart() {
    let mut world = World::new(Config::new(7).with_starting_lives(1));
    let ids = start(&mut world, &[(Species::Grunt, Vec2::new(40.0, 40.0))]);
    let mut events = Vec::new();

    apply(
        &mut world,
        Command::HitHero {
            cause: HitCause::Body(ids[0]),
        },
        &mut events,
    );

    assert!(events.contains(&Event::HeroHit { lives_remaining: 0 }));
    assert!(events.contains(&Event::PhaseChanged {
        phase: Phase::GameOver
    }));
    assert!(events.contains(&Event::GameOver { score: 0 }));

    events.clear();
    apply(&mut world, Command::StepActors, &mut events);
    assert!(events.is_empty(), "game over freezes the field");

    apply(&mut world, Command::Restart, &mut events);
    assert_eq!(events, vec![Event::GameReset]);
    assert_eq!(query::progression(&world).lives(), 1);
    assert!(query::actors(&world).is_empty());

    events.clear();
    apply(&mut world, Command::StartWave, &mut events);
    assert!(events.contains(&Event::WaveStarted {
        wave: 1,
        first: true
    }));
    assert_eq!(query::phase(&world), Phase::TransitionIn);
}

#[test]
fn restart_is_ignored_while_playing() {
    let mut world = World::new(Config::new(7));
    let _ = start(&mut world, &[(Species::Grunt, Vec2::new(40.0, 40.0))]);
    let mut events = Vec::new();

    apply(&mut world, Command::Restart, &mut events);

    assert!(events.is_empty());
    assert_eq!(query::actors(&world).len(), 1);
}

#[test]
fn brain_converts_its_victim_into_a_prog() {
    let mut world = World::new(Config::new(7));
    let brain_at = Vec2::new(100.0, 100.0);
    let ids = start(
        &mut world,
        &[
            (Species::Mom, Vec2::new(110.0, 100.0)),
            (Species::Brain, brain_at),
        ],
    );
    let mut events = Vec::new();

    apply(
        &mut world,
        Command::CaptureRescuable {
            rescuable: ids[0],
            captor: ids[1],
        },
        &mut events,
    );

    assert!(events.contains(&Event::RescuableLost {
        id: ids[0],
        species: Species::Mom,
        position: Vec2::new(110.0, 100.0),
        captor: Species::Brain,
    }));
    let prog = events.iter().find_map(|event| match event {
        Event::RescuableConverted { prog } => Some(*prog),
        _ => None,
    });
    let prog = prog.expect("brain spawns a prog");
    assert_eq!(position(&world, prog), brain_at);
    assert_eq!(species(&world, prog), Some(Species::Prog));
    assert_eq!(species(&world, ids[0]), None);
}

#[test]
fn hulk_kills_without_converting() {
    let mut world = World::new(Config::new(7));
    let ids = start(
        &mut world,
        &[
            (Species::Dad, Vec2::new(110.0, 100.0)),
            (Species::Hulk, Vec2::new(100.0, 100.0)),
            (Species::Grunt, Vec2::new(500.0, 400.0)),
        ],
    );
    let mut events = Vec::new();

    apply(
        &mut world,
        Command::CaptureRescuable {
            rescuable: ids[0],
            captor: ids[1],
        },
        &mut events,
    );

    assert!(events.contains(&Event::SoundRequested {
        cue: SoundCue::HumanDie
    }));
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::RescuableConverted { .. })));
    assert_eq!(query::actors(&world).len(), 2);
}

#[test]
fn saves_grow_the_multiplier() {
    let mut world = World::new(Config::new(7));
    let ids = start(
        &mut world,
        &[
            (Species::Mom, Vec2::new(40.0, 40.0)),
            (Species::Mike, Vec2::new(80.0, 40.0)),
            (Species::Grunt, Vec2::new(500.0, 400.0)),
        ],
    );
    let mut events = Vec::new();

    apply(&mut world, Command::SaveRescuable { rescuable: ids[0] }, &mut events);
    apply(&mut world, Command::SaveRescuable { rescuable: ids[1] }, &mut events);

    let saved: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            Event::RescuableSaved { points, .. } => Some(*points),
            _ => None,
        })
        .collect();
    assert_eq!(saved, vec![1000, 2000]);
    assert_eq!(query::progression(&world).score(), 3000);
}

#[test]
fn intercepting_a_shot_removes_both_projectiles() {
    let mut world = World::new(Config::new(7));
    let _ = start(&mut world, &[(Species::Brain, Vec2::new(40.0, 40.0))]);
    let hero_shot = fire_hero_shot(&mut world);

    let mut events = Vec::new();
    let mut enemy_shot = None;
    for _ in 0..200 {
        apply(&mut world, Command::StepActors, &mut events);
        enemy_shot = events.iter().find_map(|event| match event {
            Event::ProjectileFired {
                id,
                kind: ProjectileKind::BrainShot,
            } => Some(*id),
            _ => None,
        });
        if enemy_shot.is_some() {
            break;
        }
    }
    let enemy_shot = enemy_shot.expect("brains fire periodically");

    events.clear();
    apply(
        &mut world,
        Command::InterceptProjectile {
            hero_projectile: hero_shot,
            enemy_projectile: enemy_shot,
        },
        &mut events,
    );

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::ProjectileIntercepted { .. })));
    assert!(events.contains(&Event::ScoreAwarded {
        points: 25,
        score: 25
    }));
    assert!(query::hero_projectiles(&world).is_empty());
    assert!(query::enemy_projectiles(&world).is_empty());
}

#[test]
fn hero_shots_expire_off_the_display() {
    let mut world = World::new(Config::new(7));
    let _ = start(&mut world, &[(Species::Grunt, Vec2::new(40.0, 40.0))]);
    let _ = fire_hero_shot(&mut world);
    let mut events = Vec::new();

    for _ in 0..40 {
        apply(&mut world, Command::StepProjectiles, &mut events);
    }

    assert!(query::hero_projectiles(&world).is_empty());
}

#[test]
fn ticks_are_counted_and_reported() {
    let mut world = World::new(Config::new(7));
    let mut events = Vec::new();

    apply(&mut world, Command::Tick { dt: TICK }, &mut events);
    apply(&mut world, Command::Tick { dt: TICK }, &mut events);

    assert_eq!(query::tick_index(&world), 2);
    assert_eq!(events[0], Event::TimeAdvanced { dt: TICK });
}

fn start(world: &mut World, spawns: &[(Species, Vec2)]) -> Vec<ActorId> {
    let mut events = Vec::new();
    apply(world, Command::StartWave, &mut events);
    for &(species, position) in spawns {
        apply(world, Command::SpawnActor { species, position }, &mut events);
    }
    apply(world, Command::BeginConvergence, &mut events);
    apply(world, Command::Activate, &mut events);
    assert_eq!(query::phase(world), Phase::Active);

    events
        .iter()
        .filter_map(|event| match event {
            Event::ActorSpawned { id, .. } => Some(*id),
            _ => None,
        })
        .collect()
}

fn fire_hero_shot(world: &mut World) -> ProjectileId {
    let controls = ControlState {
        shooting: DirectionFlags::new(false, true, false, false),
        ..ControlState::default()
    };
    let mut events = Vec::new();
    for _ in 0..30 {
        apply(world, Command::StepHero { controls }, &mut events);
        if let Some(id) = events.iter().find_map(|event| match event {
            Event::ProjectileFired {
                id,
                kind: ProjectileKind::HeroShot,
            } => Some(*id),
            _ => None,
        }) {
            return id;
        }
    }
    panic!("hero never fired");
}

fn moving_right() -> ControlState {
    ControlState {
        movement: DirectionFlags::new(false, true, false, false),
        ..ControlState::default()
    }
}

fn position(world: &World, id: ActorId) -> Vec2 {
    query::actor_position(world, id).expect("actor exists")
}

fn species(world: &World, id: ActorId) -> Option<Species> {
    query::actors(world)
        .iter()
        .find(|actor| actor.id() == id)
        .map(|actor| actor.species())
}
