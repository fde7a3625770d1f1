use robotron_core::{Event, Species};
use robotron_system_scoring::{
    Award, Progression, INTERCEPT_POINTS, LIFE_BONUS_INTERVAL, MAX_MULTIPLIER, RESCUE_POINTS,
    STARTING_LIVES,
};

#[test]
fn rescue_totals_follow_the_capped_multiplier() {
    for saves in 0..12u32 {
        let mut progression = Progression::new(STARTING_LIVES);
        let _ = progression.begin_wave();
        let mut events = Vec::new();

        for _ in 0..saves {
            let _ = progression.award(Award::Rescue, &mut events);
        }

        let ramp: u32 = (1..=saves.min(MAX_MULTIPLIER)).sum();
        let capped = saves.saturating_sub(MAX_MULTIPLIER);
        let expected = RESCUE_POINTS * ramp + RESCUE_POINTS * MAX_MULTIPLIER * capped;
        assert_eq!(progression.score(), expected, "{saves} saves");
    }
}

#[test]
fn multiplier_resets_at_wave_start_but_not_on_death() {
    let mut progression = Progression::default();
    let _ = progression.begin_wave();
    let mut events = Vec::new();

    let _ = progression.award(Award::Rescue, &mut events);
    let _ = progression.award(Award::Rescue, &mut events);
    assert_eq!(progression.multiplier(), 3);

    let _ = progression.lose_life();
    assert_eq!(progression.multiplier(), 3);

    assert_eq!(progression.begin_wave(), 2);
    assert_eq!(progression.multiplier(), 1);
}

#[test]
fn bonus_life_is_granted_once_per_threshold() {
    let mut progression = Progression::default();
    let mut events = Vec::new();

    for _ in 0..(LIFE_BONUS_INTERVAL - 1) / INTERCEPT_POINTS {
        let _ = progression.award(Award::Intercept, &mut events);
    }
    assert_eq!(progression.score(), 24_975);
    assert_eq!(progression.lives(), STARTING_LIVES);
    let _ = progression.award(Award::Intercept, &mut events);
    assert_eq!(progression.score(), LIFE_BONUS_INTERVAL);
    assert_eq!(progression.lives(), STARTING_LIVES + 1);
    assert_eq!(
        events.last(),
        Some(&Event::LifeGained {
            lives: STARTING_LIVES + 1
        })
    );

    while progression.score() < 49_900 {
        let _ = progression.award(Award::Kill(Species::Grunt), &mut events);
    }
    assert_eq!(progression.score(), 49_900);
    assert_eq!(progression.lives(), STARTING_LIVES + 1);

    let _ = progression.award(Award::Kill(Species::Brain), &mut events);
    assert_eq!(progression.score(), 50_400);
    assert_eq!(progression.lives(), STARTING_LIVES + 2);
}

#[test]
fn large_totals_grant_one_life_per_threshold_crossed() {
    let mut progression = Progression::default();
    let mut events = Vec::new();

    for _ in 0..24 {
        let _ = progression.award(Award::Rescue, &mut events);
    }
    assert_eq!(progression.score(), 1000 + 2000 + 3000 + 4000 + 5000 * 20);
    assert_eq!(progression.lives(), STARTING_LIVES + 4);
}

#[test]
fn kills_use_species_points() {
    let mut progression = Progression::default();
    let mut events = Vec::new();

    for species in [
        Species::Grunt,
        Species::Prog,
        Species::Enforcer,
        Species::Tank,
        Species::Brain,
        Species::Spheroid,
        Species::Quark,
    ] {
        let _ = progression.award(Award::Kill(species), &mut events);
    }

    assert_eq!(progression.score(), 100 + 100 + 200 + 200 + 500 + 1000 + 1000);
    assert_eq!(
        events.first(),
        Some(&Event::ScoreAwarded {
            points: 100,
            score: 100
        })
    );
}

#[test]
fn lives_never_drop_below_zero_and_reset_restores_them() {
    let mut progression = Progression::new(1);
    assert_eq!(progression.lose_life(), 0);
    assert_eq!(progression.lose_life(), 0);
    assert!(progression.is_game_over());

    let _ = progression.begin_wave();
    progression.reset();
    assert_eq!(progression.lives(), 1);
    assert_eq!(progression.wave(), 0);
    assert_eq!(progression.score(), 0);
}
