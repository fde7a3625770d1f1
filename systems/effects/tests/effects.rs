use std::time::Duration;

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use robotron_core::{
    actions, display_rect, ActorId, ExplodeOrientation, Rgb, Size, Species, SpriteRef,
    SpriteSnapshot, TICK,
};
use robotron_system_effects::{
    ConvergeStyle, Convergence, EffectClock, Effects, Explosion, LabelContent, Shrink,
    Transition, TransitionStyle, CONVERGE_START_ALPHA, DISPLACEMENT, EXPLODE_DURATION,
    LABEL_TICKS,
};

const ORIGIN: Vec2 = Vec2::new(100.0, 200.0);

#[test]
fn finished_flips_exactly_at_the_duration_and_stays_set() {
    let mut clock = EffectClock::new(EXPLODE_DURATION);
    for millis in 1..=1500u64 {
        clock.advance(Duration::from_millis(1));
        assert_eq!(clock.finished(), millis >= 1000, "{millis} ms");
    }
    clock.advance(Duration::ZERO);
    assert!(clock.finished());
}

#[test]
fn fresh_explosion_draws_two_full_copies_of_every_strip() {
    let explosion = Explosion::new(grunt(), ExplodeOrientation::Horizontal);
    let mut out = Vec::new();

    explosion.draw(&mut out);

    assert_eq!(out.len(), 10);
    assert!(out.iter().all(|quad| quad.alpha == 255));
    assert!(out
        .iter()
        .all(|quad| quad.position == ORIGIN + quad.source.top_left()));
}

#[test]
fn explosion_strips_spread_by_distance_from_the_centre() {
    let mut explosion = Explosion::new(grunt(), ExplodeOrientation::Vertical);
    explosion.advance(Duration::from_millis(500));
    let mut out = Vec::new();

    explosion.draw(&mut out);

    let outer = &out[0];
    let expected_shift = (DISPLACEMENT * 3.0 * 0.5).trunc();
    assert_eq!(outer.position.x, ORIGIN.x);
    assert!((outer.position.y - (ORIGIN.y - expected_shift)).abs() < 1e-3);
    assert_eq!(outer.size.x, 29.0);
    assert!(outer.alpha < 130 && outer.alpha > 125);
}

#[test]
fn mirrored_diagonal_explosion_rises_to_the_right() {
    let mut effects = Effects::new();
    effects.explode(grunt(), ExplodeOrientation::Diagonal { mirrored: true });
    effects.advance(Duration::from_millis(500));
    let mut out = Vec::new();

    effects.draw(|_| None, &mut out);

    let first = out[0];
    assert!(first.position.x > ORIGIN.x);
    assert!(first.position.y < ORIGIN.y);
    assert!(first.size.x < 29.0);
}

#[test]
fn convergence_starts_translucent_and_tracks_the_live_position() {
    let convergence = Convergence::new(
        ActorId::new(3),
        grunt(),
        ConvergeStyle::Single(ExplodeOrientation::Horizontal),
    );
    let live = Vec2::new(140.0, 220.0);
    let mut out = Vec::new();

    convergence.draw(live, &mut out);

    assert_eq!(out.len(), 10);
    assert!(out.iter().all(|quad| quad.alpha == CONVERGE_START_ALPHA));
    let (left, right) = (out[0], out[1]);
    let midpoint = (left.position + right.position) / 2.0;
    assert_eq!(midpoint, live + left.source.top_left());
    assert_eq!(right.position.x - left.position.x, 2.0 * DISPLACEMENT * 3.0);
}

#[test]
fn hero_convergence_animates_every_family() {
    let mut effects = Effects::new();
    let hero = ActorId::new(1);
    effects.converge(hero, grunt(), ConvergeStyle::All);
    let mut out = Vec::new();

    effects.draw(|id| (id == hero).then_some(ORIGIN), &mut out);

    assert_eq!(out.len(), 10 + 10 + 20);
    assert!(effects.is_converging(hero));
}

#[test]
fn finished_effects_are_swept() {
    let mut effects = Effects::new();
    effects.explode(grunt(), ExplodeOrientation::Horizontal);
    effects.shrink(grunt());
    effects.converge(ActorId::new(2), grunt(), ConvergeStyle::All);

    effects.advance(Duration::from_millis(999));
    assert_eq!(effects.active_debris(), 2);

    effects.advance(Duration::from_millis(1));
    assert_eq!(effects.active_debris(), 0);
    assert_eq!(effects.active_convergences(), 1);

    effects.advance(Duration::from_millis(500));
    assert_eq!(effects.active_convergences(), 0);
}

#[test]
fn shrink_scales_the_whole_frame() {
    let mut effects = Effects::new();
    effects.shrink(grunt());
    effects.advance(Duration::from_millis(250));
    let mut out = Vec::new();

    effects.draw(|_| None, &mut out);

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].position, ORIGIN);
    assert!((out[0].size - Vec2::new(29.0, 27.0) * 0.75).length() < 1e-3);
    assert_eq!(Shrink::new(grunt()).clock().progress(), 0.0);
}

#[test]
fn labels_expire_with_the_effect_ticks() {
    let mut effects = Effects::new();
    let _ = effects.float_label(LabelContent::Text("2000".into()), ORIGIN);
    let skull = SpriteRef::new(Species::Mom, actions::SKULL, 0);
    let _ = effects.float_label(LabelContent::Icon(skull), ORIGIN);

    for _ in 0..LABEL_TICKS - 1 {
        effects.advance(TICK);
    }
    assert_eq!(effects.labels().len(), 2);

    effects.advance(TICK);
    assert!(effects.labels().is_empty());
}

#[test]
fn first_wave_wipe_grows_from_the_centre_over_black() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut transition = Transition::for_wave(true, display_rect(), &mut rng);
    assert_eq!(transition.style(), TransitionStyle::Centre);

    transition.advance(TICK, &mut rng);
    let mut out = Vec::new();
    transition.draw(&mut out);

    assert_eq!(out[0].rect, display_rect());
    assert_eq!(out[0].color, Rgb::BLACK);
}

#[test]
fn later_waves_never_use_the_centre_style() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    for _ in 0..50 {
        let transition = Transition::for_wave(false, display_rect(), &mut rng);
        assert_ne!(transition.style(), TransitionStyle::Centre);
    }
}

#[test]
fn wipe_spawns_squares_then_reveals_the_scene() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut transition = Transition::new(TransitionStyle::Left, None, display_rect());

    let mut ticks = 0;
    let mut most_squares = 0;
    while !transition.finished() {
        transition.advance(TICK, &mut rng);
        most_squares = most_squares.max(transition.live_squares());
        ticks += 1;
        assert!(ticks < 200, "wipe never finished");
    }

    assert!(most_squares > 10);
    assert!((118..=124).contains(&ticks), "finished after {ticks} ticks");

    let mut out = Vec::new();
    transition.draw(&mut out);
    assert!(out.is_empty());
}

#[test]
fn reveal_cuts_a_hole_in_the_overlay() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let mut transition = Transition::new(TransitionStyle::Left, Some(Rgb::BLACK), display_rect());
    for _ in 0..90 {
        transition.advance(TICK, &mut rng);
    }
    let mut out = Vec::new();

    transition.draw(&mut out);

    assert!(!out.is_empty());
    assert!(out.iter().all(|filled| filled.rect.left() > 0));
}

fn grunt() -> SpriteSnapshot {
    SpriteSnapshot {
        sprite: SpriteRef::new(Species::Grunt, actions::WALK, 0),
        position: ORIGIN,
        size: Size::new(29, 27),
    }
}
