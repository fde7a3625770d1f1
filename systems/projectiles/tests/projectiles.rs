use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use robotron_core::{
    display_rect, play_area, DirectionFlags, ExplodeOrientation, ProjectileId, ProjectileKind,
    DISPLAY_WIDTH,
};
use robotron_system_projectiles::{
    Projectile, ProjectileContext, ProjectileStatus, BRAIN_SHOT_SPEED, ENFORCER_SHOT_SPEED,
    ENFORCER_SLOWDOWN_INTERVAL, ENFORCER_SLOWDOWN_STEPS, ENFORCER_SLOW_RATE, HERO_SHOT_SPEED,
    TANK_FLIP_COOLDOWN, TANK_SHOT_LIFETIME, TANK_SHOT_SPEED,
};

#[test]
fn hero_shot_travels_until_it_leaves_the_display() {
    let mut rng = rng();
    let east = DirectionFlags::new(false, true, false, false);
    let mut shot = Projectile::hero_shot(ProjectileId::new(1), Vec2::new(100.0, 100.0), east);
    let ctx = context(Vec2::ZERO);

    let mut ticks = 0;
    loop {
        ticks += 1;
        let status = shot.advance(&ctx, &mut rng);
        assert_eq!(shot.rect().x(), 100 + HERO_SHOT_SPEED as i32 * ticks);
        if status == ProjectileStatus::Expired {
            break;
        }
        assert!(shot.rect().right() <= DISPLAY_WIDTH);
    }

    assert!(shot.rect().right() > DISPLAY_WIDTH);
    assert_eq!(ticks, 34);
}

#[test]
fn diagonal_hero_shot_moves_both_axes_at_full_speed() {
    let mut rng = rng();
    let up_left = DirectionFlags::new(true, false, true, false);
    let mut shot = Projectile::hero_shot(ProjectileId::new(1), Vec2::new(300.0, 300.0), up_left);

    let _ = shot.advance(&context(Vec2::ZERO), &mut rng);

    assert_eq!(
        shot.position(),
        Vec2::new(300.0 - HERO_SHOT_SPEED, 300.0 - HERO_SHOT_SPEED)
    );
    assert_eq!(
        shot.explode_orientation(),
        ExplodeOrientation::Diagonal { mirrored: true }
    );
}

#[test]
fn tank_shell_reflects_once_per_wall_contact() {
    let mut rng = rng();
    let origin = Vec2::new(620.0, 240.0);
    let hero = Vec2::new(700.0, 240.0);
    let mut shell = Projectile::enemy_shot(
        ProjectileId::new(7),
        ProjectileKind::TankShot,
        origin,
        hero,
        &mut rng,
    );
    assert_eq!(shell.velocity(), Vec2::new(TANK_SHOT_SPEED, 0.0));
    let ctx = context(hero);

    let bounces = (0..200)
        .filter(|_| shell.advance(&ctx, &mut rng) == ProjectileStatus::Bounced)
        .count();

    assert_eq!(bounces, 1);
    assert_eq!(shell.velocity(), Vec2::new(-TANK_SHOT_SPEED, 0.0));
}

#[test]
fn tank_shell_waits_for_cooldown_while_still_touching() {
    let mut rng = rng();
    let origin = Vec2::new(631.0, 100.0);
    let hero = Vec2::new(641.0, 600.0);
    let mut shell = Projectile::enemy_shot(
        ProjectileId::new(7),
        ProjectileKind::TankShot,
        origin,
        hero,
        &mut rng,
    );
    let ctx = context(hero);

    let bounce_ticks: Vec<u32> = (1..=2 * TANK_FLIP_COOLDOWN)
        .filter(|_| shell.advance(&ctx, &mut rng) == ProjectileStatus::Bounced)
        .collect();

    assert_eq!(bounce_ticks, vec![1, 1 + TANK_FLIP_COOLDOWN]);
}

#[test]
fn tank_shell_expires_after_its_lifetime() {
    let mut rng = rng();
    let centre = Vec2::new(320.0, 240.0);
    let mut shell = Projectile::enemy_shot(
        ProjectileId::new(3),
        ProjectileKind::TankShot,
        centre,
        centre,
        &mut rng,
    );
    let ctx = context(centre);

    for _ in 1..TANK_SHOT_LIFETIME {
        assert_eq!(shell.advance(&ctx, &mut rng), ProjectileStatus::Flying);
    }
    assert_eq!(shell.advance(&ctx, &mut rng), ProjectileStatus::Expired);
}

#[test]
fn enforcer_shot_slows_down_in_steps() {
    let mut rng = rng();
    let hero = Vec2::new(100.0, 100.0);
    let mut shot = Projectile::enemy_shot(
        ProjectileId::new(2),
        ProjectileKind::EnforcerShot,
        Vec2::new(320.0, 240.0),
        hero,
        &mut rng,
    );
    assert!((shot.velocity().length() - ENFORCER_SHOT_SPEED).abs() < 1e-4);
    assert_eq!(shot.rect().width(), 13);

    let ctx = context(hero);
    for _ in 0..ENFORCER_SLOWDOWN_INTERVAL * (ENFORCER_SLOWDOWN_STEPS + 2) {
        assert_ne!(shot.advance(&ctx, &mut rng), ProjectileStatus::Expired);
    }

    let expected = ENFORCER_SHOT_SPEED * ENFORCER_SLOW_RATE.powi(ENFORCER_SLOWDOWN_STEPS as i32);
    assert!((shot.velocity().length() - expected).abs() < 1e-3);
}

#[test]
fn brain_shot_keeps_its_speed() {
    let mut rng = rng();
    let hero = Vec2::new(500.0, 400.0);
    let mut shot = Projectile::enemy_shot(
        ProjectileId::new(4),
        ProjectileKind::BrainShot,
        Vec2::new(320.0, 240.0),
        hero,
        &mut rng,
    );
    let ctx = context(hero);

    for _ in 0..100 {
        let _ = shot.advance(&ctx, &mut rng);
        assert!((shot.velocity().length() - BRAIN_SHOT_SPEED).abs() < 1e-4);
    }
}

fn context(hero: Vec2) -> ProjectileContext {
    ProjectileContext {
        hero,
        area: play_area(),
        display: display_rect(),
    }
}

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(11)
}
