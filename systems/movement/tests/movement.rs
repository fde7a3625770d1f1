use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use robotron_core::{display_rect, DirectionFlags, Rect, Size};
use robotron_system_movement::{within_tolerance, AxisLock, Body, DirectionStacks, UNIT_STEP};

#[test]
fn hitbox_tracks_rounded_position_after_every_step() {
    let mut body = Body::new(Vec2::new(10.0, 10.0), Size::new(8, 8));
    let target = Vec2::new(200.0, -40.0);

    for _ in 0..37 {
        body.move_to_target(target, UNIT_STEP, 0.7, AxisLock::Free);
        let expected = Rect::from_position(body.position(), body.size());
        assert_eq!(body.rect(), expected);
        assert_eq!(body.rect().x(), body.position().x.round() as i32);
        assert_eq!(body.rect().y(), body.position().y.round() as i32);
    }
}

#[test]
fn axes_move_independently_without_normalisation() {
    let mut body = Body::new(Vec2::ZERO, Size::new(4, 4));
    body.move_to_target(Vec2::new(50.0, 50.0), UNIT_STEP, 3.0, AxisLock::Free);
    assert_eq!(body.position(), Vec2::new(3.0, 3.0));

    let mut aligned = Body::new(Vec2::new(10.0, 5.0), Size::new(4, 4));
    aligned.move_to_target(Vec2::new(0.0, 5.0), UNIT_STEP, 3.0, AxisLock::Free);
    assert_eq!(aligned.position(), Vec2::new(7.0, 5.0));
}

#[test]
fn axis_lock_zeroes_the_other_axis() {
    let mut horizontal = Body::new(Vec2::ZERO, Size::new(4, 4));
    horizontal.move_to_target(Vec2::new(9.0, 9.0), UNIT_STEP, 1.0, AxisLock::Horizontal);
    assert_eq!(horizontal.position(), Vec2::new(1.0, 0.0));

    let mut vertical = Body::new(Vec2::ZERO, Size::new(4, 4));
    vertical.move_to_target(Vec2::new(9.0, 9.0), UNIT_STEP, 1.0, AxisLock::Vertical);
    assert_eq!(vertical.position(), Vec2::new(0.0, 1.0));
}

#[test]
fn unrecognized_axis_name_moves_freely() {
    assert_eq!(AxisLock::from_name("x"), AxisLock::Horizontal);
    assert_eq!(AxisLock::from_name("y"), AxisLock::Vertical);
    assert_eq!(AxisLock::from_name("diagonal"), AxisLock::Free);

    let mut body = Body::new(Vec2::ZERO, Size::new(4, 4));
    body.move_to_target(
        Vec2::new(9.0, 9.0),
        UNIT_STEP,
        1.0,
        AxisLock::from_name("sideways"),
    );
    assert_eq!(body.position(), Vec2::new(1.0, 1.0));
}

#[test]
fn distant_target_is_returned_unchanged() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let body = Body::new(Vec2::new(100.0, 100.0), Size::new(4, 4));

    for target in [
        Vec2::new(102.0, 100.0),
        Vec2::new(100.0, 97.5),
        Vec2::new(300.0, 300.0),
    ] {
        assert_eq!(body.reached_target(target, display_rect(), &mut rng), target);
    }
}

#[test]
fn arrived_target_is_replaced_inside_bounds() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let body = Body::new(Vec2::new(100.0, 100.0), Size::new(4, 4));
    let target = Vec2::new(101.5, 98.5);
    assert!(within_tolerance(body.position(), target));

    let mut replaced = 0;
    for _ in 0..50 {
        let next = body.reached_target(target, display_rect(), &mut rng);
        assert!(display_rect().contains(next));
        if next != target {
            replaced += 1;
        }
    }
    assert!(replaced >= 49, "expected fresh targets, got {replaced} of 50");
}

#[test]
fn fresh_targets_keep_the_whole_hitbox_inside_bounds() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let bounds = Rect::new(5, 20, 60, 50);
    let body = Body::new(Vec2::new(30.0, 30.0), Size::new(29, 27));

    for _ in 0..200 {
        let next = body.reached_target(body.position(), bounds, &mut rng);
        let landed = Body::new(next, body.size()).rect();
        assert!(landed.left() >= bounds.left() && landed.top() >= bounds.top());
        assert!(landed.right() <= bounds.right() && landed.bottom() <= bounds.bottom());
    }
}

#[test]
fn clamp_keeps_hitbox_inside_area() {
    let area = Rect::new(5, 20, 100, 100);
    let mut body = Body::new(Vec2::new(120.0, 0.0), Size::new(10, 10));
    body.clamp_within(area);
    assert_eq!(body.rect(), Rect::new(95, 20, 10, 10));
}

#[test]
fn last_pressed_key_wins_on_each_axis() {
    let mut stacks = DirectionStacks::default();

    let left = stacks.resolve(DirectionFlags::new(true, false, false, false));
    assert_eq!(left, DirectionFlags::new(true, false, false, false));

    let both = stacks.resolve(DirectionFlags::new(true, true, false, false));
    assert_eq!(both, DirectionFlags::new(false, true, false, false));

    let right_released = stacks.resolve(DirectionFlags::new(true, false, false, false));
    assert_eq!(right_released, DirectionFlags::new(true, false, false, false));

    let repressed = stacks.resolve(DirectionFlags::new(true, true, true, false));
    assert_eq!(repressed, DirectionFlags::new(false, true, true, false));

    let released = stacks.resolve(DirectionFlags::NONE);
    assert!(released.is_empty());
}
