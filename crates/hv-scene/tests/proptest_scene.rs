//! Property tests for collision and movement.
//!
//! Random boxes and circles check that the collision predicate is symmetric
//! and that movement of solid sprites is all-or-nothing and never ends in an
//! overlap with another solid sprite.

use hv_scene::prelude::*;
use proptest::prelude::*;

fn bounds_strategy() -> impl Strategy<Value = Bounds> {
    prop_oneof![
        (-50i32..50, -50i32..50, 1u32..40, 1u32..40).prop_map(|(x, y, w, h)| Bounds::rect(
            f64::from(x),
            f64::from(y),
            f64::from(w),
            f64::from(h)
        )),
        (-50i32..50, -50i32..50, 1u32..20).prop_map(|(x, y, r)| Bounds::circle(
            f64::from(x),
            f64::from(y),
            f64::from(r)
        )),
    ]
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Left),
        Just(Direction::Right),
        Just(Direction::Down),
    ]
}

fn solid_box(x: i32, y: i32, w: u32, h: u32, bound: bool) -> SpriteOptions {
    SpriteOptions {
        x,
        y,
        width: w,
        height: h,
        solid: true,
        bound_to_viewport: bound,
        ..Default::default()
    }
}

proptest! {
    #[test]
    fn collision_is_symmetric(a in bounds_strategy(), b in bounds_strategy()) {
        prop_assert_eq!(colliding(&a, &b), colliding(&b, &a));
    }

    #[test]
    fn shapes_with_area_collide_with_themselves(a in bounds_strategy()) {
        prop_assert!(colliding(&a, &a));
    }

    #[test]
    fn rects_touching_edges_do_not_collide(
        x in -50i32..50, y in -50i32..50, w in 1u32..40, h in 1u32..40, h2 in 1u32..40,
    ) {
        let a = Bounds::rect(f64::from(x), f64::from(y), f64::from(w), f64::from(h));
        let b = Bounds::rect(f64::from(x) + f64::from(w), f64::from(y), 5.0, f64::from(h2));
        prop_assert!(!colliding(&a, &b));
    }

    #[test]
    fn non_solid_moves_exactly(
        x in -100i32..100,
        y in -100i32..100,
        dir in direction_strategy(),
        amount in -50i32..50,
    ) {
        let mut scene = Scene::new(SceneConfig::default());
        let id = scene.spawn(SpriteOptions {
            x,
            y,
            width: 5,
            height: 5,
            bound_to_viewport: true,
            ..Default::default()
        }).unwrap();
        scene.spawn(solid_box(x, y, 50, 50, false)).unwrap();

        let outcome = scene.move_sprite(id, dir, amount).unwrap();
        prop_assert_eq!(outcome, MoveOutcome::Moved);

        let (dx, dy) = dir.delta();
        let sprite = scene.sprite(id).unwrap();
        prop_assert_eq!((sprite.x, sprite.y), (x + dx * amount, y + dy * amount));
    }

    /// A solid sprite either lands exactly on its target or stays put, and a
    /// sprite that started clear of every wall is still clear afterwards.
    #[test]
    fn solid_moves_are_all_or_nothing(
        walls in prop::collection::vec((0i32..90, 0i32..90, 1u32..20, 1u32..20), 0..8),
        steps in prop::collection::vec((direction_strategy(), 0i32..15), 1..30),
    ) {
        let mut scene = Scene::new(SceneConfig { width: 100, height: 100, ..Default::default() });
        let player = scene.spawn(solid_box(45, 45, 6, 6, true)).unwrap();
        let start = scene.sprite(player).unwrap().bounds();
        for (x, y, w, h) in walls {
            let wall = Bounds::rect(f64::from(x), f64::from(y), f64::from(w), f64::from(h));
            if !colliding(&start, &wall) {
                scene.spawn(solid_box(x, y, w, h, false)).unwrap();
            }
        }

        for (dir, amount) in steps {
            let before = {
                let s = scene.sprite(player).unwrap();
                (s.x, s.y)
            };
            let outcome = scene.move_sprite(player, dir, amount).unwrap();
            let s = scene.sprite(player).unwrap();
            let after = (s.x, s.y);

            match outcome {
                MoveOutcome::Moved => {
                    let (dx, dy) = dir.delta();
                    prop_assert_eq!(after, (before.0 + dx * amount, before.1 + dy * amount));
                }
                MoveOutcome::Blocked { .. } => prop_assert_eq!(after, before),
            }

            let bounds = s.bounds();
            for (other, wall) in scene.registry().solid_excluding(player) {
                prop_assert!(
                    !colliding(&bounds, &wall.bounds()),
                    "player overlaps {:?} after {:?} {}", other, dir, amount
                );
            }
            prop_assert!(bounds.left() >= 0.0 && bounds.top() >= 0.0);
            prop_assert!(bounds.right() < 100.0 && bounds.bottom() < 100.0);
        }
    }
}
