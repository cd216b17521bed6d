//! End-to-end frame loop tests: a JSON-configured scene driven for many
//! frames against a recording surface.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use hv_engine::prelude::*;
use proptest::prelude::*;

fn config() -> EngineConfig {
    EngineConfig::from_json(r#"{"width": 100, "height": 100, "maxFrameDtMs": 50}"#).unwrap()
}

#[test]
fn player_walks_until_the_wall() {
    let mut fl = FrameLoop::from_config(&config());
    let player = fl
        .scene_mut()
        .spawn(SpriteOptions {
            name: Some("player".to_owned()),
            x: 0,
            y: 40,
            width: 10,
            height: 10,
            solid: true,
            bound_to_viewport: true,
            ..Default::default()
        })
        .unwrap();
    let wall = fl
        .scene_mut()
        .spawn(SpriteOptions {
            x: 60,
            y: 0,
            width: 5,
            height: 100,
            solid: true,
            ..Default::default()
        })
        .unwrap();

    let blocked_by = Rc::new(Cell::new(None));
    let blocked_in_system = Rc::clone(&blocked_by);
    fl.add_system("walk", move |scene, _dt| {
        if let Ok(MoveOutcome::Blocked { by }) = scene.move_sprite(player, Direction::Right, 4) {
            blocked_in_system.set(Some(by));
        }
    });

    let mut surface = RecordingSurface::new();
    for i in 0..30 {
        fl.frame(f64::from(i) * 16.0, &mut surface);
        surface.take();
    }

    // 48 + 10 = 58 is clear of the wall at 60; one more step of 4 is not.
    assert_eq!(fl.scene().sprite(player).unwrap().x, 48);
    assert_eq!(blocked_by.get(), Some(Blocker::Sprite(wall)));
}

#[test]
fn flashing_sprite_is_drawn_every_other_period() {
    let mut fl = FrameLoop::from_config(&config());
    let id = fl
        .scene_mut()
        .spawn(SpriteOptions {
            width: 10,
            height: 10,
            background: Some("yellow".to_owned()),
            ..Default::default()
        })
        .unwrap();
    fl.scene_mut().sprite_mut(id).unwrap().flash(0.25, 3).unwrap();

    let mut surface = RecordingSurface::new();
    let mut drawn = Vec::new();
    let mut toggles = 0;
    // Frames every 50 ms (the clamp) for 1.5 s.
    for i in 0..=30 {
        let report = fl.frame(f64::from(i) * 50.0, &mut surface);
        toggles += report.toggles;
        drawn.push(report.stats.unwrap().drawn);
    }

    assert_eq!(toggles, 4);
    assert!(!fl.scene().sprite(id).unwrap().is_flashing());
    assert!(fl.scene().sprite(id).unwrap().visible);
    // Hidden between 250 and 500 ms.
    assert_eq!(drawn[5..10], [0, 0, 0, 0, 0]);
    assert_eq!(drawn[10], 1);
    assert_eq!(fl.elapsed(), Duration::from_millis(1500));
}

#[test]
fn debug_config_draws_overlays() {
    let config = EngineConfig::from_json(r#"{"debug": true}"#).unwrap();
    let mut fl = FrameLoop::from_config(&config);
    fl.scene_mut()
        .spawn(SpriteOptions {
            shape: Some("circle".to_owned()),
            radius: 8.0,
            center: true,
            ..Default::default()
        })
        .unwrap();

    let mut surface = RecordingSurface::new();
    let report = fl.frame(0.0, &mut surface);
    assert_eq!(report.stats.unwrap().overlays, 1);
    assert_eq!(
        surface.texts(),
        vec![
            "name: Sprite 1",
            "visible: true",
            "x: 400",
            "y: 300",
            "width: 16",
            "height: 16"
        ]
    );
}

proptest! {
    #[test]
    fn dt_never_exceeds_the_clamp(gaps in prop::collection::vec(0.0f64..10_000.0, 1..50)) {
        let mut fl = FrameLoop::from_config(&config());
        let mut surface = RecordingSurface::new();
        let mut t = 0.0;
        fl.frame(t, &mut surface);
        for gap in gaps {
            t += gap;
            let report = fl.frame(t, &mut surface);
            prop_assert!(report.dt <= Duration::from_millis(50));
            surface.take();
        }
    }
}
