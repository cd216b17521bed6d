//! Headless demo: builds a small scene from JSON, walks a solid sprite into
//! a wall while another one flashes, and logs per-frame reports.
//!
//! Run with: `RUST_LOG=debug cargo run -p hv-engine --example headless_demo`

use hv_engine::prelude::*;

const CONFIG: &str = r#"{
    "width": 320,
    "height": 200,
    "debug": false,
    "seed": 7,
    "maxFrameDtMs": 100,
    "logFilter": "info"
}"#;

const SPRITES: &[&str] = &[
    r##"{"name": "player", "x": 10, "y": 90, "width": 16, "height": 16,
        "solid": true, "boundToViewport": true, "background": "#3366ff",
        "border": {"color": "white", "width": 2}}"##,
    r##"{"name": "wall", "x": 200, "y": 0, "width": 10, "height": 200,
        "solid": true, "background": "gray"}"##,
    r##"{"name": "beacon", "shape": "circle", "radius": 12, "center": true,
        "gradient": {"type": "radial", "colors": ["yellow", "orange", "red"], "ratio": 2},
        "shadow": {"color": "black", "blur": 6, "offsetX": 2, "offsetY": 2}}"##,
];

fn main() -> anyhow::Result<()> {
    let config = EngineConfig::from_json(CONFIG)?;
    hv_engine::logging::init(&config.log_filter)?;

    let mut frame_loop = FrameLoop::from_config(&config);
    let mut ids = Vec::new();
    for json in SPRITES {
        let options = SpriteOptions::from_json(json)?;
        ids.push(frame_loop.scene_mut().spawn(options)?);
    }
    let (player, beacon) = (ids[0], ids[2]);

    frame_loop
        .scene_mut()
        .expect_sprite_mut(beacon)?
        .flash(0.5, 0)?;

    frame_loop.add_system("walk", move |scene, dt| {
        // 120 px/s.
        let step = (dt.as_secs_f64() * 120.0).round() as i32;
        match scene.move_sprite(player, Direction::Right, step) {
            Ok(MoveOutcome::Blocked { by }) => tracing::info!(?by, "player blocked"),
            Ok(MoveOutcome::Moved) => {}
            Err(err) => tracing::warn!(%err, "player vanished"),
        }
    });

    tracing::info!(
        version = hv_engine::ENGINE_VERSION,
        id = %frame_loop.scene_mut().make_id(hv_engine::hv_scene::util::DEFAULT_ID_LEN),
        "HV-Engine ({}) ready",
        hv_engine::ENGINE_VERSION
    );

    let mut surface = RecordingSurface::new();
    for i in 0..120u32 {
        let report = frame_loop.frame(f64::from(i) * 1000.0 / 60.0, &mut surface);
        let ops = surface.take();
        if report.toggles > 0 || i % 30 == 0 {
            tracing::info!(
                frame = report.frame,
                dt_ms = report.dt.as_millis() as u64,
                toggles = report.toggles,
                draw_calls = ops.len(),
                stats = ?report.stats,
                "frame"
            );
        }
    }

    let x = frame_loop
        .scene()
        .sprite(player)
        .map(|s| s.x)
        .unwrap_or_default();
    tracing::info!(x, elapsed = ?frame_loop.elapsed(), "demo finished");
    Ok(())
}
