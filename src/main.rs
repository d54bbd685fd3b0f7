//! Skydrift entry point
//!
//! Headless native runner: flies a scripted course at a fixed 60 fps, renders
//! periodic snapshots on the CPU surface and logs what happened. Set
//! `RUST_LOG=debug` to watch tiles and objects come and go.
//!
//! Usage: `skydrift [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
use skydrift::{
    Settings, SpriteAtlas,
    assets::ProceduralLoader,
    hud::Hud,
    renderer::{PixelBuffer, Rgba},
    sim::{TickInput, World},
};

/// Frame delta of the scripted run
#[cfg(not(target_arch = "wasm32"))]
const FRAME_MS: f64 = 1000.0 / 60.0;
#[cfg(not(target_arch = "wasm32"))]
const FLIGHT_FRAMES: u32 = 60 * 60;
#[cfg(not(target_arch = "wasm32"))]
const SNAPSHOT_EVERY: u32 = 60 * 5;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Skydrift (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(2);
            }
        },
        None => {
            log::info!("Using default settings");
            Settings::default()
        }
    };

    let atlas = match SpriteAtlas::load(&ProceduralLoader) {
        Ok(atlas) => atlas,
        Err(e) => {
            log::error!("Cannot start without sprites: {e}");
            std::process::exit(1);
        }
    };

    let mut world = World::new(&settings);
    let mut hud = Hud::new(settings.viewport);
    let mut canvas = PixelBuffer::filled(
        settings.viewport.width as u32,
        settings.viewport.height as u32,
        Rgba::BLACK,
    );

    let mut stream_errors = 0u32;
    for frame in 0..FLIGHT_FRAMES {
        let input = scripted_input(frame);
        if world.update(FRAME_MS, &input).is_err() {
            stream_errors += 1;
        }
        hud.update(world.player(), atlas.o2_level.height());

        if frame % SNAPSHOT_EVERY == 0 {
            canvas.fill(Rgba::BLACK);
            world.draw(&mut canvas, &atlas);
            hud.draw(&mut canvas, &atlas);
            log::info!(
                "t={:>3}s {} fuel {:.1} o2 {:.1} tiles {} planets {} powerups {} lit {}",
                frame / 60,
                hud.distance_label(),
                world.player().fuel(),
                world.player().o2(),
                world.background().len(),
                world.planets().drawable_ids().len(),
                world.powerups().drawable_ids().len(),
                canvas.lit_pixels(),
            );
        }
    }

    let player = world.player();
    log::info!(
        "Flight over after {}s (seed {}): {} travelled, fuel {:.1}, o2 {:.1}, {} planets and {} power-ups spawned",
        FLIGHT_FRAMES / 60,
        world.seed(),
        hud.distance_label(),
        player.fuel(),
        player.o2(),
        world.planets().last_spawned().unwrap_or(0),
        world.powerups().last_spawned().unwrap_or(0),
    );
    if stream_errors > 0 {
        log::warn!("{stream_errors} frames lost track of the current tile");
    }
}

/// Sit for a second, then climb in bursts with an occasional short lean
#[cfg(not(target_arch = "wasm32"))]
fn scripted_input(frame: u32) -> TickInput {
    if frame < 60 {
        return TickInput::default();
    }
    let phase = frame % 600;
    TickInput {
        left: (300..320).contains(&phase),
        right: (320..340).contains(&phase),
        thrust: phase < 420,
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser host; the library is driven by the embedding page
}
