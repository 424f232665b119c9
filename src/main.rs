//! Hive Meadow entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_meadow {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    use hive_meadow::Settings;
    use hive_meadow::platform::FrameLoop;
    use hive_meadow::sim::RecordingScene;

    // The page's renderer listens for these and owns every mesh
    #[wasm_bindgen(inline_js = "
        export function publish_scene_events(json) {
            window.dispatchEvent(new CustomEvent('hive-meadow-frame', { detail: json }));
        }
    ")]
    extern "C" {
        fn publish_scene_events(json: &str);
    }

    type Meadow = FrameLoop<RecordingScene>;

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
        log::info!("Hive Meadow starting...");

        let settings = Settings::load();
        let seed = settings.seed_or(js_sys::Date::now() as u64);

        let meadow = match FrameLoop::new(seed, &settings, RecordingScene::new()) {
            Ok(meadow) => meadow,
            Err(e) => {
                log::error!("Could not build meadow: {}", e);
                return;
            }
        };
        let meadow = Rc::new(RefCell::new(meadow));

        // Initial population goes out before the first frame
        flush_scene(&mut meadow.borrow_mut());

        request_animation_frame(meadow);
        log::info!("Hive Meadow running (seed {})", seed);
    }

    fn flush_scene(meadow: &mut Meadow) {
        match meadow.scene.drain_events_json() {
            Ok(json) => publish_scene_events(&json),
            Err(e) => log::warn!("Scene events failed to serialize: {}", e),
        }
    }

    fn request_animation_frame(meadow: Rc<RefCell<Meadow>>) {
        let Some(window) = web_sys::window() else {
            log::error!("No window; frame loop not started");
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame(meadow, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(meadow: Rc<RefCell<Meadow>>, time: f64) {
        let again = {
            let mut m = meadow.borrow_mut();
            let again = m.on_frame(time);
            flush_scene(&mut m);
            again
        };

        if again {
            request_animation_frame(meadow);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_meadow::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Hive Meadow (native, headless) starting...");

    if let Err(e) = run_headless() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Drive the frame loop with synthetic timestamps and report the outcome
#[cfg(not(target_arch = "wasm32"))]
fn run_headless() -> Result<(), hive_meadow::SimError> {
    use std::time::{SystemTime, UNIX_EPOCH};

    use hive_meadow::Settings;
    use hive_meadow::platform::FrameLoop;
    use hive_meadow::sim::RecordingScene;

    let settings = Settings::load();
    let fallback = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    let seed = settings.seed_or(fallback);

    let mut meadow = FrameLoop::new(seed, &settings, RecordingScene::new())?;
    let frame_ms = 1000.0 / settings.headless_fps;

    for frame in 1..=settings.headless_frames {
        if !meadow.on_frame(frame as f64 * frame_ms) {
            break;
        }
        // Nobody renders natively; keep the change log from growing
        meadow.scene.drain_events();
    }
    meadow.stop();
    meadow.log_summary();
    log::info!(
        "Seed {}: {} deliveries, {} live scene nodes",
        seed,
        meadow.state.hive.deliveries,
        meadow.scene.len()
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
