//! Water Ripple entry point
//!
//! Hosts the kernel: supplies the source image, calls `tick` on a fixed
//! cadence and presents frames when the kernel flags one.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_host {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlImageElement, MouseEvent};

    use water_ripple::consts::MAX_SUBSTEPS;
    use water_ripple::renderer::CanvasPresenter;
    use water_ripple::{Settings, WaveState, tick};

    /// Stone dropped by a click
    const CLICK_STONE: (u32, i32) = (3, 400);
    /// Stone trailed by a dragged mouse
    const DRAG_STONE: (u32, i32) = (1, 120);

    /// Host instance holding all state
    struct Pond {
        state: WaveState,
        presenter: CanvasPresenter,
        settings: Settings,
        accumulator: f64,
        last_time: f64,
        mouse_down: bool,
    }

    impl Pond {
        /// Run as many ticks as the elapsed time calls for
        fn update(&mut self, elapsed_ms: f64) {
            let interval = self.settings.tick_interval_ms() as f64;
            self.accumulator = (self.accumulator + elapsed_ms).min(interval * MAX_SUBSTEPS as f64);

            while self.accumulator >= interval {
                tick(&mut self.state);
                self.accumulator -= interval;
            }

            if let Some(frame) = self.state.present(false) {
                self.presenter.present(frame);
            }
        }

        /// Convert client coordinates to grid coordinates
        fn to_grid(&self, canvas: &HtmlCanvasElement, event: &MouseEvent) -> (i32, i32) {
            let (w, h) = self.presenter.size;
            let sx = w as f64 / canvas.client_width().max(1) as f64;
            let sy = h as f64 / canvas.client_height().max(1) as f64;
            (
                (event.offset_x() as f64 * sx) as i32,
                (event.offset_y() as f64 * sy) as i32,
            )
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Water Ripple starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let image: HtmlImageElement = document
            .get_element_by_id("source")
            .expect("no source image")
            .dyn_into()
            .expect("not an image");

        // The image may still be loading
        if image.complete() && image.natural_width() > 0 {
            start(canvas, image);
        } else {
            let img = image.clone();
            let closure = Closure::once(move |_event: web_sys::Event| start(canvas, img));
            image.set_onload(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }
    }

    fn start(canvas: HtmlCanvasElement, image: HtmlImageElement) {
        let settings = Settings::load();
        settings.save();
        let (width, height) = (image.natural_width(), image.natural_height());

        let presenter = match CanvasPresenter::new(&canvas, width, height) {
            Ok(p) => p,
            Err(e) => {
                log::error!("Canvas setup failed: {}", e);
                return;
            }
        };
        let state = match presenter
            .capture(&image)
            .and_then(|source| WaveState::with_settings(source, &settings))
        {
            Ok(state) => state,
            Err(e) => {
                log::error!("Wave init failed: {}", e);
                return;
            }
        };

        if let Some(loading) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("loading"))
        {
            let _ = loading.set_attribute("class", "hidden");
        }

        let pond = Rc::new(RefCell::new(Pond {
            state,
            presenter,
            settings,
            accumulator: 0.0,
            last_time: 0.0,
            mouse_down: false,
        }));

        setup_input_handlers(&canvas, pond.clone());
        request_animation_frame(pond);

        log::info!("Water Ripple running ({}x{})", width, height);
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, pond: Rc<RefCell<Pond>>) {
        // Click: big stone
        {
            let pond = pond.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut p = pond.borrow_mut();
                p.mouse_down = true;
                let (x, y) = p.to_grid(&canvas_clone, &event);
                p.state.drop_stone(x, y, CLICK_STONE.0, CLICK_STONE.1);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Drag: trail of small stones
        {
            let pond = pond.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut p = pond.borrow_mut();
                if p.mouse_down {
                    let (x, y) = p.to_grid(&canvas_clone, &event);
                    p.state.drop_stone(x, y, DRAG_STONE.0, DRAG_STONE.1);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Release anywhere on the page
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                pond.borrow_mut().mouse_down = false;
            });
            if let Some(window) = web_sys::window() {
                let _ = window
                    .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }
    }

    fn request_animation_frame(pond: Rc<RefCell<Pond>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            frame_loop(pond, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(pond: Rc<RefCell<Pond>>, time: f64) {
        {
            let mut p = pond.borrow_mut();
            let elapsed = if p.last_time > 0.0 {
                time - p.last_time
            } else {
                0.0
            };
            p.last_time = time;
            p.update(elapsed);
        }

        request_animation_frame(pond);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_host::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod native_host {
    use std::fs::File;
    use std::io::{BufReader, BufWriter};
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    use anyhow::{Context, Result};
    use clap::Parser;

    use water_ripple::renderer::{ppm, test_pattern};
    use water_ripple::{EffectPreset, Settings, Stencil, WaveState, tick};

    #[derive(Parser, Debug)]
    #[command(author, version, about, long_about = None)]
    struct Args {
        /// Source image (binary PPM); a test pattern is used when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Where to write the last presented frame (binary PPM)
        #[arg(short, long, default_value = "ripple.ppm")]
        output: PathBuf,

        /// Settings file (JSON)
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// Test pattern width
        #[arg(long, default_value_t = 320)]
        width: usize,

        /// Test pattern height
        #[arg(long, default_value_t = 240)]
        height: usize,

        /// Number of ticks to run
        #[arg(short, long, default_value_t = 200)]
        ticks: u32,

        /// Fixed RNG seed
        #[arg(long)]
        seed: Option<u32>,

        /// Weather: off, rain, boat or wind
        #[arg(short, long)]
        effect: Option<String>,

        /// Use the elliptical (perspective) stencil
        #[arg(long)]
        elliptical: bool,

        /// Sleep the tick interval between ticks instead of running flat out
        #[arg(long)]
        realtime: bool,
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();

        let mut settings = match &args.settings {
            Some(path) => Settings::load_file(path)?,
            None => Settings::default(),
        };
        if let Some(seed) = args.seed {
            settings.seed = Some(seed);
        }
        if args.elliptical {
            settings.stencil = Stencil::Elliptical;
        }
        if let Some(name) = &args.effect {
            settings.effect = EffectPreset::from_str(name)
                .with_context(|| format!("unknown effect '{name}'"))?;
        }

        let source = match &args.input {
            Some(path) => {
                let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
                ppm::read(BufReader::new(file))?
            }
            None => test_pattern(args.width, args.height)?,
        };

        let mut state = WaveState::with_settings(source, &settings)?;
        let (w, h) = state.size();
        // Something to look at even with effects off
        state.drop_stone(w as i32 / 2, h as i32 / 2, 4, 600);

        let interval = Duration::from_millis(settings.tick_interval_ms() as u64);
        let started = Instant::now();
        let mut presented = 0u32;
        for _ in 0..args.ticks {
            tick(&mut state);
            if state.consume_present_flag() {
                presented += 1;
            }
            if args.realtime {
                std::thread::sleep(interval);
            }
        }
        log::info!(
            "{} ticks, {} frames presented in {:?} ({:?})",
            args.ticks,
            presented,
            started.elapsed(),
            state.lifecycle()
        );

        if let Some(frame) = state.present(true) {
            let file = File::create(&args.output)
                .with_context(|| format!("creating {}", args.output.display()))?;
            ppm::write(BufWriter::new(file), frame)?;
            log::info!("Wrote {}", args.output.display());
        }

        state.teardown();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Water Ripple (native) starting...");
    native_host::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
