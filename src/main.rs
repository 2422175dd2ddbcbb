//! Branch Sway entry point
//!
//! On the web this wires a canvas to a `ForestController` and runs the
//! animation loop. Natively it runs the same controller headless for a fixed
//! number of frames and prints a JSON summary.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use branch_sway::platform::CanvasSurface;
    use branch_sway::{ForestConfig, ForestController, HostEvent, PointerButton};

    /// App instance holding the controller and its surface
    struct App {
        controller: ForestController,
        surface: CanvasSurface,
        /// Last anchor written to the URL hash
        routed_anchor: Option<String>,
    }

    impl App {
        fn resize(&mut self) {
            let (w, h) = self.surface.fit();
            self.controller
                .handle_event(HostEvent::Resized { width: w, height: h });
        }

        fn render(&mut self) {
            if let Some(commands) = self.controller.frame() {
                if let Err(e) = self.surface.execute(&commands) {
                    log::warn!("Draw error: {:?}", e);
                }
                self.surface
                    .set_pointer_cursor(self.controller.hovered_anchor().is_some());
            }
            self.sync_route();
        }

        /// Mirror the active anchor into the location hash
        fn sync_route(&mut self) {
            let active = self.controller.active_anchor().map(str::to_owned);
            if active == self.routed_anchor {
                return;
            }
            if let (Some(id), Some(window)) = (&active, web_sys::window()) {
                let _ = window.location().set_hash(id);
            }
            self.routed_anchor = active;
        }

        fn toggle_theme(&mut self) {
            let theme = self.controller.theme().toggled();
            self.controller.handle_event(HostEvent::ThemeChanged(theme));
            let mut config = self.controller.config().clone();
            config.theme = theme;
            config.save();
        }
    }

    fn initial_anchor(window: &web_sys::Window) -> Option<String> {
        let hash = window.location().hash().ok()?;
        let id = hash.trim_start_matches('#');
        (!id.is_empty()).then(|| id.to_string())
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Branch Sway starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        let config = ForestConfig::load();
        let controller = ForestController::new(config, seed)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Forest initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            controller,
            surface: CanvasSurface::new(canvas.clone())?,
            routed_anchor: None,
        }));

        {
            let mut a = app.borrow_mut();
            let anchor = initial_anchor(&window);
            a.routed_anchor = anchor.clone();
            a.controller.handle_event(HostEvent::AnchorActivated(anchor));
            // Generation waits for the first non-empty size
            a.resize();
        }

        setup_input_handlers(&canvas, app.clone())?;
        setup_resize(app.clone())?;

        request_animation_frame(app);

        log::info!("Branch Sway running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        // Mouse move
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut().controller.handle_event(HostEvent::PointerMoved {
                    x: event.offset_x() as f32,
                    y: event.offset_y() as f32,
                });
            });
            canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse leave
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().controller.handle_event(HostEvent::PointerLeft);
            });
            canvas.add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse down: left activates or regenerates, middle toggles debug
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let button = match event.button() {
                    0 => PointerButton::Primary,
                    1 => {
                        event.prevent_default();
                        PointerButton::Middle
                    }
                    _ => PointerButton::Secondary,
                };
                app.borrow_mut().controller.handle_event(HostEvent::Pressed(button));
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard: T toggles the theme
        {
            let document = web_sys::window()
                .and_then(|w| w.document())
                .ok_or_else(|| JsValue::from_str("no document"))?;
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key().eq_ignore_ascii_case("t") {
                    app.borrow_mut().toggle_theme();
                }
            });
            document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_resize(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().resize();
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            animation_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn animation_loop(app: Rc<RefCell<App>>) {
        app.borrow_mut().render();
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::Parser;
    use serde::Serialize;

    use branch_sway::controller::ForestStats;
    use branch_sway::{ForestConfig, ForestController, ForestError, HostEvent, Theme};

    /// Run the forest without a window and report how it settled
    #[derive(Debug, Parser)]
    #[command(name = "branch-sway", version, about)]
    pub struct Args {
        /// JSON config file; missing fields take defaults
        pub config: Option<PathBuf>,
        /// Frames to simulate
        #[arg(long, default_value_t = 600)]
        pub frames: u64,
        #[arg(long, default_value_t = 1)]
        pub seed: u64,
        /// Viewport width and height
        #[arg(long, default_value_t = 1280.0)]
        pub width: f32,
        #[arg(long, default_value_t = 800.0)]
        pub height: f32,
        /// Sweep a pointer across the canvas while running
        #[arg(long)]
        pub sweep: bool,
        /// Add the five navigation anchors when no config file is given
        #[arg(long)]
        pub navigation: bool,
        #[arg(long)]
        pub theme: Option<String>,
    }

    #[derive(Debug, Serialize)]
    struct Summary {
        seed: u64,
        frames: u64,
        draw_commands_last_frame: usize,
        hovered_frames: u64,
        stats: Option<ForestStats>,
    }

    pub fn run(args: Args) -> Result<(), ForestError> {
        let mut config = match &args.config {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                ForestConfig::from_json_file(path)?
            }
            None if args.navigation => ForestConfig::with_navigation(),
            None => ForestConfig::load(),
        };
        if let Some(name) = &args.theme {
            match Theme::from_str(name) {
                Some(theme) => config.theme = theme,
                None => log::warn!("Unknown theme '{}', keeping {}", name, config.theme.as_str()),
            }
        }

        let mut controller = ForestController::new(config, args.seed)?;
        controller.handle_event(HostEvent::Resized {
            width: args.width,
            height: args.height,
        });

        let mut last_len = 0;
        let mut hovered_frames = 0;
        for frame in 0..args.frames {
            if args.sweep {
                let (x, y) = sweep_position(frame, args.frames, args.width, args.height);
                controller.handle_event(HostEvent::PointerMoved { x, y });
            }
            if let Some(commands) = controller.frame() {
                last_len = commands.len();
            }
            if controller.hovered_anchor().is_some() {
                hovered_frames += 1;
            }
            if frame > 0 && frame % 120 == 0 {
                if let Some(stats) = controller.stats() {
                    log::debug!(
                        "frame {}: mean displacement {:.3}, max {:.3}",
                        frame,
                        stats.mean_displacement,
                        stats.max_displacement
                    );
                }
            }
        }

        let stats = controller.stats();
        if let Some(s) = &stats {
            log::info!(
                "Ran {} frames: {} segments, mean displacement {:.3} deg",
                s.frame,
                s.segments,
                s.mean_displacement
            );
        }
        controller.teardown();

        let summary = Summary {
            seed: args.seed,
            frames: args.frames,
            draw_commands_last_frame: last_len,
            hovered_frames,
            stats,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }

    /// Pointer path: one left-to-right pass along the horizontal centre line
    fn sweep_position(frame: u64, frames: u64, width: f32, height: f32) -> (f32, f32) {
        let t = if frames <= 1 {
            0.0
        } else {
            frame as f32 / (frames - 1) as f32
        };
        (t * width, height / 2.0 + (t * std::f32::consts::TAU).sin() * height * 0.1)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    log::info!("Branch Sway (native, headless) starting...");

    let args = headless::Args::parse();
    if let Err(e) = headless::run(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
