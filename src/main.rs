//! Volador entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, MouseEvent, TouchEvent};

    use volador::platform::{FrameClock, Viewport};
    use volador::renderer::{Scene, SdfRenderState};
    use volador::sim::{GameEvent, GameState, TickInput, tick};
    use volador::{HudView, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        render_state: Option<SdfRenderState>,
        viewport: Viewport,
        clock: FrameClock,
        input: TickInput,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, settings: Settings, viewport: Viewport) -> Self {
            let mut state = GameState::new(seed);
            state.camera.aspect = viewport.aspect();
            Self {
                state,
                settings,
                render_state: None,
                viewport,
                clock: FrameClock::new(),
                input: TickInput::default(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run one simulation tick and handle what it reported
        fn update(&mut self, time: f64) {
            let dt = self.clock.delta(time);
            let input = self.input;
            tick(&mut self.state, &input, dt);
            // Clear one-shot inputs after processing
            self.input.replay = false;

            for event in self.state.drain_events() {
                match event {
                    GameEvent::ShowReplay => self.replay_prompt(true),
                    GameEvent::Restarted => self.replay_prompt(false),
                    GameEvent::EnemyHit { pos } => {
                        log::debug!("Enemy hit at ({:.0}, {:.0})", pos.x, pos.y);
                    }
                    GameEvent::GameOver { .. }
                    | GameEvent::LevelUp { .. }
                    | GameEvent::CoinCollected { .. } => {}
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            let scene = Scene::build(&self.state, &self.settings);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&scene, time) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let hud = HudView::from_state(&self.state);

            if let Some(el) = document.get_element_by_id("distValue") {
                el.set_text_content(Some(&hud.distance.to_string()));
            }
            if let Some(el) = document.get_element_by_id("levelValue") {
                el.set_text_content(Some(&hud.level.to_string()));
            }

            if let Some(bar) = html_element(document, "energyBar") {
                let style = bar.style();
                let _ = style.set_property("right", &format!("{}%", hud.energy_right_pct));
                let _ = style.set_property("background-color", hud.energy_color);
                let animation = if hud.energy_blink { "blinking" } else { "none" };
                let _ = style.set_property("animation-name", animation);
            }

            // SVG circle, not an HtmlElement
            if let Some(el) = document.get_element_by_id("levelCircleStroke") {
                let _ = el.set_attribute("stroke-dashoffset", &hud.level_dashoffset.to_string());
            }

            if self.settings.show_fps {
                if let Some(el) = document.get_element_by_id("fpsValue") {
                    el.set_text_content(Some(&self.fps.to_string()));
                }
            }
        }

        fn replay_prompt(&self, visible: bool) {
            let document = web_sys::window().and_then(|w| w.document());
            if let Some(el) = document.and_then(|d| html_element(&d, "replayMessage")) {
                let display = if visible { "block" } else { "none" };
                let _ = el.style().set_property("display", display);
            }
        }

        fn resize(&mut self, css_w: f32, css_h: f32, pixel_w: u32, pixel_h: u32) {
            self.viewport.resize(css_w, css_h);
            self.state.camera.aspect = self.viewport.aspect();
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(pixel_w, pixel_h);
            }
        }
    }

    fn html_element(document: &Document, id: &str) -> Option<HtmlElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    fn js_err(msg: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&msg.to_string())
    }

    /// Window size in CSS pixels
    fn window_size(window: &web_sys::Window) -> (f32, f32) {
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
        (w as f32, h as f32)
    }

    /// Size the canvas backing store for the current window and DPR
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (f32, f32, u32, u32) {
        let (css_w, css_h) = window_size(window);
        let dpr = window.device_pixel_ratio() as f32;
        let width = ((css_w * dpr) as u32).max(1);
        let height = ((css_h * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (css_w, css_h, width, height)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_err)?;

        log::info!("Volador starting...");

        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
        let document = window.document().ok_or_else(|| js_err("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| js_err("no canvas"))?
            .dyn_into()
            .map_err(|_| js_err("not a canvas"))?;

        let (css_w, css_h, width, height) = fit_canvas(&window, &canvas);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();
        let game = Rc::new(RefCell::new(Game::new(
            seed,
            settings,
            Viewport::new(css_w, css_h),
        )));

        log::info!("Game initialized with seed: {}", seed);

        // WebGPU where available, WebGL2 otherwise
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(js_err)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(js_err)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let mut render_state = SdfRenderState::new(surface, &adapter, width, height)
            .await
            .map_err(js_err)?;
        render_state.set_start_time(js_sys::Date::now());
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&document, game.clone());
        setup_resize_handler(&window, canvas, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Volador running!");
        Ok(())
    }

    fn setup_input_handlers(document: &Document, game: Rc<RefCell<Game>>) {
        // Mouse move: pointer anywhere in the window steers
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let pointer = g
                    .viewport
                    .pointer(event.client_x() as f32, event.client_y() as f32);
                g.input.pointer = pointer;
            });
            let _ = document
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let pointer = g
                        .viewport
                        .pointer(touch.client_x() as f32, touch.client_y() as f32);
                    g.input.pointer = pointer;
                }
            });
            let _ = document
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up / touch end: replay request
        for event_name in ["mouseup", "touchend"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.replay = true;
            });
            let _ = document
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(
        window: &web_sys::Window,
        canvas: HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::UiEvent| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (css_w, css_h, width, height) = fit_canvas(&window, &canvas);
            game.borrow_mut().resize(css_w, css_h, width, height);
            log::debug!("Resized to {}x{}", width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Volador (native) starting...");
    log::info!("Native mode has no window - flying a headless autopilot run");

    autopilot(volador::consts::DEFAULT_SEED, 60 * 60 * 3);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Fly `ticks` frames at 60 fps with a weaving pointer, replaying on game over
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(seed: u64, ticks: u32) {
    use volador::sim::{GameEvent, GameState, PointerState, TickInput, tick};

    let mut state = GameState::new(seed);
    let mut coins = 0u32;
    let mut hits = 0u32;
    let mut runs = 1u32;
    let mut best_distance = 0.0f32;

    for i in 0..ticks {
        let t = i as f32 / 60.0;
        let input = TickInput {
            pointer: PointerState::new((t * 0.7).sin() * 0.5, (t * 1.3).sin() * 0.8),
            replay: true,
        };
        tick(&mut state, &input, 1000.0 / 60.0);

        for event in state.drain_events() {
            match event {
                GameEvent::CoinCollected { .. } => coins += 1,
                GameEvent::EnemyHit { pos } => {
                    hits += 1;
                    log::debug!("Enemy hit at ({:.0}, {:.0})", pos.x, pos.y);
                }
                GameEvent::LevelUp { level } => log::info!("Level {}", level),
                GameEvent::GameOver { distance, level } => {
                    best_distance = best_distance.max(distance);
                    log::info!("Game over at distance {:.0}, level {}", distance, level);
                }
                GameEvent::ShowReplay => {}
                GameEvent::Restarted => runs += 1,
            }
        }
    }
    best_distance = best_distance.max(state.distance);

    log::info!(
        "Autopilot done: {} runs, {} coins, {} enemy hits, best distance {:.0}",
        runs,
        coins,
        hits,
        best_distance
    );
}
