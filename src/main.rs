#![warn(clippy::all)]

//! Hemisphere Workbench - A web-based dual-hemisphere gnomonic map viewer.
//!
//! Two gnomonic views of the world, each centred on the antipode of the
//! other, are overlaid on one canvas. The secondary view is mirrored and
//! drawn semi-transparently on top; a slider controls its opacity and a
//! toggle swaps the two centres.

mod data;
mod geo;
mod render;
mod scene;
mod state;
mod ui;

use data::DatasetChannel;
use eframe::egui;
use render::{ResizeAction, ResizeTracker};
use scene::{build_scene, Scene};
use state::{AppState, MapConfig, Viewport};
use ui::ControlEvent;
use web_time::Instant;

// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        "Hemisphere Workbench",
        native_options,
        Box::new(|cc| Ok(Box::new(HemisphereApp::new(cc)))),
    )
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` messages to `console.log`:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document to host the map");
            return;
        };

        let canvas = match document
            .get_element_by_id("app_canvas")
            .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        {
            Some(canvas) => canvas,
            None => {
                log::error!("Failed to find canvas element app_canvas");
                return;
            }
        };

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(HemisphereApp::new(cc)))),
            )
            .await;

        // Remove the loading text once the app has loaded:
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p>The app has crashed. See the developer console for details.</p>",
                    );
                    log::error!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}

/// Main application state and logic.
pub struct HemisphereApp {
    /// Application state: configuration, current view, UI bits
    state: AppState,

    /// Scene currently on screen
    scene: Scene,

    /// Channel for async dataset fetches, keyed by render generation
    dataset_channel: DatasetChannel,

    /// Turns canvas size changes into debounced renders
    resize_tracker: ResizeTracker,
}

impl HemisphereApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let config = MapConfig::load();
        log::info!(
            "Starting with primary {} / secondary {}, dataset {}",
            config.primary_rotation,
            config.secondary_rotation,
            config.dataset_url
        );

        let state = AppState::new(config);
        let scene = Scene::empty(&state.view);
        let resize_tracker = ResizeTracker::new(state.config.resize_debounce());

        Self {
            state,
            scene,
            dataset_channel: DatasetChannel::new(),
            resize_tracker,
        }
    }

    /// Starts a full render of the current view.
    ///
    /// The scene is cleared right away; drawing happens once this render's
    /// dataset arrives.
    fn begin_render(&mut self, ctx: &egui::Context) {
        self.scene = Scene::empty(&self.state.view);
        let generation = self.dataset_channel.begin(
            ctx.clone(),
            self.state.config.dataset_url.clone(),
            self.state.config.countries_object.clone(),
        );
        log::debug!(
            "Render {} started at {}x{}",
            generation,
            self.state.view.viewport.width,
            self.state.view.viewport.height
        );
        self.state.status_message = "Loading boundaries...".to_string();
    }

    fn poll_dataset(&mut self) {
        let Some(result) = self.dataset_channel.try_recv() else {
            return;
        };

        match result.outcome {
            Ok(dataset) => {
                if dataset.is_empty() {
                    log::warn!("Render {}: dataset has no countries", result.generation);
                } else {
                    log::info!(
                        "Render {}: drawing {} countries",
                        result.generation,
                        dataset.len()
                    );
                }
                self.scene = build_scene(&self.state.view, &self.state.config, Some(&dataset));
                self.state.finish_load(Some(dataset.len()));
            }
            Err(e) => {
                // The map simply stays blank; the failure only goes to the log.
                log::warn!("Render {}: failed to load boundaries: {}", result.generation, e);
                self.state.finish_load(None);
            }
        }
    }

    fn handle_control(&mut self, ctx: &egui::Context, event: ControlEvent) {
        match event {
            ControlEvent::OpacityChanged(opacity) => {
                self.state.view = self.state.view.with_opacity(opacity);
                self.scene.set_secondary_opacity(opacity);
            }
            ControlEvent::Toggle => {
                self.state.view = self.state.view.toggled();
                log::info!(
                    "Toggled: primary {} / secondary {}",
                    self.state.view.primary,
                    self.state.view.secondary
                );
                self.begin_render(ctx);
            }
            ControlEvent::CopySvg => {
                ctx.copy_text(self.scene.to_svg());
                self.state.status_message = "Copied SVG to clipboard".to_string();
            }
        }
    }

    fn track_viewport(&mut self, ctx: &egui::Context, size: Viewport) {
        match self.resize_tracker.observe(size, Instant::now()) {
            ResizeAction::Render(size) => {
                self.state.view = self.state.view.resized(size);
                self.begin_render(ctx);
            }
            ResizeAction::Wait(remaining) => ctx.request_repaint_after(remaining),
            ResizeAction::Idle => {}
        }
    }
}

impl eframe::App for HemisphereApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_dataset();

        for event in ui::render_top_bar(ctx, &self.state) {
            self.handle_control(ctx, event);
        }

        let size = ui::render_canvas(ctx, &mut self.state, &self.scene);
        self.track_viewport(ctx, size);
    }
}
