//! Orrery: an interactive solar-system viewer with adjustable orbital speeds.

mod catalog;
mod config;
mod events;
mod mount;
mod panel;
mod render;
mod scene;
mod speed;
mod update;

use anyhow::Result;
use engine_core::Time;
use input::InputState;
use rand::rngs::StdRng;
use rand::SeedableRng;
use renderer::{RenderError, Renderer};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowId},
};

use config::OrreryConfig;
use mount::Mount;
use panel::ControlPanel;
use scene::SolarScene;
use speed::SpeedControl;

/// Everything bound to the window surface. Created on mount, dropped on unmount.
pub struct Session {
    renderer: Renderer,
    scene: SolarScene,
    input: InputState,
    time: Time,
    panel: ControlPanel,
}

impl Session {
    async fn new(window: Arc<Window>, config: &OrreryConfig) -> Result<Self> {
        let mut renderer = Renderer::new(window.clone(), config.vsync).await?;
        let (width, height) = renderer.dimensions();

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let scene = SolarScene::new(&config.planets, config.star_count, &mut rng, width, height);

        renderer.upload_scene(&scene.geometry());
        renderer.set_lights(&scene.lights());
        renderer.update_camera(scene.camera());

        let names = config.planets.iter().map(|p| p.name.clone()).collect();
        let panel = ControlPanel::new(names, config.show_controls, window.scale_factor() as f32);

        Ok(Self {
            renderer,
            scene,
            input: InputState::new(),
            time: Time::new(),
            panel,
        })
    }

    /// Update and draw one frame.
    fn frame(&mut self, speeds: &mut SpeedControl) -> Result<(), RenderError> {
        self.update(speeds);
        render::run(self, speeds)
    }
}

/// Application handler for winit.
struct App {
    config: OrreryConfig,
    window: Option<Arc<Window>>,
    /// Outlives sessions so a suspend/resume keeps the chosen speeds.
    speeds: SpeedControl,
    mount: Mount<Session>,
}

impl App {
    fn new(config: OrreryConfig) -> Self {
        Self {
            speeds: SpeedControl::from_catalog(&config.planets),
            config,
            window: None,
            mount: Mount::new(),
        }
    }

    fn window(&mut self, event_loop: &ActiveEventLoop) -> Option<Arc<Window>> {
        if let Some(window) = &self.window {
            return Some(window.clone());
        }
        let window_attrs = Window::default_attributes()
            .with_title("Orrery")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ))
            .with_fullscreen(self.config.fullscreen.then_some(Fullscreen::Borderless(None)));

        match event_loop.create_window(window_attrs) {
            Ok(w) => {
                let window = Arc::new(w);
                self.window = Some(window.clone());
                Some(window)
            }
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                None
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.window(event_loop) else {
            event_loop.exit();
            return;
        };

        let config = &self.config;
        match self
            .mount
            .mount_with(|| pollster::block_on(Session::new(window.clone(), config)))
        {
            Ok(true) => window.request_redraw(),
            Ok(false) => {}
            Err(e) => {
                log::error!("Failed to initialize renderer: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if matches!(event, WindowEvent::CloseRequested) {
            self.mount.unmount();
            event_loop.exit();
            return;
        }
        let Some(session) = self.mount.session_mut() else {
            return;
        };
        if let Err(e) = session.handle_window_event(event, &mut self.speeds) {
            log::error!("Render error: {}", e);
            self.mount.unmount();
            event_loop.exit();
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.mount.unmount();
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.mount.unmount();
        log::info!(
            "Exiting after {} mount(s), {} unmount(s)",
            self.mount.mounts(),
            self.mount.unmounts()
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = OrreryConfig::load();
    log::info!(
        "Starting Orrery: {} planets, {} stars, {}x{}",
        config.planets.len(),
        config.star_count,
        config.window_width,
        config.window_height
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
