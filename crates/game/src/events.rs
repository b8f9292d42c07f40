//! Window event routing for a mounted session.

use input::Viewport;
use renderer::RenderError;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::keyboard::PhysicalKey;

use crate::speed::SpeedControl;

impl crate::Session {
    /// Handle a window event. Errors are fatal render failures.
    pub(crate) fn handle_window_event(
        &mut self,
        event: WindowEvent,
        speeds: &mut SpeedControl,
    ) -> Result<(), RenderError> {
        match event {
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                log::info!("Scale factor changed to {}", scale_factor);
                self.panel.set_ui_scale(scale_factor as f32);
                let size = self.renderer.window().inner_size();
                self.resize(size);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (width, height) = self.renderer.dimensions();
                self.input
                    .process_cursor_position((position.x, position.y), &Viewport::from_size(width, height));
            }
            WindowEvent::CursorLeft { .. } => self.input.process_cursor_left(),
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.process_mouse_button(button, state);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.input.process_keyboard(key, event.state, event.repeat);
                }
            }
            WindowEvent::RedrawRequested => {
                self.frame(speeds)?;
                self.renderer.window().request_redraw();
            }
            _ => {}
        }
        Ok(())
    }

    /// Resize the surface and camera. Zero-sized (minimized) windows are ignored.
    fn resize(&mut self, size: PhysicalSize<u32>) {
        let Some((width, height)) = drawable_size(size) else {
            return;
        };
        log::info!("Resized to {}x{}", width, height);
        self.renderer.resize(size);
        self.scene.resize(width, height);
        self.renderer.update_camera(self.scene.camera());
    }
}

/// Size to configure the surface with, or `None` while the window has no drawable area.
fn drawable_size(size: PhysicalSize<u32>) -> Option<(u32, u32)> {
    (size.width > 0 && size.height > 0).then_some((size.width, size.height))
}
