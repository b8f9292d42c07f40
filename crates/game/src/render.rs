//! Rendering: scene pass then the panel overlay.

use renderer::{OverlayTextBuilder, RenderError};

use crate::speed::SpeedControl;
use crate::Session;

/// Draw one frame. A skipped frame (surface lost or busy) is not an error.
pub fn run(session: &mut Session, speeds: &SpeedControl) -> Result<(), RenderError> {
    let Some((output, mut encoder)) = session.renderer.begin_frame()? else {
        return Ok(());
    };
    let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

    let bodies = session.scene.body_instances();
    let labels = session.scene.label_instances();
    session.renderer.update_camera(session.scene.camera());
    session.renderer.render_scene(&mut encoder, &view, &bodies, &labels);

    let (width, height) = session.renderer.dimensions();
    let mut overlay = OverlayTextBuilder::new(width as f32, height as f32);
    session.panel.build(&mut overlay, speeds);
    session
        .renderer
        .render_overlay(&mut encoder, &view, &overlay.vertices, &overlay.indices);

    session.renderer.end_frame(output, encoder);
    Ok(())
}
