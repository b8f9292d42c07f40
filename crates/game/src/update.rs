//! Per-frame state advancement.

use crate::speed::SpeedControl;

impl crate::Session {
    /// Apply panel input, then advance the scene with the live speeds.
    pub(crate) fn update(&mut self, speeds: &mut SpeedControl) {
        self.time.update();

        if let Some(change) = self.panel.handle_input(&self.input) {
            speeds.apply(&change.name, &change.text);
        }
        self.scene.update(speeds, self.input.pointer_ndc());

        if let Some(fps) = self.time.take_report() {
            log::debug!(
                "{:.1} fps ({} frames, hovered {:?})",
                fps,
                self.time.frame_count(),
                self.scene.hovered()
            );
        }
        self.input.begin_frame();
    }
}
