//! Speed control panel: a toggle button plus one slider per planet, drawn
//! with the overlay pipeline and driven by the pointer.

use glam::Vec2;
use input::{InputState, KeyCode, MouseButton};
use renderer::OverlayTextBuilder;

use crate::speed::SpeedControl;

/// Slider range and step, radians per frame.
pub const SLIDER_MIN: f32 = 0.0;
pub const SLIDER_MAX: f32 = 0.1;
pub const SLIDER_STEP: f32 = 0.001;

pub const PANEL_TITLE: &str = "Planet Speed Control";
const SHOW_TEXT: &str = "Show Controls";
const HIDE_TEXT: &str = "Hide Controls";

// Layout in logical pixels.
const MARGIN: f32 = 10.0;
const TEXT_SCALE: f32 = 2.0;
const PADDING: f32 = 6.0;
const PANEL_WIDTH: f32 = 300.0;
const ROW_HEIGHT: f32 = 42.0;
const TRACK_HEIGHT: f32 = 6.0;
/// Extra grab area above and below a track.
const TRACK_GRAB: f32 = 8.0;
const THUMB_SIZE: f32 = 14.0;

const BUTTON_BG: [f32; 4] = [0.15, 0.15, 0.2, 0.85];
const PANEL_BG: [f32; 4] = [0.0, 0.0, 0.0, 0.6];
const TEXT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const TRACK_COLOR: [f32; 4] = [0.4, 0.4, 0.45, 1.0];
const THUMB_COLOR: [f32; 4] = [0.3, 0.6, 1.0, 1.0];

/// Axis-aligned rectangle in window pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }

    fn grown(&self, dy: f32) -> Self {
        Self::new(self.x, self.y - dy, self.w, self.h + 2.0 * dy)
    }
}

/// A slider moved: new value for `name`, as slider text.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderChange {
    pub name: String,
    pub text: String,
}

/// Slider value under pixel `x` of `track`, snapped to the step and clamped to the range.
pub fn value_at(track: Rect, x: f32) -> f32 {
    let t = if track.w > 0.0 { ((x - track.x) / track.w).clamp(0.0, 1.0) } else { 0.0 };
    let steps = ((SLIDER_MAX - SLIDER_MIN) / SLIDER_STEP).round();
    let step = (t * steps).round();
    (SLIDER_MIN + step * SLIDER_STEP).clamp(SLIDER_MIN, SLIDER_MAX)
}

/// Text a slider hands over for `value`.
pub fn slider_text(value: f32) -> String {
    format!("{:.3}", value)
}

pub struct ControlPanel {
    names: Vec<String>,
    visible: bool,
    /// Slider being dragged.
    dragging: Option<usize>,
    /// Logical to physical pixel factor.
    ui_scale: f32,
    /// Row captions, rebuilt when the speed display copy changes.
    captions: Vec<String>,
    captions_revision: Option<u64>,
}

impl ControlPanel {
    pub fn new(names: Vec<String>, visible: bool, ui_scale: f32) -> Self {
        Self {
            captions: Vec::with_capacity(names.len()),
            names,
            visible,
            dragging: None,
            ui_scale: ui_scale.max(0.5),
            captions_revision: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        self.dragging = None;
        log::info!("Speed panel {}", if self.visible { "shown" } else { "hidden" });
    }

    pub fn set_ui_scale(&mut self, scale: f32) {
        self.ui_scale = scale.max(0.5);
    }

    pub fn button_text(&self) -> &'static str {
        if self.visible {
            HIDE_TEXT
        } else {
            SHOW_TEXT
        }
    }

    fn px(&self, logical: f32) -> f32 {
        logical * self.ui_scale
    }

    fn text_scale(&self) -> f32 {
        TEXT_SCALE * self.ui_scale
    }

    pub fn button_rect(&self) -> Rect {
        let text_w = OverlayTextBuilder::text_width(self.button_text(), self.text_scale());
        let text_h = OverlayTextBuilder::line_height(self.text_scale());
        Rect::new(
            self.px(MARGIN),
            self.px(MARGIN),
            text_w + self.px(PADDING) * 2.0,
            text_h + self.px(PADDING) * 2.0,
        )
    }

    fn panel_top(&self) -> f32 {
        let button = self.button_rect();
        button.y + button.h + self.px(MARGIN)
    }

    fn title_height(&self) -> f32 {
        OverlayTextBuilder::line_height(self.text_scale()) + self.px(PADDING) * 2.0
    }

    pub fn panel_rect(&self) -> Rect {
        Rect::new(
            self.px(MARGIN),
            self.panel_top(),
            self.px(PANEL_WIDTH),
            self.title_height() + self.px(ROW_HEIGHT) * self.names.len() as f32 + self.px(PADDING),
        )
    }

    fn row_top(&self, index: usize) -> f32 {
        self.panel_top() + self.title_height() + self.px(ROW_HEIGHT) * index as f32
    }

    /// Track of slider `index`.
    pub fn track_rect(&self, index: usize) -> Rect {
        let caption_h = OverlayTextBuilder::line_height(self.text_scale());
        Rect::new(
            self.px(MARGIN + PADDING),
            self.row_top(index) + caption_h + self.px(PADDING),
            self.px(PANEL_WIDTH - PADDING * 2.0),
            self.px(TRACK_HEIGHT),
        )
    }

    /// Feed one frame of input. Returns the slider change to apply, if any.
    pub fn handle_input(&mut self, input: &InputState) -> Option<SliderChange> {
        if input.is_key_pressed(KeyCode::Tab) {
            self.toggle();
        }

        let pointer = input.pointer();
        if input.is_mouse_pressed(MouseButton::Left) {
            if let Some(p) = pointer {
                if self.button_rect().contains(p) {
                    self.toggle();
                    return None;
                }
                if self.visible {
                    self.dragging =
                        (0..self.names.len()).find(|&i| self.track_rect(i).grown(self.px(TRACK_GRAB)).contains(p));
                }
            }
        }

        let change = self.drag_change(input, pointer);
        if !input.is_mouse_held(MouseButton::Left) {
            self.dragging = None;
        }
        change
    }

    fn drag_change(&self, input: &InputState, pointer: Option<Vec2>) -> Option<SliderChange> {
        let index = self.dragging?;
        let p = pointer?;
        if !(input.is_mouse_pressed(MouseButton::Left) || input.pointer_moved()) {
            return None;
        }
        Some(SliderChange {
            name: self.names.get(index)?.clone(),
            text: slider_text(value_at(self.track_rect(index), p.x)),
        })
    }

    fn refresh_captions(&mut self, speeds: &SpeedControl) {
        if self.captions_revision == Some(speeds.revision()) {
            return;
        }
        self.captions = self
            .names
            .iter()
            .map(|name| match speeds.display(name) {
                Some(speed) => format!("{}: {}", name, slider_text(speed)),
                None => name.clone(),
            })
            .collect();
        self.captions_revision = Some(speeds.revision());
    }

    /// Append the button and (when shown) the panel to `out`.
    pub fn build(&mut self, out: &mut OverlayTextBuilder, speeds: &SpeedControl) {
        let scale = self.text_scale();
        let pad = self.px(PADDING);

        let button = self.button_rect();
        out.add_text_with_bg(button.x, button.y, self.button_text(), scale, pad, TEXT_COLOR, BUTTON_BG);

        if !self.visible {
            return;
        }
        self.refresh_captions(speeds);

        let panel = self.panel_rect();
        out.add_rect(panel.x, panel.y, panel.w, panel.h, PANEL_BG);
        out.add_text(panel.x + pad, panel.y + pad, PANEL_TITLE, scale, TEXT_COLOR);

        for (index, name) in self.names.iter().enumerate() {
            let caption = self.captions.get(index).unwrap_or(name);
            out.add_text(panel.x + pad, self.row_top(index), caption, scale, TEXT_COLOR);

            let track = self.track_rect(index);
            out.add_rect(track.x, track.y, track.w, track.h, TRACK_COLOR);

            let value = speeds.display(name).unwrap_or(SLIDER_MIN).clamp(SLIDER_MIN, SLIDER_MAX);
            let t = (value - SLIDER_MIN) / (SLIDER_MAX - SLIDER_MIN);
            let thumb = self.px(THUMB_SIZE);
            out.add_rect(
                track.x + t * track.w - thumb / 2.0,
                track.y + track.h / 2.0 - thumb / 2.0,
                thumb,
                thumb,
                THUMB_COLOR,
            );
        }
        out.add_frame(panel.x, panel.y, panel.w, panel.h, self.ui_scale, TRACK_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;
    use input::{ElementState, Viewport};

    fn panel(visible: bool) -> ControlPanel {
        let names = default_catalog().into_iter().map(|s| s.name).collect();
        ControlPanel::new(names, visible, 1.0)
    }

    fn viewport() -> Viewport {
        Viewport::from_size(1280, 720)
    }

    fn center(r: Rect) -> (f64, f64) {
        ((r.x + r.w / 2.0) as f64, (r.y + r.h / 2.0) as f64)
    }

    #[test]
    fn value_is_quantized_and_clamped() {
        let track = Rect::new(100.0, 0.0, 200.0, 6.0);
        assert_eq!(value_at(track, 100.0), 0.0);
        assert_eq!(value_at(track, 50.0), 0.0);
        assert!((value_at(track, 300.0) - 0.1).abs() < 1e-6);
        assert!((value_at(track, 1000.0) - 0.1).abs() < 1e-6);
        // 41% of the way lands on step 41.
        assert!((value_at(track, 182.0) - 0.041).abs() < 1e-6);
        assert_eq!(slider_text(value_at(track, 182.0)), "0.041");
        assert_eq!(slider_text(value_at(track, 130.3)), "0.015");
    }

    #[test]
    fn starts_hidden_and_button_toggles() {
        let mut panel = panel(false);
        assert!(!panel.is_visible());
        assert_eq!(panel.button_text(), "Show Controls");

        let mut input = InputState::new();
        input.process_cursor_position(center(panel.button_rect()), &viewport());
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert_eq!(panel.handle_input(&input), None);
        assert!(panel.is_visible());
        assert_eq!(panel.button_text(), "Hide Controls");

        input.begin_frame();
        input.process_mouse_button(MouseButton::Left, ElementState::Released);
        panel.handle_input(&input);
        input.begin_frame();
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        panel.handle_input(&input);
        assert!(!panel.is_visible());
    }

    #[test]
    fn tab_toggles() {
        let mut panel = panel(false);
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::Tab, ElementState::Pressed, false);
        panel.handle_input(&input);
        assert!(panel.is_visible());
    }

    #[test]
    fn hidden_sliders_ignore_clicks() {
        let mut panel = panel(false);
        let track = panel.track_rect(0);
        let mut input = InputState::new();
        input.process_cursor_position(center(track), &viewport());
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert_eq!(panel.handle_input(&input), None);
    }

    #[test]
    fn dragging_a_slider_reports_changes() {
        let mut panel = panel(true);
        let track = panel.track_rect(6);
        let mut input = InputState::new();

        input.process_cursor_position((track.x as f64, (track.y + 1.0) as f64), &viewport());
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert_eq!(
            panel.handle_input(&input),
            Some(SliderChange { name: "Mars".into(), text: "0.000".into() })
        );

        // Keep dragging past the end of the track.
        input.begin_frame();
        input.process_cursor_position(((track.x + track.w + 50.0) as f64, 0.0), &viewport());
        assert_eq!(
            panel.handle_input(&input),
            Some(SliderChange { name: "Mars".into(), text: "0.100".into() })
        );

        // No movement, no change.
        input.begin_frame();
        assert_eq!(panel.handle_input(&input), None);

        input.begin_frame();
        input.process_mouse_button(MouseButton::Left, ElementState::Released);
        panel.handle_input(&input);
        input.begin_frame();
        input.process_cursor_position(center(track), &viewport());
        assert_eq!(panel.handle_input(&input), None);
    }

    #[test]
    fn slider_change_feeds_speed_control() {
        let mut panel = panel(true);
        let mut speeds = SpeedControl::from_catalog(&default_catalog());
        let track = panel.track_rect(4);
        let mut input = InputState::new();
        input.process_cursor_position(((track.x + track.w * 0.25) as f64, center(track).1), &viewport());
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        let change = panel.handle_input(&input).expect("slider moved");
        assert_eq!(change.name, "Earth");
        speeds.apply(&change.name, &change.text);
        assert!((speeds.live("Earth") - 0.025).abs() < 1e-6);
        assert_eq!(speeds.display("Earth"), Some(speeds.live("Earth")));
    }

    #[test]
    fn hidden_panel_draws_only_the_button() {
        let mut panel = panel(false);
        let speeds = SpeedControl::from_catalog(&default_catalog());
        let mut out = OverlayTextBuilder::new(1280.0, 720.0);
        panel.build(&mut out, &speeds);
        // Background plus the visible glyphs of "Show Controls".
        let glyphs = "Show Controls".chars().filter(|c| *c != ' ').count();
        assert_eq!(out.vertices.len(), 4 * (1 + glyphs));
    }

    #[test]
    fn button_background_covers_its_hit_area() {
        for scale in [1.0, 2.0] {
            let mut panel = panel(false);
            panel.set_ui_scale(scale);
            let speeds = SpeedControl::from_catalog(&default_catalog());
            let mut out = OverlayTextBuilder::new(1280.0, 720.0);
            panel.build(&mut out, &speeds);

            let r = panel.button_rect();
            let tl = out.vertices[0].position;
            let br = out.vertices[2].position;
            assert!((tl[0] - (r.x / 640.0 - 1.0)).abs() < 1e-5);
            assert!((tl[1] - (1.0 - r.y / 360.0)).abs() < 1e-5);
            assert!((br[0] - ((r.x + r.w) / 640.0 - 1.0)).abs() < 1e-5);
            assert!((br[1] - (1.0 - (r.y + r.h) / 360.0)).abs() < 1e-5);
            assert_eq!(out.vertices[0].color, BUTTON_BG);
        }
    }

    #[test]
    fn captions_follow_display_copy() {
        let mut panel = panel(true);
        let mut speeds = SpeedControl::from_catalog(&default_catalog());
        let mut out = OverlayTextBuilder::new(1280.0, 720.0);
        panel.build(&mut out, &speeds);
        assert_eq!(panel.captions[4], "Earth: 0.010");

        speeds.apply("Earth", "0.07");
        panel.build(&mut out, &speeds);
        assert_eq!(panel.captions[4], "Earth: 0.070");
        assert_eq!(panel.captions_revision, Some(1));
    }

    #[test]
    fn layout_scales_with_ui_scale() {
        let mut panel = panel(true);
        let small = panel.track_rect(0);
        panel.set_ui_scale(2.0);
        let large = panel.track_rect(0);
        assert!((large.w - small.w * 2.0).abs() < 1e-3);
        assert!((large.y - small.y * 2.0).abs() < 1e-3);
    }
}
