//! Vertex types and layouts for rendering.

use bytemuck::{Pod, Zeroable};
use engine_core::font;

/// Mesh vertex with position, normal and UV coordinates.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coords,
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Normal
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // UV/Tex coords
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Per-instance data for a sphere body (sun or planet).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct BodyInstance {
    /// Model matrix (4x4)
    pub model: [[f32; 4]; 4],
    /// Linear RGB color. w > 0.5 means emissive (unlit), otherwise lit by the scene lights.
    pub color: [f32; 4],
}

impl BodyInstance {
    pub fn new(model: [[f32; 4]; 4], color: [f32; 3], emissive: bool) -> Self {
        Self {
            model,
            color: [color[0], color[1], color[2], if emissive { 1.0 } else { 0.0 }],
        }
    }

    pub fn is_emissive(&self) -> bool {
        self.color[3] > 0.5
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<BodyInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // Model matrix column 0
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // Model matrix column 1
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // Model matrix column 2
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // Model matrix column 3
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // Color
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colored point, used for stars (point list) and orbit rings (line strips).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl LineVertex {
    pub fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Camera-facing label quad. The quad corners are generated from the vertex index.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LabelInstance {
    /// World-space center of the quad.
    pub center: [f32; 3],
    pub _pad: f32,
    /// Width and height in world units.
    pub size: [f32; 2],
    pub _pad2: [f32; 2],
    /// Atlas region `[u0, v0, u1, v1]`.
    pub uv_rect: [f32; 4],
}

impl LabelInstance {
    pub fn new(center: [f32; 3], size: [f32; 2], uv_rect: [f32; 4]) -> Self {
        Self {
            center,
            _pad: 0.0,
            size,
            _pad2: [0.0; 2],
            uv_rect,
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LabelInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Vertex for screen-space text / UI overlay.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct OverlayVertex {
    /// NDC position (x, y) in -1..1
    pub position: [f32; 2],
    /// UV into font atlas (negative x = solid color quad)
    pub tex_coords: [f32; 2],
    /// RGBA color
    pub color: [f32; 4],
}

impl OverlayVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<OverlayVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Font atlas layout: 16 columns x 6 rows of glyph cells, covering ASCII 32..127.
const FONT_COLS: u32 = 16;
const FONT_ROWS: u32 = 6;

/// Helper to build screen-space overlay geometry.
/// Generates OverlayVertex quads for each character and for solid rectangles.
pub struct OverlayTextBuilder {
    pub vertices: Vec<OverlayVertex>,
    pub indices: Vec<u32>,
    screen_w: f32,
    screen_h: f32,
}

impl OverlayTextBuilder {
    pub fn new(screen_w: f32, screen_h: f32) -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            screen_w: screen_w.max(1.0),
            screen_h: screen_h.max(1.0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Width in pixels of `text` drawn at `scale`.
    pub fn text_width(text: &str, scale: f32) -> f32 {
        text.chars().count() as f32 * font::ADVANCE_X as f32 * scale
    }

    /// Height in pixels of one line drawn at `scale`.
    pub fn line_height(scale: f32) -> f32 {
        font::ADVANCE_Y as f32 * scale
    }

    /// Convert pixel coords to NDC.
    fn px_to_ndc(&self, px: f32, py: f32) -> [f32; 2] {
        [
            (px / self.screen_w) * 2.0 - 1.0,
            1.0 - (py / self.screen_h) * 2.0,
        ]
    }

    fn push_quad(&mut self, x: f32, y: f32, w: f32, h: f32, uv: [f32; 4], color: [f32; 4]) {
        let tl = self.px_to_ndc(x, y);
        let br = self.px_to_ndc(x + w, y + h);
        let base = self.vertices.len() as u32;
        self.vertices.push(OverlayVertex { position: [tl[0], tl[1]], tex_coords: [uv[0], uv[1]], color });
        self.vertices.push(OverlayVertex { position: [br[0], tl[1]], tex_coords: [uv[2], uv[1]], color });
        self.vertices.push(OverlayVertex { position: [br[0], br[1]], tex_coords: [uv[2], uv[3]], color });
        self.vertices.push(OverlayVertex { position: [tl[0], br[1]], tex_coords: [uv[0], uv[3]], color });
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Add a solid-color rectangle. Coordinates in pixels.
    pub fn add_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
        // Negative UV is the solid-color sentinel.
        self.push_quad(x, y, w, h, [-1.0, -1.0, -1.0, -1.0], color);
    }

    /// Add a 1px-per-scale outline around a rectangle.
    pub fn add_frame(&mut self, x: f32, y: f32, w: f32, h: f32, thickness: f32, color: [f32; 4]) {
        self.add_rect(x, y, w, thickness, color);
        self.add_rect(x, y + h - thickness, w, thickness, color);
        self.add_rect(x, y, thickness, h, color);
        self.add_rect(x + w - thickness, y, thickness, h, color);
    }

    /// Add a string of text at pixel position (x, y) with the given scale and color.
    /// `scale` = 1.0 means each glyph cell is 6x8 screen pixels; 2.0 doubles that.
    pub fn add_text(&mut self, x: f32, y: f32, text: &str, scale: f32, color: [f32; 4]) {
        let gw = font::ADVANCE_X as f32 * scale;
        let gh = font::ADVANCE_Y as f32 * scale;
        let mut cx = x;
        for ch in text.chars() {
            let code = ch as u32;
            if !(font::FIRST_CHAR..=font::LAST_CHAR).contains(&code) || ch == ' ' {
                cx += gw;
                continue;
            }
            let idx = code - font::FIRST_CHAR;
            let col = (idx % FONT_COLS) as f32;
            let row = (idx / FONT_COLS) as f32;
            let uv = [
                col / FONT_COLS as f32,
                row / FONT_ROWS as f32,
                (col + 1.0) / FONT_COLS as f32,
                (row + 1.0) / FONT_ROWS as f32,
            ];
            self.push_quad(cx, y, gw, gh, uv, color);
            cx += gw;
        }
    }

    /// Add text on a background box with `padding` pixels on every side.
    /// Returns the height of the box.
    #[allow(clippy::too_many_arguments)]
    pub fn add_text_with_bg(
        &mut self,
        x: f32,
        y: f32,
        text: &str,
        scale: f32,
        padding: f32,
        text_color: [f32; 4],
        bg_color: [f32; 4],
    ) -> f32 {
        let gh = Self::line_height(scale);
        let text_w = Self::text_width(text, scale);
        self.add_rect(x, y, text_w + padding * 2.0, gh + padding * 2.0, bg_color);
        self.add_text(x + padding, y + padding, text, scale, text_color);
        gh + padding * 2.0
    }
}

/// Bake the bitmap font into an `R8Unorm` atlas of 16x6 cells.
/// Returns the pixel bytes and (width, height).
pub fn generate_font_atlas() -> (Vec<u8>, u32, u32) {
    let atlas_w = FONT_COLS * font::ADVANCE_X; // 96
    let atlas_h = FONT_ROWS * font::ADVANCE_Y; // 48
    let mut pixels = vec![0u8; (atlas_w * atlas_h) as usize];

    for code in font::FIRST_CHAR..=font::LAST_CHAR {
        let Some(rows) = char::from_u32(code).and_then(font::glyph) else {
            continue;
        };
        let idx = code - font::FIRST_CHAR;
        let base_x = (idx % FONT_COLS) * font::ADVANCE_X;
        let base_y = (idx / FONT_COLS) * font::ADVANCE_Y;

        for gy in 0..font::GLYPH_H {
            for gx in 0..font::GLYPH_W {
                if font::pixel(&rows, gx, gy) {
                    pixels[((base_y + gy) * atlas_w + base_x + gx) as usize] = 255;
                }
            }
        }
    }

    (pixels, atlas_w, atlas_h)
}
