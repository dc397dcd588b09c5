//! Instanced 2D shapes: the WGSL shader and the CPU-side instance data.
//!
//! Every [`DrawCommand`] except `Clear` becomes one [`ShapeInstance`], drawn
//! as a screen-aligned quad whose fragment shader evaluates a signed distance
//! for the shape kind.

use bytemuck::{Pod, Zeroable};

use crate::draw::{Color, DrawCommand, DrawList};

pub const KIND_RECT: f32 = 0.0;
pub const KIND_CIRCLE: f32 = 1.0;
pub const KIND_GLOW: f32 = 2.0;

/// Per-draw uniforms.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Uniforms {
    /// Logical viewport size in pixels.
    pub viewport: [f32; 2],
    pub scale_factor: f32,
    pub _padding: f32,
}

/// One shape, laid out to match `ShapeIn` in [`SHAPE_SHADER`].
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ShapeInstance {
    /// Centre in logical pixels.
    pub center: [f32; 2],
    /// Half extents in logical pixels.
    pub half_size: [f32; 2],
    /// Straight (non-premultiplied) RGBA.
    pub color: [f32; 4],
    /// x: kind, y: corner radius (rects) or radius (circles, glows).
    pub params: [f32; 4],
}

impl ShapeInstance {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x2,
        2 => Float32x4,
        3 => Float32x4
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ShapeInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }

    #[inline]
    pub fn kind(&self) -> f32 {
        self.params[0]
    }
}

fn encode(color: Color, linear: bool) -> [f32; 4] {
    if linear {
        color.to_linear().to_array()
    } else {
        color.to_array()
    }
}

/// Convert a recorded list into instances, replacing the contents of `out`.
///
/// With `linear`, colours are converted from sRGB for an sRGB render target.
pub fn shape_instances(list: &DrawList, linear: bool, out: &mut Vec<ShapeInstance>) {
    out.clear();
    for command in list.commands() {
        let instance = match *command {
            DrawCommand::Clear(_) => continue,
            DrawCommand::Rect {
                origin,
                size,
                corner_radius,
                color,
            } => {
                let half = size * 0.5;
                let corner = corner_radius.min(half.x).min(half.y);
                ShapeInstance {
                    center: (origin + half).to_array(),
                    half_size: half.to_array(),
                    color: encode(color, linear),
                    params: [KIND_RECT, corner, 0.0, 0.0],
                }
            }
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => ShapeInstance {
                center: center.to_array(),
                half_size: [radius, radius],
                color: encode(color, linear),
                params: [KIND_CIRCLE, radius, 0.0, 0.0],
            },
            DrawCommand::Glow {
                center,
                radius,
                color,
            } => ShapeInstance {
                center: center.to_array(),
                half_size: [radius, radius],
                color: encode(color, linear),
                params: [KIND_GLOW, radius, 0.0, 0.0],
            },
        };
        out.push(instance);
    }
}

/// Shape shader. Quads are grown by one pixel for anti-aliasing.
pub const SHAPE_SHADER: &str = r#"
struct Uniforms {
    viewport: vec2<f32>,
    scale_factor: f32,
    _padding: f32,
}

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct ShapeIn {
    @location(0) center: vec2<f32>,
    @location(1) half_size: vec2<f32>,
    @location(2) color: vec4<f32>,
    @location(3) params: vec4<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) local: vec2<f32>,
    @location(1) half_size: vec2<f32>,
    @location(2) color: vec4<f32>,
    @location(3) params: vec4<f32>,
}

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32, shape: ShapeIn) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0)
    );
    let corner = corners[vertex_index];
    let local = corner * (shape.half_size + vec2<f32>(1.0, 1.0));
    let pixel = shape.center + local;
    let ndc = vec2<f32>(
        pixel.x / uniforms.viewport.x * 2.0 - 1.0,
        1.0 - pixel.y / uniforms.viewport.y * 2.0
    );

    var out: VertexOutput;
    out.clip_position = vec4<f32>(ndc, 0.0, 1.0);
    out.local = local;
    out.half_size = shape.half_size;
    out.color = shape.color;
    out.params = shape.params;
    return out;
}

fn rounded_box(p: vec2<f32>, half_size: vec2<f32>, radius: f32) -> f32 {
    let q = abs(p) - half_size + vec2<f32>(radius, radius);
    return length(max(q, vec2<f32>(0.0, 0.0))) + min(max(q.x, q.y), 0.0) - radius;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let kind = in.params.x;
    let radius = in.params.y;
    var coverage: f32 = 0.0;

    if (kind < 0.5) {
        let d = rounded_box(in.local, in.half_size, radius);
        coverage = clamp(0.5 - d, 0.0, 1.0);
    } else if (kind < 1.5) {
        let d = length(in.local) - radius;
        coverage = clamp(0.5 - d, 0.0, 1.0);
    } else {
        let t = clamp(1.0 - length(in.local) / max(radius, 0.0001), 0.0, 1.0);
        coverage = t * t;
    }

    if (coverage <= 0.0) {
        discard;
    }
    return vec4<f32>(in.color.rgb, in.color.a * coverage);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawTarget;
    use glam::Vec2;

    #[test]
    fn test_instance_layout_size() {
        assert_eq!(std::mem::size_of::<ShapeInstance>(), 48);
        assert_eq!(std::mem::size_of::<Uniforms>(), 16);
    }

    #[test]
    fn test_commands_become_instances() {
        let mut list = DrawList::new();
        list.clear(Color::BLACK);
        list.fill_glow(Vec2::new(10.0, 10.0), 30.0, Color::WHITE.with_alpha(0.1));
        list.fill_circle(Vec2::new(10.0, 10.0), 1.5, Color::WHITE);
        list.fill_rect(Vec2::new(100.0, 50.0), Vec2::new(40.0, 20.0), 30.0, Color::WHITE);

        let mut out = Vec::new();
        shape_instances(&list, false, &mut out);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].kind(), KIND_GLOW);
        assert_eq!(out[1].kind(), KIND_CIRCLE);
        assert_eq!(out[1].params[1], 1.5);

        let rect = out[2];
        assert_eq!(rect.kind(), KIND_RECT);
        assert_eq!(rect.center, [120.0, 60.0]);
        assert_eq!(rect.half_size, [20.0, 10.0]);
        assert_eq!(rect.params[1], 10.0, "corner radius limited by half height");
    }

    #[test]
    fn test_linear_conversion() {
        let mut list = DrawList::new();
        let grey = Color::rgba(0.5, 0.5, 0.5, 0.5);
        list.fill_circle(Vec2::ZERO, 1.0, grey);

        let mut out = Vec::new();
        shape_instances(&list, true, &mut out);
        let c = out[0].color;
        assert!(c[0] < 0.25 && c[0] > 0.2);
        assert_eq!(c[3], 0.5);
    }

    #[test]
    fn test_output_is_replaced() {
        let mut list = DrawList::new();
        list.fill_circle(Vec2::ZERO, 1.0, Color::WHITE);
        let mut out = Vec::new();
        shape_instances(&list, false, &mut out);
        shape_instances(&list, false, &mut out);
        assert_eq!(out.len(), 1);
    }
}
