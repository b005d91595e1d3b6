use crate::config::MaskChannel;

pub(crate) const VERTEX_ENTRY: &str = "vs_main";
pub(crate) const FRAGMENT_ENTRY: &str = "fs_main";

const MASK_COMPONENT: &str = "MASK_COMPONENT";

// Mirrors `effects::blend`. The mask component is substituted before compilation.
const RECOLOR_WGSL: &str = r#"
struct VsIn {
  @location(0) position: vec2<f32>,
  @location(1) texture_coordinate: vec2<f32>,
};

struct VsOut {
  @builtin(position) pos: vec4<f32>,
  @location(0) sample_coordinate: vec2<f32>,
};

@vertex
fn vs_main(in: VsIn) -> VsOut {
  var o: VsOut;
  o.pos = vec4<f32>(in.position, 0.0, 1.0);
  o.sample_coordinate = in.texture_coordinate;
  return o;
}

@group(0) @binding(0) var t_frame: texture_2d<f32>;
@group(0) @binding(1) var t_mask: texture_2d<f32>;
@group(0) @binding(2) var s_linear: sampler;
@group(0) @binding(3) var<uniform> recolor: vec4<f32>;

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
  let weight = textureSample(t_mask, s_linear, in.sample_coordinate);
  let color1 = textureSample(t_frame, s_linear, in.sample_coordinate);
  let color2 = vec4<f32>(recolor.rgb, 1.0);

  let luminance = dot(color1.rgb, vec3<f32>(0.299, 0.587, 0.114));
  let mix_value = clamp(weight.MASK_COMPONENT * luminance, 0.0, 1.0);

  return mix(color1, color2, mix_value);
}
"#;

/// WGSL for the recolor pass, reading the weight from `channel`'s component of the mask.
pub fn recolor_wgsl(channel: MaskChannel) -> String {
    RECOLOR_WGSL.replace(MASK_COMPONENT, channel.shader_component())
}

/// Full-viewport quad as a 4-vertex triangle strip: `(x, y)` in NDC then `(u, v)`.
///
/// Texture space has its origin top-left, so NDC bottom maps to `v = 1`.
pub(crate) const QUAD_VERTICES: [[f32; 4]; 4] = [
    [-1.0, -1.0, 0.0, 1.0], // bottom left
    [1.0, -1.0, 1.0, 1.0],  // bottom right
    [-1.0, 1.0, 0.0, 0.0],  // top left
    [1.0, 1.0, 1.0, 0.0],   // top right
];

pub(crate) const QUAD_STRIDE: u64 = 16;

pub(crate) const QUAD_ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: 0,
        shader_location: 0,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: 8,
        shader_location: 1,
    },
];

pub(crate) fn quad_bytes() -> Vec<u8> {
    QUAD_VERTICES
        .iter()
        .flatten()
        .flat_map(|v| v.to_le_bytes())
        .collect()
}

/// `recolor` uniform contents: the normalized target color padded to a `vec4<f32>`.
pub(crate) fn recolor_uniform(color: [f32; 3]) -> [u8; 16] {
    let mut out = [0u8; 16];
    for (i, c) in color.iter().chain(std::iter::once(&1.0)).enumerate() {
        out[i * 4..i * 4 + 4].copy_from_slice(&c.to_le_bytes());
    }
    out
}

#[cfg(test)]
#[path = "../../../tests/unit/render/gpu/shader.rs"]
mod tests;
