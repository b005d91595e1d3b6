//! Luminance-weighted color mix.
//!
//! The same arithmetic runs per fragment in the GPU shader (see `render::gpu::shader`), so any
//! change here must be mirrored there.

/// Rec. 601 luma weights for red, green and blue.
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Perceptual brightness of an 8-bit-range RGB triple, in `[0, 1]`.
pub fn luminance(rgb: [f32; 3]) -> f32 {
    (rgb[0] * LUMA_WEIGHTS[0] + rgb[1] * LUMA_WEIGHTS[1] + rgb[2] * LUMA_WEIGHTS[2]) / 255.0
}

/// Interpolation factor between source and target: mask weight scaled by luminance.
pub fn mix_amount(weight: f32, luminance: f32) -> f32 {
    (weight * luminance).clamp(0.0, 1.0)
}

/// Mix `source` toward `target`, both in `[0, 255]`, by `weight` (in `[0, 1]`) times the
/// source luminance.
pub fn blend(source: [f32; 3], weight: f32, target: [f32; 3]) -> [f32; 3] {
    let m = mix_amount(weight, luminance(source));
    let keep = 1.0 - m;
    [
        source[0] * keep + target[0] * m,
        source[1] * keep + target[1] * m,
        source[2] * keep + target[2] * m,
    ]
}

/// Round to nearest (ties to even) and saturate into `u8`.
pub fn quantize(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round_ties_even().clamp(0.0, 255.0) as u8
}

/// Blend one 8-bit pixel with an 8-bit mask value.
///
/// `target` is the configured color in `[0, 255]`.
pub fn blend_rgb8(source: [u8; 3], mask: u8, target: [f32; 3]) -> [u8; 3] {
    let weight = f32::from(mask) * (1.0 / 255.0);
    let out = blend(source.map(f32::from), weight, target);
    out.map(quantize)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blend.rs"]
mod tests;
