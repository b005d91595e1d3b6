use image::GrayImage;
use image::imageops;

use crate::config::MaskChannel;
use crate::foundation::error::{RecolorError, RecolorResult};
use crate::foundation::frame::{ImageFrame, PixelFormat};

/// Pull the weight plane out of `mask` without resizing.
///
/// Single-channel masks are used as-is regardless of `channel`. Multi-channel masks yield
/// plane 0 for `Red` and plane 3 for `Alpha`.
pub fn select_plane(mask: &ImageFrame, channel: MaskChannel) -> RecolorResult<GrayImage> {
    let (w, h) = (mask.width(), mask.height());
    let plane = match mask.format() {
        PixelFormat::Gray8 => mask.data().to_vec(),
        fmt => {
            let idx = channel.plane_index();
            if idx >= fmt.channels() {
                return Err(RecolorError::contract(format!(
                    "{channel:?} mask channel needs an RGBA mask, got {fmt:?}"
                )));
            }
            mask.data()
                .chunks_exact(fmt.channels())
                .map(|px| px[idx])
                .collect()
        }
    };
    GrayImage::from_raw(w, h, plane)
        .ok_or_else(|| RecolorError::contract("mask plane does not match mask dimensions"))
}

/// Single-channel weight image for `mask`, resampled to `target_width`x`target_height`.
///
/// Resampling is centre-aligned bilinear over the nearest 2x2 texels with edges clamped, the
/// same lookup the GPU sampler performs, so both executors see the same weights at any scale.
/// Values stay in `0..=255`; callers scale by `1/255`.
pub fn extract(
    mask: &ImageFrame,
    channel: MaskChannel,
    target_width: u32,
    target_height: u32,
) -> RecolorResult<GrayImage> {
    if target_width == 0 || target_height == 0 {
        return Err(RecolorError::contract(format!(
            "mask target size must be non-zero, got {target_width}x{target_height}"
        )));
    }
    let plane = select_plane(mask, channel)?;
    if plane.dimensions() == (target_width, target_height) {
        return Ok(plane);
    }
    tracing::trace!(
        from_w = plane.width(),
        from_h = plane.height(),
        to_w = target_width,
        to_h = target_height,
        "resizing mask plane"
    );
    let (tw, th) = (target_width as f32, target_height as f32);
    let mut resized = GrayImage::new(target_width, target_height);
    for (x, y, px) in resized.enumerate_pixels_mut() {
        let u = (x as f32 + 0.5) / tw;
        let v = (y as f32 + 0.5) / th;
        *px = imageops::sample_bilinear(&plane, u, v)
            .ok_or_else(|| RecolorError::contract("mask sample outside the mask plane"))?;
    }
    Ok(resized)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/mask.rs"]
mod tests;
