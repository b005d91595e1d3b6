use rayon::prelude::*;

use crate::config::BlendConfig;
use crate::contract::Residency;
use crate::effects::{blend, mask};
use crate::foundation::error::{RecolorError, RecolorResult};
use crate::foundation::frame::{ImageFrame, PixelFormat};
use crate::render::executor::{BlendExecutor, FrameResource};

/// Host-memory recolor over packed RGB8 buffers.
#[derive(Clone, Debug)]
pub struct CpuRecolor {
    config: BlendConfig,
    closed: bool,
}

impl CpuRecolor {
    /// Create an executor for `config`.
    pub fn new(config: BlendConfig) -> Self {
        Self {
            config,
            closed: false,
        }
    }

    /// Blend settings in use.
    pub fn config(&self) -> &BlendConfig {
        &self.config
    }

    /// Recolor an RGB8 `source` with `mask`, returning a newly allocated frame.
    ///
    /// `mask` may be gray, RGB or RGBA and any size; it is reduced to one plane and resampled
    /// to the source size. Returns `Ok(None)` when `mask` is absent.
    #[tracing::instrument(skip_all, fields(w = source.width(), h = source.height()))]
    pub fn process_frame(
        &self,
        source: &ImageFrame,
        mask: Option<&ImageFrame>,
    ) -> RecolorResult<Option<ImageFrame>> {
        if self.closed {
            return Err(RecolorError::contract("cpu executor is closed"));
        }
        let Some(mask) = mask else {
            tracing::debug!("mask missing, skipping frame");
            return Ok(None);
        };
        if source.format() != PixelFormat::Rgb8 {
            return Err(RecolorError::contract(format!(
                "cpu recolor expects an RGB8 source, got {:?}",
                source.format()
            )));
        }

        let (w, h) = (source.width(), source.height());
        let weights = mask::extract(mask, self.config.mask_channel(), w, h)?;
        let target = self.config.target_color_255();

        let mut out = vec![0u8; source.data().len()];
        let stride = source.stride();
        out.par_chunks_mut(stride)
            .zip(source.data().par_chunks(stride))
            .zip(weights.as_raw().par_chunks(w as usize))
            .for_each(|((dst_row, src_row), mask_row)| {
                for ((d, s), &m) in dst_row
                    .chunks_exact_mut(3)
                    .zip(src_row.chunks_exact(3))
                    .zip(mask_row)
                {
                    let px = blend::blend_rgb8([s[0], s[1], s[2]], m, target);
                    d.copy_from_slice(&px);
                }
            });

        ImageFrame::new(w, h, source.format(), out).map(Some)
    }
}

impl BlendExecutor for CpuRecolor {
    fn residency(&self) -> Residency {
        Residency::Cpu
    }

    fn process(
        &mut self,
        image: &FrameResource,
        mask: Option<&FrameResource>,
    ) -> RecolorResult<Option<FrameResource>> {
        let source = expect_cpu(image, "image")?;
        let mask = mask.map(|m| expect_cpu(m, "mask")).transpose()?;
        Ok(self.process_frame(source, mask)?.map(FrameResource::Cpu))
    }

    fn import(&mut self, frame: ImageFrame) -> RecolorResult<FrameResource> {
        Ok(FrameResource::Cpu(frame))
    }

    fn export(&mut self, frame: &FrameResource) -> RecolorResult<ImageFrame> {
        expect_cpu(frame, "exported").cloned()
    }

    fn shutdown(&mut self) -> RecolorResult<()> {
        self.closed = true;
        Ok(())
    }
}

fn expect_cpu<'a>(frame: &'a FrameResource, what: &str) -> RecolorResult<&'a ImageFrame> {
    frame.as_cpu().ok_or_else(|| {
        RecolorError::contract(format!(
            "cpu executor received a {} {what} frame",
            frame.residency()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
