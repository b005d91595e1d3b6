//! Recolor masked regions of an image toward a target color.
//!
//! Each pixel is mixed toward the target by `mask weight * source luminance`, so bright areas
//! take the color strongly while shadows keep their shading. The same blend runs on two
//! executors:
//!
//! - [`CpuRecolor`] over host RGB8 buffers (always available)
//! - [`GpuRecolor`] over RGBA8 textures via `wgpu` (feature `gpu`)
//!
//! A [`RecolorNode`] binds one image stream and one mask stream, validates the
//! [`StreamContract`], picks the executor once at open, and then turns timestamped frames into
//! recolored packets.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Node options and blend settings.
pub mod config;
/// Stream tags and contract validation.
pub mod contract;
pub(crate) mod effects;
/// The recolor node.
pub mod node;
/// Blend executors.
pub mod render;

pub use crate::config::{BlendConfig, MaskChannel, NodeConfig, RecolorOptions, RgbColor};
pub use crate::contract::{Residency, StreamContract, StreamTag};
pub use crate::effects::blend::{LUMA_WEIGHTS, blend, blend_rgb8, luminance, mix_amount, quantize};
pub use crate::effects::mask::{extract as extract_mask, select_plane};
pub use crate::foundation::core::{Packet, Timestamp};
pub use crate::foundation::error::{RecolorError, RecolorResult};
pub use crate::foundation::frame::{ImageFrame, PixelFormat};
pub use crate::node::{NodeState, RecolorNode};
pub use crate::render::{BlendExecutor, CpuRecolor, FrameResource, create_executor};
#[cfg(feature = "gpu")]
pub use crate::render::{
    FRAME_FORMAT, GpuContext, GpuFrame, GpuRecolor, GpuWorker, RecolorRenderer, recolor_wgsl,
};
