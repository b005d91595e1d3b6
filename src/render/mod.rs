pub(crate) mod cpu;
pub(crate) mod executor;
#[cfg(feature = "gpu")]
pub(crate) mod gpu;

pub use cpu::CpuRecolor;
pub use executor::{BlendExecutor, FrameResource, create_executor};
#[cfg(feature = "gpu")]
pub use gpu::{
    FRAME_FORMAT, GpuContext, GpuFrame, GpuRecolor, GpuWorker, RecolorRenderer, recolor_wgsl,
};
