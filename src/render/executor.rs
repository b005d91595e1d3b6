use crate::config::BlendConfig;
use crate::contract::Residency;
use crate::foundation::error::{RecolorError, RecolorResult};
use crate::foundation::frame::ImageFrame;

/// A frame handed to or produced by an executor.
#[derive(Clone, Debug)]
pub enum FrameResource {
    /// Host pixel buffer.
    Cpu(ImageFrame),
    /// GPU texture.
    #[cfg(feature = "gpu")]
    Gpu(crate::render::gpu::GpuFrame),
}

impl FrameResource {
    /// Where this frame lives.
    pub fn residency(&self) -> Residency {
        match self {
            Self::Cpu(_) => Residency::Cpu,
            #[cfg(feature = "gpu")]
            Self::Gpu(_) => Residency::Gpu,
        }
    }

    /// Frame dimensions.
    pub fn size(&self) -> (u32, u32) {
        match self {
            Self::Cpu(f) => (f.width(), f.height()),
            #[cfg(feature = "gpu")]
            Self::Gpu(f) => (f.width(), f.height()),
        }
    }

    /// Borrow the host frame, if this is one.
    pub fn as_cpu(&self) -> Option<&ImageFrame> {
        match self {
            Self::Cpu(f) => Some(f),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    /// Take the host frame, or fail with a contract violation.
    pub fn into_cpu(self) -> RecolorResult<ImageFrame> {
        match self {
            Self::Cpu(f) => Ok(f),
            #[allow(unreachable_patterns)]
            other => Err(RecolorError::contract(format!(
                "expected a cpu frame, got a {} frame",
                other.residency()
            ))),
        }
    }
}

/// One implementation of the recolor blend, bound to a residency kind.
///
/// Executors are chosen once at node setup (see [`create_executor`]); the node never branches
/// on residency per frame. Calls are not reentrant.
pub trait BlendExecutor: Send {
    /// Residency of the frames this executor accepts and produces.
    fn residency(&self) -> Residency;

    /// Recolor `image` using `mask`.
    ///
    /// Returns `Ok(None)` when `mask` is absent for this frame.
    fn process(
        &mut self,
        image: &FrameResource,
        mask: Option<&FrameResource>,
    ) -> RecolorResult<Option<FrameResource>>;

    /// Move a host frame into this executor's residency.
    fn import(&mut self, frame: ImageFrame) -> RecolorResult<FrameResource>;

    /// Bring a frame of this executor's residency back to host memory.
    fn export(&mut self, frame: &FrameResource) -> RecolorResult<ImageFrame>;

    /// Release long-lived resources. Further `process` calls fail.
    fn shutdown(&mut self) -> RecolorResult<()>;
}

/// Create the executor for `residency`.
///
/// - `Residency::Cpu` is always available.
/// - `Residency::Gpu` requires the `gpu` feature and a usable adapter.
pub fn create_executor(
    residency: Residency,
    config: &BlendConfig,
) -> RecolorResult<Box<dyn BlendExecutor>> {
    match residency {
        Residency::Cpu => Ok(Box::new(crate::render::cpu::CpuRecolor::new(*config))),
        #[cfg(feature = "gpu")]
        Residency::Gpu => Ok(Box::new(crate::render::gpu::GpuRecolor::spawn(*config)?)),
        #[allow(unreachable_patterns)]
        _ => Err(RecolorError::configuration(
            "requested gpu executor is not available (built without the `gpu` feature)",
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/executor.rs"]
mod tests;
