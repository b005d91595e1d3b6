use crate::config::BlendConfig;
use crate::contract::Residency;
use crate::foundation::error::{RecolorError, RecolorResult};
use crate::foundation::frame::ImageFrame;
use crate::render::executor::{BlendExecutor, FrameResource};
use crate::render::gpu::context::GpuFrame;
use crate::render::gpu::recolor::RecolorRenderer;
use crate::render::gpu::worker::GpuWorker;

/// GPU recolor executor: a [`RecolorRenderer`] living on its own [`GpuWorker`] thread.
pub struct GpuRecolor {
    worker: GpuWorker<RecolorRenderer>,
    config: BlendConfig,
    closed: bool,
}

impl GpuRecolor {
    /// Open a GPU context on a new worker thread.
    ///
    /// The shader program is not built until [`GpuRecolor::initialize`] or the first frame.
    pub fn spawn(config: BlendConfig) -> RecolorResult<Self> {
        let worker = GpuWorker::spawn("recolor-gpu", move |_| Ok(RecolorRenderer::new(config)))?;
        tracing::info!(adapter = worker.adapter_name(), "gpu recolor executor ready");
        Ok(Self {
            worker,
            config,
            closed: false,
        })
    }

    /// Blend settings in use.
    pub fn config(&self) -> &BlendConfig {
        &self.config
    }

    /// Name of the adapter in use.
    pub fn adapter_name(&self) -> &str {
        self.worker.adapter_name()
    }

    /// Build the shader program now instead of on the first frame.
    pub fn initialize(&mut self) -> RecolorResult<()> {
        self.ensure_open()?;
        self.worker.run(|ctx, renderer| renderer.initialize(ctx))
    }

    /// Whether the shader program has been built.
    pub fn is_initialized(&self) -> RecolorResult<bool> {
        self.ensure_open()?;
        self.worker.run(|_, renderer| Ok(renderer.is_initialized()))
    }

    /// Recolor GPU-resident frames.
    #[tracing::instrument(skip_all, fields(w = source.width(), h = source.height()))]
    pub fn process_frame(
        &mut self,
        source: &GpuFrame,
        mask: Option<&GpuFrame>,
    ) -> RecolorResult<Option<GpuFrame>> {
        self.ensure_open()?;
        let source = source.clone();
        let mask = mask.cloned();
        self.worker
            .run(move |ctx, renderer| renderer.process(ctx, &source, mask.as_ref()))
    }

    /// Copy a host frame to a texture.
    pub fn upload(&self, frame: ImageFrame) -> RecolorResult<GpuFrame> {
        self.ensure_open()?;
        self.worker.run(move |ctx, _| ctx.upload(&frame))
    }

    /// Read a texture back to host memory as RGBA8.
    pub fn download(&self, frame: &GpuFrame) -> RecolorResult<ImageFrame> {
        self.ensure_open()?;
        let frame = frame.clone();
        self.worker.run(move |ctx, _| ctx.download(&frame))
    }

    fn ensure_open(&self) -> RecolorResult<()> {
        if self.closed {
            return Err(RecolorError::contract("gpu executor is closed"));
        }
        Ok(())
    }
}

impl BlendExecutor for GpuRecolor {
    fn residency(&self) -> Residency {
        Residency::Gpu
    }

    fn process(
        &mut self,
        image: &FrameResource,
        mask: Option<&FrameResource>,
    ) -> RecolorResult<Option<FrameResource>> {
        let source = expect_gpu(image, "image")?;
        let mask = mask.map(|m| expect_gpu(m, "mask")).transpose()?;
        Ok(self.process_frame(source, mask)?.map(FrameResource::Gpu))
    }

    fn import(&mut self, frame: ImageFrame) -> RecolorResult<FrameResource> {
        self.upload(frame).map(FrameResource::Gpu)
    }

    fn export(&mut self, frame: &FrameResource) -> RecolorResult<ImageFrame> {
        self.download(expect_gpu(frame, "exported")?)
    }

    fn shutdown(&mut self) -> RecolorResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let released = self.worker.run(|_, renderer| {
            renderer.shutdown();
            Ok(())
        });
        self.worker.shutdown()?;
        released
    }
}

fn expect_gpu<'a>(frame: &'a FrameResource, what: &str) -> RecolorResult<&'a GpuFrame> {
    match frame {
        FrameResource::Gpu(f) => Ok(f),
        other => Err(RecolorError::contract(format!(
            "gpu executor received a {} {what} frame",
            other.residency()
        ))),
    }
}
