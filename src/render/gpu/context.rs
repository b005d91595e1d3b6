use crate::foundation::error::{RecolorError, RecolorResult};
use crate::foundation::frame::{ImageFrame, PixelFormat};
use crate::render::gpu::scoped::ScopedBuffer;

/// Texel format of every texture this crate creates.
pub const FRAME_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// A GPU-resident RGBA8 image.
///
/// Cloning shares the underlying texture. The frame remembers the host layout it was uploaded
/// from, since an RGB upload carries a synthesized alpha plane.
#[derive(Clone, Debug)]
pub struct GpuFrame {
    texture: wgpu::Texture,
    source_format: PixelFormat,
}

impl GpuFrame {
    /// Wrap an existing texture whose four channels are all real data.
    pub fn new(texture: wgpu::Texture) -> Self {
        Self::uploaded_from(texture, PixelFormat::Rgba8)
    }

    pub(crate) fn uploaded_from(texture: wgpu::Texture, source_format: PixelFormat) -> Self {
        Self {
            texture,
            source_format,
        }
    }

    /// Host layout the texture was filled from.
    pub fn source_format(&self) -> PixelFormat {
        self.source_format
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.texture.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.texture.height()
    }

    /// The wrapped texture.
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }
}

/// Device, queue and adapter for one GPU execution context.
///
/// Every call that touches these objects for a node runs on the thread that owns the context
/// (see [`crate::render::gpu::GpuWorker`]).
pub struct GpuContext {
    device: wgpu::Device,
    queue: wgpu::Queue,
    adapter_info: wgpu::AdapterInfo,
    // Dropped last so the instance outlives the device.
    _instance: wgpu::Instance,
}

impl GpuContext {
    /// Pick a high-performance adapter and open a device on it.
    pub fn new() -> RecolorResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .map_err(|e| match e {
            wgpu::RequestAdapterError::NotFound { .. } => {
                RecolorError::gpu("no gpu adapter available")
            }
            other => RecolorError::gpu(format!("wgpu request_adapter failed: {other:?}")),
        })?;
        let adapter_info = adapter.get_info();

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("recolor_device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            experimental_features: wgpu::ExperimentalFeatures::default(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }))
        .map_err(|e| RecolorError::gpu(format!("wgpu request_device failed: {e:?}")))?;

        tracing::debug!(
            adapter = %adapter_info.name,
            backend = ?adapter_info.backend,
            device_type = ?adapter_info.device_type,
            "opened gpu context"
        );

        Ok(Self {
            device,
            queue,
            adapter_info,
            _instance: instance,
        })
    }

    /// The logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// The submission queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Human-readable adapter name.
    pub fn adapter_name(&self) -> &str {
        &self.adapter_info.name
    }

    /// Full adapter description.
    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    /// Allocate a render target usable as a recolor destination and as a later source.
    pub fn create_target(&self, width: u32, height: u32) -> RecolorResult<wgpu::Texture> {
        self.create_texture(
            "recolor_target",
            width,
            height,
            wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
        )
    }

    /// Copy a host frame into a new RGBA8 texture.
    ///
    /// RGB frames get an opaque alpha; gray frames are replicated into all four channels so a
    /// single-channel weight map reads the same through either mask component.
    pub fn upload(&self, frame: &ImageFrame) -> RecolorResult<GpuFrame> {
        let (width, height) = (frame.width(), frame.height());
        let rgba: Vec<u8> = match frame.format() {
            PixelFormat::Rgba8 => frame.data().to_vec(),
            PixelFormat::Rgb8 => frame
                .data()
                .chunks_exact(3)
                .flat_map(|px| [px[0], px[1], px[2], 255])
                .collect(),
            PixelFormat::Gray8 => frame.data().iter().flat_map(|&g| [g, g, g, g]).collect(),
        };

        let texture = self.create_texture(
            "recolor_upload",
            width,
            height,
            wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::COPY_SRC,
        )?;
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        Ok(GpuFrame::uploaded_from(texture, frame.format()))
    }

    /// Read an RGBA8 texture back into host memory. Blocks until the copy completes.
    pub fn download(&self, frame: &GpuFrame) -> RecolorResult<ImageFrame> {
        let texture = frame.texture();
        if texture.format() != FRAME_FORMAT {
            return Err(RecolorError::contract(format!(
                "download expects a {FRAME_FORMAT:?} texture, got {:?}",
                texture.format()
            )));
        }
        if !texture.usage().contains(wgpu::TextureUsages::COPY_SRC) {
            return Err(RecolorError::contract(
                "download expects a texture created with COPY_SRC usage",
            ));
        }

        let (width, height) = (frame.width(), frame.height());
        let row_bytes = width
            .checked_mul(4)
            .ok_or_else(|| RecolorError::gpu("readback width overflow"))?;
        let padded_row_bytes = align_to(row_bytes, wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);
        let buffer_size = u64::from(padded_row_bytes)
            .checked_mul(u64::from(height))
            .ok_or_else(|| RecolorError::gpu("readback buffer size overflow"))?;

        let readback = ScopedBuffer::new(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("recolor_readback"),
            size: buffer_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("recolor_readback_encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &*readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row_bytes),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(Some(encoder.finish()));

        let slice = readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |res| {
            let _ = tx.send(res);
        });
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| RecolorError::gpu(format!("wgpu poll failed: {e:?}")))?;
        rx.recv()
            .map_err(|_| RecolorError::gpu("readback channel closed"))?
            .map_err(|e| RecolorError::gpu(format!("readback map failed: {e:?}")))?;

        let mapped = slice.get_mapped_range();
        let mut out = Vec::with_capacity(row_bytes as usize * height as usize);
        for row in mapped.chunks_exact(padded_row_bytes as usize) {
            out.extend_from_slice(&row[..row_bytes as usize]);
        }
        drop(mapped);
        readback.unmap();

        ImageFrame::new(width, height, PixelFormat::Rgba8, out)
    }

    pub(crate) fn create_texture(
        &self,
        label: &'static str,
        width: u32,
        height: u32,
        usage: wgpu::TextureUsages,
    ) -> RecolorResult<wgpu::Texture> {
        let max = self.device.limits().max_texture_dimension_2d;
        if width == 0 || height == 0 || width > max || height > max {
            return Err(RecolorError::contract(format!(
                "texture size {width}x{height} outside 1..={max}"
            )));
        }
        Ok(self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FRAME_FORMAT,
            usage,
            view_formats: &[],
        }))
    }
}

fn align_to(value: u32, alignment: u32) -> u32 {
    let mask = alignment - 1;
    (value + mask) & !mask
}

#[cfg(test)]
#[path = "../../../tests/unit/render/gpu/context.rs"]
mod tests;
