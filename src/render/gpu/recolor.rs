use wgpu::util::DeviceExt;

use crate::config::{BlendConfig, MaskChannel};
use crate::foundation::error::{RecolorError, RecolorResult};
use crate::foundation::frame::PixelFormat;
use crate::render::gpu::context::{FRAME_FORMAT, GpuContext, GpuFrame};
use crate::render::gpu::scoped::{ScopedBuffer, ScopedTexture};
use crate::render::gpu::shader;

/// GPU objects created once per node by [`RecolorRenderer::initialize`].
struct RecolorProgram {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    uniform: wgpu::Buffer,
}

/// Runs the recolor shader over a full-viewport quad.
///
/// Must only be used on the thread owning the [`GpuContext`] it is given.
pub struct RecolorRenderer {
    config: BlendConfig,
    program: Option<RecolorProgram>,
}

impl RecolorRenderer {
    /// A renderer whose program is built lazily on first use.
    pub fn new(config: BlendConfig) -> Self {
        Self {
            config,
            program: None,
        }
    }

    /// Whether the program has been built.
    pub fn is_initialized(&self) -> bool {
        self.program.is_some()
    }

    /// Compile the shader and create the pipeline, sampler and uniform. Idempotent.
    #[tracing::instrument(skip_all, fields(channel = ?self.config.mask_channel()))]
    pub fn initialize(&mut self, ctx: &GpuContext) -> RecolorResult<()> {
        if self.program.is_some() {
            return Ok(());
        }
        let device = ctx.device();

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("recolor_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let uniform = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("recolor_uniform"),
            size: 16,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
            },
            count: None,
        };
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("recolor_bgl"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(16),
                    },
                    count: None,
                },
            ],
        });

        let source = shader::recolor_wgsl(self.config.mask_channel());
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("recolor_shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("recolor_pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("recolor_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some(shader::VERTEX_ENTRY),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: shader::QUAD_STRIDE,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &shader::QUAD_ATTRIBUTES,
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some(shader::FRAGMENT_ENTRY),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: FRAME_FORMAT,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            uniform.destroy();
            return Err(RecolorError::gpu(format!(
                "recolor program setup failed: {err}"
            )));
        }

        ctx.queue().write_buffer(
            &uniform,
            0,
            &shader::recolor_uniform(self.config.target_color()),
        );
        tracing::debug!("recolor program ready");

        self.program = Some(RecolorProgram {
            pipeline,
            bind_group_layout,
            sampler,
            uniform,
        });
        Ok(())
    }

    /// Recolor `source` using `mask`, returning a new texture of the source's size.
    ///
    /// The program is built on the first call even when `mask` is absent; a missing mask then
    /// yields `Ok(None)`.
    pub fn process(
        &mut self,
        ctx: &GpuContext,
        source: &GpuFrame,
        mask: Option<&GpuFrame>,
    ) -> RecolorResult<Option<GpuFrame>> {
        self.initialize(ctx)?;
        let Some(mask) = mask else {
            tracing::debug!("mask stream empty, no output for this frame");
            return Ok(None);
        };
        check_sampleable("image", source)?;
        check_sampleable("mask", mask)?;
        check_mask_channel(self.config.mask_channel(), mask)?;

        let program = self
            .program
            .as_ref()
            .ok_or_else(|| RecolorError::gpu("recolor program not initialized"))?;
        let device = ctx.device();
        let (width, height) = (source.width(), source.height());

        let target = ScopedTexture::new(ctx.create_target(width, height)?);

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let quad = ScopedBuffer::new(device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("recolor_quad"),
                contents: &shader::quad_bytes(),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));

        let frame_view = source
            .texture()
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mask_view = mask
            .texture()
            .create_view(&wgpu::TextureViewDescriptor::default());
        let target_view = target
            .texture()
            .create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("recolor_bg"),
            layout: &program.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&frame_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&mask_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&program.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: program.uniform.as_entire_binding(),
                },
            ],
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("recolor_encoder"),
        });
        {
            let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("recolor_rp"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target_view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rp.set_pipeline(&program.pipeline);
            rp.set_bind_group(0, &bind_group, &[]);
            rp.set_vertex_buffer(0, quad.slice(..));
            rp.draw(0..4, 0..1);
        }
        ctx.queue().submit(Some(encoder.finish()));

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RecolorError::gpu(format!("recolor pass failed: {err}")));
        }

        Ok(Some(GpuFrame::new(target.release())))
    }

    /// Release the program. The renderer re-initializes on next use.
    pub fn shutdown(&mut self) {
        if let Some(program) = self.program.take() {
            program.uniform.destroy();
            tracing::debug!("recolor program released");
        }
    }
}

fn check_sampleable(what: &str, frame: &GpuFrame) -> RecolorResult<()> {
    let texture = frame.texture();
    if texture.format() != FRAME_FORMAT {
        return Err(RecolorError::contract(format!(
            "{what} texture must be {FRAME_FORMAT:?}, got {:?}",
            texture.format()
        )));
    }
    if !texture.usage().contains(wgpu::TextureUsages::TEXTURE_BINDING) {
        return Err(RecolorError::contract(format!(
            "{what} texture was not created with TEXTURE_BINDING usage"
        )));
    }
    Ok(())
}

// An RGB upload has an opaque filler alpha; reading it would weight every pixel fully.
fn check_mask_channel(channel: MaskChannel, mask: &GpuFrame) -> RecolorResult<()> {
    let fmt = mask.source_format();
    if fmt != PixelFormat::Gray8 && channel.plane_index() >= fmt.channels() {
        return Err(RecolorError::contract(format!(
            "{channel:?} mask channel needs an RGBA mask, got {fmt:?}"
        )));
    }
    Ok(())
}
