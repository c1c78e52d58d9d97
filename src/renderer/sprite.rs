use crate::assets::{SpriteQuad, TextureLoader, Tint, decode_image};
use crate::error::AssetError;
use log::debug;
use std::collections::HashMap;
use std::mem;
use std::ops::Range;
use std::path::{Path, PathBuf};
use wgpu::{
    BindGroup, BindGroupLayout, BufferUsages, ColorTargetState, ColorWrites, Device,
    FragmentState, MultisampleState, PrimitiveState, RenderPass, RenderPipeline, Sampler,
    SamplerBindingType, ShaderStages, Texture, TextureFormat, VertexAttribute, VertexBufferLayout,
    VertexFormat, VertexState, util::DeviceExt,
};

/// Vertex of a sprite quad.
///
/// Position is in normalized device coordinates, `uv` in texture space with (0,0) at the
/// top-left texel, and `tint` is multiplied with the sampled color.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub tint: [f32; 4],
}

impl SpriteVertex {
    const ATTRIBUTES: [VertexAttribute; 3] = [
        VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: VertexFormat::Float32x2,
        },
        VertexAttribute {
            offset: mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
            shader_location: 1,
            format: VertexFormat::Float32x2,
        },
        VertexAttribute {
            // After position and uv.
            offset: (mem::size_of::<[f32; 2]>() * 2) as wgpu::BufferAddress,
            shader_location: 2,
            format: VertexFormat::Float32x4,
        },
    ];

    fn desc<'a>() -> VertexBufferLayout<'a> {
        VertexBufferLayout {
            array_stride: mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

fn tint_to_rgba(tint: Tint) -> [f32; 4] {
    tint.map(|channel| f32::from(channel) / 255.0)
}

/// Converts a screen-space quad into four vertices (top-left, top-right, bottom-right,
/// bottom-left) for a render target of the given size.
pub fn quad_vertices(quad: &SpriteQuad, width: f32, height: f32) -> [SpriteVertex; 4] {
    let to_ndc = |x: f32, y: f32| [x / width * 2.0 - 1.0, 1.0 - y / height * 2.0];
    let tint = tint_to_rgba(quad.tint);
    let (dest, uv) = (quad.dest, quad.uv);

    [
        SpriteVertex {
            position: to_ndc(dest.x, dest.y),
            uv: [uv.x, uv.y],
            tint,
        },
        SpriteVertex {
            position: to_ndc(dest.right(), dest.y),
            uv: [uv.right(), uv.y],
            tint,
        },
        SpriteVertex {
            position: to_ndc(dest.right(), dest.bottom()),
            uv: [uv.right(), uv.bottom()],
            tint,
        },
        SpriteVertex {
            position: to_ndc(dest.x, dest.bottom()),
            uv: [uv.x, uv.bottom()],
            tint,
        },
    ]
}

struct SpriteTexture {
    _texture: Texture,
    bind_group: BindGroup,
    size: [u32; 2],
}

/// Consecutive quads sharing a texture, drawn with one call.
#[derive(Debug, Clone, PartialEq)]
struct Batch {
    texture: PathBuf,
    indices: Range<u32>,
}

/// Draws textured sprite quads in submission order.
///
/// Textures are cached by image path, so sprites sharing an image share one GPU texture.
/// Each frame, [`prepare`](Self::prepare) uploads the quads and groups neighbours with the
/// same texture into batches; [`render`](Self::render) replays the batches back to front.
pub struct SpriteRenderer {
    render_pipeline: RenderPipeline,
    bind_group_layout: BindGroupLayout,
    sampler: Sampler,
    textures: HashMap<PathBuf, SpriteTexture>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    batches: Vec<Batch>,
    window_width: f32,
    window_height: f32,
}

impl SpriteRenderer {
    pub fn new(device: &Device, surface_format: TextureFormat, width: u32, height: u32) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sprite Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Sprite Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Sprite Pipeline Layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sprite Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[SpriteVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        // Pixel art: no smoothing.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Sprite Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            render_pipeline,
            bind_group_layout,
            sampler,
            textures: HashMap::new(),
            vertex_buffer: None,
            index_buffer: None,
            batches: Vec::new(),
            window_width: width as f32,
            window_height: height as f32,
        }
    }

    /// Loads the image at `path` into a GPU texture and returns its size.
    ///
    /// An image already in the cache is not read again.
    pub fn load_texture(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        path: &Path,
    ) -> Result<[u32; 2], AssetError> {
        if let Some(cached) = self.textures.get(path) {
            return Ok(cached.size);
        }

        let rgba = decode_image(path)?;
        let (width, height) = rgba.dimensions();
        let label = path.display().to_string();

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label.as_str()),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            &rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
            label: Some(label.as_str()),
        });

        debug!("Uploaded texture {} ({}x{})", label, width, height);
        self.textures.insert(
            path.to_path_buf(),
            SpriteTexture {
                _texture: texture,
                bind_group,
                size: [width, height],
            },
        );

        Ok([width, height])
    }

    /// Borrows the renderer as a [`TextureLoader`] bound to a device and queue.
    pub fn loader<'a>(
        &'a mut self,
        device: &'a Device,
        queue: &'a wgpu::Queue,
    ) -> GpuTextureLoader<'a> {
        GpuTextureLoader {
            renderer: self,
            device,
            queue,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.window_width = width as f32;
        self.window_height = height as f32;
    }

    /// Uploads this frame's quads. Quads whose texture is not cached are skipped.
    pub fn prepare<'a>(
        &mut self,
        device: &Device,
        quads: impl IntoIterator<Item = (&'a Path, SpriteQuad)>,
    ) {
        let mut vertices: Vec<SpriteVertex> = Vec::new();
        let mut indices: Vec<u16> = Vec::new();
        self.batches.clear();

        for (texture, quad) in quads {
            if !self.textures.contains_key(texture) {
                continue;
            }

            let base = vertices.len() as u16;
            vertices.extend_from_slice(&quad_vertices(
                &quad,
                self.window_width,
                self.window_height,
            ));
            let first_index = indices.len() as u32;
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
            let last_index = indices.len() as u32;

            match self.batches.last_mut() {
                Some(batch) if batch.texture == texture => batch.indices.end = last_index,
                _ => self.batches.push(Batch {
                    texture: texture.to_path_buf(),
                    indices: first_index..last_index,
                }),
            }
        }

        if vertices.is_empty() {
            self.vertex_buffer = None;
            self.index_buffer = None;
            return;
        }

        self.vertex_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sprite Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: BufferUsages::VERTEX,
        }));
        self.index_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sprite Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: BufferUsages::INDEX,
        }));
    }

    /// Draws the quads uploaded by the last [`prepare`](Self::prepare).
    pub fn render(&self, render_pass: &mut RenderPass) {
        let (Some(vertex_buffer), Some(index_buffer)) = (&self.vertex_buffer, &self.index_buffer)
        else {
            return;
        };

        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint16);

        for batch in &self.batches {
            if let Some(texture) = self.textures.get(&batch.texture) {
                render_pass.set_bind_group(0, &texture.bind_group, &[]);
                render_pass.draw_indexed(batch.indices.clone(), 0, 0..1);
            }
        }
    }
}

/// [`TextureLoader`] that uploads into a [`SpriteRenderer`]'s cache.
pub struct GpuTextureLoader<'a> {
    renderer: &'a mut SpriteRenderer,
    device: &'a Device,
    queue: &'a wgpu::Queue,
}

impl TextureLoader for GpuTextureLoader<'_> {
    fn load_texture(&mut self, path: &Path) -> Result<[u32; 2], AssetError> {
        self.renderer.load_texture(self.device, self.queue, path)
    }
}
