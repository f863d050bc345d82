use wgpu::util::DeviceExt;
use wgpu::*;

use crate::model::{Camera, DirectionalLight, Material, NodeId, Scene};
use crate::view::gpu_init::GpuContext;
use crate::view::mesh::{Mesh, MeshBuffer, Vertex};

pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

const CLEAR_COLOR: Color = Color { r: 0.04, g: 0.22, b: 0.42, a: 1.0 };

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    pub sun_dir: [f32; 3],
    pub sun_intensity: f32,
    pub ambient: f32,
    pub _pad: [f32; 3],
}

impl From<&DirectionalLight> for LightingUniform {
    fn from(light: &DirectionalLight) -> Self {
        Self {
            sun_dir: light.direction.into(),
            sun_intensity: light.intensity,
            ambient: light.ambient,
            _pad: [0.0; 3],
        }
    }
}

/// Per-node world matrix and flat color
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    pub transform: [[f32; 4]; 4],
    pub color: [f32; 4],
}

// Shared graphics setup used by native and web
pub struct CameraResources {
    pub camera_buffer: Buffer,
    pub lighting_buffer: Buffer,
    pub bind_group_layout: BindGroupLayout,
    pub camera_bind_group: BindGroup,
}

pub fn create_depth_texture(device: &Device, width: u32, height: u32) -> (Texture, TextureView) {
    let depth_texture = device.create_texture(&TextureDescriptor {
        label: Some("depth_texture"),
        size: Extent3d { width: width.max(1), height: height.max(1), depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&TextureViewDescriptor::default());
    (depth_texture, depth_view)
}

fn uniform_entry(binding: u32, visibility: ShaderStages) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility,
        ty: BindingType::Buffer {
            ty: BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

pub fn create_camera_resources(device: &Device) -> CameraResources {
    let camera_buffer = device.create_buffer(&BufferDescriptor {
        label: Some("camera_buffer"),
        size: std::mem::size_of::<CameraUniform>() as BufferAddress,
        usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let lighting_buffer = device.create_buffer(&BufferDescriptor {
        label: Some("lighting_buffer"),
        size: std::mem::size_of::<LightingUniform>() as BufferAddress,
        usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some("camera_bind_group_layout"),
        entries: &[uniform_entry(0, ShaderStages::VERTEX), uniform_entry(1, ShaderStages::FRAGMENT)],
    });

    let camera_bind_group = device.create_bind_group(&BindGroupDescriptor {
        label: Some("camera_bind_group"),
        layout: &bind_group_layout,
        entries: &[
            BindGroupEntry { binding: 0, resource: camera_buffer.as_entire_binding() },
            BindGroupEntry { binding: 1, resource: lighting_buffer.as_entire_binding() },
        ],
    });

    CameraResources { camera_buffer, lighting_buffer, bind_group_layout, camera_bind_group }
}

pub fn create_model_bind_group_layout(device: &Device) -> BindGroupLayout {
    device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some("model_bind_group_layout"),
        entries: &[uniform_entry(0, ShaderStages::VERTEX | ShaderStages::FRAGMENT)],
    })
}

pub fn create_scene_pipeline(
    device: &Device,
    format: TextureFormat,
    camera_layout: &BindGroupLayout,
    model_layout: &BindGroupLayout,
) -> RenderPipeline {
    let shader = device.create_shader_module(ShaderModuleDescriptor {
        label: Some("scene_shader"),
        source: ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
        label: Some("scene_pipeline_layout"),
        bind_group_layouts: &[camera_layout, model_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some("scene_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as BufferAddress,
                step_mode: VertexStepMode::Vertex,
                attributes: &[
                    VertexAttribute { offset: 0, shader_location: 0, format: VertexFormat::Float32x3 },
                    VertexAttribute { offset: 12, shader_location: 1, format: VertexFormat::Float32x3 },
                ],
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(ColorTargetState { format, blend: Some(BlendState::REPLACE), write_mask: ColorWrites::ALL })],
            compilation_options: Default::default(),
        }),
        primitive: PrimitiveState {
            topology: PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: FrontFace::Ccw,
            cull_mode: Some(Face::Back),
            polygon_mode: PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: CompareFunction::Less,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        }),
        multisample: MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
        multiview: None,
        cache: None,
    })
}

/// One drawable node: its own mesh and its own uniform block
struct DrawItem {
    node: NodeId,
    mesh: MeshBuffer,
    model_buffer: Buffer,
    bind_group: BindGroup,
}

/// egui output ready to be painted over the scene
pub struct HudFrame {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

/// Draws a [`Scene`] plus an optional HUD overlay
pub struct SceneRenderer {
    pipeline: RenderPipeline,
    camera: CameraResources,
    items: Vec<DrawItem>,
    depth_view: TextureView,
    egui_renderer: egui_wgpu::Renderer,
    pub width: u32,
    pub height: u32,
}

impl SceneRenderer {
    pub fn new(gpu: &GpuContext, scene: &Scene) -> Self {
        let device = gpu.device.as_ref();
        let (width, height) = (gpu.config.width, gpu.config.height);

        let camera = create_camera_resources(device);
        let model_layout = create_model_bind_group_layout(device);
        let pipeline = create_scene_pipeline(device, gpu.format, &camera.bind_group_layout, &model_layout);
        let (_, depth_view) = create_depth_texture(device, width, height);

        // Shapes are meshed per node so no two nodes share mutable GPU state
        let items = scene
            .graph
            .drawables()
            .filter_map(|(id, node)| node.shape.map(|shape| (id, node.name, shape)))
            .map(|(node, name, shape)| {
                let mesh = Mesh::from_shape(&shape).upload(device);
                let model_buffer = device.create_buffer_init(&util::BufferInitDescriptor {
                    label: Some(name),
                    contents: bytemuck::bytes_of(&model_uniform(scene, node)),
                    usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
                });
                let bind_group = device.create_bind_group(&BindGroupDescriptor {
                    label: Some(name),
                    layout: &model_layout,
                    entries: &[BindGroupEntry { binding: 0, resource: model_buffer.as_entire_binding() }],
                });
                DrawItem { node, mesh, model_buffer, bind_group }
            })
            .collect::<Vec<_>>();

        tracing::debug!(items = items.len(), width, height, "scene renderer ready");

        let egui_renderer = egui_wgpu::Renderer::new(device, gpu.format, egui_wgpu::RendererOptions::default());

        Self { pipeline, camera, items, depth_view, egui_renderer, width, height }
    }

    /// Recreate size-dependent resources. The caller reconfigures the surface.
    pub fn resize(&mut self, device: &Device, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        let (_, depth_view) = create_depth_texture(device, self.width, self.height);
        self.depth_view = depth_view;
    }

    /// Push camera, light and every node's world transform and color
    pub fn update(&self, queue: &Queue, scene: &Scene, camera: &Camera) {
        let cam = CameraUniform { view_proj: camera.view_proj().to_cols_array_2d() };
        queue.write_buffer(&self.camera.camera_buffer, 0, bytemuck::bytes_of(&cam));
        queue.write_buffer(&self.camera.lighting_buffer, 0, bytemuck::bytes_of(&LightingUniform::from(&scene.light)));

        for item in &self.items {
            queue.write_buffer(&item.model_buffer, 0, bytemuck::bytes_of(&model_uniform(scene, item.node)));
        }
    }

    pub fn draw_frame(&mut self, gpu: &GpuContext, hud: Option<HudFrame>) {
        let device = gpu.device.as_ref();
        let queue = gpu.queue.as_ref();

        let frame = match gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                // Picked up again on the next frame
                gpu.surface.configure(device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::warn!("skipping frame: {e:?}");
                return;
            }
        };

        let view = frame.texture.create_view(&TextureViewDescriptor::default());
        let mut encoder = device.create_command_encoder(&CommandEncoderDescriptor { label: Some("encoder") });

        {
            let mut rp = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations { load: LoadOp::Clear(CLEAR_COLOR), store: StoreOp::Store },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(Operations { load: LoadOp::Clear(1.0), store: StoreOp::Store }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            rp.set_pipeline(&self.pipeline);
            rp.set_bind_group(0, &self.camera.camera_bind_group, &[]);
            for item in &self.items {
                if item.mesh.index_count == 0 {
                    continue;
                }
                rp.set_bind_group(1, &item.bind_group, &[]);
                rp.set_vertex_buffer(0, item.mesh.vertex_buffer.slice(..));
                rp.set_index_buffer(item.mesh.index_buffer.slice(..), IndexFormat::Uint32);
                rp.draw_indexed(0..item.mesh.index_count, 0, 0..1);
            }
        }

        let mut extra = Vec::new();
        if let Some(hud) = &hud {
            let screen = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [self.width, self.height],
                pixels_per_point: hud.pixels_per_point,
            };
            for (id, delta) in &hud.textures_delta.set {
                self.egui_renderer.update_texture(device, queue, *id, delta);
            }
            extra = self.egui_renderer.update_buffers(device, queue, &mut encoder, &hud.primitives, &screen);

            let hud_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("hud_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations { load: LoadOp::Load, store: StoreOp::Store },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui_renderer.render(&mut hud_pass.forget_lifetime(), &hud.primitives, &screen);
        }

        queue.submit(extra.into_iter().chain(std::iter::once(encoder.finish())));
        frame.present();

        if let Some(hud) = hud {
            for id in &hud.textures_delta.free {
                self.egui_renderer.free_texture(id);
            }
        }
    }
}

fn model_uniform(scene: &Scene, node: NodeId) -> ModelUniform {
    let n = scene.graph.node(node);
    let color = n.material.unwrap_or(Material::rgb(1.0, 0.0, 1.0)).color;
    ModelUniform {
        transform: scene.graph.world_matrix(node).to_cols_array_2d(),
        color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SceneLayout;

    #[test]
    fn test_uniform_sizes_match_shader() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 64);
        assert_eq!(std::mem::size_of::<LightingUniform>(), 32);
        assert_eq!(std::mem::size_of::<ModelUniform>(), 80);
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }

    #[test]
    fn test_model_uniform_tracks_scene() {
        let mut scene = Scene::build(SceneLayout::default());
        let tint = Material::rgb(0.5, 0.0, 0.0);
        scene.graph.node_mut(scene.body).material = Some(tint);
        scene.graph.transform_mut(scene.submarine).translation.x = -40.0;

        let u = model_uniform(&scene, scene.body);
        assert_eq!(u.color, tint.color);
        // translation column
        assert_eq!(u.transform[3][0], -40.0);
    }
}
