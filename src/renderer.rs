// renderer.rs - wgpu renderer for the orb sphere plus the egui overlay
//
// Each placed orb gets its own quad, texture and uniform buffers. Orbs are
// drawn back to front with alpha blending and no depth buffer, so glow and
// border frames sit on top of their plane in painter's order.

use crate::error::RendererError;
use crate::mesh::{build_frame, build_plane, QuadMesh};
use crate::scene::{ItemSurface, OrbScene, PlacedItem, PLACEHOLDER_COLOR};
use glam::{Mat4, Vec3};
use image::RgbaImage;
use wgpu::util::DeviceExt;
use winit::window::Window;

/// World units of outline per pixel of border width.
const BORDER_UNIT: f32 = 0.008;
const GLOW_THICKNESS: f32 = 0.05;

fn setup_egui_ui_fonts(ctx: &egui::Context) {
    // 系统字体 + ./assets 下的 Noto，取第一个 ab_glyph 能解析的
    fn try_load_font(path: &std::path::Path) -> Option<Vec<u8>> {
        let bytes = std::fs::read(path).ok()?;
        ab_glyph::FontArc::try_from_vec(bytes.clone()).ok()?;
        Some(bytes)
    }

    let mut candidates: Vec<std::path::PathBuf> = Vec::new();
    if cfg!(windows) {
        let win_fonts = std::path::PathBuf::from(r"C:\Windows\Fonts");
        for f in ["msyh.ttf", "simhei.ttf", "meiryo.ttf", "malgun.ttf"] {
            candidates.push(win_fonts.join(f));
        }
    } else if cfg!(target_os = "macos") {
        for p in [
            "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
            "/Library/Fonts/NotoSansSC-Regular.otf",
            "/Library/Fonts/NotoSansJP-Regular.otf",
        ] {
            candidates.push(p.into());
        }
    } else if cfg!(unix) {
        for p in [
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
        ] {
            candidates.push(p.into());
        }
    }
    for f in ["NotoSansSC-Regular.otf", "NotoSansJP-Regular.otf", "NotoSans-Regular.ttf"] {
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                candidates.push(dir.join("assets").join(f));
            }
        }
        candidates.push(std::path::PathBuf::from("assets").join(f));
    }

    let Some((font_path, font_bytes)) = candidates
        .into_iter()
        .find_map(|p| try_load_font(&p).map(|bytes| (p, bytes)))
    else {
        log::warn!("{}", crate::i18n::tr("font.not_found"));
        return;
    };
    log::info!(
        "{}",
        crate::i18n::tr_with("font.using", &[("path", font_path.display().to_string())])
    );

    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert("ui".to_owned(), egui::FontData::from_owned(font_bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        if let Some(list) = fonts.families.get_mut(&family) {
            list.push("ui".to_owned());
        }
    }
    ctx.set_fonts(fonts);
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_rgba(rgb: [f32; 3], alpha: f32) -> [f32; 4] {
    [srgb_to_linear(rgb[0]), srgb_to_linear(rgb[1]), srgb_to_linear(rgb[2]), alpha]
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    uv: [f32; 2],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct DrawUniform {
    mvp: [[f32; 4]; 4],
    color: [f32; 4],
    use_texture: u32,
    pad: [u32; 3],
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, mesh: &QuadMesh, label: &str) -> Self {
        let vertices: Vec<Vertex> = mesh
            .positions
            .iter()
            .zip(&mesh.uvs)
            .map(|(p, uv)| Vertex { position: *p, uv: *uv })
            .collect();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }
}

/// One uniform buffer + bind group per draw call.
struct DrawSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    visible: bool,
}

impl DrawSlot {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("orb_draw_uniform"),
            size: std::mem::size_of::<DrawUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("orb_draw_bind_group"),
        });
        Self {
            buffer,
            bind_group,
            visible: false,
        }
    }

    fn write(&mut self, queue: &wgpu::Queue, mvp: Mat4, color: [f32; 4], textured: bool) {
        let uniform = DrawUniform {
            mvp: mvp.to_cols_array_2d(),
            color,
            use_texture: textured as u32,
            pad: [0; 3],
        };
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[uniform]));
        self.visible = true;
    }
}

/// GPU resources of one placed orb. Dropped on rebuild / teardown.
struct ItemGpu {
    plane: GpuMesh,
    plane_draw: DrawSlot,
    texture_group: Option<wgpu::BindGroup>,
    _texture: Option<wgpu::Texture>,
    border: Option<(GpuMesh, f32)>,
    border_draw: DrawSlot,
    glow_mesh: GpuMesh,
    glow_draws: [DrawSlot; 3],
}

pub struct Renderer {
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    render_pipeline: wgpu::RenderPipeline,

    draw_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    /// 1x1 white texture bound for flat-coloured draws.
    white_group: wgpu::BindGroup,
    _white_texture: wgpu::Texture,

    generation: u64,
    items: Vec<Option<ItemGpu>>,
    draw_order: Vec<usize>,
    clear_color: wgpu::Color,

    // UI
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Renderer {
    pub async fn new(window: std::sync::Arc<Window>) -> Result<Self, RendererError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = unsafe { instance.create_surface(window.as_ref()) }?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RendererError::NoAdapter)?;
        log::info!("using GPU adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    features: wgpu::Features::empty(),
                    limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                    label: Some("moonr_orb_device"),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("orb_draw_layout"),
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
            label: Some("orb_texture_layout"),
        });

        let white = RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]));
        let (white_texture, white_group) = upload_texture(&device, &queue, &texture_layout, &sampler, &white);

        let shader = device.create_shader_module(wgpu::include_wgsl!("shader_orb.wgsl"));
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Orb Pipeline Layout"),
            bind_group_layouts: &[&draw_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Orb Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None, // 双面显示，背面的球体图片也要画
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let egui_ctx = egui::Context::default();
        setup_egui_ui_fonts(&egui_ctx);
        let mut egui_state = egui_winit::State::new(window.as_ref());
        egui_state.set_pixels_per_point(window.scale_factor() as f32);
        let egui_renderer = egui_wgpu::Renderer::new(&device, config.format, None, 1);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            render_pipeline,
            draw_layout,
            texture_layout,
            sampler,
            white_group,
            _white_texture: white_texture,
            generation: 0,
            items: Vec::new(),
            draw_order: Vec::new(),
            clear_color: wgpu::Color::BLACK,
            egui_ctx,
            egui_state,
            egui_renderer,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Drop every orb's GPU resources.
    pub fn release_scene(&mut self) {
        self.items.clear();
        self.draw_order.clear();
    }

    /// Bring GPU state in line with `scene` and write this frame's uniforms.
    pub fn prepare(&mut self, scene: &OrbScene) {
        if scene.generation() != self.generation {
            self.release_scene();
            self.generation = scene.generation();
        }
        let bg = scene.background();
        let [r, g, b, _] = linear_rgba(bg, 1.0);
        self.clear_color = wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        };

        let view_proj = scene.camera().view_projection();
        let eye = scene.camera().position;
        let mut order: Vec<(f32, usize)> = Vec::new();

        for item in scene.placed() {
            if self.items.len() <= item.index {
                self.items.resize_with(item.index + 1, || None);
            }
            if self.items[item.index].is_none() {
                self.items[item.index] = Some(self.create_item(item));
            }
            self.update_item(item, view_proj);
            order.push((item.position.distance_squared(eye), item.index));
        }

        // 远的先画
        order.sort_by(|a, b| b.0.total_cmp(&a.0));
        self.draw_order = order.into_iter().map(|(_, i)| i).collect();
    }

    fn create_item(&self, item: &PlacedItem) -> ItemGpu {
        let plane = GpuMesh::upload(&self.device, &build_plane(item.size.x, item.size.y), "orb_plane");
        let (texture, texture_group) = match &item.surface {
            ItemSurface::Image(img) => {
                let img = self.fit_texture_limits(img);
                let (t, g) = upload_texture(&self.device, &self.queue, &self.texture_layout, &self.sampler, &img);
                (Some(t), Some(g))
            }
            ItemSurface::Flat => (None, None),
        };
        let glow_mesh = GpuMesh::upload(&self.device, &build_frame(item.size.x, item.size.y, GLOW_THICKNESS), "orb_glow");

        ItemGpu {
            plane,
            plane_draw: DrawSlot::new(&self.device, &self.draw_layout),
            texture_group,
            _texture: texture,
            border: None,
            border_draw: DrawSlot::new(&self.device, &self.draw_layout),
            glow_mesh,
            glow_draws: [
                DrawSlot::new(&self.device, &self.draw_layout),
                DrawSlot::new(&self.device, &self.draw_layout),
                DrawSlot::new(&self.device, &self.draw_layout),
            ],
        }
    }

    fn fit_texture_limits(&self, img: &RgbaImage) -> RgbaImage {
        let max = self.device.limits().max_texture_dimension_2d;
        let (w, h) = img.dimensions();
        if w <= max && h <= max {
            return img.clone();
        }
        let scale = max as f32 / w.max(h) as f32;
        let (nw, nh) = (((w as f32 * scale) as u32).max(1), ((h as f32 * scale) as u32).max(1));
        log::warn!("orb image {w}x{h} exceeds GPU limit {max}, scaling to {nw}x{nh}");
        image::imageops::resize(img, nw, nh, image::imageops::FilterType::Triangle)
    }

    fn update_item(&mut self, item: &PlacedItem, view_proj: Mat4) {
        let Some(gpu) = self.items[item.index].as_mut() else {
            return;
        };
        let model = Mat4::from_scale_rotation_translation(Vec3::splat(item.scale), item.orientation, item.position);
        let mvp = view_proj * model;

        match item.surface {
            ItemSurface::Image(_) => gpu.plane_draw.write(&self.queue, mvp, [1.0; 4], true),
            ItemSurface::Flat => gpu.plane_draw.write(&self.queue, mvp, linear_rgba(PLACEHOLDER_COLOR, 1.0), false),
        }

        gpu.border_draw.visible = false;
        for slot in &mut gpu.glow_draws {
            slot.visible = false;
        }
        let Some(decoration) = &item.decoration else {
            return;
        };

        if decoration.border.visible {
            let width = decoration.border.width;
            let stale = gpu.border.as_ref().map_or(true, |(_, w)| *w != width);
            if stale {
                let mesh = build_frame(item.size.x, item.size.y, width * BORDER_UNIT);
                gpu.border = Some((GpuMesh::upload(&self.device, &mesh, "orb_border"), width));
            }
            let color = linear_rgba(decoration.border.color, decoration.border.opacity);
            gpu.border_draw.write(&self.queue, mvp, color, false);
        }

        for (layer, slot) in decoration.glow.iter().zip(&mut gpu.glow_draws) {
            if !layer.visible {
                continue;
            }
            let glow_model = model * Mat4::from_scale(Vec3::new(layer.scale, layer.scale, 1.0));
            slot.write(&self.queue, view_proj * glow_model, linear_rgba(layer.color, layer.opacity), false);
        }
    }

    pub fn render_with_ui(
        &mut self,
        window: &Window,
        run_ui: impl FnOnce(&egui::Context),
    ) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        // 1. Orbs
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Orb Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });
            render_pass.set_pipeline(&self.render_pipeline);

            for &index in &self.draw_order {
                let Some(gpu) = self.items.get(index).and_then(Option::as_ref) else {
                    continue;
                };

                render_pass.set_bind_group(1, &self.white_group, &[]);
                for slot in gpu.glow_draws.iter().filter(|s| s.visible).rev() {
                    draw_mesh(&mut render_pass, &gpu.glow_mesh, slot);
                }

                let texture_group = gpu.texture_group.as_ref().unwrap_or(&self.white_group);
                render_pass.set_bind_group(1, texture_group, &[]);
                draw_mesh(&mut render_pass, &gpu.plane, &gpu.plane_draw);

                if let (Some((mesh, _)), true) = (&gpu.border, gpu.border_draw.visible) {
                    render_pass.set_bind_group(1, &self.white_group, &[]);
                    draw_mesh(&mut render_pass, mesh, &gpu.border_draw);
                }
            }
        }

        // 2. UI
        let raw_input = self.egui_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, run_ui);

        self.egui_state
            .handle_platform_output(window, &self.egui_ctx, full_output.platform_output);
        let clipped_primitives = self.egui_ctx.tessellate(full_output.shapes);

        let screen_descriptor = egui_wgpu::renderer::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        for (id, delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, delta);
        }
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &clipped_primitives,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });
            self.egui_renderer
                .render(&mut render_pass, &clipped_primitives, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

fn draw_mesh<'a>(pass: &mut wgpu::RenderPass<'a>, mesh: &'a GpuMesh, slot: &'a DrawSlot) {
    pass.set_bind_group(0, &slot.bind_group, &[]);
    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
    pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    pass.draw_indexed(0..mesh.index_count, 0, 0..1);
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    img: &RgbaImage,
) -> (wgpu::Texture, wgpu::BindGroup) {
    let (width, height) = img.dimensions();
    let texture_size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        size: texture_size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        label: Some("orb_texture"),
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        img,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        texture_size,
    );

    let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture_view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
        label: Some("orb_texture_bind_group"),
    });
    (texture, bind_group)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_conversion_end_points() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-6);
        assert!(srgb_to_linear(0.5) < 0.5);
    }

    #[test]
    fn uniform_matches_wgsl_layout() {
        // mat4 + vec4 + u32, padded to 16
        assert_eq!(std::mem::size_of::<DrawUniform>(), 96);
        assert_eq!(std::mem::size_of::<Vertex>(), 20);
    }
}
