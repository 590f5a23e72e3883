//! Core application state and lifecycle.

use kurbo::{Point, Size};
use peniko::Color;
use speakpad_core::input::PointerEvent;
use speakpad_core::speech::SystemSpeech;
use speakpad_core::storage::{FileStorage, StorageResult};
use speakpad_core::InteractionController;
use std::path::PathBuf;
use std::sync::Arc;
use vello::util::{RenderContext, RenderSurface};
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions, Scene};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use crate::marker::paint_marker;
use crate::ui::{render_ui, ScreenView, UiAction, UiState};

/// Controller wired to the native gateways.
pub type ScreenController = InteractionController<FileStorage, SystemSpeech>;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
    /// Layout position of the marker before any drag, in logical pixels.
    pub marker_home: Point,
    pub marker_size: Size,
    pub marker_color: Color,
    pub marker_label: String,
    /// Overrides the default storage directory.
    pub storage_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "SpeakPad".to_string(),
            width: 960,
            height: 720,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            marker_home: Point::new(520.0, 160.0),
            marker_size: Size::new(100.0, 100.0),
            marker_color: Color::from_rgba8(0, 0, 0, 255),
            marker_label: "Drag me".to_string(),
            storage_dir: None,
        }
    }
}

/// Runtime state that exists once the window is up.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    /// Texture blitter for RGBA->surface format conversion
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    /// Last cursor position in logical pixels.
    cursor: Point,
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    controller: ScreenController,
    state: Option<AppState>,
    render_cx: Option<RenderContext>,
}

impl App {
    /// Create the application with native storage and speech.
    pub fn with_config(config: AppConfig) -> StorageResult<Self> {
        let storage = match &config.storage_dir {
            Some(dir) => FileStorage::new(dir.clone())?,
            None => FileStorage::default_location()?,
        };
        log::info!("Storing text in {}", storage.store_path().display());

        let speech = SystemSpeech::new();
        log::info!("Using {:?} synthesizer", speech.kind());

        let controller = InteractionController::new(Arc::new(storage), Arc::new(speech));

        Ok(Self {
            config,
            controller,
            state: None,
            render_cx: None,
        })
    }

    /// Run the application.
    pub async fn run() {
        let mut app = match App::with_config(AppConfig::default()) {
            Ok(app) => app,
            Err(e) => {
                log::error!("Failed to open storage: {}", e);
                return;
            }
        };

        app.controller.fetch_voice_catalog().await;

        let event_loop = EventLoop::new().expect("Failed to create event loop");
        event_loop.run_app(&mut app).expect("Event loop error");
    }

    /// Finish initialization after surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) {
        let render_cx = self.render_cx.as_ref().expect("RenderContext not initialized");
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .expect("Failed to create Vello renderer");

        // Vello renders to Rgba8Unorm; the surface may be Bgra8Unorm
        let texture_blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        log::info!("SpeakPad initialized - {}x{}", surface.config.width, surface.config.height);

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state: UiState {
                draft: self.controller.draft().to_string(),
            },
            cursor: Point::ZERO,
        });

        window.request_redraw();
    }

    fn apply_action(&mut self, action: UiAction) {
        match action {
            UiAction::SetDraft(text) => self.controller.set_draft(text),
            UiAction::Save => pollster::block_on(self.controller.save()),
            UiAction::Load => pollster::block_on(self.controller.load()),
            UiAction::Speak => {
                // A missing voice is reported through the notice modal
                let _ = self.controller.speak();
            }
            UiAction::SelectVoice(id) => self.controller.select_voice(id),
            UiAction::DismissNotice => self.controller.dismiss_notice(),
        }
    }

    fn marker_bounds(&self) -> kurbo::Rect {
        self.controller
            .marker_bounds(self.config.marker_home, self.config.marker_size)
    }

    fn redraw(&mut self) {
        let marker = self.marker_bounds();
        let Some(state) = &mut self.state else {
            return;
        };

        let controller = &self.controller;
        let effective_voice_id = controller.effective_voice().map(|voice| voice.id.as_str());
        let view = ScreenView {
            persisted: controller.persisted(),
            voices: controller.catalog(),
            effective_voice_id,
            notice: controller.notice(),
            marker_center: egui::Pos2::new(marker.center().x as f32, marker.center().y as f32),
            marker_label: &self.config.marker_label,
        };

        let egui_input = state.egui_state.take_egui_input(&state.window);
        let mut action: Option<UiAction> = None;
        let egui_output = state.egui_ctx.run(egui_input, |ctx| {
            action = render_ui(ctx, &mut state.ui_state, &view);
        });

        state.egui_state.handle_platform_output(&state.window, egui_output.platform_output);
        let egui_primitives = state.egui_ctx.tessellate(egui_output.shapes, egui_output.pixels_per_point);

        let Some(render_cx) = self.render_cx.as_ref() else {
            return;
        };

        let device_handle = &render_cx.devices[state.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = match state.surface.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Failed to get surface texture: {:?}", e);
                return;
            }
        };

        let width = state.surface.config.width;
        let height = state.surface.config.height;

        let mut scene = Scene::new();
        paint_marker(&mut scene, marker, state.window.scale_factor(), self.config.marker_color);

        let params = RenderParams {
            base_color: self.config.background_color,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello's compute shaders need a StorageBinding Rgba8Unorm target
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_texture_view =
            render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        if let Err(e) = state.vello_renderer.render_to_texture(
            device,
            queue,
            &scene,
            &render_texture_view,
            &params,
        ) {
            log::error!("Failed to render: {:?}", e);
            return;
        }

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        {
            let mut blit_encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                label: Some("blit encoder"),
            });
            state.texture_blitter.copy(device, &mut blit_encoder, &render_texture_view, &surface_view);
            queue.submit(std::iter::once(blit_encoder.finish()));
        }

        for (id, image_delta) in &egui_output.textures_delta.set {
            state.egui_renderer.update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: egui_output.pixels_per_point,
        };

        {
            let mut egui_encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                label: Some("egui encoder"),
            });

            state.egui_renderer.update_buffers(
                device,
                queue,
                &mut egui_encoder,
                &egui_primitives,
                &screen_descriptor,
            );

            let render_pass = egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: vello::wgpu::Operations {
                        load: vello::wgpu::LoadOp::Load, // Keep the marker
                        store: vello::wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // egui-wgpu wants a 'static render pass
            let mut render_pass = render_pass.forget_lifetime();
            state.egui_renderer.render(&mut render_pass, &egui_primitives, &screen_descriptor);
            drop(render_pass);

            queue.submit(std::iter::once(egui_encoder.finish()));
        }

        for id in &egui_output.textures_delta.free {
            state.egui_renderer.free_texture(id);
        }
        surface_texture.present();
        state.window.request_redraw();

        if let Some(action) = action {
            log::debug!("UI action: {:?}", action);
            self.apply_action(action);
        }
    }

    fn pointer_event(&mut self, event: PointerEvent) {
        let marker = self.marker_bounds();
        self.controller.handle_pointer_event(event, marker);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        log::info!("Creating window...");

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };

        log::info!("Surface size: {}x{}", width, height);

        let render_cx = self.render_cx.get_or_insert_with(RenderContext::new);
        let surface = pollster::block_on(render_cx.create_surface(
            window.clone(),
            width,
            height,
            PresentMode::AutoVsync,
        ))
        .expect("Failed to create surface");

        self.finish_init(window, surface);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };

        // Let egui process the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        let egui_wants_input = egui_response.consumed
            || state.egui_ctx.is_pointer_over_area()
            || state.egui_ctx.wants_pointer_input();

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }
                state.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                self.redraw();
            }

            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f64>(state.window.scale_factor());
                state.cursor = Point::new(logical.x, logical.y);
                let position = state.cursor;
                self.pointer_event(PointerEvent::Move { position });
            }

            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } => {
                let position = state.cursor;
                match button_state {
                    ElementState::Pressed if !egui_wants_input => {
                        self.pointer_event(PointerEvent::Down { position });
                    }
                    ElementState::Pressed => {}
                    ElementState::Released => {
                        self.pointer_event(PointerEvent::Up { position });
                    }
                }
            }

            WindowEvent::Focused(false) => {
                self.pointer_event(PointerEvent::Cancel);
            }

            _ => {}
        }
    }
}
