//! Main application state and event loop.

use gridsketch_core::{
    DragSession, EditorConfig, EditorEvent, EditorState, LineSet, PlatformAutoSaveManager,
    create_autosave_manager, export_lines,
};
use gridsketch_render::{RenderContext, Renderer, VelloRenderer};
use kurbo::{Point, Size};
use peniko::Color;
use std::sync::Arc;
use std::time::Instant;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::event_handler::EventHandler;
use crate::ui::{UiAction, UiState, render_ui};

mod file_ops {
    use gridsketch_core::{EXPORT_FILE_NAME, Line, import_lines};

    /// Write exported text to a file chosen with the native dialog.
    pub fn save_export(contents: &str) {
        let dialog = rfd::FileDialog::new()
            .set_title("Export Lines")
            .set_file_name(EXPORT_FILE_NAME)
            .add_filter("GridSketch Lines", &["txt", "json"]);

        if let Some(path) = dialog.save_file() {
            if let Err(e) = std::fs::write(&path, contents) {
                log::error!("Failed to write file: {}", e);
            } else {
                log::info!("Exported lines to: {:?}", path);
            }
        }
    }

    /// Read and parse a line file chosen with the native dialog.
    /// Returns None when cancelled or when the file cannot be used.
    pub fn load_import() -> Option<Vec<Line>> {
        let dialog = rfd::FileDialog::new()
            .set_title("Import Lines")
            .add_filter("GridSketch Lines", &["txt", "json"]);

        let path = dialog.pick_file()?;
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                log::error!("Failed to read file: {}", e);
                return None;
            }
        };
        match import_lines(&content) {
            Ok(lines) => {
                log::info!("Imported {} lines from: {:?}", lines.len(), path);
                Some(lines)
            }
            Err(e) => {
                log::warn!("Ignoring import from {:?}: {}", path, e);
                None
            }
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "GridSketch".to_string(),
            width: 1280,
            height: 800,
            background_color: Color::from_rgba8(250, 250, 250, 255),
        }
    }
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    line_renderer: VelloRenderer,
    /// Blits the Rgba8Unorm render target onto the surface format.
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    // Editor
    editor: EditorState,
    editor_config: EditorConfig,
    event_handler: EventHandler,
    /// None when the platform store could not be opened.
    autosave: Option<PlatformAutoSaveManager>,
    background_color: Color,
}

impl AppState {
    /// Run one editor transition and carry out its effects.
    fn dispatch(&mut self, event: &EditorEvent) {
        let editor = std::mem::take(&mut self.editor);
        let (editor, effects) = editor.apply(event, &self.editor_config);
        self.editor = editor;

        if effects.lines_changed {
            self.schedule_autosave();
        }
        if effects.redraw {
            self.window.request_redraw();
        }
    }

    fn schedule_autosave(&mut self) {
        let Some(autosave) = self.autosave.as_mut() else {
            return;
        };
        if let Err(e) = autosave.schedule(&self.editor.lines, Instant::now()) {
            log::warn!("Failed to schedule autosave: {}", e);
        }
    }

    fn viewport_center(&self) -> Point {
        Point::new(
            f64::from(self.surface.config.width) / 2.0,
            f64::from(self.surface.config.height) / 2.0,
        )
    }

    fn handle_ui_action(&mut self, action: UiAction) {
        match action {
            UiAction::ToggleGrid => self.dispatch(&EditorEvent::ToggleGrid),
            UiAction::ToggleFineGrid => self.dispatch(&EditorEvent::ToggleFineGrid),
            UiAction::ToggleLabels => self.dispatch(&EditorEvent::ToggleLabels),
            UiAction::ResetView => self.dispatch(&EditorEvent::ResetView),
            UiAction::ZoomIn | UiAction::ZoomOut => {
                let steps = if action == UiAction::ZoomIn { 1 } else { -1 };
                let position = self.viewport_center();
                self.dispatch(&EditorEvent::Wheel { position, steps });
            }
            UiAction::SetLength(text) => self.dispatch(&EditorEvent::LengthEntered(text)),
            UiAction::Export => match export_lines(&self.editor.lines) {
                Ok(json) => file_ops::save_export(&json),
                Err(e) => log::error!("Failed to serialize lines: {}", e),
            },
            UiAction::Import => {
                if let Some(lines) = file_ops::load_import() {
                    self.dispatch(&EditorEvent::ReplaceLines(lines));
                }
            }
            UiAction::Clear => self.dispatch(&EditorEvent::Clear),
        }
    }

    /// Write any pending autosave now.
    fn flush_autosave(&mut self) {
        if let Some(autosave) = self.autosave.as_mut() {
            if let Err(e) = autosave.flush() {
                log::error!("Failed to save drawing: {}", e);
            }
        }
    }

    fn render(&mut self, render_cx: &vello::util::RenderContext) {
        // Run egui and apply any action before drawing the canvas
        let egui_input = self.egui_state.take_egui_input(&self.window);
        let mut ui_action = None;
        let egui_output = self.egui_ctx.run(egui_input, |ctx| {
            ui_action = render_ui(ctx, &mut self.ui_state, &self.editor);
        });
        self.egui_state
            .handle_platform_output(&self.window, egui_output.platform_output);
        if let Some(action) = ui_action {
            self.handle_ui_action(action);
        }
        let egui_primitives = self
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);

        let width = self.surface.config.width;
        let height = self.surface.config.height;

        let ctx = RenderContext::new(&self.editor, Size::new(f64::from(width), f64::from(height)))
            .with_scale_factor(self.window.scale_factor())
            .with_background(self.background_color);
        self.line_renderer.build_scene(&ctx);
        let base_color = self.line_renderer.background_color(&ctx);
        let scene = self.line_renderer.take_scene();

        let device_handle = &render_cx.devices[self.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = match self.surface.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Failed to get surface texture: {:?}", e);
                return;
            }
        };

        let params = RenderParams {
            base_color,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello needs a storage-bindable Rgba8Unorm target; the surface may be Bgra8Unorm
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

        if let Err(e) =
            self.vello_renderer
                .render_to_texture(device, queue, &scene, &render_texture_view, &params)
        {
            log::error!("Failed to render: {:?}", e);
            return;
        }

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        {
            let mut blit_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("blit encoder"),
                });
            self.texture_blitter
                .copy(device, &mut blit_encoder, &render_texture_view, &surface_view);
            queue.submit(std::iter::once(blit_encoder.finish()));
        }

        for (id, image_delta) in &egui_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: egui_output.pixels_per_point,
        };

        {
            let mut egui_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("egui encoder"),
                });
            self.egui_renderer.update_buffers(
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
                        // Keep the canvas underneath
                        load: vello::wgpu::LoadOp::Load,
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
            self.egui_renderer
                .render(&mut render_pass, &egui_primitives, &screen_descriptor);
            drop(render_pass);

            queue.submit(std::iter::once(egui_encoder.finish()));
        }

        for id in &egui_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        surface_texture.present();

        // egui animations and tooltips ask for another frame
        let repaint_delay = egui_output
            .viewport_output
            .get(&egui::ViewportId::ROOT)
            .map(|viewport| viewport.repaint_delay);
        if repaint_delay.is_some_and(|delay| delay.is_zero()) {
            self.window.request_redraw();
        }
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    editor_config: EditorConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
}

impl App {
    /// Create a new application with default window settings and the
    /// editor config from the platform config directory.
    pub fn new() -> Self {
        let editor_config = EditorConfig::default_path()
            .map(|path| EditorConfig::load_or_default(&path))
            .unwrap_or_default();
        Self::with_config(AppConfig::default(), editor_config)
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig, editor_config: EditorConfig) -> Self {
        Self {
            config,
            editor_config,
            state: None,
            render_cx: None,
        }
    }

    /// Run the application.
    pub async fn run() {
        let event_loop = EventLoop::new().expect("Failed to create event loop");
        let mut app = App::new();
        event_loop.run_app(&mut app).expect("Event loop error");
    }

    /// Finish initialization after surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) {
        let render_cx = self.render_cx.as_ref().expect("RenderContext not initialized");
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .expect("Failed to create Vello renderer");
        let texture_blitter =
            vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

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

        let autosave = match create_autosave_manager(&self.editor_config) {
            Ok(manager) => Some(manager),
            Err(e) => {
                log::warn!("Autosave disabled: {}", e);
                None
            }
        };
        let lines = autosave
            .as_ref()
            .map(PlatformAutoSaveManager::load_initial)
            .unwrap_or_else(LineSet::new);
        let mut editor = EditorState::with_lines(lines, &self.editor_config);
        editor.view.scale_factor = window.scale_factor();

        log::info!(
            "GridSketch initialized - {}x{}, {} lines",
            surface.config.width,
            surface.config.height,
            editor.lines.len()
        );

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            line_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state: UiState::new(),
            editor,
            editor_config: self.editor_config.clone(),
            event_handler: EventHandler::new(),
            autosave,
            background_color: self.config.background_color,
        });

        window.request_redraw();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
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

        let render_cx = self
            .render_cx
            .get_or_insert_with(vello::util::RenderContext::new);
        let surface = pollster::block_on(render_cx.create_surface(
            window.clone(),
            width,
            height,
            PresentMode::AutoVsync,
        ))
        .expect("Failed to create surface");

        // The window is kept alive by AppState alongside the surface
        let surface: RenderSurface<'static> = unsafe { std::mem::transmute(surface) };
        self.finish_init(window, surface);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };

        // egui sees every event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        if egui_response.repaint {
            state.window.request_redraw();
        }
        let pointer_over_ui = egui_response.consumed
            || state.egui_ctx.is_pointer_over_area()
            || state.egui_ctx.wants_pointer_input();
        let keyboard_to_ui = state.egui_ctx.wants_keyboard_input();

        match event {
            WindowEvent::CloseRequested => {
                state.flush_autosave();
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
                let Some(render_cx) = self.render_cx.as_ref() else {
                    return;
                };
                state.render(render_cx);
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                state.dispatch(&EditorEvent::ScaleFactorChanged(scale_factor));
            }

            WindowEvent::Focused(false) => {
                if let Some(event) = state.event_handler.focus_lost() {
                    state.dispatch(&event);
                }
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                let control = modifiers.state().control_key();
                if let Some(event) = state.event_handler.modifiers_changed(control) {
                    state.dispatch(&event);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = state
                    .event_handler
                    .cursor_moved(Point::new(position.x, position.y));
                // Drags keep following the pointer across the panel
                let dragging = state.editor.interaction.drag != DragSession::Idle;
                if !pointer_over_ui || dragging {
                    state.dispatch(&event);
                }
            }

            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                let pressed = button_state == ElementState::Pressed;
                for event in state.event_handler.mouse_input(button, pressed, pointer_over_ui) {
                    state.dispatch(&event);
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                if pointer_over_ui {
                    return;
                }
                if let Some(event) = state.event_handler.mouse_wheel(delta) {
                    state.dispatch(&event);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if keyboard_to_ui {
                    return;
                }
                let pressed = event.state == ElementState::Pressed;
                if let Some(editor_event) =
                    state
                        .event_handler
                        .key_input(&event.logical_key, pressed, event.repeat)
                {
                    state.dispatch(&editor_event);
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = &mut self.state else {
            return;
        };
        let Some(autosave) = state.autosave.as_mut() else {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        };

        if let Err(e) = autosave.poll(Instant::now()) {
            log::error!("Failed to save drawing: {}", e);
        }
        match autosave.next_deadline() {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            state.flush_autosave();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.title, "GridSketch");
        assert_eq!((config.width, config.height), (1280, 800));
    }
}
