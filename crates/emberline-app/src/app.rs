//! Core application state and lifecycle.

use emberline_core::config::SurfaceConfig;
use emberline_core::input::{InputState, MouseButton as InkButton};
use emberline_core::surface::Surface;
use emberline_render::{RenderContext, Renderer, RendererError, VelloRenderer};
use kurbo::{Point, Size};
use peniko::Color;
use std::sync::Arc;
use std::time::Instant;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
    /// Ink surface settings (stroke radius, color, fade timing).
    pub surface: SurfaceConfig,
    /// Outline layer frames (debugging aid).
    pub show_layer_frames: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Emberline".to_string(),
            width: 1280,
            height: 800,
            background_color: Color::from_rgba8(24, 26, 33, 255),
            surface: SurfaceConfig::default(),
            show_layer_frames: false,
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
    scene_renderer: VelloRenderer,
    /// Texture blitter for RGBA->surface format conversion.
    blitter: vello::wgpu::util::TextureBlitter,

    // State
    ink: Surface,
    input: InputState,
    config: AppConfig,
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
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

    /// Finish initialization after the surface is created.
    fn finish_init(
        &mut self,
        window: Arc<Window>,
        surface: RenderSurface<'static>,
    ) -> Result<(), RendererError> {
        let render_cx = self
            .render_cx
            .as_ref()
            .ok_or_else(|| RendererError::InitFailed("RenderContext not initialized".into()))?;
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .map_err(|e| RendererError::InitFailed(e.to_string()))?;

        // Vello renders to Rgba8Unorm for compute-shader compatibility; the
        // swapchain format may differ, so frames are blitted across.
        let blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        log::info!(
            "Emberline initialized - {}x{}",
            surface.config.width,
            surface.config.height
        );
        log::info!("Draw with the left mouse button; Escape or C clears");

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            scene_renderer: VelloRenderer::new(),
            blitter,
            ink: Surface::new(self.config.surface),
            input: InputState::new(),
            config: self.config.clone(),
        });

        window.request_redraw();
        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a winit mouse button onto the surface's button model.
fn map_button(button: MouseButton) -> Option<InkButton> {
    match button {
        MouseButton::Left => Some(InkButton::Left),
        MouseButton::Right => Some(InkButton::Right),
        MouseButton::Middle => Some(InkButton::Middle),
        _ => None,
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

        // Transmute lifetime to 'static - safe because App owns everything
        let surface: RenderSurface<'static> = unsafe { std::mem::transmute(surface) };

        if let Err(e) = self.finish_init(window, surface) {
            log::error!("Initialization failed: {e}");
            event_loop.exit();
        }
    }

    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        // A fade-out delay elapsed; wake the render path so the scheduler
        // can start the transition.
        if matches!(cause, StartCause::ResumeTimeReached { .. }) {
            if let Some(state) = &self.state {
                state.window.request_redraw();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

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

            WindowEvent::CursorMoved { position, .. } => {
                let event = state.input.moved(Point::new(position.x, position.y));
                state.ink.handle_pointer(&event, Instant::now());
                if state.ink.is_drawing() {
                    state.window.request_redraw();
                }
            }

            WindowEvent::MouseInput { state: element_state, button, .. } => {
                let Some(button) = map_button(button) else {
                    return;
                };
                let event = match element_state {
                    ElementState::Pressed => state.input.press(button),
                    ElementState::Released => state.input.release(button),
                };
                state.ink.handle_pointer(&event, Instant::now());
                state.window.request_redraw();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                let clear = match &event.logical_key {
                    Key::Named(NamedKey::Escape) => true,
                    Key::Character(c) => c == "c" || c == "C",
                    _ => false,
                };
                if clear {
                    state.ink.clear();
                    state.window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                // Advance fade animations before the scene is built.
                state.ink.tick(Instant::now());

                let viewport_size = Size::new(
                    state.surface.config.width as f64,
                    state.surface.config.height as f64,
                );
                let render_ctx = RenderContext::new(&state.ink, viewport_size)
                    .with_background(state.config.background_color)
                    .with_layer_frames(state.config.show_layer_frames);

                state.scene_renderer.build_scene(&render_ctx);
                let scene = state.scene_renderer.take_scene();

                let Some(render_cx) = self.render_cx.as_ref() else {
                    return;
                };
                let device_handle = &render_cx.devices[state.surface.dev_id];
                let device = &device_handle.device;
                let queue = &device_handle.queue;

                let surface_texture = match state.surface.surface.get_current_texture() {
                    Ok(t) => t,
                    Err(e) => {
                        log::warn!("Failed to get surface texture: {e:?}");
                        return;
                    }
                };

                let width = state.surface.config.width;
                let height = state.surface.config.height;

                let params = RenderParams {
                    base_color: state.config.background_color,
                    width,
                    height,
                    antialiasing_method: AaConfig::Area,
                };

                // Intermediate Rgba8Unorm texture: Vello's compute shaders
                // need StorageBinding, which the swapchain format may not
                // support.
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
                    log::error!("Failed to render: {e:?}");
                    return;
                }

                let surface_view = surface_texture
                    .texture
                    .create_view(&vello::wgpu::TextureViewDescriptor::default());

                let mut encoder =
                    device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                        label: Some("blit encoder"),
                    });
                state
                    .blitter
                    .copy(device, &mut encoder, &render_texture_view, &surface_view);
                queue.submit(std::iter::once(encoder.finish()));

                surface_texture.present();

                // A running fade transition needs per-frame updates.
                if state.ink.is_animating() {
                    state.window.request_redraw();
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = &self.state else {
            return;
        };
        // Sleep until the next fade-out becomes due; poll only while a
        // transition is actually running.
        if state.ink.is_animating() {
            event_loop.set_control_flow(ControlFlow::Poll);
            state.window.request_redraw();
        } else if let Some(due) = state.ink.next_due() {
            event_loop.set_control_flow(ControlFlow::WaitUntil(due));
        } else {
            event_loop.set_control_flow(ControlFlow::Wait);
        }
    }
}
