//! Renderer trait abstraction.

use emberline_core::surface::Surface;
use kurbo::Size;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The ink surface whose layers are drawn.
    pub surface: &'a Surface,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Background color.
    pub background_color: Color,
    /// Outline each layer's frame (debugging aid).
    pub show_layer_frames: bool,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(surface: &'a Surface, viewport_size: Size) -> Self {
        Self {
            surface,
            viewport_size,
            background_color: Color::from_rgba8(24, 26, 33, 255),
            show_layer_frames: false,
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Enable layer frame outlines.
    pub fn with_layer_frames(mut self, show: bool) -> Self {
        self.show_layer_frames = show;
        self
    }
}

/// Trait for rendering backends.
///
/// Implementations can use Vello, wgpu directly, or other rendering engines.
pub trait Renderer: Send + Sync {
    /// Build the scene/command buffer for a frame.
    ///
    /// Called once per frame; prepares all drawing commands for the
    /// surface's current layer tree.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
