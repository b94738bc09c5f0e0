//! Emberline Render Library
//!
//! Renderer abstraction and the Vello implementation that draws the ink
//! surface's layer tree.

mod renderer;
mod vello_impl;

pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
pub use vello_impl::VelloRenderer;
