//! Emberline Core Library
//!
//! Platform-agnostic stroke geometry and annotation lifecycle for the
//! Emberline ink surface.

pub mod annotation;
pub mod config;
pub mod fade;
pub mod geometry;
pub mod input;
pub mod layer;
pub mod stroke;
pub mod surface;

pub use annotation::{Annotation, AnnotationId, AnnotationRegistry};
pub use config::SurfaceConfig;
pub use fade::{Ease, FadeScheduler};
pub use geometry::StrokeBounds;
pub use input::{InputState, MouseButton, PointerEvent};
pub use layer::{InkLayer, InkStyle, LayerId, LayerTree};
pub use stroke::Stroke;
pub use surface::Surface;
