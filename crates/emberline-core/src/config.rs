//! Surface configuration.

use crate::fade::Ease;
use peniko::Color;
use std::time::Duration;

/// Construction-time configuration for an annotation surface.
///
/// There is no runtime reconfiguration: the values are fixed when the
/// surface is created. The defaults carry the reference design's constants.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceConfig {
    /// Half the rendered line width.
    pub stroke_radius: f64,
    /// Ink color for new strokes.
    pub ink_color: Color,
    /// Delay between releasing a stroke and the start of its fade-out.
    pub fade_delay: Duration,
    /// Length of the fade-out reveal transition.
    pub fade_duration: Duration,
    /// Timing curve of the fade-out.
    pub ease: Ease,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            stroke_radius: 4.0,
            ink_color: Color::from_rgba8(229, 57, 53, 255),
            fade_delay: Duration::from_secs(4),
            fade_duration: Duration::from_millis(1500),
            ease: Ease::InQuad,
        }
    }
}
