//! Vello-based renderer implementation.

use crate::renderer::{RenderContext, Renderer};
use emberline_core::layer::InkLayer;
use kurbo::{Affine, BezPath, Cap, Join, Point, Rect, Stroke};
use peniko::{Color, Fill};
use vello::Scene;

/// Outline color for layer frames when the debug flag is on.
const FRAME_OUTLINE_COLOR: Color = Color::from_rgba8(255, 255, 255, 96);

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
        }
    }

    /// Take ownership of the built scene, leaving an empty one behind.
    pub fn take_scene(&mut self) -> Scene {
        std::mem::replace(&mut self.scene, Scene::new())
    }

    fn draw_layer(&mut self, layer: &InkLayer, show_frame: bool) {
        let transform = Affine::translate(layer.frame.origin().to_vec2());

        let path = reveal_path(&layer.points, layer.reveal);
        if !path.elements().is_empty() {
            let stroke = Stroke::new(layer.style.line_width())
                .with_caps(Cap::Round)
                .with_join(Join::Round);
            self.scene
                .stroke(&stroke, transform, layer.style.color, None, &path);
        }

        if show_frame {
            let outline = Rect::from_origin_size(Point::ZERO, layer.frame.size());
            self.scene
                .stroke(&Stroke::new(1.0), transform, FRAME_OUTLINE_COLOR, None, &outline);
        }
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();

        let viewport = Rect::from_origin_size(Point::ZERO, ctx.viewport_size);
        self.scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            ctx.background_color,
            None,
            &viewport,
        );

        for layer in ctx.surface.layers().iter() {
            self.draw_layer(layer, ctx.show_layer_frames);
        }
    }
}

/// Build the visible prefix of a local polyline.
///
/// `reveal` is the fraction of total arc length, measured from the start,
/// that remains visible. A single-point path renders as a dot (zero-length
/// segment under round caps) until reveal reaches zero.
fn reveal_path(points: &[Point], reveal: f64) -> BezPath {
    let mut path = BezPath::new();
    let Some((&first, rest)) = points.split_first() else {
        return path;
    };
    let reveal = reveal.clamp(0.0, 1.0);
    if reveal <= 0.0 {
        return path;
    }

    path.move_to(first);
    if rest.is_empty() {
        path.line_to(first);
        return path;
    }
    if reveal >= 1.0 {
        for &p in rest {
            path.line_to(p);
        }
        return path;
    }

    let total: f64 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
    if total <= 0.0 {
        path.line_to(first);
        return path;
    }

    let mut remaining = total * reveal;
    let mut prev = first;
    for &p in rest {
        let seg = prev.distance(p);
        if seg <= remaining {
            path.line_to(p);
            remaining -= seg;
            prev = p;
        } else {
            let t = if seg > 0.0 { remaining / seg } else { 0.0 };
            path.line_to(prev.lerp(p, t));
            break;
        }
    }
    path
}
