//! A single growing stroke and its layer synchronization.

use crate::geometry::StrokeBounds;
use crate::layer::{InkLayer, InkStyle, LayerId, LayerTree};
use kurbo::{Point, Vec2};

/// One continuous line from pointer-down to pointer-up.
///
/// The stroke owns the authoritative geometry; its layer is synchronized
/// from it after every mutation, never the other way around.
#[derive(Debug, Clone)]
pub struct Stroke {
    bounds: StrokeBounds,
    /// Path points relative to the current frame origin.
    path: Vec<Point>,
    layer: LayerId,
}

impl Stroke {
    /// Open a stroke at `at` and attach its rendering layer to the tree.
    pub fn start(tree: &mut LayerTree, at: Point, style: InkStyle) -> Self {
        let bounds = StrokeBounds::new(at, style.radius);
        let mut layer = InkLayer::new(bounds.frame(), style);
        layer.points.push(bounds.to_local(at));
        let path = layer.points.clone();
        let layer = tree.attach(layer);
        log::debug!("stroke started at ({:.1}, {:.1})", at.x, at.y);
        Self { bounds, path, layer }
    }

    /// Extend the stroke to `to`.
    ///
    /// The existing path is re-expressed in the new coordinate space before
    /// the converted point is appended, so every entry stays relative to the
    /// current frame origin. Repeating the previous point appends a
    /// zero-length segment and leaves the frame untouched.
    pub fn extend(&mut self, tree: &mut LayerTree, to: Point) {
        let shift = self.bounds.add(to);
        if shift != Vec2::ZERO {
            for p in &mut self.path {
                *p += shift;
            }
        }
        self.path.push(self.bounds.to_local(to));
        self.sync(tree);
    }

    /// Push frame and path to the rendering layer in one step.
    fn sync(&self, tree: &mut LayerTree) {
        // Layer already detached means the surface was cleared mid-gesture.
        let Some(layer) = tree.get_mut(self.layer) else {
            return;
        };
        layer.frame = self.bounds.frame();
        layer.points.clear();
        layer.points.extend_from_slice(&self.path);
    }

    /// Handle of the rendering layer this stroke draws into.
    pub fn layer(&self) -> LayerId {
        self.layer
    }

    pub fn bounds(&self) -> &StrokeBounds {
        &self.bounds
    }

    /// The accumulated local path.
    pub fn path(&self) -> &[Point] {
        &self.path
    }
}
