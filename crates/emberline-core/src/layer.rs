//! Retained layer tree fed to the renderer.

use kurbo::{Point, Rect};
use peniko::Color;
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for a layer in the tree.
pub type LayerId = Uuid;

/// Visual style of one ink layer. Caps and joins are always round and the
/// path is never filled; those are fixed by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InkStyle {
    /// Stroke color.
    pub color: Color,
    /// Half the rendered line width.
    pub radius: f64,
}

impl InkStyle {
    pub fn new(color: Color, radius: f64) -> Self {
        Self { color, radius }
    }

    /// Full rendered line width.
    pub fn line_width(&self) -> f64 {
        self.radius * 2.0
    }
}

/// One drawable shape: a polyline in local coordinates plus the frame that
/// positions it on the surface.
///
/// Frame and path mutations take effect instantaneously; nothing in the
/// model interpolates them. Only `reveal` animates, and only the fade
/// scheduler drives it.
#[derive(Debug, Clone)]
pub struct InkLayer {
    id: LayerId,
    /// Position and size on the surface.
    pub frame: Rect,
    /// Path points relative to `frame.origin()`.
    pub points: Vec<Point>,
    /// Stroke style.
    pub style: InkStyle,
    /// Fraction of the path, by arc length from the start, that is visible.
    /// 1.0 while drawing; the fade-out ramps it down to 0.
    pub reveal: f64,
}

impl InkLayer {
    pub fn new(frame: Rect, style: InkStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            frame,
            points: Vec::new(),
            style,
            reveal: 1.0,
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }
}

/// Insertion-ordered set of layers, back to front.
///
/// This is the boundary with the compositing backend: the renderer walks the
/// tree each frame, and attach/detach are the only structural mutations.
#[derive(Debug, Clone, Default)]
pub struct LayerTree {
    layers: HashMap<LayerId, InkLayer>,
    order: Vec<LayerId>,
}

impl LayerTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer on top and return its id.
    pub fn attach(&mut self, layer: InkLayer) -> LayerId {
        let id = layer.id();
        self.order.push(id);
        self.layers.insert(id, layer);
        id
    }

    /// Remove a layer. Detaching an id that is not attached is a no-op.
    pub fn detach(&mut self, id: LayerId) -> Option<InkLayer> {
        self.order.retain(|&l| l != id);
        self.layers.remove(&id)
    }

    pub fn get(&self, id: LayerId) -> Option<&InkLayer> {
        self.layers.get(&id)
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut InkLayer> {
        self.layers.get_mut(&id)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.layers.contains_key(&id)
    }

    /// Layers in attach order (back to front).
    pub fn iter(&self) -> impl Iterator<Item = &InkLayer> {
        self.order.iter().filter_map(|id| self.layers.get(id))
    }

    /// Detach everything.
    pub fn clear(&mut self) {
        self.layers.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
