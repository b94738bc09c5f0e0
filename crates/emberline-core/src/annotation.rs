//! Annotation registry: per-gesture layer handle sets.

use crate::layer::{LayerId, LayerTree};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for an annotation.
pub type AnnotationId = Uuid;

/// The visual elements of one gesture, tracked as a unit for removal.
#[derive(Debug, Clone)]
pub struct Annotation {
    /// Layer handles belonging to this gesture. This design produces one
    /// layer per gesture, but removal always treats it as a set.
    pub layers: Vec<LayerId>,
}

impl Annotation {
    /// An annotation holding a single layer handle.
    pub fn single(layer: LayerId) -> Self {
        Self {
            layers: vec![layer],
        }
    }
}

/// Mapping from annotation id to its layer handles.
///
/// The registry is the sole owner of annotation lifetimes: an entry is added
/// when a gesture starts and removed exactly once, by an explicit clear or by
/// the fade scheduler. Removing an id that is already gone is a no-op.
#[derive(Debug, Clone, Default)]
pub struct AnnotationRegistry {
    entries: HashMap<AnnotationId, Annotation>,
}

impl AnnotationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an annotation under a fresh id.
    pub fn insert(&mut self, annotation: Annotation) -> AnnotationId {
        let id = Uuid::new_v4();
        self.entries.insert(id, annotation);
        id
    }

    pub fn contains(&self, id: AnnotationId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.entries.get(&id)
    }

    /// Remove an entry and detach all of its layers from the tree.
    ///
    /// Returns false if the id was not registered; the tree is untouched in
    /// that case.
    pub fn remove_detached(&mut self, id: AnnotationId, tree: &mut LayerTree) -> bool {
        let Some(annotation) = self.entries.remove(&id) else {
            return false;
        };
        for layer in annotation.layers {
            tree.detach(layer);
        }
        log::debug!("annotation {id} removed");
        true
    }

    /// Detach every tracked layer and empty the registry.
    pub fn clear_detached(&mut self, tree: &mut LayerTree) {
        for annotation in self.entries.values() {
            for &layer in &annotation.layers {
                tree.detach(layer);
            }
        }
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{InkLayer, InkStyle};
    use kurbo::Rect;
    use peniko::Color;

    fn attach_layer(tree: &mut LayerTree) -> LayerId {
        tree.attach(InkLayer::new(
            Rect::new(0.0, 0.0, 8.0, 8.0),
            InkStyle::new(Color::from_rgba8(255, 0, 0, 255), 4.0),
        ))
    }

    #[test]
    fn test_remove_detaches_layers() {
        let mut tree = LayerTree::new();
        let mut registry = AnnotationRegistry::new();
        let layer = attach_layer(&mut tree);
        let id = registry.insert(Annotation::single(layer));

        assert!(registry.remove_detached(id, &mut tree));
        assert!(registry.is_empty());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_double_remove_is_noop() {
        let mut tree = LayerTree::new();
        let mut registry = AnnotationRegistry::new();
        let layer = attach_layer(&mut tree);
        let id = registry.insert(Annotation::single(layer));

        assert!(registry.remove_detached(id, &mut tree));
        assert!(!registry.remove_detached(id, &mut tree));
        assert!(registry.is_empty());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_remove_unknown_id_preserves_state() {
        let mut tree = LayerTree::new();
        let mut registry = AnnotationRegistry::new();
        let layer = attach_layer(&mut tree);
        registry.insert(Annotation::single(layer));

        assert!(!registry.remove_detached(Uuid::new_v4(), &mut tree));
        assert_eq!(registry.len(), 1);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_clear_detaches_everything() {
        let mut tree = LayerTree::new();
        let mut registry = AnnotationRegistry::new();
        for _ in 0..3 {
            let layer = attach_layer(&mut tree);
            registry.insert(Annotation::single(layer));
        }

        registry.clear_detached(&mut tree);
        assert!(registry.is_empty());
        assert!(tree.is_empty());
    }
}
