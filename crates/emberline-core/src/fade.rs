//! Delayed fade-out of completed annotations.

use crate::annotation::{AnnotationId, AnnotationRegistry};
use crate::layer::LayerTree;
use std::time::{Duration, Instant};

/// Easing functions used to map normalized animation progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    /// Linear interpolation.
    Linear,
    /// Quadratic ease-in.
    #[default]
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Cubic ease-in.
    InCubic,
}

impl Ease {
    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InCubic => t * t * t,
        }
    }
}

/// One pending removal.
#[derive(Debug, Clone, Copy)]
struct FadeTask {
    id: AnnotationId,
    due: Instant,
    /// Set once the reveal transition has begun. Anchored to `due`, so a
    /// late first tick does not stretch the animation.
    started: Option<Instant>,
}

/// Schedules the animated removal of completed annotations.
///
/// Tasks are fire-and-forget: there is no cancel API. Once a task's delay
/// elapses, every layer of the annotation runs a reveal transition down to
/// zero; on completion the layers are detached and the registry entry is
/// removed. A task whose annotation is already gone (an explicit clear,
/// typically) drops itself on the next tick without touching anything.
#[derive(Debug, Clone, Default)]
pub struct FadeScheduler {
    tasks: Vec<FadeTask>,
    duration: Duration,
    ease: Ease,
}

impl FadeScheduler {
    pub fn new(duration: Duration, ease: Ease) -> Self {
        Self {
            tasks: Vec::new(),
            duration,
            ease,
        }
    }

    /// Arrange for annotation `id` to fade out once `due` passes.
    pub fn schedule(&mut self, id: AnnotationId, due: Instant) {
        log::debug!("fade-out scheduled for annotation {id}");
        self.tasks.push(FadeTask {
            id,
            due,
            started: None,
        });
    }

    /// Advance every task to `now`.
    ///
    /// Tolerates running arbitrarily late and after arbitrary intervening
    /// clears; every registry lookup is a lookup-or-drop, never an unchecked
    /// access.
    pub fn tick(&mut self, now: Instant, registry: &mut AnnotationRegistry, tree: &mut LayerTree) {
        let duration = self.duration;
        let ease = self.ease;
        self.tasks.retain_mut(|task| {
            // Liveness re-check: the annotation may be long gone by the time
            // the task fires.
            if !registry.contains(task.id) {
                return false;
            }
            if now < task.due {
                return true;
            }
            let started = *task.started.get_or_insert(task.due);
            let progress = if duration.is_zero() {
                1.0
            } else {
                now.duration_since(started).as_secs_f64() / duration.as_secs_f64()
            };
            if progress >= 1.0 {
                registry.remove_detached(task.id, tree);
                log::debug!("annotation {} faded out", task.id);
                return false;
            }
            let reveal = 1.0 - ease.apply(progress);
            if let Some(annotation) = registry.get(task.id) {
                for &layer in &annotation.layers {
                    if let Some(layer) = tree.get_mut(layer) {
                        layer.reveal = reveal;
                    }
                }
            }
            true
        });
    }

    /// Whether any reveal transition is currently running.
    pub fn is_animating(&self) -> bool {
        self.tasks.iter().any(|t| t.started.is_some())
    }

    /// Earliest instant at which a waiting task becomes due.
    pub fn next_due(&self) -> Option<Instant> {
        self.tasks
            .iter()
            .filter(|t| t.started.is_none())
            .map(|t| t.due)
            .min()
    }

    /// Number of pending tasks (waiting or animating).
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Annotation;
    use crate::layer::{InkLayer, InkStyle, LayerId};
    use kurbo::Rect;
    use peniko::Color;

    const FADE: Duration = Duration::from_millis(1500);

    fn setup() -> (LayerTree, AnnotationRegistry, FadeScheduler, AnnotationId, LayerId) {
        let mut tree = LayerTree::new();
        let layer = tree.attach(InkLayer::new(
            Rect::new(0.0, 0.0, 8.0, 8.0),
            InkStyle::new(Color::from_rgba8(255, 0, 0, 255), 4.0),
        ));
        let mut registry = AnnotationRegistry::new();
        let id = registry.insert(Annotation::single(layer));
        let scheduler = FadeScheduler::new(FADE, Ease::InQuad);
        (tree, registry, scheduler, id, layer)
    }

    #[test]
    fn test_ease_endpoints() {
        for ease in [Ease::Linear, Ease::InQuad, Ease::OutQuad, Ease::InCubic] {
            assert_eq!(ease.apply(0.0), 0.0);
            assert_eq!(ease.apply(1.0), 1.0);
        }
        // Ease-in starts slower than linear.
        assert!(Ease::InQuad.apply(0.25) < 0.25);
        assert!(Ease::InCubic.apply(0.25) < Ease::InQuad.apply(0.25));
    }

    #[test]
    fn test_nothing_happens_before_due() {
        let (mut tree, mut registry, mut scheduler, id, layer) = setup();
        let t0 = Instant::now();
        scheduler.schedule(id, t0 + Duration::from_secs(4));

        scheduler.tick(t0 + Duration::from_secs(3), &mut registry, &mut tree);
        assert!(registry.contains(id));
        assert_eq!(tree.get(layer).unwrap().reveal, 1.0);
        assert!(!scheduler.is_animating());
    }

    #[test]
    fn test_reveal_ramps_down_after_due() {
        let (mut tree, mut registry, mut scheduler, id, layer) = setup();
        let t0 = Instant::now();
        scheduler.schedule(id, t0);

        // Halfway through the transition: ease-in keeps the reveal above
        // the linear value.
        scheduler.tick(t0 + FADE / 2, &mut registry, &mut tree);
        assert!(scheduler.is_animating());
        let reveal = tree.get(layer).unwrap().reveal;
        assert!(reveal < 1.0 && reveal > 0.5);
        assert!((reveal - (1.0 - 0.25)).abs() < 1e-9);
    }

    #[test]
    fn test_completion_detaches_and_removes() {
        let (mut tree, mut registry, mut scheduler, id, _layer) = setup();
        let t0 = Instant::now();
        scheduler.schedule(id, t0);

        scheduler.tick(t0 + FADE + Duration::from_millis(1), &mut registry, &mut tree);
        assert!(!registry.contains(id));
        assert!(tree.is_empty());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_late_tick_after_clear_is_noop() {
        let (mut tree, mut registry, mut scheduler, id, _layer) = setup();
        let t0 = Instant::now();
        scheduler.schedule(id, t0 + Duration::from_secs(4));

        registry.clear_detached(&mut tree);

        // Fires long after the clear; must detect the missing entry and
        // drop itself.
        scheduler.tick(t0 + Duration::from_secs(60), &mut registry, &mut tree);
        assert!(registry.is_empty());
        assert!(tree.is_empty());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_late_first_tick_anchors_to_due() {
        let (mut tree, mut registry, mut scheduler, id, _layer) = setup();
        let t0 = Instant::now();
        scheduler.schedule(id, t0);

        // The first tick arrives after the whole transition window; the
        // animation is anchored at `due`, so it completes immediately.
        scheduler.tick(t0 + FADE * 3, &mut registry, &mut tree);
        assert!(registry.is_empty());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_next_due_is_earliest_waiting_task() {
        let (mut tree, mut registry, mut scheduler, id, _layer) = setup();
        let other_layer = tree.attach(InkLayer::new(
            Rect::new(0.0, 0.0, 8.0, 8.0),
            InkStyle::new(Color::from_rgba8(255, 0, 0, 255), 4.0),
        ));
        let other = registry.insert(Annotation::single(other_layer));

        let t0 = Instant::now();
        scheduler.schedule(id, t0 + Duration::from_secs(4));
        scheduler.schedule(other, t0 + Duration::from_secs(2));
        assert_eq!(scheduler.next_due(), Some(t0 + Duration::from_secs(2)));
    }
}
