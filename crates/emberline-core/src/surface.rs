//! The annotation surface: pointer state machine, clear command, frame tick.

use crate::annotation::{Annotation, AnnotationId, AnnotationRegistry};
use crate::config::SurfaceConfig;
use crate::fade::FadeScheduler;
use crate::input::{MouseButton, PointerEvent};
use crate::layer::{InkStyle, LayerTree};
use crate::stroke::Stroke;
use kurbo::Point;
use std::time::Instant;

/// The gesture currently being drawn.
#[derive(Debug, Clone)]
struct ActiveGesture {
    id: AnnotationId,
    stroke: Stroke,
}

/// An ink annotation surface.
///
/// Owns the layer tree, the annotation registry, the fade scheduler, and the
/// pointer state machine (idle, or drawing one stroke). All mutation happens
/// on the host's event thread; the fade scheduler's continuations run from
/// [`Surface::tick`], on that same thread.
#[derive(Debug, Clone)]
pub struct Surface {
    config: SurfaceConfig,
    tree: LayerTree,
    registry: AnnotationRegistry,
    scheduler: FadeScheduler,
    gesture: Option<ActiveGesture>,
}

impl Surface {
    pub fn new(config: SurfaceConfig) -> Self {
        Self {
            config,
            tree: LayerTree::new(),
            registry: AnnotationRegistry::new(),
            scheduler: FadeScheduler::new(config.fade_duration, config.ease),
            gesture: None,
        }
    }

    /// Route a pointer event. Only the primary button draws.
    pub fn handle_pointer(&mut self, event: &PointerEvent, now: Instant) {
        match *event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => self.pointer_down(position, now),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up {
                position,
                button: MouseButton::Left,
            } => self.pointer_up(position, now),
            _ => {}
        }
    }

    /// Open a new stroke and register its annotation.
    ///
    /// An unfinished gesture (multi-touch or pen-plus-mouse race) is finished
    /// first, exactly as a release at its last point would finish it, so no
    /// annotation is ever leaked without a scheduled removal.
    pub fn pointer_down(&mut self, position: Point, now: Instant) {
        if self.gesture.is_some() {
            log::debug!("pointer-down while drawing; closing previous gesture");
            self.finish_gesture(now);
        }
        let style = InkStyle::new(self.config.ink_color, self.config.stroke_radius);
        let stroke = Stroke::start(&mut self.tree, position, style);
        let id = self.registry.insert(Annotation::single(stroke.layer()));
        self.gesture = Some(ActiveGesture { id, stroke });
    }

    /// Extend the current stroke. A move while idle, or after the current
    /// annotation was removed out from under the gesture, is a no-op.
    pub fn pointer_move(&mut self, position: Point) {
        let Some(gesture) = &mut self.gesture else {
            return;
        };
        if !self.registry.contains(gesture.id) {
            return;
        }
        gesture.stroke.extend(&mut self.tree, position);
    }

    /// Close the gesture: extend to the release point, then schedule the
    /// annotation's fade-out.
    pub fn pointer_up(&mut self, position: Point, now: Instant) {
        if let Some(gesture) = &mut self.gesture {
            if self.registry.contains(gesture.id) {
                gesture.stroke.extend(&mut self.tree, position);
            }
        }
        self.finish_gesture(now);
    }

    fn finish_gesture(&mut self, now: Instant) {
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        self.scheduler
            .schedule(gesture.id, now + self.config.fade_delay);
    }

    /// Detach every annotation's visuals and empty the registry. Valid from
    /// any state. Scheduled fade tasks are not cancelled; they find their
    /// ids gone and drop themselves on the next tick.
    pub fn clear(&mut self) {
        log::debug!("clearing {} annotations", self.registry.len());
        self.registry.clear_detached(&mut self.tree);
        self.gesture = None;
    }

    /// Advance fade animations to `now`.
    pub fn tick(&mut self, now: Instant) {
        self.scheduler
            .tick(now, &mut self.registry, &mut self.tree);
    }

    /// Whether a gesture is in progress.
    pub fn is_drawing(&self) -> bool {
        self.gesture.is_some()
    }

    /// Whether any fade-out transition is currently running.
    pub fn is_animating(&self) -> bool {
        self.scheduler.is_animating()
    }

    /// Earliest instant a pending fade-out becomes due.
    pub fn next_due(&self) -> Option<Instant> {
        self.scheduler.next_due()
    }

    /// The layer tree the renderer walks.
    pub fn layers(&self) -> &LayerTree {
        &self.tree
    }

    pub fn annotations(&self) -> &AnnotationRegistry {
        &self.registry
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn surface() -> Surface {
        Surface::new(SurfaceConfig::default())
    }

    #[test]
    fn test_press_drag_release_lifecycle() {
        let mut s = surface();
        let t0 = Instant::now();

        s.pointer_down(Point::new(100.0, 100.0), t0);
        assert!(s.is_drawing());
        assert_eq!(s.annotations().len(), 1);
        assert_eq!(s.layers().len(), 1);

        s.pointer_move(Point::new(110.0, 90.0));
        s.pointer_up(Point::new(120.0, 95.0), t0);
        assert!(!s.is_drawing());
        // Annotation stays visible until the scheduled fade-out completes.
        assert_eq!(s.annotations().len(), 1);
        assert_eq!(s.next_due(), Some(t0 + s.config().fade_delay));

        let layer = s.layers().iter().next().unwrap();
        assert_eq!(layer.points.len(), 3);
    }

    #[test]
    fn test_full_fade_removes_annotation() {
        let mut s = surface();
        let t0 = Instant::now();

        s.pointer_down(Point::new(0.0, 0.0), t0);
        s.pointer_move(Point::new(50.0, 0.0));
        s.pointer_up(Point::new(50.0, 50.0), t0);

        let end = t0 + s.config().fade_delay + s.config().fade_duration + Duration::from_millis(1);
        s.tick(end);
        assert!(s.annotations().is_empty());
        assert!(s.layers().is_empty());
    }

    #[test]
    fn test_move_while_idle_is_noop() {
        let mut s = surface();
        s.pointer_move(Point::new(10.0, 10.0));
        assert!(s.layers().is_empty());
        assert!(s.annotations().is_empty());
    }

    #[test]
    fn test_pointer_down_while_drawing_closes_previous() {
        let mut s = surface();
        let t0 = Instant::now();

        s.pointer_down(Point::new(0.0, 0.0), t0);
        s.pointer_move(Point::new(20.0, 20.0));
        // Second press without a release: the first gesture must be closed
        // and scheduled, not leaked.
        s.pointer_down(Point::new(100.0, 100.0), t0);

        assert!(s.is_drawing());
        assert_eq!(s.annotations().len(), 2);
        assert_eq!(s.next_due(), Some(t0 + s.config().fade_delay));
    }

    #[test]
    fn test_clear_mid_drag() {
        let mut s = surface();
        let t0 = Instant::now();

        s.pointer_down(Point::new(0.0, 0.0), t0);
        s.pointer_move(Point::new(30.0, 30.0));
        s.clear();

        assert!(!s.is_drawing());
        assert!(s.annotations().is_empty());
        assert!(s.layers().is_empty());

        // The gesture is gone; further moves and the release are no-ops.
        s.pointer_move(Point::new(60.0, 60.0));
        s.pointer_up(Point::new(60.0, 60.0), t0);
        assert!(s.layers().is_empty());
    }

    #[test]
    fn test_fade_callback_after_clear_is_noop() {
        let mut s = surface();
        let t0 = Instant::now();

        s.pointer_down(Point::new(0.0, 0.0), t0);
        s.pointer_up(Point::new(10.0, 10.0), t0);
        s.clear();

        // The scheduled task fires long after the clear and must not fault
        // or resurrect anything.
        s.tick(t0 + Duration::from_secs(60));
        assert!(s.annotations().is_empty());
        assert!(s.layers().is_empty());
        assert!(!s.is_animating());
    }

    #[test]
    fn test_clear_while_fading() {
        let mut s = surface();
        let t0 = Instant::now();

        s.pointer_down(Point::new(0.0, 0.0), t0);
        s.pointer_up(Point::new(10.0, 10.0), t0);

        // Mid-transition clear, then the next tick drops the task.
        let mid = t0 + s.config().fade_delay + s.config().fade_duration / 2;
        s.tick(mid);
        assert!(s.is_animating());
        s.clear();
        s.tick(mid + Duration::from_millis(100));
        assert!(!s.is_animating());
        assert!(s.layers().is_empty());
    }

    #[test]
    fn test_secondary_button_does_not_draw() {
        let mut s = surface();
        let now = Instant::now();
        let event = PointerEvent::Down {
            position: Point::new(5.0, 5.0),
            button: MouseButton::Right,
        };
        s.handle_pointer(&event, now);
        assert!(!s.is_drawing());
        assert!(s.layers().is_empty());
    }
}
