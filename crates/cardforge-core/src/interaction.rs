//! Transient direct-manipulation state.

use crate::camera::Camera;
use crate::elements::ElementId;
use crate::geometry::{ResizeHandle, solve_anchored_resize};
use kurbo::{Point, Size};

/// The active pointer gesture. Never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging {
        element: ElementId,
        /// Screen position of the pointer-down.
        origin_pointer: Point,
        origin_pos: Point,
    },
    Resizing {
        element: ElementId,
        handle: ResizeHandle,
        origin_pointer: Point,
        origin_size: Size,
        origin_pos: Point,
        rotation: f64,
    },
    EditingText {
        element: ElementId,
        /// Uncommitted text; written back on blur.
        draft: String,
    },
    DraggingInspector {
        origin_pointer: Point,
        origin_panel: Point,
    },
}

/// What a pointer move asks the editor to commit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureUpdate {
    Move {
        element: ElementId,
        position: Point,
    },
    Resize {
        element: ElementId,
        position: Point,
        size: Size,
    },
    Panel(Point),
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// Element being manipulated or edited.
    pub fn element(&self) -> Option<ElementId> {
        match self {
            Gesture::Dragging { element, .. }
            | Gesture::Resizing { element, .. }
            | Gesture::EditingText { element, .. } => Some(*element),
            Gesture::Idle | Gesture::DraggingInspector { .. } => None,
        }
    }

    pub fn editing(&self) -> Option<ElementId> {
        match self {
            Gesture::EditingText { element, .. } => Some(*element),
            _ => None,
        }
    }

    /// Whether pointer-up ends this gesture.
    pub fn ends_on_pointer_up(&self) -> bool {
        matches!(
            self,
            Gesture::Dragging { .. } | Gesture::Resizing { .. } | Gesture::DraggingInspector { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Dragging { .. } => "dragging",
            Gesture::Resizing { .. } => "resizing",
            Gesture::EditingText { .. } => "editing-text",
            Gesture::DraggingInspector { .. } => "dragging-inspector",
        }
    }

    /// Geometry for the pointer now at `pointer` (screen space).
    ///
    /// Element deltas are converted to card units through `camera`; the
    /// inspector follows the raw screen delta.
    pub fn track(&self, pointer: Point, camera: &Camera) -> Option<GestureUpdate> {
        match self {
            Gesture::Dragging { element, origin_pointer, origin_pos } => {
                let delta = camera.screen_delta_to_card(pointer - *origin_pointer);
                Some(GestureUpdate::Move {
                    element: *element,
                    position: *origin_pos + delta,
                })
            }
            Gesture::Resizing {
                element,
                handle,
                origin_pointer,
                origin_size,
                origin_pos,
                rotation,
            } => {
                let delta = camera.screen_delta_to_card(pointer - *origin_pointer);
                let solution =
                    solve_anchored_resize(*handle, *rotation, *origin_size, *origin_pos, delta);
                Some(GestureUpdate::Resize {
                    element: *element,
                    position: solution.position,
                    size: solution.size,
                })
            }
            Gesture::DraggingInspector { origin_pointer, origin_panel } => {
                Some(GestureUpdate::Panel(*origin_panel + (pointer - *origin_pointer)))
            }
            Gesture::Idle | Gesture::EditingText { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn zoomed(zoom: f64) -> Camera {
        let mut camera = Camera::default();
        camera.set_zoom(zoom);
        camera
    }

    #[test]
    fn test_drag_divides_by_zoom() {
        let id = Uuid::new_v4();
        let gesture = Gesture::Dragging {
            element: id,
            origin_pointer: Point::new(100.0, 100.0),
            origin_pos: Point::new(20.0, 20.0),
        };
        let update = gesture.track(Point::new(140.0, 120.0), &zoomed(2.0));
        assert_eq!(
            update,
            Some(GestureUpdate::Move {
                element: id,
                position: Point::new(40.0, 30.0)
            })
        );
    }

    #[test]
    fn test_resize_uses_solver() {
        let id = Uuid::new_v4();
        let gesture = Gesture::Resizing {
            element: id,
            handle: ResizeHandle::SE,
            origin_pointer: Point::new(0.0, 0.0),
            origin_size: Size::new(200.0, 40.0),
            origin_pos: Point::new(70.0, 50.0),
            rotation: 0.0,
        };
        match gesture.track(Point::new(20.0, 10.0), &Camera::default()) {
            Some(GestureUpdate::Resize { position, size, .. }) => {
                assert_eq!(size, Size::new(220.0, 50.0));
                assert!((position - Point::new(70.0, 50.0)).hypot() < 1e-9);
            }
            other => panic!("unexpected update {other:?}"),
        }
    }

    #[test]
    fn test_resize_divides_by_zoom() {
        let gesture = Gesture::Resizing {
            element: Uuid::new_v4(),
            handle: ResizeHandle::SE,
            origin_pointer: Point::new(0.0, 0.0),
            origin_size: Size::new(200.0, 40.0),
            origin_pos: Point::new(70.0, 50.0),
            rotation: 0.0,
        };
        match gesture.track(Point::new(40.0, 20.0), &zoomed(2.0)) {
            Some(GestureUpdate::Resize { size, .. }) => assert_eq!(size, Size::new(220.0, 50.0)),
            other => panic!("unexpected update {other:?}"),
        }
    }

    #[test]
    fn test_inspector_ignores_zoom() {
        let gesture = Gesture::DraggingInspector {
            origin_pointer: Point::new(10.0, 10.0),
            origin_panel: Point::new(24.0, 96.0),
        };
        assert_eq!(
            gesture.track(Point::new(30.0, 15.0), &zoomed(4.0)),
            Some(GestureUpdate::Panel(Point::new(44.0, 101.0)))
        );
    }

    #[test]
    fn test_idle_and_editing_do_not_track() {
        assert_eq!(Gesture::Idle.track(Point::ZERO, &Camera::default()), None);
        let editing = Gesture::EditingText {
            element: Uuid::new_v4(),
            draft: String::new(),
        };
        assert!(editing.editing().is_some());
        assert!(!editing.ends_on_pointer_up());
        assert_eq!(editing.track(Point::ZERO, &Camera::default()), None);
    }
}
