//! Selection target and resize handles.

use crate::elements::{Element, ElementId};
use crate::geometry::ResizeHandle;
use crate::standard::StandardFieldKey;
use kurbo::Point;

/// Size of resize handles in card units.
pub const HANDLE_SIZE: f64 = 8.0;

/// The single selected object. Holding one variant excludes the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection {
    Standard(StandardFieldKey),
    Element(ElementId),
}

impl Selection {
    pub fn element(&self) -> Option<ElementId> {
        match self {
            Selection::Element(id) => Some(*id),
            Selection::Standard(_) => None,
        }
    }

    pub fn standard(&self) -> Option<StandardFieldKey> {
        match self {
            Selection::Standard(key) => Some(*key),
            Selection::Element(_) => None,
        }
    }
}

/// A resize handle placed on an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in card coordinates.
    pub position: Point,
    pub kind: ResizeHandle,
}

impl Handle {
    pub fn new(position: Point, kind: ResizeHandle) -> Self {
        Self { position, kind }
    }

    /// `tolerance` should already be divided by the camera zoom.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// The eight handles of `element`, following its rotation.
pub fn get_handles(element: &Element) -> Vec<Handle> {
    let frame = element.frame();
    let rotation = element.rotation();
    ResizeHandle::ALL
        .into_iter()
        .map(|kind| Handle::new(kind.position(frame, rotation), kind))
        .collect()
}

pub fn hit_test_handles(element: &Element, point: Point, tolerance: f64) -> Option<ResizeHandle> {
    get_handles(element)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementPatch, ShapeType};

    #[test]
    fn test_handles_follow_rotation() {
        let mut element = Element::shape(ShapeType::Rectangle, Point::new(100.0, 100.0));
        element.apply(&ElementPatch::size(100.0, 50.0));
        let handles = get_handles(&element);
        assert_eq!(handles.len(), 8);

        let se = hit_test_handles(&element, Point::new(200.0, 150.0), 2.0);
        assert_eq!(se, Some(ResizeHandle::SE));

        element.apply(&ElementPatch::rotation(90.0));
        // Rotated 90 degrees about (150, 125), the SE corner lands at (125, 175).
        let corner = hit_test_handles(&element, Point::new(125.0, 175.0), 2.0);
        assert_eq!(corner, Some(ResizeHandle::SE));
        assert_eq!(hit_test_handles(&element, Point::new(200.0, 150.0), 2.0), None);
    }

    #[test]
    fn test_selection_accessors() {
        let selection = Selection::Standard(StandardFieldKey::Grade);
        assert_eq!(selection.standard(), Some(StandardFieldKey::Grade));
        assert_eq!(selection.element(), None);
    }
}
