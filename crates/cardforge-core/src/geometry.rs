//! Geometry kernel for free-form card elements.
//!
//! Elements are stored as an unrotated box (top-left + size) plus a rotation
//! in degrees about the box center. Everything here is pure math over kurbo
//! types so it can be tested without an editor.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest width or height an element may be resized to.
pub const MIN_ELEMENT_SIZE: f64 = 10.0;

/// Convert degrees to radians.
pub fn to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Rotate a vector by `radians` (counter-clockwise in a y-up frame, clockwise on screen).
pub fn rotate_vector(v: Vec2, radians: f64) -> Vec2 {
    let (sin, cos) = radians.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// An unrotated element box in card-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Top-left corner before rotation.
    pub origin: Point,
    /// Box size.
    pub size: Size,
}

impl Frame {
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Geometric center; the pivot for rotation.
    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// The box as an axis-aligned rect (ignores rotation).
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.size)
    }
}

/// Map a point from the element's local frame (origin at the unrotated top-left)
/// into card space.
pub fn local_to_global(local: Point, frame: Frame, rotation_deg: f64) -> Point {
    let half = Vec2::new(frame.size.width / 2.0, frame.size.height / 2.0);
    let offset = local.to_vec2() - half;
    frame.center() + rotate_vector(offset, to_radians(rotation_deg))
}

/// Map a card-space point into the element's local, unrotated frame.
pub fn global_to_local(global: Point, frame: Frame, rotation_deg: f64) -> Point {
    let offset = rotate_vector(global - frame.center(), -to_radians(rotation_deg));
    Point::new(
        offset.x + frame.size.width / 2.0,
        offset.y + frame.size.height / 2.0,
    )
}

/// Check whether a card-space point falls inside a rotated frame.
pub fn contains_rotated(frame: Frame, rotation_deg: f64, point: Point, tolerance: f64) -> bool {
    let local = global_to_local(point, frame, rotation_deg);
    local.x >= -tolerance
        && local.y >= -tolerance
        && local.x <= frame.size.width + tolerance
        && local.y <= frame.size.height + tolerance
}

/// The eight resize handles around a selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NW,
        ResizeHandle::N,
        ResizeHandle::NE,
        ResizeHandle::E,
        ResizeHandle::SE,
        ResizeHandle::S,
        ResizeHandle::SW,
        ResizeHandle::W,
    ];

    /// Direction of growth along each local axis: -1, 0 or 1.
    pub fn signs(self) -> (f64, f64) {
        match self {
            ResizeHandle::N => (0.0, -1.0),
            ResizeHandle::S => (0.0, 1.0),
            ResizeHandle::E => (1.0, 0.0),
            ResizeHandle::W => (-1.0, 0.0),
            ResizeHandle::NE => (1.0, -1.0),
            ResizeHandle::NW => (-1.0, -1.0),
            ResizeHandle::SE => (1.0, 1.0),
            ResizeHandle::SW => (-1.0, 1.0),
        }
    }

    /// The handle on the other side of the box; it stays fixed while this one moves.
    pub fn opposite(self) -> Self {
        match self {
            ResizeHandle::N => ResizeHandle::S,
            ResizeHandle::S => ResizeHandle::N,
            ResizeHandle::E => ResizeHandle::W,
            ResizeHandle::W => ResizeHandle::E,
            ResizeHandle::NE => ResizeHandle::SW,
            ResizeHandle::NW => ResizeHandle::SE,
            ResizeHandle::SE => ResizeHandle::NW,
            ResizeHandle::SW => ResizeHandle::NE,
        }
    }

    /// Position of the handle in the element's local frame.
    pub fn local_position(self, size: Size) -> Point {
        let (sx, sy) = self.signs();
        Point::new(
            (sx + 1.0) / 2.0 * size.width,
            (sy + 1.0) / 2.0 * size.height,
        )
    }

    /// Position of the handle in card space.
    pub fn position(self, frame: Frame, rotation_deg: f64) -> Point {
        local_to_global(self.local_position(frame.size), frame, rotation_deg)
    }

    /// CSS cursor name shown while hovering the handle.
    pub fn cursor(self) -> &'static str {
        match self {
            ResizeHandle::N | ResizeHandle::S => "ns-resize",
            ResizeHandle::E | ResizeHandle::W => "ew-resize",
            ResizeHandle::NE | ResizeHandle::SW => "nesw-resize",
            ResizeHandle::NW | ResizeHandle::SE => "nwse-resize",
        }
    }
}

/// Card-space position of the edge midpoint or corner that stays fixed when `handle` is dragged.
pub fn anchor_point(handle: ResizeHandle, frame: Frame, rotation_deg: f64) -> Point {
    handle.opposite().position(frame, rotation_deg)
}

/// Result of an anchored resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSolution {
    pub size: Size,
    /// New unrotated top-left.
    pub position: Point,
}

impl ResizeSolution {
    pub fn frame(&self) -> Frame {
        Frame::new(self.position, self.size)
    }
}

/// Resize a rotated box by dragging `handle` by `pointer_delta` (card space),
/// keeping the opposite edge or corner fixed in card space.
pub fn solve_anchored_resize(
    handle: ResizeHandle,
    rotation_deg: f64,
    origin_size: Size,
    origin_pos: Point,
    pointer_delta: Vec2,
) -> ResizeSolution {
    let radians = to_radians(rotation_deg);
    let local_delta = rotate_vector(pointer_delta, -radians);
    let (sx, sy) = handle.signs();

    let width = (origin_size.width + sx * local_delta.x).max(MIN_ELEMENT_SIZE);
    let height = (origin_size.height + sy * local_delta.y).max(MIN_ELEMENT_SIZE);

    // Anchor offsets are measured from the center, on the side opposite the handle.
    let origin_center = Frame::new(origin_pos, origin_size).center();
    let old_anchor_offset =
        Vec2::new(-sx * origin_size.width / 2.0, -sy * origin_size.height / 2.0);
    let anchor = origin_center + rotate_vector(old_anchor_offset, radians);

    let new_anchor_offset = Vec2::new(-sx * width / 2.0, -sy * height / 2.0);
    let center = anchor - rotate_vector(new_anchor_offset, radians);

    ResizeSolution {
        size: Size::new(width, height),
        position: Point::new(center.x - width / 2.0, center.y - height / 2.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point, eps: f64) -> bool {
        (a.x - b.x).abs() < eps && (a.y - b.y).abs() < eps
    }

    #[test]
    fn test_rotate_vector_quarter_turn() {
        let v = rotate_vector(Vec2::new(1.0, 0.0), std::f64::consts::FRAC_PI_2);
        assert!(v.x.abs() < 1e-12);
        assert!((v.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_local_global_roundtrip() {
        let frame = Frame::new(Point::new(40.0, 60.0), Size::new(120.0, 80.0));
        let local = Point::new(10.0, 70.0);
        for rotation in [0.0, 15.0, 45.0, 90.0, 200.0] {
            let global = local_to_global(local, frame, rotation);
            let back = global_to_local(global, frame, rotation);
            assert!(close(local, back, 1e-9), "rotation {rotation}");
        }
    }

    #[test]
    fn test_anchor_preserved_for_all_handles() {
        let origin_size = Size::new(120.0, 60.0);
        let origin_pos = Point::new(50.0, 80.0);
        let deltas = [
            Vec2::new(17.0, -9.0),
            Vec2::new(-30.0, 25.0),
            Vec2::new(4.5, 4.5),
        ];
        for rotation in [0.0, 15.0, 45.0, 90.0] {
            let eps = if rotation == 0.0 { 1e-6 } else { 1e-4 };
            for handle in ResizeHandle::ALL {
                for delta in deltas {
                    let origin = Frame::new(origin_pos, origin_size);
                    let before = anchor_point(handle, origin, rotation);
                    let solved =
                        solve_anchored_resize(handle, rotation, origin_size, origin_pos, delta);
                    let after = anchor_point(handle, solved.frame(), rotation);
                    assert!(
                        close(before, after, eps),
                        "handle {handle:?} rotation {rotation} delta {delta:?}: {before:?} != {after:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_se_resize_keeps_top_left() {
        let solved = solve_anchored_resize(
            ResizeHandle::SE,
            0.0,
            Size::new(200.0, 40.0),
            Point::new(70.0, 50.0),
            Vec2::new(20.0, 10.0),
        );
        assert_eq!(solved.size, Size::new(220.0, 50.0));
        assert!(close(solved.position, Point::new(70.0, 50.0), 1e-9));
    }

    #[test]
    fn test_west_handle_moves_left_edge() {
        let solved = solve_anchored_resize(
            ResizeHandle::W,
            0.0,
            Size::new(100.0, 50.0),
            Point::new(10.0, 10.0),
            Vec2::new(-20.0, 33.0),
        );
        assert_eq!(solved.size, Size::new(120.0, 50.0));
        assert!(close(solved.position, Point::new(-10.0, 10.0), 1e-9));
    }

    #[test]
    fn test_rotated_east_handle_uses_local_axis() {
        // At 90 degrees the local x axis points down the screen.
        let solved = solve_anchored_resize(
            ResizeHandle::E,
            90.0,
            Size::new(100.0, 50.0),
            Point::new(0.0, 0.0),
            Vec2::new(0.0, 20.0),
        );
        assert!((solved.size.width - 120.0).abs() < 1e-9);
        assert!((solved.size.height - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_minimum_size_clamp() {
        for handle in ResizeHandle::ALL {
            let solved = solve_anchored_resize(
                handle,
                0.0,
                Size::new(40.0, 40.0),
                Point::new(0.0, 0.0),
                Vec2::new(-500.0 * handle.signs().0, -500.0 * handle.signs().1),
            );
            assert!(solved.size.width >= MIN_ELEMENT_SIZE);
            assert!(solved.size.height >= MIN_ELEMENT_SIZE);
        }

        let solved = solve_anchored_resize(
            ResizeHandle::SE,
            30.0,
            Size::new(40.0, 40.0),
            Point::new(0.0, 0.0),
            Vec2::new(-900.0, -900.0),
        );
        assert_eq!(solved.size, Size::new(MIN_ELEMENT_SIZE, MIN_ELEMENT_SIZE));
    }

    #[test]
    fn test_contains_rotated() {
        let frame = Frame::new(Point::new(0.0, 0.0), Size::new(100.0, 10.0));
        // Unrotated, a point well below the thin bar misses.
        assert!(!contains_rotated(frame, 0.0, Point::new(50.0, 40.0), 0.0));
        // Rotated a quarter turn, the bar stands upright through its center.
        assert!(contains_rotated(frame, 90.0, Point::new(50.0, 40.0), 0.0));
        assert!(!contains_rotated(frame, 90.0, Point::new(90.0, 5.0), 0.0));
    }

    #[test]
    fn test_handle_positions() {
        let frame = Frame::new(Point::new(10.0, 20.0), Size::new(100.0, 50.0));
        assert!(close(ResizeHandle::NW.position(frame, 0.0), Point::new(10.0, 20.0), 1e-9));
        assert!(close(ResizeHandle::SE.position(frame, 0.0), Point::new(110.0, 70.0), 1e-9));
        assert!(close(ResizeHandle::E.position(frame, 0.0), Point::new(110.0, 45.0), 1e-9));
        assert_eq!(ResizeHandle::NE.opposite(), ResizeHandle::SW);
    }
}
