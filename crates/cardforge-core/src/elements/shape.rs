//! Vector shape layers.

use kurbo::{BezPath, Ellipse, Point, Rect, Shape as KurboShape, Size};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// Fill seeded into new shapes.
pub const DEFAULT_FILL_COLOR: &str = "#e3f2fd";
/// Stroke seeded into new shapes.
pub const DEFAULT_STROKE_COLOR: &str = "#1e88e5";

const STAR_POINTS: usize = 5;
const STAR_INNER_RATIO: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    Rectangle,
    Circle,
    Star,
    Line,
}

impl ShapeType {
    pub fn default_size(self) -> Size {
        match self {
            ShapeType::Line => Size::new(50.0, 2.0),
            _ => Size::new(50.0, 50.0),
        }
    }

    /// Outline in the shape's own unrotated box, origin at the top-left.
    pub fn local_path(self, size: Size) -> BezPath {
        let rect = Rect::from_origin_size(Point::ZERO, size);
        match self {
            ShapeType::Rectangle | ShapeType::Line => rect.to_path(0.1),
            ShapeType::Circle => Ellipse::from_rect(rect).to_path(0.1),
            ShapeType::Star => star_path(rect),
        }
    }
}

fn star_path(rect: Rect) -> BezPath {
    let center = rect.center();
    let (rx, ry) = (rect.width() / 2.0, rect.height() / 2.0);
    let mut path = BezPath::new();
    for i in 0..STAR_POINTS * 2 {
        let radius = if i % 2 == 0 { 1.0 } else { STAR_INNER_RATIO };
        // Start at the top and walk clockwise.
        let angle = -FRAC_PI_2 + i as f64 * PI / STAR_POINTS as f64;
        let p = Point::new(
            center.x + rx * radius * angle.cos(),
            center.y + ry * radius * angle.sin(),
        );
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path.close_path();
    path
}

/// Payload of a shape element. Stroke lives in the element's text style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeLayer {
    pub shape_type: ShapeType,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub flip_x: bool,
    #[serde(default)]
    pub flip_y: bool,
    pub fill_color: String,
}

impl ShapeLayer {
    pub fn new(shape_type: ShapeType) -> Self {
        let size = shape_type.default_size();
        let fill_color = match shape_type {
            ShapeType::Line => DEFAULT_STROKE_COLOR,
            _ => DEFAULT_FILL_COLOR,
        };
        Self {
            shape_type,
            width: size.width,
            height: size.height,
            rotation: 0.0,
            flip_x: false,
            flip_y: false,
            fill_color: fill_color.to_string(),
        }
    }

    pub fn path(&self) -> BezPath {
        self.shape_type.local_path(Size::new(self.width, self.height))
    }
}
