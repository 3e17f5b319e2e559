//! Custom card elements: freely positioned text, image and shape layers.

mod image;
mod shape;
mod text;

pub use image::{DEFAULT_IMAGE_WIDTH, ImageFormat, ImageLayer, decode_data_url, encode_data_url};
pub use shape::{DEFAULT_FILL_COLOR, DEFAULT_STROKE_COLOR, ShapeLayer, ShapeType};
pub use text::{GLYPH_WIDTH_FACTOR, TextLayer, layout_lines, measure_text};

use crate::geometry::{Frame, MIN_ELEMENT_SIZE, contains_rotated};
use crate::style::TextStyle;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Step applied by bring-forward / send-backward.
pub const Z_INDEX_STEP: i32 = 5;
/// Lowest and highest z-index reachable through reordering.
pub const Z_INDEX_RANGE: (i32, i32) = (0, 100);

/// Card face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Front,
    Back,
}

impl Side {
    pub fn name(self) -> &'static str {
        match self {
            Side::Front => "front",
            Side::Back => "back",
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Side::Front => Side::Back,
            Side::Back => Side::Front,
        }
    }
}

/// Element type discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Text,
    Image,
    Shape,
}

impl ElementType {
    /// Paint order a freshly added element of this type starts at.
    pub fn default_z_index(self) -> i32 {
        match self {
            ElementType::Text => 30,
            ElementType::Image => 20,
            ElementType::Shape => 10,
        }
    }
}

/// Reorder direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZOrderDirection {
    Forward,
    Backward,
}

/// Per-type payload. The `type` tag is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Text(TextLayer),
    Image(ImageLayer),
    Shape(ShapeLayer),
}

/// A user-created card layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub(crate) id: ElementId,
    /// Missing means front.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    /// Unrotated top-left in card-local design units.
    pub x: f64,
    pub y: f64,
    pub z_index: i32,
    #[serde(flatten)]
    pub style: TextStyle,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    fn with_kind(kind: ElementKind, position: Point) -> Self {
        let z_index = match &kind {
            ElementKind::Text(_) => ElementType::Text.default_z_index(),
            ElementKind::Image(_) => ElementType::Image.default_z_index(),
            ElementKind::Shape(_) => ElementType::Shape.default_z_index(),
        };
        Self {
            id: Uuid::new_v4(),
            side: None,
            x: position.x,
            y: position.y,
            z_index,
            style: TextStyle::default(),
            kind,
        }
    }

    /// A text element with automatic width and full opacity.
    pub fn text(content: impl Into<String>, position: Point) -> Self {
        let mut element = Self::with_kind(ElementKind::Text(TextLayer::new(content)), position);
        element.style.opacity = Some(100.0);
        element
    }

    /// An image element sized from the asset's intrinsic pixel dimensions.
    pub fn image(src: impl Into<String>, intrinsic: (u32, u32), position: Point) -> Self {
        Self::with_kind(ElementKind::Image(ImageLayer::new(src, intrinsic)), position)
    }

    /// A shape element with seeded colors.
    pub fn shape(shape_type: ShapeType, position: Point) -> Self {
        let kind = ElementKind::Shape(ShapeLayer::new(shape_type));
        let mut element = Self::with_kind(kind, position);
        element.style.stroke_color = Some(DEFAULT_STROKE_COLOR.to_string());
        element.style.stroke_width = Some(if shape_type == ShapeType::Line { 0.0 } else { 1.0 });
        element
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn element_type(&self) -> ElementType {
        match self.kind {
            ElementKind::Text(_) => ElementType::Text,
            ElementKind::Image(_) => ElementType::Image,
            ElementKind::Shape(_) => ElementType::Shape,
        }
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style.merge(&style);
        self
    }

    /// Effective side; elements without one live on the front.
    pub fn side(&self) -> Side {
        self.side.unwrap_or_default()
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Rotation in degrees. Text elements are never rotated.
    pub fn rotation(&self) -> f64 {
        match &self.kind {
            ElementKind::Text(_) => 0.0,
            ElementKind::Image(image) => image.rotation,
            ElementKind::Shape(shape) => shape.rotation,
        }
    }

    /// Horizontal and vertical mirroring.
    pub fn flip(&self) -> (bool, bool) {
        match &self.kind {
            ElementKind::Text(_) => (false, false),
            ElementKind::Image(image) => (image.flip_x, image.flip_y),
            ElementKind::Shape(shape) => (shape.flip_x, shape.flip_y),
        }
    }

    /// Box size; auto-sized text is measured from its content.
    pub fn size(&self) -> Size {
        match &self.kind {
            ElementKind::Text(text) => text.resolved_size(&self.style),
            ElementKind::Image(image) => Size::new(image.width, image.height),
            ElementKind::Shape(shape) => Size::new(shape.width, shape.height),
        }
    }

    pub fn frame(&self) -> Frame {
        Frame::new(self.position(), self.size())
    }

    /// Rotation-aware hit test in card-local space.
    pub fn contains(&self, point: Point, tolerance: f64) -> bool {
        contains_rotated(self.frame(), self.rotation(), point, tolerance)
    }

    pub fn as_text(&self) -> Option<&TextLayer> {
        match &self.kind {
            ElementKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageLayer> {
        match &self.kind {
            ElementKind::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<&ShapeLayer> {
        match &self.kind {
            ElementKind::Shape(shape) => Some(shape),
            _ => None,
        }
    }

    /// Set position and size together. Dimensions are floored at the minimum size.
    pub fn set_frame(&mut self, position: Point, size: Size) {
        let width = size.width.max(MIN_ELEMENT_SIZE);
        let height = size.height.max(MIN_ELEMENT_SIZE);
        self.x = position.x;
        self.y = position.y;
        match &mut self.kind {
            ElementKind::Text(text) => {
                text.width = Some(width);
                text.height = Some(height);
            }
            ElementKind::Image(image) => {
                image.width = width;
                image.height = height;
            }
            ElementKind::Shape(shape) => {
                shape.width = width;
                shape.height = height;
            }
        }
    }

    /// Shift the z-index one step, staying inside [`Z_INDEX_RANGE`].
    pub fn reorder(&mut self, direction: ZOrderDirection) {
        let step = match direction {
            ZOrderDirection::Forward => Z_INDEX_STEP,
            ZOrderDirection::Backward => -Z_INDEX_STEP,
        };
        self.z_index = (self.z_index + step).clamp(Z_INDEX_RANGE.0, Z_INDEX_RANGE.1);
    }

    /// Merge a partial update. Fields that do not apply to this element's type are ignored.
    pub fn apply(&mut self, patch: &ElementPatch) {
        if let Some(side) = patch.side {
            self.side = Some(side);
        }
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(z_index) = patch.z_index {
            self.z_index = z_index;
        }
        self.style.merge(&patch.style);

        let width = patch.width.map(|w| w.max(MIN_ELEMENT_SIZE));
        let height = patch.height.map(|h| h.max(MIN_ELEMENT_SIZE));
        match &mut self.kind {
            ElementKind::Text(text) => {
                if let Some(content) = &patch.text {
                    text.text = content.clone();
                }
                if width.is_some() {
                    text.width = width;
                }
                if height.is_some() {
                    text.height = height;
                }
            }
            ElementKind::Image(image) => {
                if let Some(src) = &patch.src {
                    image.src = src.clone();
                }
                if let Some(ratio) = patch.aspect_ratio {
                    image.aspect_ratio = ratio;
                }
                image.width = width.unwrap_or(image.width);
                image.height = height.unwrap_or(image.height);
                image.rotation = patch.rotation.unwrap_or(image.rotation);
                image.flip_x = patch.flip_x.unwrap_or(image.flip_x);
                image.flip_y = patch.flip_y.unwrap_or(image.flip_y);
            }
            ElementKind::Shape(shape) => {
                if let Some(shape_type) = patch.shape_type {
                    shape.shape_type = shape_type;
                }
                if let Some(fill) = &patch.fill_color {
                    shape.fill_color = fill.clone();
                }
                shape.width = width.unwrap_or(shape.width);
                shape.height = height.unwrap_or(shape.height);
                shape.rotation = patch.rotation.unwrap_or(shape.rotation);
                shape.flip_x = patch.flip_x.unwrap_or(shape.flip_x);
                shape.flip_y = patch.flip_y.unwrap_or(shape.flip_y);
            }
        }
    }
}

/// A partial element update, as produced by the inspector panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub side: Option<Side>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z_index: Option<i32>,
    pub style: TextStyle,
    pub text: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub flip_x: Option<bool>,
    pub flip_y: Option<bool>,
    pub src: Option<String>,
    pub aspect_ratio: Option<f64>,
    pub shape_type: Option<ShapeType>,
    pub fill_color: Option<String>,
}

impl ElementPatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    pub fn rotation(degrees: f64) -> Self {
        Self {
            rotation: Some(degrees),
            ..Default::default()
        }
    }

    pub fn style(style: TextStyle) -> Self {
        Self {
            style,
            ..Default::default()
        }
    }
}
