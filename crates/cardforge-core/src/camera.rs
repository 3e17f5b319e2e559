//! Screen placement and zoom of the card being edited.

use crate::config::EditorConfig;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Maps card-local design units onto screen pixels.
///
/// Pointer deltas measured on screen are divided by `zoom` before they are
/// applied to element geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Screen position of the card's top-left corner.
    pub offset: Vec2,
    /// 1.0 = 100%.
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

impl Camera {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
        }
    }

    /// Card to screen.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Screen to card.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    pub fn screen_to_card(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn card_to_screen(&self, card_point: Point) -> Point {
        self.transform() * card_point
    }

    /// Convert a screen-space displacement to card units.
    pub fn screen_delta_to_card(&self, delta: Vec2) -> Vec2 {
        delta / self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Zoom by `factor`, keeping `screen_point` over the same card point.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }
        let card_point = self.screen_to_card(screen_point);
        self.zoom = new_zoom;
        self.offset += screen_point - self.card_to_screen(card_point);
    }

    /// Center a card of `card_size` in `viewport`, leaving `padding` on each side.
    pub fn fit_card(&mut self, card_size: Size, viewport: Size, padding: f64) {
        let available = Size::new(
            (viewport.width - padding * 2.0).max(1.0),
            (viewport.height - padding * 2.0).max(1.0),
        );
        let scale = (available.width / card_size.width).min(available.height / card_size.height);
        self.zoom = scale.clamp(self.min_zoom, self.max_zoom);
        let card = Rect::from_origin_size(Point::ZERO, card_size);
        self.offset = Vec2::new(
            viewport.width / 2.0 - card.center().x * self.zoom,
            viewport.height / 2.0 - card.center().y * self.zoom,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_to_card_with_offset_and_zoom() {
        let mut camera = Camera::default();
        camera.offset = Vec2::new(50.0, 100.0);
        camera.zoom = 2.0;
        let card = camera.screen_to_card(Point::new(150.0, 300.0));
        assert!((card.x - 50.0).abs() < f64::EPSILON);
        assert!((card.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut camera = Camera::default();
        camera.offset = Vec2::new(30.0, -20.0);
        camera.zoom = 1.5;
        let original = Point::new(123.0, 456.0);
        let back = camera.card_to_screen(camera.screen_to_card(original));
        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut camera = Camera::default();
        camera.zoom_at(Point::ZERO, 0.001);
        assert!((camera.zoom - camera.min_zoom).abs() < f64::EPSILON);
        camera.set_zoom(1000.0);
        assert!((camera.zoom - camera.max_zoom).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_at_keeps_point_fixed() {
        let mut camera = Camera::default();
        let pivot = Point::new(160.0, 250.0);
        let before = camera.screen_to_card(pivot);
        camera.zoom_at(pivot, 2.0);
        let after = camera.screen_to_card(pivot);
        assert!((before - after).hypot() < 1e-9);
    }

    #[test]
    fn test_fit_card_centers() {
        let mut camera = Camera::default();
        camera.fit_card(Size::new(320.0, 500.0), Size::new(800.0, 600.0), 50.0);
        assert!((camera.zoom - 1.0).abs() < 1e-12);
        let center = camera.card_to_screen(Point::new(160.0, 250.0));
        assert!((center.x - 400.0).abs() < 1e-9);
        assert!((center.y - 300.0).abs() < 1e-9);
    }
}
