//! The persistable part of the editor: card data, settings and layers.

use crate::card::{CardData, CardImages, DesignationConfig, GradeConfig, LookupTable};
use crate::config::{BarcodeConfig, ProfilePhotoStyle, SignatureStyle};
use crate::elements::{Element, ElementId, ElementPatch, Side, ZOrderDirection};
use crate::standard::StandardStyles;
use kurbo::Point;

/// Everything a template captures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardDocument {
    pub card_data: CardData,
    pub images: CardImages,
    pub designations: LookupTable<DesignationConfig>,
    pub grades: LookupTable<GradeConfig>,
    pub barcode_config: BarcodeConfig,
    pub profile_style: ProfilePhotoStyle,
    pub holder_signature_style: SignatureStyle,
    pub authority_signature_style: SignatureStyle,
    /// Custom elements in insertion order.
    pub elements: Vec<Element>,
    pub standard_styles: StandardStyles,
}

impl CardDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_element(&mut self, element: Element) -> ElementId {
        let id = element.id();
        self.elements.push(element);
        id
    }

    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        let index = self.elements.iter().position(|e| e.id() == id)?;
        Some(self.elements.remove(index))
    }

    pub fn get_element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn get_element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    /// Merge `patch` into the element. Returns false when it does not exist.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        match self.get_element_mut(id) {
            Some(element) => {
                element.apply(patch);
                true
            }
            None => false,
        }
    }

    pub fn reorder(&mut self, id: ElementId, direction: ZOrderDirection) -> bool {
        match self.get_element_mut(id) {
            Some(element) => {
                element.reorder(direction);
                true
            }
            None => false,
        }
    }

    /// Elements on `side` in list order. Elements without a side are on the front.
    pub fn elements_for_side(&self, side: Side) -> Vec<&Element> {
        self.elements.iter().filter(|e| e.side() == side).collect()
    }

    /// Elements on `side` sorted by ascending z-index; ties keep list order.
    pub fn paint_order(&self, side: Side) -> Vec<&Element> {
        let mut elements = self.elements_for_side(side);
        elements.sort_by_key(|e| e.z_index);
        elements
    }

    /// Topmost element on `side` under `point`.
    pub fn hit_test(&self, side: Side, point: Point) -> Option<ElementId> {
        self.paint_order(side)
            .into_iter()
            .rev()
            .find(|e| e.contains(point, 0.0))
            .map(|e| e.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ShapeType;

    #[test]
    fn test_paint_order_is_stable() {
        let mut doc = CardDocument::new();
        let a = doc.add_element(Element::text("a", Point::ZERO).with_z_index(20));
        let b = doc.add_element(Element::text("b", Point::ZERO).with_z_index(10));
        let c = doc.add_element(Element::text("c", Point::ZERO).with_z_index(20));
        let order: Vec<_> = doc.paint_order(Side::Front).iter().map(|e| e.id()).collect();
        assert_eq!(order, vec![b, a, c]);
    }

    #[test]
    fn test_side_filter() {
        let mut doc = CardDocument::new();
        let front = doc.add_element(Element::text("f", Point::ZERO));
        let back = doc.add_element(Element::text("b", Point::ZERO).with_side(Side::Back));
        let explicit = doc.add_element(Element::text("e", Point::ZERO).with_side(Side::Front));

        let ids: Vec<_> = doc.elements_for_side(Side::Front).iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec![front, explicit]);
        let ids: Vec<_> = doc.elements_for_side(Side::Back).iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec![back]);
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut doc = CardDocument::new();
        let low = doc.add_element(Element::shape(ShapeType::Rectangle, Point::new(0.0, 0.0)));
        let raised = Element::shape(ShapeType::Rectangle, Point::new(25.0, 25.0)).with_z_index(50);
        let high = doc.add_element(raised);
        assert_eq!(doc.hit_test(Side::Front, Point::new(30.0, 30.0)), Some(high));
        assert_eq!(doc.hit_test(Side::Front, Point::new(5.0, 5.0)), Some(low));
        assert_eq!(doc.hit_test(Side::Back, Point::new(5.0, 5.0)), None);
        assert_eq!(doc.hit_test(Side::Front, Point::new(200.0, 200.0)), None);
    }

    #[test]
    fn test_update_missing_element() {
        let mut doc = CardDocument::new();
        assert!(!doc.update_element(uuid::Uuid::new_v4(), &ElementPatch::position(1.0, 1.0)));
        assert!(doc.remove_element(uuid::Uuid::new_v4()).is_none());
    }
}
