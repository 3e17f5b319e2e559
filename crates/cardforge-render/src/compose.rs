//! Card composition: turns editor state into a flat, paint-ordered scene.

use crate::barcode::{BarcodeEncoder, Code128Encoder, layout_barcode};
use cardforge_core::card::{designation_color, grade_color};
use cardforge_core::elements::layout_lines;
use cardforge_core::geometry::{local_to_global, to_radians};
use cardforge_core::selection::get_handles;
use cardforge_core::style::{TextAlign, TextStyle};
use cardforge_core::{
    CardColor, EditorState, Element, ElementKind, ImageSlot, RenderableStyle, Selection, Side,
    SignatureStyle, StandardFieldKey, compute_visual_style,
};
use kurbo::{Affine, BezPath, Point, Rect, RoundedRect, Shape, Size, Vec2};

/// Profile photo frame on the front.
pub const PHOTO_FRAME: Rect = Rect::new(100.0, 90.0, 220.0, 240.0);
pub const BARCODE_FRAME: Rect = Rect::new(60.0, 346.0, 260.0, 410.0);
/// Accent stripe above the footer.
pub const STRIPE_FRAME: Rect = Rect::new(0.0, 418.0, 320.0, 430.0);
pub const HOLDER_SIGNATURE_FRAME: Rect = Rect::new(30.0, 300.0, 150.0, 360.0);
pub const AUTHORITY_SIGNATURE_FRAME: Rect = Rect::new(170.0, 300.0, 290.0, 360.0);

const SIGNATURE_CAPTION_HEIGHT: f64 = 14.0;
const PHOTO_PLACEHOLDER: CardColor = CardColor::new(236, 239, 241, 255);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposeOptions {
    /// Draw the selection outline and resize handles (ignored while locked).
    pub overlays: bool,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self { overlays: true }
    }
}

impl ComposeOptions {
    pub fn print() -> Self {
        Self { overlays: false }
    }
}

/// Stroke paint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub width: f64,
    pub color: CardColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageItem {
    pub src: String,
    /// Placement before `transform`.
    pub rect: Rect,
    pub transform: Affine,
    pub opacity: f64,
    /// Clip in card coordinates.
    pub clip: Option<RoundedRect>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeItem {
    pub path: BezPath,
    pub transform: Affine,
    pub fill: Option<CardColor>,
    pub stroke: Option<StrokeStyle>,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    /// Already wrapped and case-transformed.
    pub lines: Vec<String>,
    /// Text box before `transform`.
    pub frame: Rect,
    pub transform: Affine,
    pub style: RenderableStyle,
}

/// One paint operation.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneItem {
    Image(ImageItem),
    Shape(ShapeItem),
    Text(TextItem),
    /// Selection outline, already in card coordinates.
    Outline(BezPath),
    /// Resize handle center in card coordinates.
    Handle(Point),
}

/// Everything drawn on one card face, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct CardScene {
    pub side: Side,
    pub size: Size,
    pub items: Vec<SceneItem>,
}

impl CardScene {
    pub fn texts(&self) -> impl Iterator<Item = &TextItem> {
        self.items.iter().filter_map(|item| match item {
            SceneItem::Text(text) => Some(text),
            _ => None,
        })
    }

    pub fn has_overlays(&self) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, SceneItem::Outline(_) | SceneItem::Handle(_)))
    }
}

/// `translate(x, y)` followed by rotation and mirroring about the box center.
///
/// Mirroring is applied to the geometry before the rotation.
pub fn element_transform(element: &Element) -> Affine {
    let size = element.size();
    let center = Vec2::new(size.width / 2.0, size.height / 2.0);
    let (flip_x, flip_y) = element.flip();
    let scale = Affine::scale_non_uniform(
        if flip_x { -1.0 } else { 1.0 },
        if flip_y { -1.0 } else { 1.0 },
    );
    Affine::translate(element.position().to_vec2())
        * Affine::translate(center)
        * Affine::rotate(to_radians(element.rotation()))
        * scale
        * Affine::translate(-center)
}

/// Builds card scenes with a given barcode collaborator.
pub struct Composer<E> {
    encoder: E,
}

impl Default for Composer<Code128Encoder> {
    fn default() -> Self {
        Self::new(Code128Encoder)
    }
}

/// Compose `side` with the Code 128 encoder.
pub fn compose(editor: &EditorState, side: Side, options: &ComposeOptions) -> CardScene {
    Composer::new(Code128Encoder).compose(editor, side, options)
}

impl<E: BarcodeEncoder> Composer<E> {
    pub fn new(encoder: E) -> Self {
        Self { encoder }
    }

    pub fn compose(&self, editor: &EditorState, side: Side, options: &ComposeOptions) -> CardScene {
        let size = editor.config.card_size;
        let mut items = Vec::new();
        let document = &editor.document;

        let background = match side {
            Side::Front => ImageSlot::FrontBackground,
            Side::Back => ImageSlot::BackBackground,
        };
        if let Some(src) = document.images.get(background) {
            items.push(SceneItem::Image(ImageItem {
                src: src.to_string(),
                rect: Rect::from_origin_size(Point::ZERO, size),
                transform: Affine::IDENTITY,
                opacity: 1.0,
                clip: None,
            }));
        }

        match side {
            Side::Front => self.compose_front(editor, &mut items),
            Side::Back => compose_back(editor, &mut items),
        }

        for element in editor.paint_order(side) {
            items.push(element_item(element));
        }

        if options.overlays && !editor.is_locked() {
            push_overlays(editor, side, &mut items);
        }

        CardScene { side, size, items }
    }

    fn compose_front(&self, editor: &EditorState, items: &mut Vec<SceneItem>) {
        let document = &editor.document;
        let style = &document.profile_style;
        let frame = RoundedRect::from_rect(PHOTO_FRAME, style.border_radius);

        match document.images.get(ImageSlot::ProfilePhoto) {
            Some(src) => {
                let offset = Vec2::new(0.0, style.offset_y);
                let scaled = scale_about_center(PHOTO_FRAME, style.scale, offset);
                items.push(SceneItem::Image(ImageItem {
                    src: src.to_string(),
                    rect: scaled,
                    transform: Affine::IDENTITY,
                    opacity: 1.0,
                    clip: Some(frame),
                }));
            }
            None => items.push(SceneItem::Shape(ShapeItem {
                path: frame.to_path(0.1),
                transform: Affine::IDENTITY,
                fill: Some(PHOTO_PLACEHOLDER),
                stroke: None,
                opacity: 1.0,
            })),
        }
        if style.border_width > 0.0 {
            let color = CardColor::parse_or(Some(style.border_color.as_str()), CardColor::black());
            items.push(SceneItem::Shape(ShapeItem {
                path: frame.to_path(0.1),
                transform: Affine::IDENTITY,
                fill: None,
                stroke: Some(StrokeStyle {
                    width: style.border_width,
                    color,
                }),
                opacity: 1.0,
            }));
        }

        let data = &document.card_data;
        let accent = designation_color(&document.designations, &data.designation);
        for key in [
            StandardFieldKey::NameWithInitials,
            StandardFieldKey::FullName,
            StandardFieldKey::Designation,
            StandardFieldKey::Grade,
        ] {
            let color = match key {
                StandardFieldKey::Designation => Some(accent),
                StandardFieldKey::Grade => Some(grade_color(&document.grades, &data.grade)),
                _ => None,
            };
            items.push(standard_item(editor, key, color));
        }

        self.push_barcode(editor, items);

        items.push(SceneItem::Shape(ShapeItem {
            path: STRIPE_FRAME.to_path(0.1),
            transform: Affine::IDENTITY,
            fill: Some(accent),
            stroke: None,
            opacity: 1.0,
        }));

        items.push(standard_item(editor, StandardFieldKey::FooterLeft, None));
        items.push(standard_item(editor, StandardFieldKey::FooterRight, None));
    }

    fn push_barcode(&self, editor: &EditorState, items: &mut Vec<SceneItem>) {
        let document = &editor.document;
        let nic = document.card_data.nic.trim();
        let modules = match self.encoder.encode(nic) {
            Ok(modules) => modules,
            Err(e) => {
                log::warn!("Barcode omitted: {e}");
                return;
            }
        };
        let config = &document.barcode_config;
        let layout = layout_barcode(&modules, BARCODE_FRAME, config);
        let line_color = CardColor::parse_or(Some(config.line_color.as_str()), CardColor::black());
        items.push(SceneItem::Shape(ShapeItem {
            path: layout.bars,
            transform: Affine::IDENTITY,
            fill: Some(line_color),
            stroke: None,
            opacity: 1.0,
        }));
        if let Some(caption) = layout.caption {
            let style = TextStyle::default()
                .with_font_size(config.font_size)
                .with_align(TextAlign::Center)
                .with_color(line_color.to_hex());
            items.push(SceneItem::Text(TextItem {
                lines: vec![nic.to_string()],
                frame: caption,
                transform: Affine::IDENTITY,
                style: compute_visual_style(&style),
            }));
        }
    }
}

fn compose_back(editor: &EditorState, items: &mut Vec<SceneItem>) {
    let document = &editor.document;
    items.push(standard_item(editor, StandardFieldKey::OfficialAddress, None));

    let signatures = [
        (
            ImageSlot::HolderSignature,
            HOLDER_SIGNATURE_FRAME,
            &document.holder_signature_style,
            "Holder's Signature",
        ),
        (
            ImageSlot::AuthoritySignature,
            AUTHORITY_SIGNATURE_FRAME,
            &document.authority_signature_style,
            "Authorized Signature",
        ),
    ];
    for (slot, frame, style, caption) in signatures {
        if let Some(src) = document.images.get(slot) {
            items.push(signature_item(src, frame, style));
        }
        let line_y = frame.y1;
        let mut rule = BezPath::new();
        rule.move_to(Point::new(frame.x0, line_y));
        rule.line_to(Point::new(frame.x1, line_y));
        items.push(SceneItem::Shape(ShapeItem {
            path: rule,
            transform: Affine::IDENTITY,
            fill: None,
            stroke: Some(StrokeStyle {
                width: 0.75,
                color: CardColor::black(),
            }),
            opacity: 1.0,
        }));
        let caption_style = TextStyle::default()
            .with_font_size(9.0)
            .with_align(TextAlign::Center);
        let caption_top = line_y + 2.0;
        items.push(SceneItem::Text(TextItem {
            lines: vec![caption.to_string()],
            frame: Rect::new(
                frame.x0,
                caption_top,
                frame.x1,
                caption_top + SIGNATURE_CAPTION_HEIGHT,
            ),
            transform: Affine::IDENTITY,
            style: compute_visual_style(&caption_style),
        }));
    }
}

fn signature_item(src: &str, frame: Rect, style: &SignatureStyle) -> SceneItem {
    SceneItem::Image(ImageItem {
        src: src.to_string(),
        rect: scale_about_center(frame, style.scale, Vec2::new(style.offset_x, style.offset_y)),
        transform: Affine::IDENTITY,
        opacity: style.opacity_fraction(),
        clip: Some(RoundedRect::from_rect(frame, 0.0)),
    })
}

fn scale_about_center(rect: Rect, scale: f64, offset: Vec2) -> Rect {
    let scale = if scale > 0.0 { scale } else { 1.0 };
    let size = Size::new(rect.width() * scale, rect.height() * scale);
    Rect::from_center_size(rect.center() + offset, size)
}

/// A standard field, with an optional color that replaces the style's own default.
fn standard_item(
    editor: &EditorState,
    key: StandardFieldKey,
    default_color: Option<CardColor>,
) -> SceneItem {
    let text_style = editor.document.standard_styles.get(key);
    let mut style = compute_visual_style(&text_style);
    if let (None, Some(color)) = (&text_style.color, default_color) {
        style.color = color;
    }
    let frame = key.frame();
    let text = style.apply_case(&key.text(&editor.document.card_data));
    SceneItem::Text(TextItem {
        lines: layout_lines(&text, Some(frame.width()), &text_style),
        frame,
        transform: Affine::IDENTITY,
        style,
    })
}

fn element_item(element: &Element) -> SceneItem {
    let transform = element_transform(element);
    let size = element.size();
    let local = Rect::from_origin_size(Point::ZERO, size);
    let opacity = element.style.opacity_fraction();
    match &element.kind {
        ElementKind::Text(text) => {
            let style = compute_visual_style(&element.style);
            let content = style.apply_case(&text.text);
            SceneItem::Text(TextItem {
                lines: layout_lines(&content, text.width, &element.style),
                frame: local,
                transform,
                style,
            })
        }
        ElementKind::Image(image) => SceneItem::Image(ImageItem {
            src: image.src.clone(),
            rect: local,
            transform,
            opacity,
            clip: None,
        }),
        ElementKind::Shape(shape) => {
            let fill = CardColor::parse(&shape.fill_color);
            let stroke_color = element.style.stroke_color.as_deref();
            let stroke = element
                .style
                .stroke_width
                .filter(|w| *w > 0.0)
                .map(|width| StrokeStyle {
                    width,
                    color: CardColor::parse_or(stroke_color, CardColor::black()),
                });
            SceneItem::Shape(ShapeItem {
                path: shape.path(),
                transform,
                fill,
                stroke,
                opacity,
            })
        }
    }
}

fn push_overlays(editor: &EditorState, side: Side, items: &mut Vec<SceneItem>) {
    match editor.selection() {
        Some(Selection::Standard(key)) if key.side() == side => {
            items.push(SceneItem::Outline(key.frame().to_path(0.1)));
        }
        Some(Selection::Element(id)) => {
            let Some(element) = editor.document.get_element(id).filter(|e| e.side() == side) else {
                return;
            };
            let frame = element.frame();
            let rotation = element.rotation();
            let size = frame.size;
            let corners = [
                Point::ZERO,
                Point::new(size.width, 0.0),
                Point::new(size.width, size.height),
                Point::new(0.0, size.height),
            ];
            let mut outline = BezPath::new();
            for (i, corner) in corners.into_iter().enumerate() {
                let p = local_to_global(corner, frame, rotation);
                if i == 0 {
                    outline.move_to(p);
                } else {
                    outline.line_to(p);
                }
            }
            outline.close_path();
            items.push(SceneItem::Outline(outline));

            if editor.editing_element() != Some(id) {
                let handles = get_handles(element).into_iter();
                items.extend(handles.map(|h| SceneItem::Handle(h.position)));
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::BarcodeError;
    use cardforge_core::{ElementPatch, ShapeType};

    struct FailingEncoder;

    impl BarcodeEncoder for FailingEncoder {
        fn encode(&self, data: &str) -> Result<Vec<bool>, BarcodeError> {
            Err(BarcodeError::Encode { data: data.to_string(), reason: "unsupported".into() })
        }
    }

    fn editor_with_data() -> EditorState {
        let mut editor = EditorState::default();
        let data = &mut editor.document.card_data;
        data.name_with_initials = "K. M. Dissanayake".into();
        data.designation = "Postmaster".into();
        data.grade = "Grade I".into();
        data.nic = "199012345678".into();
        data.issue_date = "2024-05-01".into();
        data.file_number = "PF/778".into();
        editor
    }

    /// One string per text item, wrapped lines joined back together.
    fn text_lines(scene: &CardScene) -> Vec<String> {
        scene.texts().map(|t| t.lines.join(" ")).collect()
    }

    #[test]
    fn test_front_contains_standard_fields_and_barcode() {
        let editor = editor_with_data();
        let scene = compose(&editor, Side::Front, &ComposeOptions::default());
        let lines = text_lines(&scene);
        assert!(lines.contains(&"K. M. Dissanayake".to_string()));
        assert!(lines.contains(&"Date of Issue: 2024-05-01".to_string()));
        assert!(lines.contains(&"File No: PF/778".to_string()));
        // Barcode caption.
        assert!(lines.contains(&"199012345678".to_string()));
        assert!(!lines.iter().any(|l| l.contains("Holder")));
    }

    #[test]
    fn test_barcode_failure_is_omitted() {
        let editor = editor_with_data();
        let options = ComposeOptions::default();
        let ok = compose(&editor, Side::Front, &options);
        let failed = Composer::new(FailingEncoder).compose(&editor, Side::Front, &options);
        // Bars and caption are missing, everything else is still there.
        assert_eq!(failed.items.len(), ok.items.len() - 2);
        assert!(!text_lines(&failed).contains(&"199012345678".to_string()));
    }

    #[test]
    fn test_designation_color_drives_text_and_stripe() {
        let mut editor = editor_with_data();
        editor.add_designation("Postmaster", "#c62828");
        editor.clear_selection();
        let scene = compose(&editor, Side::Front, &ComposeOptions::default());
        let red = CardColor::new(0xc6, 0x28, 0x28, 255);
        let designation = scene
            .texts()
            .find(|t| t.lines == vec!["Postmaster".to_string()])
            .unwrap();
        assert_eq!(designation.style.color, red);
        let stripe = scene.items.iter().any(|item| match item {
            SceneItem::Shape(shape) => {
                shape.fill == Some(red) && shape.path.bounding_box() == STRIPE_FRAME
            }
            _ => false,
        });
        assert!(stripe);

        let grade = scene.texts().find(|t| t.lines == vec!["Grade I".to_string()]).unwrap();
        assert_eq!(grade.style.color.to_hex(), cardforge_core::color::DEFAULT_ACCENT_HEX);
    }

    #[test]
    fn test_elements_painted_by_z_on_their_side() {
        let mut editor = EditorState::default();
        let top = editor.add_text("top");
        let raise = ElementPatch {
            z_index: Some(90),
            ..Default::default()
        };
        editor.update_element(top, &raise);
        editor.add_shape(ShapeType::Rectangle);
        editor.set_active_side(Side::Back);
        editor.add_text("back only");

        let scene = compose(&editor, Side::Front, &ComposeOptions::print());
        let last = scene.items.last().unwrap();
        assert!(matches!(last, SceneItem::Text(t) if t.lines == vec!["top".to_string()]));
        assert!(!text_lines(&scene).contains(&"back only".to_string()));

        let back = compose(&editor, Side::Back, &ComposeOptions::print());
        assert!(text_lines(&back).contains(&"back only".to_string()));
    }

    #[test]
    fn test_overlays_only_when_unlocked() {
        let mut editor = EditorState::default();
        editor.add_shape(ShapeType::Circle);
        let scene = compose(&editor, Side::Front, &ComposeOptions::default());
        let handles = scene.items.iter().filter(|i| matches!(i, SceneItem::Handle(_))).count();
        assert_eq!(handles, 8);
        assert!(!compose(&editor, Side::Front, &ComposeOptions::print()).has_overlays());

        let id = editor.selection().and_then(|s| s.element()).unwrap();
        editor.set_locked(true);
        editor.select(Selection::Element(id));
        assert!(!compose(&editor, Side::Front, &ComposeOptions::default()).has_overlays());
    }

    #[test]
    fn test_editing_hides_handles() {
        let mut editor = EditorState::default();
        let id = editor.add_text("edit me");
        editor.begin_edit(id);
        let scene = compose(&editor, Side::Front, &ComposeOptions::default());
        assert!(scene.items.iter().any(|i| matches!(i, SceneItem::Outline(_))));
        assert!(!scene.items.iter().any(|i| matches!(i, SceneItem::Handle(_))));
    }

    #[test]
    fn test_standard_field_outline() {
        let mut editor = EditorState::default();
        editor.select(Selection::Standard(StandardFieldKey::OfficialAddress));
        assert!(!compose(&editor, Side::Front, &ComposeOptions::default()).has_overlays());
        assert!(compose(&editor, Side::Back, &ComposeOptions::default()).has_overlays());
    }

    #[test]
    fn test_flip_applies_before_rotation() {
        let mut element = Element::shape(ShapeType::Rectangle, Point::new(10.0, 20.0));
        element.apply(&ElementPatch {
            width: Some(40.0),
            height: Some(20.0),
            rotation: Some(90.0),
            flip_x: Some(true),
            ..Default::default()
        });
        let transform = element_transform(&element);
        // Local top-left mirrors to the top-right, then turns a quarter about the center (30, 30).
        let p = transform * Point::new(0.0, 0.0);
        assert!((p - Point::new(40.0, 50.0)).hypot() < 1e-9, "{p:?}");
        // The center is fixed.
        let c = transform * Point::new(20.0, 10.0);
        assert!((c - Point::new(30.0, 30.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_background_and_signatures() {
        let mut editor = EditorState::default();
        editor.document.images.back_background = "data:image/png;base64,AAAA".into();
        editor.document.images.holder_signature = "data:image/png;base64,BBBB".into();
        editor.document.holder_signature_style.opacity = 50.0;
        let scene = compose(&editor, Side::Back, &ComposeOptions::print());
        match &scene.items[0] {
            SceneItem::Image(image) => assert_eq!(image.rect, Rect::new(0.0, 0.0, 320.0, 500.0)),
            other => panic!("expected background, got {other:?}"),
        }
        let signature = scene.items.iter().find_map(|i| match i {
            SceneItem::Image(image) if image.src.ends_with("BBBB") => Some(image),
            _ => None,
        });
        assert_eq!(signature.map(|s| s.opacity), Some(0.5));
    }
}
