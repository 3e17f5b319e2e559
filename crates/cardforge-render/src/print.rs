//! Printable export of both card faces.

use crate::barcode::{BarcodeEncoder, Code128Encoder};
use crate::compose::{CardScene, ComposeOptions, Composer};
use crate::renderer::{RenderContext, RenderResult};
use crate::svg::SvgRenderer;
use cardforge_core::{EditorState, Side};
use kurbo::{Size, Vec2};

/// Space between the front and back in the printed sheet.
pub const PRINT_GAP: f64 = 20.0;

/// Front and back composed in preview mode, ready to lay out on one sheet.
#[derive(Debug, Clone)]
pub struct PrintJob {
    pub front: CardScene,
    pub back: CardScene,
}

impl PrintJob {
    pub fn new(editor: &EditorState) -> Self {
        Self::with_composer(editor, &Composer::new(Code128Encoder))
    }

    /// Compose both sides as the locked preview shows them.
    pub fn with_composer<E: BarcodeEncoder>(editor: &EditorState, composer: &Composer<E>) -> Self {
        let mut preview = editor.clone();
        preview.set_locked(true);
        let options = ComposeOptions::print();
        Self {
            front: composer.compose(&preview, Side::Front, &options),
            back: composer.compose(&preview, Side::Back, &options),
        }
    }

    /// Compose and write the sheet in one go.
    pub fn render(editor: &EditorState) -> RenderResult<String> {
        Self::new(editor).to_svg()
    }

    /// Sheet size: both cards next to each other.
    pub fn size(&self) -> Size {
        Size::new(
            self.front.size.width + PRINT_GAP + self.back.size.width,
            self.front.size.height.max(self.back.size.height),
        )
    }

    pub fn to_svg(&self) -> RenderResult<String> {
        let mut renderer = SvgRenderer::new();
        renderer.begin_document(self.size(), 1.0)?;
        renderer.write_face(&RenderContext::new(&self.front), Vec2::ZERO)?;
        renderer.write_face(
            &RenderContext::new(&self.back),
            Vec2::new(self.front.size.width + PRINT_GAP, 0.0),
        )?;
        renderer.end_document();
        log::info!("Prepared print sheet {}x{}", self.size().width, self.size().height);
        Ok(renderer.take_svg())
    }
}
