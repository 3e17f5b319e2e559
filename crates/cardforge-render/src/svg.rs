//! SVG backend.

use crate::compose::{ImageItem, SceneItem, ShapeItem, StrokeStyle, TextItem};
use crate::renderer::{RenderContext, RenderResult, Renderer};
use cardforge_core::CardColor;
use cardforge_core::selection::HANDLE_SIZE;
use cardforge_core::style::{BaselineShift, FontVariant, TextAlign};
use kurbo::{Affine, Rect, Vec2};
use std::fmt::Write;

/// Writes card scenes as standalone SVG documents.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    output: String,
    next_clip: usize,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last rendered document.
    pub fn svg(&self) -> &str {
        &self.output
    }

    pub fn take_svg(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    pub(crate) fn begin_document(
        &mut self,
        size: kurbo::Size,
        scale_factor: f64,
    ) -> RenderResult<()> {
        self.output.clear();
        self.next_clip = 0;
        writeln!(
            self.output,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">",
            num(size.width * scale_factor),
            num(size.height * scale_factor),
            num(size.width),
            num(size.height),
        )?;
        Ok(())
    }

    pub(crate) fn end_document(&mut self) {
        self.output.push_str("</svg>\n");
    }

    /// Append one card face shifted by `offset`, without the document wrapper.
    pub(crate) fn write_face(&mut self, ctx: &RenderContext, offset: Vec2) -> RenderResult<()> {
        let scene = ctx.scene;
        writeln!(
            self.output,
            "<g class=\"card {}\" transform=\"translate({} {})\">",
            scene.side.name(),
            num(offset.x),
            num(offset.y)
        )?;
        let card = Rect::from_origin_size(kurbo::Point::ZERO, scene.size);
        let background = CardColor::from(self.background_color(ctx));
        writeln!(
            self.output,
            "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\"{}/>",
            num(card.width()),
            num(card.height()),
            paint("fill", background)
        )?;

        let selection = CardColor::from(ctx.selection_color);
        for item in &scene.items {
            match item {
                SceneItem::Image(image) => self.write_image(image)?,
                SceneItem::Shape(shape) => self.write_shape(shape)?,
                SceneItem::Text(text) => self.write_text(text)?,
                SceneItem::Outline(path) => writeln!(
                    self.output,
                    "<path d=\"{}\" fill=\"none\" stroke-width=\"1\"{}/>",
                    path.to_svg(),
                    paint("stroke", selection)
                )?,
                SceneItem::Handle(center) => {
                    let half = HANDLE_SIZE / 2.0;
                    writeln!(
                        self.output,
                        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#ffffff\" stroke-width=\"1\"{}/>",
                        num(center.x - half),
                        num(center.y - half),
                        num(HANDLE_SIZE),
                        num(HANDLE_SIZE),
                        paint("stroke", selection)
                    )?
                }
            }
        }
        self.output.push_str("</g>\n");
        Ok(())
    }

    fn write_image(&mut self, image: &ImageItem) -> RenderResult<()> {
        let mut attrs = String::new();
        if let Some(clip) = image.clip {
            let id = format!("clip-{}", self.next_clip);
            self.next_clip += 1;
            let rect = clip.rect();
            writeln!(
                self.output,
                "<clipPath id=\"{id}\"><rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\"/></clipPath>",
                num(rect.x0),
                num(rect.y0),
                num(rect.width()),
                num(rect.height()),
                num(clip.radii().top_left)
            )?;
            write!(attrs, " clip-path=\"url(#{id})\" preserveAspectRatio=\"xMidYMid slice\"")?;
        } else {
            attrs.push_str(" preserveAspectRatio=\"none\"");
        }
        if image.opacity < 1.0 {
            write!(attrs, " opacity=\"{}\"", num(image.opacity))?;
        }
        if let Some(matrix) = matrix(image.transform) {
            write!(attrs, " transform=\"{matrix}\"")?;
        }
        let rect = image.rect;
        writeln!(
            self.output,
            "<image href=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{attrs}/>",
            escape(&image.src),
            num(rect.x0),
            num(rect.y0),
            num(rect.width()),
            num(rect.height())
        )?;
        Ok(())
    }

    fn write_shape(&mut self, shape: &ShapeItem) -> RenderResult<()> {
        let fill = match shape.fill {
            Some(color) => paint("fill", color),
            None => " fill=\"none\"".to_string(),
        };
        let stroke = match shape.stroke {
            Some(StrokeStyle { width, color }) => {
                format!(" stroke-width=\"{}\"{}", num(width), paint("stroke", color))
            }
            None => String::new(),
        };
        let mut extra = String::new();
        if shape.opacity < 1.0 {
            write!(extra, " opacity=\"{}\"", num(shape.opacity))?;
        }
        if let Some(matrix) = matrix(shape.transform) {
            write!(extra, " transform=\"{matrix}\"")?;
        }
        writeln!(self.output, "<path d=\"{}\"{fill}{stroke}{extra}/>", shape.path.to_svg())?;
        Ok(())
    }

    fn write_text(&mut self, text: &TextItem) -> RenderResult<()> {
        let style = &text.style;
        let frame = text.frame;
        let (anchor, x) = match style.text_align {
            TextAlign::Left | TextAlign::Justify => ("start", frame.x0),
            TextAlign::Center => ("middle", frame.center().x),
            TextAlign::Right => ("end", frame.x1),
        };

        write!(
            self.output,
            "<text font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\" font-style=\"{}\" text-anchor=\"{anchor}\"{}",
            escape(&style.font_family),
            style.font_size,
            style.font_weight.css(),
            style.font_style.css(),
            paint("fill", style.color)
        )?;
        if !style.text_decoration.is_none() {
            write!(self.output, " text-decoration=\"{}\"", style.text_decoration.css())?;
        }
        if style.font_variant == FontVariant::SmallCaps {
            self.output.push_str(" font-variant=\"small-caps\"");
        }
        if style.letter_spacing != "normal" {
            write!(self.output, " letter-spacing=\"{}\"", escape(&style.letter_spacing))?;
        }
        if let Some(stroke) = &style.stroke {
            let color = paint("stroke", stroke.color);
            write!(self.output, " stroke-width=\"{}\"{color}", num(stroke.width))?;
        }
        if style.opacity < 1.0 {
            write!(self.output, " opacity=\"{}\"", num(style.opacity))?;
        }
        if let Some(matrix) = matrix(text.transform) {
            write!(self.output, " transform=\"{matrix}\"")?;
        }
        self.output.push('>');

        let shift = match style.baseline_shift {
            BaselineShift::Baseline => "",
            BaselineShift::Super => " baseline-shift=\"super\"",
            BaselineShift::Sub => " baseline-shift=\"sub\"",
        };
        let advance = style.line_advance();
        // First baseline sits centred in the first line box.
        let first_baseline =
            frame.y0 + (advance - style.font_size_px) / 2.0 + style.font_size_px * 0.8;
        for (i, line) in text.lines.iter().enumerate() {
            write!(
                self.output,
                "<tspan x=\"{}\" y=\"{}\"{shift}>{}</tspan>",
                num(x),
                num(first_baseline + advance * i as f64),
                escape(line)
            )?;
        }
        self.output.push_str("</text>\n");
        Ok(())
    }
}

impl Renderer for SvgRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        self.begin_document(ctx.scene.size, ctx.scale_factor)?;
        self.write_face(ctx, Vec2::ZERO)?;
        self.end_document();
        log::debug!("Rendered {} side, {} items", ctx.scene.side.name(), ctx.scene.items.len());
        Ok(())
    }
}

/// `fill="#rrggbb"` plus an opacity attribute for translucent colors.
fn paint(attr: &str, color: CardColor) -> String {
    let hex = color.to_hex();
    if color.a == 255 {
        format!(" {attr}=\"{hex}\"")
    } else {
        format!(" {attr}=\"{hex}\" {attr}-opacity=\"{}\"", num(color.alpha()))
    }
}

fn matrix(transform: Affine) -> Option<String> {
    if transform == Affine::IDENTITY {
        return None;
    }
    let [a, b, c, d, e, f] = transform.as_coeffs();
    Some(format!(
        "matrix({} {} {} {} {} {})",
        num(a),
        num(b),
        num(c),
        num(d),
        num(e),
        num(f)
    ))
}

/// Compact number formatting; trims float noise.
fn num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        // Avoid "-0".
        return "0".to_string();
    }
    format!("{rounded}")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{ComposeOptions, compose};
    use cardforge_core::style::TextStyle;
    use cardforge_core::{EditorState, ElementPatch, ShapeType, Side};
    use pretty_assertions::assert_eq;

    fn render(editor: &EditorState, side: Side, options: ComposeOptions) -> String {
        let scene = compose(editor, side, &options);
        let mut renderer = SvgRenderer::new();
        renderer.build_scene(&RenderContext::new(&scene)).unwrap();
        renderer.take_svg()
    }

    #[test]
    fn test_document_wrapper_and_scale() {
        let editor = EditorState::default();
        let scene = compose(&editor, Side::Front, &ComposeOptions::print());
        let mut renderer = SvgRenderer::new();
        renderer
            .build_scene(&RenderContext::new(&scene).with_scale_factor(2.0))
            .unwrap();
        let svg = renderer.svg();
        assert!(svg.starts_with(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"640\" height=\"1000\" viewBox=\"0 0 320 500\">"
        ));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("<rect x=\"0\" y=\"0\" width=\"320\" height=\"500\" fill=\"#ffffff\"/>"));
    }

    #[test]
    fn test_text_is_escaped_and_wrapped_in_tspans() {
        let mut editor = EditorState::default();
        editor.document.card_data.name_with_initials = "A & B <Co>".into();
        let svg = render(&editor, Side::Front, ComposeOptions::print());
        assert!(svg.contains(">A &amp; B &lt;Co&gt;</tspan>"));
        assert!(svg.contains("text-anchor=\"middle\""));
        assert!(svg.contains("font-weight=\"bold\""));
    }

    #[test]
    fn test_rotated_shape_uses_matrix() {
        let mut editor = EditorState::default();
        let id = editor.add_shape(ShapeType::Star);
        editor.update_element(id, &ElementPatch::rotation(90.0));
        let svg = render(&editor, Side::Front, ComposeOptions::print());
        assert!(svg.contains("transform=\"matrix(0 1 -1 0 "), "{svg}");
        assert!(svg.contains("fill=\"#e3f2fd\""));
        assert!(svg.contains("stroke=\"#1e88e5\""));
    }

    #[test]
    fn test_overlays_render_handles() {
        let mut editor = EditorState::default();
        editor.add_shape(ShapeType::Rectangle);
        let svg = render(&editor, Side::Front, ComposeOptions::default());
        assert_eq!(svg.matches("fill=\"#ffffff\" stroke-width=\"1\"").count(), 8);
        assert!(svg.contains("fill=\"none\" stroke-width=\"1\" stroke=\"#3b82f6\""));
    }

    #[test]
    fn test_text_style_attributes() {
        let mut editor = EditorState::default();
        let id = editor.add_text("Note");
        let style = TextStyle {
            underline: Some(true),
            script: Some(cardforge_core::style::Script::Super),
            opacity: Some(50.0),
            color: Some("#ff000080".into()),
            ..Default::default()
        };
        editor.update_element(id, &ElementPatch::style(style));
        let svg = render(&editor, Side::Front, ComposeOptions::print());
        assert!(svg.contains("text-decoration=\"underline\""));
        assert!(svg.contains("baseline-shift=\"super\""));
        assert!(svg.contains("opacity=\"0.5\""));
        assert!(svg.contains("fill=\"#ff0000\" fill-opacity=\"0.502\""));
    }

    #[test]
    fn test_clipped_photo() {
        let mut editor = EditorState::default();
        editor.document.images.profile_photo = "data:image/png;base64,AAAA".into();
        let svg = render(&editor, Side::Front, ComposeOptions::print());
        assert!(svg.contains("<clipPath id=\"clip-0\"><rect x=\"100\" y=\"90\" width=\"120\" height=\"150\" rx=\"8\"/></clipPath>"));
        assert!(svg.contains("clip-path=\"url(#clip-0)\""));
    }

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(1.0), "1");
        assert_eq!(num(0.1 + 0.2), "0.3");
        assert_eq!(num(-0.0000001), "0");
    }
}
