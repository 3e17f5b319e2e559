//! CardForge Render Library
//!
//! Composes card faces from editor state and writes them out. The default
//! backend produces SVG.

pub mod barcode;
pub mod compose;
pub mod print;
mod renderer;
pub mod svg;

pub use barcode::{BarcodeEncoder, BarcodeError, Code128Encoder};
pub use compose::{CardScene, ComposeOptions, Composer, SceneItem, compose};
pub use print::PrintJob;
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
pub use svg::SvgRenderer;
