//! Renderer trait abstraction.

use crate::compose::CardScene;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Render failed: {0}")]
    RenderFailed(String),
}

impl From<std::fmt::Error> for RendererError {
    fn from(err: std::fmt::Error) -> Self {
        RendererError::RenderFailed(err.to_string())
    }
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for rendering one card face.
pub struct RenderContext<'a> {
    pub scene: &'a CardScene,
    /// Output pixels per card unit.
    pub scale_factor: f64,
    /// Card fill behind everything else.
    pub background_color: Color,
    /// Outline and handle color.
    pub selection_color: Color,
}

impl<'a> RenderContext<'a> {
    pub fn new(scene: &'a CardScene) -> Self {
        Self {
            scene,
            scale_factor: 1.0,
            background_color: Color::WHITE,
            selection_color: Color::from_rgba8(59, 130, 246, 255),
        }
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Render the context's scene, replacing any previous output.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
