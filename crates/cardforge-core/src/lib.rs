//! CardForge Core Library
//!
//! Platform-agnostic data structures and editing logic for the CardForge
//! identity card designer.

pub mod autofill;
pub mod camera;
pub mod card;
pub mod color;
pub mod config;
pub mod document;
pub mod editor;
pub mod elements;
pub mod geometry;
pub mod input;
pub mod interaction;
pub mod selection;
pub mod standard;
pub mod storage;
pub mod style;
pub mod template;
pub mod upload;

pub use autofill::{AutofillClient, AutofillError};
pub use camera::Camera;
pub use card::{CardData, CardImages, CardRecords, DesignationConfig, GradeConfig, ImageSlot};
pub use color::CardColor;
pub use config::{BarcodeConfig, CARD_SIZE, EditorConfig, ProfilePhotoStyle, SignatureStyle};
pub use document::CardDocument;
pub use editor::{EditorState, Notice, NoticeLevel};
pub use elements::{Element, ElementId, ElementKind, ElementPatch, ShapeType, Side, ZOrderDirection};
pub use geometry::{Frame, ResizeHandle, ResizeSolution, solve_anchored_resize};
pub use interaction::Gesture;
pub use selection::Selection;
pub use standard::{StandardFieldKey, StandardStyles};
pub use style::{RenderableStyle, TextStyle, compute_visual_style};
pub use template::{Template, TemplateError};
pub use upload::{UploadError, UploadTarget, UploadTicket};
