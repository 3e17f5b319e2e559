//! CardForge Application
//!
//! Command-line shell around the card editor: template files, the local
//! template library, recorded input replay, and SVG output.

mod app;
pub mod event_handler;

pub use app::{App, AppConfig, AppError, write};
pub use event_handler::{EventHandler, ScriptEvent, ScriptStep};
