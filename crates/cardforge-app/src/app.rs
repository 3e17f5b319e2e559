//! Application state for the command-line shell.

use crate::event_handler::{EventHandler, parse_script};
use cardforge_core::storage::{FileStorage, Storage, StorageError, TemplateSummary};
use cardforge_core::{
    EditorConfig, EditorState, ImageSlot, NoticeLevel, Side, Template, TemplateError, UploadError,
    UploadTarget,
};
use cardforge_render::{
    ComposeOptions, PrintJob, RenderContext, Renderer, RendererError, SvgRenderer, compose,
};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Template(String),
    #[error(transparent)]
    TemplateEncoding(#[from] TemplateError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error("Card data must be a JSON object")]
    CardData,
    #[error("{0}")]
    Image(String),
}

/// Shell settings, filled from the command line.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Template library directory; the platform data dir when unset.
    pub library_dir: Option<PathBuf>,
    pub editor: EditorConfig,
    /// Output pixels per card unit for single-side renders.
    pub scale: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            library_dir: None,
            editor: EditorConfig::default(),
            scale: 1.0,
        }
    }
}

impl AppConfig {
    /// Load the editor section from a JSON file, keeping defaults for missing keys.
    pub fn with_editor_file(mut self, path: &Path) -> Result<Self, AppError> {
        let json = read_to_string(path)?;
        self.editor = EditorConfig::from_json(&json)?;
        Ok(self)
    }
}

/// One editing session driven from the command line.
pub struct App {
    config: AppConfig,
    editor: EditorState,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let editor = EditorState::new(config.editor.clone());
        Self { config, editor }
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditorState {
        &mut self.editor
    }

    /// Open the template library.
    pub fn library(&self) -> Result<FileStorage, AppError> {
        let storage = match &self.config.library_dir {
            Some(dir) => FileStorage::new(dir.clone())?,
            None => FileStorage::default_location()?,
        };
        log::debug!("Template library at {}", storage.base_path().display());
        Ok(storage)
    }

    /// Load a template file once `confirm` approves replacing the current card.
    ///
    /// Returns whether the template was applied.
    pub fn open_template(
        &mut self,
        path: &Path,
        confirm: impl FnOnce(&Template) -> bool,
    ) -> Result<bool, AppError> {
        let json = read_to_string(path)?;
        let applied = self.editor.load_template(&json, confirm);
        self.flush_notices()?;
        Ok(applied)
    }

    pub fn save_template(&self, path: &Path) -> Result<(), AppError> {
        let json = self.editor.save_template_json()?;
        write(path, &json)
    }

    /// Merge a JSON object of card fields into the current record.
    pub fn merge_card_data(&mut self, path: &Path) -> Result<(), AppError> {
        let json = read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        let fields = value.as_object().ok_or(AppError::CardData)?;
        self.editor.document.card_data.merge_json(fields);
        log::info!("Merged {} card fields from {}", fields.len(), path.display());
        Ok(())
    }

    /// Embed an image file into one of the card's slots.
    pub fn set_image(&mut self, slot: ImageSlot, path: &Path) -> Result<(), AppError> {
        let ticket = self.editor.begin_upload(UploadTarget::Card(slot));
        let bytes = fs::read(path)
            .map_err(|e| UploadError::Read(format!("{}: {e}", path.display())));
        self.editor.finish_upload(ticket, bytes);
        self.flush_notices()
    }

    /// Render one side without editing overlays.
    pub fn render_side(&self, side: Side) -> Result<String, AppError> {
        let scene = compose(&self.editor, side, &ComposeOptions::print());
        let mut renderer = SvgRenderer::new();
        renderer.build_scene(&RenderContext::new(&scene).with_scale_factor(self.config.scale))?;
        Ok(renderer.take_svg())
    }

    pub fn print_sheet(&self) -> Result<String, AppError> {
        Ok(PrintJob::render(&self.editor)?)
    }

    /// File the current card under `name`. An existing entry is only replaced
    /// when `confirm_overwrite` approves; `None` means the save was declined.
    pub fn save_to_library(
        &self,
        name: &str,
        confirm_overwrite: impl FnOnce(&TemplateSummary) -> bool,
    ) -> Result<Option<TemplateSummary>, AppError> {
        let storage = self.library()?;
        if let Some(existing) = pollster::block_on(storage.find(name))? {
            if !confirm_overwrite(&existing) {
                log::info!("Kept library entry {}", existing.key);
                return Ok(None);
            }
        }
        let summary = pollster::block_on(storage.save(name, &self.editor.save_template()))?;
        Ok(Some(summary))
    }

    /// Load a library entry through the same confirmation as template files.
    pub fn load_from_library(
        &mut self,
        name: &str,
        confirm: impl FnOnce(&Template) -> bool,
    ) -> Result<bool, AppError> {
        let storage = self.library()?;
        let template = pollster::block_on(storage.load(name))?;
        let applied = self.editor.offer_template(template, confirm);
        self.flush_notices()?;
        Ok(applied)
    }

    pub fn list_library(&self) -> Result<Vec<TemplateSummary>, AppError> {
        let storage = self.library()?;
        Ok(pollster::block_on(storage.list())?)
    }

    pub fn delete_from_library(&self, name: &str) -> Result<(), AppError> {
        let storage = self.library()?;
        Ok(pollster::block_on(storage.delete(name))?)
    }

    /// Replay a recorded input script against the card. Returns the number of steps.
    pub fn replay_events(&mut self, path: &Path) -> Result<usize, AppError> {
        let steps = parse_script(&read_to_string(path)?)?;
        let replayed = EventHandler::new().replay(&mut self.editor, &steps);
        self.flush_notices()?;
        Ok(replayed)
    }

    /// Log pending notices. Alerts and failures abort the command.
    fn flush_notices(&mut self) -> Result<(), AppError> {
        let mut failure = None;
        for notice in self.editor.drain_notices() {
            match notice.level {
                NoticeLevel::Info => log::info!("{}", notice.message),
                NoticeLevel::Alert => failure = Some(AppError::Template(notice.message)),
                NoticeLevel::Failure => failure = Some(AppError::Image(notice.message)),
            }
        }
        failure.map_or(Ok(()), Err)
    }
}

fn read_to_string(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> AppError {
    let path = path.to_path_buf();
    move |source| AppError::Write { path, source }
}

/// Write `contents`, creating parent directories as needed.
pub fn write(path: &Path, contents: &str) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error(parent))?;
    }
    fs::write(path, contents).map_err(write_error(path))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}
