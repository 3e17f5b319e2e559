//! Named template library.
//!
//! Templates are filed under a normalized name so "Main Office" and
//! "main_office" refer to the same entry. Listing returns a
//! [`TemplateSummary`] per entry so a picker can show who each template
//! belongs to without loading it into the editor.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use crate::template::{Template, TemplateError};
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("No template named {0} in the library")]
    NotFound(String),
    #[error("Template name {0:?} has no usable characters")]
    InvalidName(String),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("Failed to access {path}: {message}")]
    Io {
        path: String,
        message: String,
    },
    #[error("Library is unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future returned by asynchronous collaborators.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Turn a display name into a library key: ASCII letters and digits are
/// lowercased, `-` is kept, and every other run of characters becomes one `_`.
pub fn library_key(name: &str) -> StorageResult<String> {
    let mut key = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            key.push(c.to_ascii_lowercase());
        } else if !key.ends_with('_') {
            key.push('_');
        }
    }
    let key = key.trim_matches('_').to_string();
    if key.is_empty() {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(key)
}

/// What the library shows about a stored template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub key: String,
    /// Empty when the template carries no card record.
    pub full_name: String,
    pub nic: String,
    pub element_count: usize,
}

impl TemplateSummary {
    pub fn of(key: impl Into<String>, template: &Template) -> Self {
        let (full_name, nic) = template
            .card_data
            .as_ref()
            .map(|data| (data.full_name.clone(), data.nic.clone()))
            .unwrap_or_default();
        Self {
            key: key.into(),
            full_name,
            nic,
            element_count: template.elements.as_ref().map_or(0, Vec::len),
        }
    }
}

/// A collection of templates filed by [`library_key`].
///
/// Every method takes the display name and normalizes it.
pub trait Storage: Send + Sync {
    /// Store `template`, replacing any entry with the same key.
    fn save(
        &self,
        name: &str,
        template: &Template,
    ) -> BoxFuture<'_, StorageResult<TemplateSummary>>;

    fn load(&self, name: &str) -> BoxFuture<'_, StorageResult<Template>>;

    /// Removing a missing entry is not an error.
    fn delete(&self, name: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Summaries of every readable entry, sorted by key.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<TemplateSummary>>>;

    /// Summary of the entry filed under `name`, if any.
    fn find(&self, name: &str) -> BoxFuture<'_, StorageResult<Option<TemplateSummary>>>;
}
