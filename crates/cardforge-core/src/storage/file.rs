//! Library directory with one pretty-printed JSON file per template.

use super::{BoxFuture, Storage, StorageError, StorageResult, TemplateSummary, library_key};
use crate::template::Template;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "json";

pub struct FileStorage {
    dir: PathBuf,
}

fn io_error(path: &Path, e: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

/// Read and parse one library file.
fn read_template(path: &Path) -> StorageResult<Template> {
    let json = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    Ok(Template::from_json(&json)?)
}

impl FileStorage {
    /// Use `dir` as the library, creating it when missing.
    pub fn new(dir: PathBuf) -> StorageResult<Self> {
        fs::create_dir_all(&dir).map_err(|e| io_error(&dir, e))?;
        Ok(Self { dir })
    }

    /// `<local data dir>/cardforge/templates`, or under the home directory
    /// on platforms without a data dir.
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Unavailable("no data or home directory".to_string()))?;
        Self::new(base.join("cardforge").join("templates"))
    }

    pub fn base_path(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key).with_extension(EXTENSION)
    }
}

impl Storage for FileStorage {
    fn save(
        &self,
        name: &str,
        template: &Template,
    ) -> BoxFuture<'_, StorageResult<TemplateSummary>> {
        let prepared = library_key(name).and_then(|key| {
            let json = template.to_json()?;
            Ok((TemplateSummary::of(key, template), json))
        });
        Box::pin(async move {
            let (summary, json) = prepared?;
            let path = self.path_for(&summary.key);
            fs::write(&path, json).map_err(|e| io_error(&path, e))?;
            log::info!("Filed template at {}", path.display());
            Ok(summary)
        })
    }

    fn load(&self, name: &str) -> BoxFuture<'_, StorageResult<Template>> {
        let key = library_key(name);
        Box::pin(async move {
            let key = key?;
            let path = self.path_for(&key);
            match read_template(&path) {
                Err(StorageError::Io { .. }) if !path.exists() => Err(StorageError::NotFound(key)),
                other => other,
            }
        })
    }

    fn delete(&self, name: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = library_key(name);
        Box::pin(async move {
            let path = self.path_for(&key?);
            match fs::remove_file(&path) {
                Ok(()) => {
                    log::info!("Removed {}", path.display());
                    Ok(())
                }
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(io_error(&path, e)),
            }
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<TemplateSummary>>> {
        Box::pin(async move {
            let entries = fs::read_dir(&self.dir).map_err(|e| io_error(&self.dir, e))?;
            let mut summaries = Vec::new();
            for path in entries.flatten().map(|entry| entry.path()) {
                if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                    continue;
                }
                match read_template(&path) {
                    Ok(template) => summaries.push(TemplateSummary::of(name_of(&path), &template)),
                    Err(e) => {
                        log::warn!("Skipping unreadable library entry {}: {e}", path.display())
                    }
                }
            }
            summaries.sort_by(|a, b| a.key.cmp(&b.key));
            Ok(summaries)
        })
    }

    fn find(&self, name: &str) -> BoxFuture<'_, StorageResult<Option<TemplateSummary>>> {
        let key = library_key(name);
        Box::pin(async move {
            let key = key?;
            let path = self.path_for(&key);
            if !path.exists() {
                return Ok(None);
            }
            let template = read_template(&path)?;
            Ok(Some(TemplateSummary::of(key, &template)))
        })
    }
}

fn name_of(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardData;
    use crate::config::BarcodeConfig;
    use pollster::block_on;
    use tempfile::tempdir;

    fn sample(nic: &str) -> Template {
        Template {
            card_data: Some(CardData {
                full_name: "Kamala Silva".into(),
                nic: nic.into(),
                ..Default::default()
            }),
            barcode_config: Some(BarcodeConfig {
                height: 64.0,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_save_files_under_key() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("library")).unwrap();

        let summary = block_on(storage.save("Front Office", &sample("1"))).unwrap();
        assert_eq!(summary.key, "front_office");
        assert_eq!(summary.full_name, "Kamala Silva");
        assert!(dir.path().join("library").join("front_office.json").exists());
        assert_eq!(block_on(storage.load("front office")).unwrap(), sample("1"));
    }

    #[test]
    fn test_missing_entry() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        assert!(matches!(block_on(storage.load("nobody")), Err(StorageError::NotFound(_))));
        assert_eq!(block_on(storage.find("nobody")).unwrap(), None);
        block_on(storage.delete("nobody")).unwrap();
    }

    #[test]
    fn test_corrupt_entry_fails_load_and_is_skipped_by_list() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        block_on(storage.save("good", &sample("2"))).unwrap();
        fs::write(dir.path().join("broken.json"), "{oops").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        assert!(matches!(block_on(storage.load("broken")), Err(StorageError::Template(_))));
        let list = block_on(storage.list()).unwrap();
        let keys: Vec<_> = list.into_iter().map(|s| s.key).collect();
        assert_eq!(keys, vec!["good".to_string()]);
    }

    #[test]
    fn test_list_sorted_with_metadata() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        block_on(storage.save("b", &sample("200V"))).unwrap();
        block_on(storage.save("a", &sample("100V"))).unwrap();

        let list = block_on(storage.list()).unwrap();
        let nics: Vec<_> = list.iter().map(|s| (s.key.as_str(), s.nic.as_str())).collect();
        assert_eq!(nics, vec![("a", "100V"), ("b", "200V")]);
    }

    #[test]
    fn test_delete_then_find() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        block_on(storage.save("clerk", &sample("3"))).unwrap();
        assert_eq!(block_on(storage.find("Clerk")).unwrap().unwrap().nic, "3");
        block_on(storage.delete("clerk")).unwrap();
        assert_eq!(block_on(storage.find("clerk")).unwrap(), None);
    }
}
