//! Library kept in process memory.

use super::{BoxFuture, Storage, StorageError, StorageResult, TemplateSummary, library_key};
use crate::template::Template;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Library for tests and sessions that never touch disk.
#[derive(Default)]
pub struct MemoryStorage {
    templates: RwLock<BTreeMap<String, Template>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, BTreeMap<String, Template>>> {
        self.templates
            .read()
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, BTreeMap<String, Template>>> {
        self.templates
            .write()
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }
}

impl Storage for MemoryStorage {
    fn save(
        &self,
        name: &str,
        template: &Template,
    ) -> BoxFuture<'_, StorageResult<TemplateSummary>> {
        let key = library_key(name);
        let template = template.clone();
        Box::pin(async move {
            let key = key?;
            let summary = TemplateSummary::of(key.clone(), &template);
            self.write()?.insert(key, template);
            Ok(summary)
        })
    }

    fn load(&self, name: &str) -> BoxFuture<'_, StorageResult<Template>> {
        let key = library_key(name);
        Box::pin(async move {
            let key = key?;
            let templates = self.read()?;
            templates.get(&key).cloned().ok_or(StorageError::NotFound(key))
        })
    }

    fn delete(&self, name: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = library_key(name);
        Box::pin(async move {
            self.write()?.remove(&key?);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<TemplateSummary>>> {
        Box::pin(async move {
            let templates = self.read()?;
            Ok(templates
                .iter()
                .map(|(key, template)| TemplateSummary::of(key.clone(), template))
                .collect())
        })
    }

    fn find(&self, name: &str) -> BoxFuture<'_, StorageResult<Option<TemplateSummary>>> {
        let key = library_key(name);
        Box::pin(async move {
            let key = key?;
            let templates = self.read()?;
            Ok(templates.get(&key).map(|t| TemplateSummary::of(key.clone(), t)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardData;
    use pollster::block_on;

    fn holder(name: &str) -> Template {
        Template {
            card_data: Some(CardData {
                full_name: name.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_names_share_a_key() {
        let storage = MemoryStorage::new();
        let summary = block_on(storage.save("Front Desk", &holder("Kamal"))).unwrap();
        assert_eq!(summary.key, "front_desk");
        assert_eq!(block_on(storage.load("front_desk")).unwrap(), holder("Kamal"));
    }

    #[test]
    fn test_missing_entry() {
        let storage = MemoryStorage::new();
        assert!(matches!(block_on(storage.load("nobody")), Err(StorageError::NotFound(_))));
        assert_eq!(block_on(storage.find("nobody")).unwrap(), None);
        block_on(storage.delete("nobody")).unwrap();
    }

    #[test]
    fn test_list_summaries_sorted_by_key() {
        let storage = MemoryStorage::new();
        block_on(storage.save("Zonal", &holder("Sunil"))).unwrap();
        block_on(storage.save("Admin", &holder("Amara"))).unwrap();
        let names: Vec<_> = block_on(storage.list())
            .unwrap()
            .into_iter()
            .map(|s| (s.key, s.full_name))
            .collect();
        assert_eq!(
            names,
            vec![
                ("admin".to_string(), "Amara".to_string()),
                ("zonal".to_string(), "Sunil".to_string()),
            ]
        );
    }

    #[test]
    fn test_save_replaces_and_find_reports() {
        let storage = MemoryStorage::new();
        block_on(storage.save("clerk", &holder("Old"))).unwrap();
        block_on(storage.save("Clerk", &holder("New"))).unwrap();
        let found = block_on(storage.find("CLERK")).unwrap().unwrap();
        assert_eq!(found.full_name, "New");
        assert_eq!(block_on(storage.list()).unwrap().len(), 1);
    }
}
