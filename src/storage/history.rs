//! History of generated texts.
//!
//! The whole table lives in one pretty-printed JSON array. Writes go to a
//! sibling temp file that is then renamed over the original, so a crash
//! mid-write leaves the previous history intact.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::error::ReaderError;

const DAY_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Assigned by the store on insert; 0 means "not stored yet"
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub synopsis: String,
    pub text: String,
    /// Word count requested from the generator, not the count received
    pub number_of_words: u32,
    pub language: String,
}

impl HistoryRecord {
    pub fn new(
        synopsis: impl Into<String>,
        text: impl Into<String>,
        number_of_words: u32,
        language: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            created_at: Utc::now(),
            synopsis: synopsis.into(),
            text: text.into(),
            number_of_words,
            language: language.into(),
        }
    }
}

pub trait HistoryStore {
    /// All records in insertion order.
    fn get_all(&self) -> Result<Vec<HistoryRecord>, ReaderError>;

    /// Stores `record`, assigning an id when it has none. Returns the stored record.
    fn insert(&mut self, record: HistoryRecord) -> Result<HistoryRecord, ReaderError>;

    /// Removes the record with the same id. Returns false if none matched.
    fn delete(&mut self, record: &HistoryRecord) -> Result<bool, ReaderError>;

    fn delete_all(&mut self) -> Result<(), ReaderError>;

    fn find(&self, id: u64) -> Result<Option<HistoryRecord>, ReaderError> {
        Ok(self.get_all()?.into_iter().find(|r| r.id == id))
    }
}

#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<HistoryRecord>, ReaderError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path).map_err(|e| ReaderError::io(&self.path, e))?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&contents).map_err(|source| ReaderError::Json {
            path: self.path.clone(),
            source,
        })
    }

    fn write(&self, records: &[HistoryRecord]) -> Result<(), ReaderError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ReaderError::io(parent, e))?;
            }
        }

        let json = serde_json::to_string_pretty(records).map_err(|source| ReaderError::Json {
            path: self.path.clone(),
            source,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| ReaderError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| ReaderError::io(&self.path, e))
    }
}

impl HistoryStore for JsonHistoryStore {
    fn get_all(&self) -> Result<Vec<HistoryRecord>, ReaderError> {
        self.read()
    }

    fn insert(&mut self, mut record: HistoryRecord) -> Result<HistoryRecord, ReaderError> {
        let mut records = self.read()?;
        if record.id == 0 {
            record.id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        } else if records.iter().any(|r| r.id == record.id) {
            return Err(ReaderError::DuplicateRecord(record.id));
        }

        records.push(record.clone());
        self.write(&records)?;
        tracing::info!(id = record.id, words = record.number_of_words, "history record stored");
        Ok(record)
    }

    fn delete(&mut self, record: &HistoryRecord) -> Result<bool, ReaderError> {
        let mut records = self.read()?;
        let before = records.len();
        records.retain(|r| r.id != record.id);
        if records.len() == before {
            return Ok(false);
        }
        self.write(&records)?;
        tracing::info!(id = record.id, "history record deleted");
        Ok(true)
    }

    fn delete_all(&mut self) -> Result<(), ReaderError> {
        self.write(&[])?;
        tracing::info!("history cleared");
        Ok(())
    }
}

/// One row of the history listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryItem {
    Header(String),
    Record(HistoryRecord),
}

/// Newest first, with a `dd/MM/yyyy` header before each day's records.
pub fn group_by_day(records: &[HistoryRecord]) -> Vec<HistoryItem> {
    group_by_day_in(records, &Local)
}

pub fn group_by_day_in<Tz: TimeZone>(records: &[HistoryRecord], tz: &Tz) -> Vec<HistoryItem>
where
    Tz::Offset: std::fmt::Display,
{
    let mut groups: Vec<(String, Vec<&HistoryRecord>)> = Vec::new();
    for record in records.iter().rev() {
        let day = record
            .created_at
            .with_timezone(tz)
            .format(DAY_FORMAT)
            .to_string();
        match groups.iter_mut().find(|(key, _)| *key == day) {
            Some((_, group)) => group.push(record),
            None => groups.push((day, vec![record])),
        }
    }

    groups
        .into_iter()
        .flat_map(|(day, group)| {
            std::iter::once(HistoryItem::Header(day))
                .chain(group.into_iter().cloned().map(HistoryItem::Record))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record_at(synopsis: &str, y: i32, m: u32, d: u32, h: u32) -> HistoryRecord {
        HistoryRecord {
            created_at: Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap(),
            ..HistoryRecord::new(synopsis, format!("story about {synopsis}"), 600, "English")
        }
    }

    fn store() -> (tempfile::TempDir, JsonHistoryStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonHistoryStore::new(dir.path().join("nested").join("history.json"));
        (dir, store)
    }

    #[test]
    fn test_missing_file_is_empty_history() {
        let (_dir, store) = store();
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let (_dir, mut store) = store();
        let first = store.insert(HistoryRecord::new("a", "x", 600, "English")).unwrap();
        let second = store.insert(HistoryRecord::new("b", "y", 300, "English")).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let all = store.get_all().unwrap();
        assert_eq!(all, vec![first, second]);
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let (_dir, mut store) = store();
        let stored = store.insert(HistoryRecord::new("a", "x", 600, "English")).unwrap();
        assert!(matches!(
            store.insert(stored),
            Err(ReaderError::DuplicateRecord(1))
        ));
    }

    #[test]
    fn test_ids_are_not_reused_after_delete_of_older() {
        let (_dir, mut store) = store();
        let first = store.insert(HistoryRecord::new("a", "x", 600, "English")).unwrap();
        store.insert(HistoryRecord::new("b", "y", 600, "English")).unwrap();
        store.delete(&first).unwrap();

        let third = store.insert(HistoryRecord::new("c", "z", 600, "English")).unwrap();
        assert_eq!(third.id, 3);
    }

    #[test]
    fn test_delete_and_find() {
        let (_dir, mut store) = store();
        let first = store.insert(HistoryRecord::new("a", "x", 600, "English")).unwrap();
        let second = store.insert(HistoryRecord::new("b", "y", 600, "English")).unwrap();

        assert!(store.delete(&first).unwrap());
        assert!(!store.delete(&first).unwrap());
        assert_eq!(store.find(first.id).unwrap(), None);
        assert_eq!(store.find(second.id).unwrap(), Some(second));
    }

    #[test]
    fn test_delete_all() {
        let (_dir, mut store) = store();
        store.insert(HistoryRecord::new("a", "x", 600, "English")).unwrap();
        store.insert(HistoryRecord::new("b", "y", 600, "English")).unwrap();
        store.delete_all().unwrap();
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_persists_across_instances() {
        let (_dir, mut store) = store();
        let stored = store
            .insert(HistoryRecord::new("dragons", "Once upon a time", 600, "Português"))
            .unwrap();

        let reopened = JsonHistoryStore::new(store.path());
        assert_eq!(reopened.get_all().unwrap(), vec![stored]);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let (dir, _) = store();
        let path = dir.path().join("history.json");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonHistoryStore::new(&path);
        assert!(matches!(store.get_all(), Err(ReaderError::Json { .. })));
    }

    #[test]
    fn test_group_by_day_newest_first() {
        let records = vec![
            record_at("one", 2024, 3, 1, 9),
            record_at("two", 2024, 3, 1, 18),
            record_at("three", 2024, 3, 2, 12),
        ];

        let items = group_by_day_in(&records, &Utc);
        assert_eq!(
            items,
            vec![
                HistoryItem::Header("02/03/2024".to_string()),
                HistoryItem::Record(records[2].clone()),
                HistoryItem::Header("01/03/2024".to_string()),
                HistoryItem::Record(records[1].clone()),
                HistoryItem::Record(records[0].clone()),
            ]
        );
    }

    #[test]
    fn test_group_by_day_empty() {
        assert!(group_by_day_in(&[], &Utc).is_empty());
    }
}
