//! Append-only JSON-Lines storage
//!
//! Every store is a single file holding one JSON object per line. Records are
//! only ever appended; loading reads the file top to bottom. A line that cannot
//! be decoded is skipped and reported rather than failing the whole load, so a
//! single damaged record never hides the rest of the store.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// A line that was skipped while loading a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the file
    pub line: usize,
    pub reason: String,
}

/// Result of reading a whole store
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    /// Successfully decoded records, in file order
    pub records: Vec<T>,
    pub skipped: Vec<SkippedLine>,
}

impl<T> Default for Loaded<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Handles appending records to and loading records from one JSON-Lines file
#[derive(Debug)]
pub struct JsonLinesStore<T> {
    path: PathBuf,
    kind: &'static str,
    _record: PhantomData<fn() -> T>,
}

impl<T> JsonLinesStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Creates a store backed by `path`; nothing is touched on disk yet
    pub fn new<P: AsRef<Path>>(path: P, kind: &'static str) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            kind,
            _record: PhantomData,
        }
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every decodable record in file order
    ///
    /// A missing file is an empty store. Blank lines are ignored, malformed
    /// lines (bad JSON, wrong shape, invalid UTF-8) are skipped.
    pub fn load(&self) -> Result<Loaded<T>, StoreError> {
        if !self.path.exists() {
            debug!("No {} store at {}, starting empty", self.kind, self.path.display());
            return Ok(Loaded::default());
        }

        let read_err = |source: std::io::Error| StoreError::Read {
            path: self.path.clone(),
            source,
        };

        let file = File::open(&self.path).map_err(read_err)?;
        let mut reader = BufReader::new(file);
        let mut loaded = Loaded::default();
        let mut buf = Vec::new();
        let mut line_no = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).map_err(read_err)? == 0 {
                break;
            }
            line_no += 1;

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line.trim(),
                Err(e) => {
                    self.skip(&mut loaded, line_no, e.to_string());
                    continue;
                }
            };
            if line.is_empty() {
                continue;
            }

            match serde_json::from_str::<T>(line) {
                Ok(record) => loaded.records.push(record),
                Err(e) => self.skip(&mut loaded, line_no, e.to_string()),
            }
        }

        debug!(
            "Loaded {} {} record(s) from {} ({} skipped)",
            loaded.records.len(),
            self.kind,
            self.path.display(),
            loaded.skipped.len()
        );

        Ok(loaded)
    }

    /// Appends one record as a new line
    ///
    /// The record is serialized before the file is opened, so a serialization
    /// failure never leaves a partial line behind. If the previous write was
    /// cut short and the file does not end in a newline, one is inserted first
    /// so the new record does not merge with the damaged one.
    pub fn append(&self, record: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(record).map_err(|source| StoreError::Serialize {
            kind: self.kind,
            source,
        })?;

        let write_err = |source: std::io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(write_err)?;

        let mut line = String::with_capacity(json.len() + 2);
        if !ends_with_newline(&mut file).map_err(write_err)? {
            line.push('\n');
        }
        line.push_str(&json);
        line.push('\n');

        file.write_all(line.as_bytes()).map_err(write_err)?;
        file.flush().map_err(write_err)?;

        debug!("Appended {} record to {}", self.kind, self.path.display());
        Ok(())
    }

    fn skip(&self, loaded: &mut Loaded<T>, line: usize, reason: String) {
        warn!(
            "Skipping unreadable {} record at {}:{}: {}",
            self.kind,
            self.path.display(),
            line,
            reason
        );
        loaded.skipped.push(SkippedLine { line, reason });
    }
}

/// True for an empty file or one whose last byte is `\n`
fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: u32,
        text: String,
    }

    fn note(id: u32, text: &str) -> Note {
        Note {
            id,
            text: text.to_string(),
        }
    }

    fn create_test_store() -> (JsonLinesStore<Note>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonLinesStore::new(temp_dir.path().join("notes.json"), "note");
        (store, temp_dir)
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let (store, _temp) = create_test_store();

        let loaded = store.load().unwrap();
        assert!(loaded.records.is_empty());
        assert!(loaded.skipped.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_append_and_load() {
        let (store, _temp) = create_test_store();

        store.append(&note(1, "first")).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.records, vec![note(1, "first")]);

        store.append(&note(2, "second")).unwrap();
        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.ends_with('\n'));

        let loaded = store.load().unwrap();
        assert_eq!(loaded.records, vec![note(1, "first"), note(2, "second")]);
    }

    #[test]
    fn test_append_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let store: JsonLinesStore<Note> =
            JsonLinesStore::new(temp_dir.path().join("nested/data/notes.json"), "note");

        store.append(&note(1, "deep")).unwrap();
        assert_eq!(store.load().unwrap().records.len(), 1);
    }

    #[test]
    fn test_malformed_line_is_skipped_at_any_position() {
        let valid = [note(1, "a"), note(2, "b"), note(3, "c")];

        for bad_at in 0..=valid.len() {
            let (store, _temp) = create_test_store();
            let mut lines: Vec<String> = valid
                .iter()
                .map(|n| serde_json::to_string(n).unwrap())
                .collect();
            lines.insert(bad_at, "{\"id\": 9, \"text\": ".to_string());
            fs::write(store.path(), lines.join("\n") + "\n").unwrap();

            let loaded = store.load().unwrap();
            assert_eq!(loaded.records, valid.to_vec(), "bad line at {}", bad_at);
            assert_eq!(loaded.skipped.len(), 1);
            assert_eq!(loaded.skipped[0].line, bad_at + 1);
        }
    }

    #[test]
    fn test_wrong_shape_and_invalid_utf8_are_skipped() {
        let (store, _temp) = create_test_store();
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"{\"id\":1,\"text\":\"ok\"}\n");
        bytes.extend_from_slice(b"{\"name\":\"not a note\"}\n");
        bytes.extend_from_slice(b"\xff\xfe\n");
        bytes.extend_from_slice(b"\n");
        bytes.extend_from_slice(b"{\"id\":2,\"text\":\"also ok\"}\n");
        fs::write(store.path(), bytes).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.records, vec![note(1, "ok"), note(2, "also ok")]);
        assert_eq!(loaded.skipped.len(), 2);
    }

    #[test]
    fn test_append_after_truncated_line() {
        let (store, _temp) = create_test_store();
        fs::write(store.path(), "{\"id\":1,\"text\":\"ok\"}\n{\"id\":2,\"te").unwrap();

        store.append(&note(3, "after crash")).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.records, vec![note(1, "ok"), note(3, "after crash")]);
        assert_eq!(loaded.skipped.len(), 1);
    }

    #[test]
    fn test_append_to_unwritable_path_fails() {
        let temp_dir = TempDir::new().unwrap();
        // A directory cannot be opened for appending
        let store: JsonLinesStore<Note> = JsonLinesStore::new(temp_dir.path(), "note");

        let err = store.append(&note(1, "lost")).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        assert!(err.is_write_failure());
    }
}
