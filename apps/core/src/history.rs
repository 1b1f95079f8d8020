//! Per-processor command history: a persisted, deduplicated,
//! most-recent-first store plus a prefix-scoped navigation cursor.

use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::logging;
use crate::processor::ProcessorInput;

pub const DEFAULT_MAX_ENTRIES: usize = 1000;

#[derive(Debug)]
pub enum HistoryError {
    Io(std::io::Error),
    Format(serde_json::Error),
}

impl Display for HistoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(error) => write!(f, "history io error: {error}"),
            Self::Format(error) => write!(f, "history format error: {error}"),
        }
    }
}

impl std::error::Error for HistoryError {}

impl From<std::io::Error> for HistoryError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for HistoryError {
    fn from(value: serde_json::Error) -> Self {
        Self::Format(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistEntry {
    pub cmd: String,
    pub row: Option<String>,
}

/// On-disk shape of one entry. The legacy format stored bare command
/// strings; newer files store `[cmd, row]` pairs.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Bare(String),
    WithRow(String, Option<String>),
}

/// Persisted, capped, most-recent-first list of history entries,
/// deduplicated by command text.
pub struct HistStore {
    path: PathBuf,
    max_entries: usize,
    save_rownum: Option<usize>,
    entries: Vec<HistEntry>,
}

impl HistStore {
    /// Loads the store from `path`, tolerating a missing file and the legacy
    /// bare-string list format. `save_rownum` selects which result-row
    /// column is remembered alongside each committed command.
    pub fn open(
        path: &Path,
        max_entries: usize,
        save_rownum: Option<usize>,
    ) -> Result<Self, HistoryError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let entries = load_entries(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            max_entries,
            save_rownum,
            entries,
        })
    }

    pub fn save_rownum(&self) -> Option<usize> {
        self.save_rownum
    }

    /// Entry at `index` within the prefix-scoped view, `None` when out of
    /// range. An empty prefix selects all entries.
    pub fn get(&self, prefix: &str, index: usize) -> Option<&HistEntry> {
        self.filtered(prefix).into_iter().nth(index)
    }

    pub fn len(&self, prefix: &str) -> usize {
        self.filtered(prefix).len()
    }

    pub fn is_empty(&self, prefix: &str) -> bool {
        self.len(prefix) == 0
    }

    /// Prepends a trimmed command, dropping any older duplicate and
    /// truncating to the cap, then rewrites the whole file.
    pub fn add(&mut self, cmd: &str, row: Option<String>) {
        let cmd = cmd.trim().to_string();
        let mut rebuilt = vec![HistEntry { cmd, row }];
        for entry in &self.entries {
            if rebuilt.len() >= self.max_entries {
                break;
            }
            if rebuilt.iter().any(|kept| kept.cmd == entry.cmd) {
                continue;
            }
            rebuilt.push(entry.clone());
        }
        self.entries = rebuilt;
        self.save();
    }

    fn filtered(&self, prefix: &str) -> Vec<&HistEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.cmd.starts_with(prefix))
            .collect()
    }

    fn save(&self) {
        let stored: Vec<StoredEntry> = self
            .entries
            .iter()
            .map(|entry| match self.save_rownum {
                Some(_) => StoredEntry::WithRow(entry.cmd.clone(), entry.row.clone()),
                None => StoredEntry::Bare(entry.cmd.clone()),
            })
            .collect();
        let encoded = match serde_json::to_string(&stored) {
            Ok(encoded) => encoded,
            Err(error) => {
                logging::warn(&format!("history encode failed: {error}"));
                return;
            }
        };
        // A failed mid-session write must not interrupt the interaction.
        if let Err(error) = fs::write(&self.path, encoded) {
            logging::warn(&format!(
                "history write failed for {}: {error}",
                self.path.display()
            ));
        }
    }
}

fn load_entries(path: &Path) -> Result<Vec<HistEntry>, HistoryError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(error) => return Err(error.into()),
    };
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let stored: Vec<StoredEntry> = serde_json::from_str(&raw)?;
    Ok(stored
        .into_iter()
        .map(|entry| match entry {
            StoredEntry::Bare(cmd) => HistEntry { cmd, row: None },
            StoredEntry::WithRow(cmd, row) => HistEntry { cmd, row },
        })
        .collect())
}

/// Stateful cursor over a [`HistStore`]. Navigation is scoped to a sticky
/// command prefix so that typing inside an already-navigated session does
/// not change which entries are visible.
pub struct HistManager {
    store: HistStore,
    pointer: isize,
    cmd_prefix: Option<String>,
}

impl HistManager {
    pub fn open(path: &Path, save_rownum: Option<usize>) -> Result<Self, HistoryError> {
        let store = HistStore::open(path, DEFAULT_MAX_ENTRIES, save_rownum)?;
        Ok(Self::with_store(store))
    }

    pub fn with_store(store: HistStore) -> Self {
        let mut manager = Self {
            store,
            pointer: -1,
            cmd_prefix: None,
        };
        manager.reset();
        manager
    }

    pub fn store(&self) -> &HistStore {
        &self.store
    }

    /// Records the committed command, remembering the selected row when the
    /// store was opened with a row column.
    pub fn add(&mut self, input: &ProcessorInput) {
        let row = self
            .store
            .save_rownum()
            .map(|col| input.selrow_text(col));
        self.store.add(&input.cmd, row);
    }

    /// Index of the most recent entry's remembered row among `rows`, used to
    /// restore the previous selection in a freshly rendered list.
    pub fn match_to_row(&self, cmd_prefix: &str, rows: &[String]) -> Option<usize> {
        let entry = self.store.get(cmd_prefix, 0)?;
        let row = entry.row.as_deref().filter(|row| !row.is_empty())?;
        rows.iter().position(|candidate| candidate == row)
    }

    pub fn reset(&mut self) {
        self.pointer = -1;
        self.cmd_prefix = None;
    }

    pub fn get_next_entry(&mut self, cmd_prefix: &str) -> Option<HistEntry> {
        self.try_set_cmd_prefix(cmd_prefix);
        self.pointer += 1;
        let len = self.scoped_len() as isize;
        if self.pointer >= len {
            self.pointer = len - 1;
        }
        if len == 0 {
            return None;
        }
        self.store.get(self.scope(), self.pointer as usize).cloned()
    }

    pub fn get_next_cmd(&mut self, cmd_prefix: &str) -> Option<String> {
        self.get_next_entry(cmd_prefix).map(|entry| entry.cmd)
    }

    pub fn get_prev_entry(&mut self, cmd_prefix: &str) -> Option<HistEntry> {
        self.try_set_cmd_prefix(cmd_prefix);
        self.pointer -= 1;
        if self.pointer < 0 {
            self.pointer = 0;
        }
        if self.scoped_len() == 0 {
            return None;
        }
        self.store.get(self.scope(), self.pointer as usize).cloned()
    }

    pub fn get_prev_cmd(&mut self, cmd_prefix: &str) -> Option<String> {
        self.get_prev_entry(cmd_prefix).map(|entry| entry.cmd)
    }

    fn scope(&self) -> &str {
        self.cmd_prefix.as_deref().unwrap_or("")
    }

    fn scoped_len(&self) -> usize {
        self.store.len(self.scope())
    }

    /// Prefix lock: adopt the requested prefix when no lock is held or the
    /// locked scope is empty; an explicit empty prefix releases the lock;
    /// otherwise the existing lock is kept.
    fn try_set_cmd_prefix(&mut self, cmd_prefix: &str) {
        let should_set = self.cmd_prefix.is_none() || self.scoped_len() == 0;
        if should_set {
            self.cmd_prefix = Some(cmd_prefix.to_string());
        } else if cmd_prefix.is_empty() {
            self.cmd_prefix = None;
        }
    }
}
