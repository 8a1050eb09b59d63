/// On-disk daylog record and the in-memory task mutations
///
/// A daylog file is always read in full, mutated in memory and written back in
/// full. Writes go through a hidden sibling temp file that is renamed over the
/// target, so a failed write leaves the previous content in place.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{DaylogError, DaylogResult};

/// Title of the task every new daylog is seeded with
pub const SEED_TASK: &str = "wake up";

/// Extension used for daylog files created by this tool
pub const EXTENSION: &str = "yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Task {
    pub title: String,
    pub status: bool,
}

impl Task {
    pub fn pending(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: false,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Daylog {
    pub date: String,
    pub tasks: Vec<Task>,
}

impl Daylog {
    /// Fresh daylog holding the completed seed task
    pub fn seeded(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            tasks: vec![Task {
                title: SEED_TASK.to_string(),
                status: true,
            }],
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, index: usize) -> DaylogResult<&Task> {
        self.tasks.get(index).ok_or(DaylogError::IndexOutOfRange {
            index,
            len: self.tasks.len(),
        })
    }

    /// Append a pending task, returning its index
    pub fn push(&mut self, task: Task) -> usize {
        self.tasks.push(task);
        self.tasks.len() - 1
    }

    /// Check every index against the current sequence without mutating it
    pub fn validate(&self, indices: &[usize]) -> DaylogResult<BTreeSet<usize>> {
        let mut unique = BTreeSet::new();
        for &index in indices {
            self.get(index)?;
            unique.insert(index);
        }
        Ok(unique)
    }

    /// Flip the status once per supplied index, so a repeated index cancels out
    pub fn toggle(&mut self, indices: &[usize]) -> DaylogResult<()> {
        self.validate(indices)?;
        for &index in indices {
            let task = &mut self.tasks[index];
            task.status = !task.status;
        }
        Ok(())
    }

    /// Remove exactly the named tasks, returned in their original order
    ///
    /// Deletion runs from the highest index down so earlier removals never
    /// shift the position of a task that is still pending removal.
    pub fn remove(&mut self, indices: &[usize]) -> DaylogResult<Vec<Task>> {
        let unique = self.validate(indices)?;
        let mut removed: Vec<Task> = unique
            .into_iter()
            .rev()
            .map(|index| self.tasks.remove(index))
            .collect();
        removed.reverse();
        Ok(removed)
    }

    pub fn rename(&mut self, index: usize, title: impl Into<String>) -> DaylogResult<()> {
        let len = self.tasks.len();
        let task = self
            .tasks
            .get_mut(index)
            .ok_or(DaylogError::IndexOutOfRange { index, len })?;
        task.title = title.into();
        Ok(())
    }

    pub fn parse(path: &Path, content: &str) -> DaylogResult<Self> {
        serde_yml::from_str(content).map_err(|source| DaylogError::Format {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_yaml(&self, path: &Path) -> DaylogResult<String> {
        serde_yml::to_string(self).map_err(|source| DaylogError::Encode {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read and parse a daylog file
    pub fn read(path: &Path) -> DaylogResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| DaylogError::io(path, e))?;
        Self::parse(path, &content)
    }

    /// Serialize and atomically replace the file at `path`
    pub fn write(&self, path: &Path) -> DaylogResult<()> {
        let yaml = self.to_yaml(path)?;
        write_file_atomic(path, yaml.as_bytes())?;
        tracing::debug!(path = %path.display(), tasks = self.tasks.len(), "daylog written");
        Ok(())
    }
}

/// Hidden sibling used while a write is in flight
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "daylog".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

/// Write file atomically (write to temp, then rename)
pub(crate) fn write_file_atomic(path: &Path, content: &[u8]) -> DaylogResult<()> {
    write_via_temp(path, |file| file.write_all(content))
}

/// Let `fill` write the temp file, then rename it over `path`
///
/// The temp file is removed on every failure path.
fn write_via_temp(path: &Path, fill: impl FnOnce(&mut File) -> io::Result<()>) -> DaylogResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| DaylogError::io(parent, e))?;
    }

    let temp_path = temp_path_for(path);
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| DaylogError::io(&temp_path, e))?;

    let written = fill(&mut file).and_then(|_| file.sync_all());
    drop(file);
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(DaylogError::io(&temp_path, e));
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(DaylogError::io(path, e));
    }

    Ok(())
}
