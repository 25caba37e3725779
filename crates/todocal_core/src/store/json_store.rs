//! JSON file implementation of `TaskStore`.
//!
//! # Invariants
//! - A missing file is an empty collection and is not created by `load`.
//! - `save` writes a sibling temp file and renames it over the target.
//! - A failed `save` leaves no temp file behind.

use super::{decode_tasks, encode_tasks, StoreError, StoreResult, TaskStore};
use crate::model::task::Task;
use chrono::NaiveDate;
use log::{error, info, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Task store backed by one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_atomically(&self, contents: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let temp = self.temp_path();
        let written = fs::write(&temp, contents).and_then(|()| fs::rename(&temp, &self.path));
        if written.is_err() {
            if let Err(err) = fs::remove_file(&temp) {
                if err.kind() != ErrorKind::NotFound {
                    warn!(
                        "event=store_save module=store status=error mode=file error_code=temp_cleanup_failed error={}",
                        err
                    );
                }
            }
        }
        written
    }
}

impl TaskStore for JsonFileStore {
    fn load(&self, today: NaiveDate) -> Vec<Task> {
        let started_at = Instant::now();
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("event=store_load module=store status=ok mode=file missing=true count=0");
                return Vec::new();
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error mode=file error_code=read_failed error={}",
                    err
                );
                return Vec::new();
            }
        };

        let tasks = decode_tasks(&text, today).unwrap_or_default();
        info!(
            "event=store_load module=store status=ok mode=file count={} duration_ms={}",
            tasks.len(),
            started_at.elapsed().as_millis()
        );
        tasks
    }

    fn save(&self, tasks: &[Task]) -> StoreResult<()> {
        let started_at = Instant::now();
        let contents = encode_tasks(tasks)?;

        match self.write_atomically(&contents) {
            Ok(()) => {
                info!(
                    "event=store_save module=store status=ok mode=file count={} duration_ms={}",
                    tasks.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save module=store status=error mode=file error_code=write_failed error={}",
                    err
                );
                Err(StoreError::Io {
                    path: self.path.clone(),
                    source: err,
                })
            }
        }
    }
}
