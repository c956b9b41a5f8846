//! Save-game persistence.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::game::GameSnapshot;

/// Metadata describing a persisted session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaveEntry {
    /// Absolute path to the save file on disk.
    pub path: PathBuf,
    /// Human readable save name.
    pub name: String,
    /// Planet the player was docked at.
    pub planet: String,
    /// Turn number at the time of saving.
    pub turn: u32,
    /// Credit balance at the time of saving.
    pub credits: f64,
    /// Timestamp when the save was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Serialized representation of a save file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavePayload {
    name: String,
    saved_at: DateTime<Utc>,
    snapshot: GameSnapshot,
}

impl SavePayload {
    fn new(name: Option<&str>, snapshot: GameSnapshot) -> Self {
        let display_name = name
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(|value| value.to_string())
            .unwrap_or_else(|| format!("Captain at {}", snapshot.current_planet));
        Self {
            name: display_name,
            saved_at: Utc::now(),
            snapshot,
        }
    }

    /// Name given to the save.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Borrow the stored game state without consuming the payload.
    pub fn snapshot(&self) -> &GameSnapshot {
        &self.snapshot
    }

    /// Consume the payload and return the stored game state.
    pub fn into_snapshot(self) -> GameSnapshot {
        self.snapshot
    }

    fn entry(&self, path: PathBuf) -> SaveEntry {
        SaveEntry {
            path,
            name: self.name.clone(),
            planet: self.snapshot.current_planet.clone(),
            turn: self.snapshot.player.turn(),
            credits: self.snapshot.player.credits(),
            updated_at: self.saved_at,
        }
    }
}

/// Manager responsible for loading and writing save files.
pub struct SaveManager {
    root: PathBuf,
}

impl SaveManager {
    /// Create a new manager rooted at the provided directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the save files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return all known saves sorted by timestamp (most recent first).
    pub fn entries(&self) -> Result<Vec<SaveEntry>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.root).context("failed to read save directory")? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if entry.path().extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            match self.read_payload(entry.path()) {
                Ok(payload) => entries.push(payload.entry(entry.path())),
                Err(err) => {
                    warn!("Failed to read save {:?}: {err:#}", entry.path());
                }
            }
        }

        entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(entries)
    }

    /// Write a new save file and return its entry.
    pub fn create_save(&self, name: Option<&str>, snapshot: GameSnapshot) -> Result<SaveEntry> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create {}", self.root.display()))?;

        let payload = SavePayload::new(name, snapshot);
        let file_name = format!(
            "{}_{}.json",
            sanitize_component(&payload.name),
            payload.saved_at.format("%Y%m%d%H%M%S%3f")
        );
        let path = self.root.join(file_name);
        self.write_payload(&path, &payload)?;
        info!(save = %path.display(), "save created");
        Ok(payload.entry(path))
    }

    /// Overwrite an existing save with updated state while refreshing metadata.
    pub fn update_save(&self, entry: &SaveEntry, snapshot: GameSnapshot) -> Result<SaveEntry> {
        let mut payload = self.read_payload(&entry.path)?;
        payload.snapshot = snapshot;
        payload.saved_at = Utc::now();
        self.write_payload(&entry.path, &payload)?;
        Ok(payload.entry(entry.path.clone()))
    }

    /// Load payload for the provided entry.
    pub fn load(&self, entry: &SaveEntry) -> Result<SavePayload> {
        self.read_payload(&entry.path)
    }

    /// Load most recent save entry, if any.
    pub fn latest(&self) -> Result<Option<SaveEntry>> {
        let entries = self.entries()?;
        Ok(entries.into_iter().next())
    }

    fn write_payload(&self, path: &Path, payload: &SavePayload) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let serialised = serde_json::to_vec_pretty(payload)?;
        fs::write(path, serialised).with_context(|| format!("failed to write {}", path.display()))
    }

    fn read_payload(&self, path: impl AsRef<Path>) -> Result<SavePayload> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let payload = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(payload)
    }
}

fn sanitize_component(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_') {
            result.push(ch);
        }
    }
    if result.is_empty() {
        "save".to_string()
    } else {
        result
    }
}
