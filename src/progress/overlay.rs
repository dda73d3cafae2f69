//! Persisted progress overlay
//!
//! The overlay is a flat JSON object keyed by chapter id, plus a top-level
//! `totalProgress`:
//!
//! ```json
//! { "chapter-1": { "progress": 75, "completed": ["module-1"] }, "totalProgress": 38 }
//! ```
//!
//! Values are kept as raw integers so that out-of-range data survives decoding
//! and can be clamped (and reported) when it is applied to a course. Each entry
//! is decoded on its own: a malformed entry is logged and skipped, and the rest
//! of the overlay is kept.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

/// Key of the overall progress value
const TOTAL_KEY: &str = "totalProgress";

/// Key of the list-shaped layout written by older versions
const LISTED_KEY: &str = "chapters";

/// Stored progress for one chapter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChapterProgress {
    /// Chapter progress (expected 0-100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<i64>,

    /// Ids of completed subsections
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub completed: BTreeSet<String>,
}

/// Progress persisted separately from the course document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProgressOverlay {
    /// Overall course progress (expected 0-100)
    #[serde(rename = "totalProgress", skip_serializing_if = "Option::is_none")]
    pub total_progress: Option<i64>,

    /// Per-chapter progress keyed by chapter id
    #[serde(flatten)]
    pub chapters: BTreeMap<String, ChapterProgress>,
}

/// A partial overlay produced by one completion event.
///
/// Patches have the same shape as the overlay and are merged into it.
pub type OverlayPatch = ProgressOverlay;

/// Stored overlay text that cannot be read at all
#[derive(Debug, Error)]
pub enum OverlayError {
    /// Not valid JSON
    #[error("Progress overlay is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Valid JSON, but not an object
    #[error("Progress overlay is not a JSON object")]
    NotAnObject,
}

impl ProgressOverlay {
    /// Decode an overlay.
    ///
    /// Also accepts the older `{"chapters": [{"id", "progress", "subsections"}]}`
    /// layout; entries keyed directly by chapter id take precedence over it.
    /// Only text that is not a JSON object is an error.
    pub fn from_json(json: &str) -> Result<Self, OverlayError> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(map) = value else {
            return Err(OverlayError::NotAnObject);
        };

        let mut overlay = Self::default();
        let mut listed = None;

        for (key, value) in map {
            match key.as_str() {
                TOTAL_KEY => match progress_value(&value) {
                    Some(total) => overlay.total_progress = total,
                    None => warn!(value = %value, "ignoring unreadable total progress"),
                },
                LISTED_KEY if value.is_array() => listed = Some(value),
                _ => match value {
                    Value::Object(entry) => {
                        let progress = chapter_entry(&key, &entry);
                        overlay.chapters.insert(key, progress);
                    }
                    other => warn!(key = %key, value = %other, "ignoring unknown overlay entry"),
                },
            }
        }

        if let Some(Value::Array(items)) = listed {
            for item in &items {
                overlay.merge_listed(item);
            }
        }

        Ok(overlay)
    }

    /// Fold one entry of the list layout in, without overriding flat entries
    fn merge_listed(&mut self, item: &Value) {
        let Some(id) = item.get("id").and_then(Value::as_str) else {
            warn!(value = %item, "ignoring listed chapter without an id");
            return;
        };

        let progress = item.get("progress").and_then(|v| progress_value(v).flatten());
        let completed = item
            .get("subsections")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter(|s| s.get("completed").and_then(Value::as_bool) == Some(true))
            .filter_map(|s| s.get("id").and_then(Value::as_str))
            .map(str::to_string);

        let entry = self.chapters.entry(id.to_string()).or_default();
        if entry.progress.is_none() {
            entry.progress = progress;
        }
        entry.completed.extend(completed);
    }

    /// Encode the overlay as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Stored entry for a chapter
    pub fn chapter(&self, chapter_id: &str) -> Option<&ChapterProgress> {
        self.chapters.get(chapter_id)
    }

    /// Merge a patch into this overlay.
    ///
    /// Chapter progress and the total are overwritten when the patch carries
    /// them; completed subsections accumulate. Chapters absent from the patch
    /// are left alone.
    pub fn merge(&mut self, patch: &OverlayPatch) {
        for (chapter_id, incoming) in &patch.chapters {
            let entry = self.chapters.entry(chapter_id.clone()).or_default();
            if incoming.progress.is_some() {
                entry.progress = incoming.progress;
            }
            entry.completed.extend(incoming.completed.iter().cloned());
        }

        if patch.total_progress.is_some() {
            self.total_progress = patch.total_progress;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_progress.is_none() && self.chapters.is_empty()
    }
}

/// Read a progress number: `Some(None)` for null, `None` if unreadable.
///
/// Fractions are rounded; range is checked later, when the value is applied.
fn progress_value(value: &Value) -> Option<Option<i64>> {
    match value {
        Value::Null => Some(None),
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)).map(Some),
        _ => None,
    }
}

fn chapter_entry(chapter_id: &str, entry: &Map<String, Value>) -> ChapterProgress {
    let progress = match entry.get("progress") {
        None => None,
        Some(value) => progress_value(value).unwrap_or_else(|| {
            warn!(chapter_id, value = %value, "ignoring unreadable chapter progress");
            None
        }),
    };

    let completed = match entry.get("completed") {
        None | Some(Value::Null) => BTreeSet::new(),
        Some(Value::Array(ids)) => ids.iter().filter_map(Value::as_str).map(str::to_string).collect(),
        Some(other) => {
            warn!(chapter_id, value = %other, "ignoring unreadable completed list");
            BTreeSet::new()
        }
    };

    ChapterProgress { progress, completed }
}
