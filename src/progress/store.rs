//! Reading and writing the stored overlay

use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::overlay::{OverlayPatch, ProgressOverlay};
use crate::storage::{COURSE_PROGRESS_KEY, KeyValueStore};

/// The progress overlay as kept in a [`KeyValueStore`]
#[derive(Debug, Clone)]
pub struct ProgressStore<S> {
    store: S,
}

impl<S: KeyValueStore> ProgressStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read the stored overlay.
    ///
    /// A missing overlay is `None`. Text that cannot be read as an overlay at
    /// all is logged and also treated as `None`, so it never blocks loading.
    pub fn load(&self) -> Result<Option<ProgressOverlay>> {
        let Some(raw) = self.store.get(COURSE_PROGRESS_KEY)? else {
            return Ok(None);
        };

        match ProgressOverlay::from_json(&raw) {
            Ok(overlay) => Ok(Some(overlay)),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable progress overlay");
                Ok(None)
            }
        }
    }

    /// Merge a patch into the stored overlay and write it back.
    ///
    /// This is the only write path for progress. It re-reads the overlay on
    /// every call, so a patch never wipes entries it does not mention. An
    /// overlay that cannot be read is left untouched and reported as an error.
    pub fn apply_patch(&self, patch: &OverlayPatch) -> Result<ProgressOverlay> {
        let mut overlay = match self.store.get(COURSE_PROGRESS_KEY)? {
            Some(raw) => ProgressOverlay::from_json(&raw).context(
                "Stored progress is unreadable; run `syllabus reset` to start over",
            )?,
            None => ProgressOverlay::default(),
        };
        overlay.merge(patch);

        let json = overlay.to_json().context("Failed to serialize progress overlay")?;
        self.store.set(COURSE_PROGRESS_KEY, &json)?;

        debug!(chapters = patch.chapters.len(), total = ?overlay.total_progress, "saved progress");
        Ok(overlay)
    }

    /// Forget all stored progress
    pub fn clear(&self) -> Result<()> {
        self.store.remove(COURSE_PROGRESS_KEY)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::progress::ChapterProgress;
    use crate::storage::MemoryStore;

    fn patch(chapter_id: &str, progress: i64, total: i64) -> OverlayPatch {
        let mut patch = OverlayPatch { total_progress: Some(total), ..Default::default() };
        patch
            .chapters
            .insert(chapter_id.into(), ChapterProgress { progress: Some(progress), ..Default::default() });
        patch
    }

    #[test]
    fn load_returns_none_when_empty() {
        let store = ProgressStore::new(MemoryStore::new());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn corrupt_overlay_loads_as_none() {
        let memory = MemoryStore::new();
        memory.set(COURSE_PROGRESS_KEY, "{broken").unwrap();

        let store = ProgressStore::new(memory);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn patches_accumulate() {
        let store = ProgressStore::new(MemoryStore::new());

        store.apply_patch(&patch("chapter-1", 100, 50)).unwrap();
        let overlay = store.apply_patch(&patch("chapter-2", 40, 70)).unwrap();

        assert_eq!(overlay.chapter("chapter-1").unwrap().progress, Some(100));
        assert_eq!(overlay.chapter("chapter-2").unwrap().progress, Some(40));
        assert_eq!(overlay.total_progress, Some(70));
        assert_eq!(store.load().unwrap(), Some(overlay));
    }

    #[test]
    fn patch_refuses_to_replace_unreadable_overlay() {
        let memory = MemoryStore::new();
        memory.set(COURSE_PROGRESS_KEY, "[1, 2").unwrap();

        let store = ProgressStore::new(memory.clone());
        assert!(store.apply_patch(&patch("chapter-1", 100, 100)).is_err());
        assert_eq!(memory.get(COURSE_PROGRESS_KEY).unwrap().as_deref(), Some("[1, 2"));
    }

    #[test]
    fn patch_keeps_entries_around_a_malformed_one() {
        let memory = MemoryStore::new();
        memory
            .set(
                COURSE_PROGRESS_KEY,
                r#"{"chapter-1":{"progress":100},"chapter-2":{"progress":"half"},"version":2,"totalProgress":75}"#,
            )
            .unwrap();

        let store = ProgressStore::new(memory.clone());
        let overlay = store.apply_patch(&patch("chapter-3", 30, 10)).unwrap();

        assert_eq!(overlay.chapter("chapter-1").unwrap().progress, Some(100));
        assert_eq!(overlay.chapter("chapter-3").unwrap().progress, Some(30));
        assert_eq!(overlay.total_progress, Some(10));
        assert_eq!(store.load().unwrap(), Some(overlay));
    }

    #[test]
    fn patch_rewrites_listed_overlay_flat() {
        let memory = MemoryStore::new();
        memory
            .set(
                COURSE_PROGRESS_KEY,
                r#"{"chapters":[{"id":"chapter-1","progress":100,"subsections":[{"id":"module-1","completed":true}]}],"totalProgress":50}"#,
            )
            .unwrap();

        let store = ProgressStore::new(memory.clone());
        store.apply_patch(&patch("chapter-2", 40, 70)).unwrap();

        assert_eq!(
            memory.get(COURSE_PROGRESS_KEY).unwrap().as_deref(),
            Some(r#"{"totalProgress":70,"chapter-1":{"progress":100,"completed":["module-1"]},"chapter-2":{"progress":40}}"#)
        );
    }

    #[test]
    fn clear_removes_overlay() {
        let store = ProgressStore::new(MemoryStore::new());
        store.apply_patch(&patch("chapter-1", 10, 10)).unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
