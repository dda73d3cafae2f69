//! Course session
//!
//! Rebuilds the current course from storage and records completions. The
//! stored document, its title and the overlay are the only durable state; every load maps the
//! document again and lays the overlay on top.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::course::{Course, CourseMapper, IdSource, SystemClock, sample_course};
use crate::progress::{self, ProgressStore};
use crate::storage::{COURSE_DATA_KEY, COURSE_TITLE_KEY, KeyValueStore};

/// Where the loaded course came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseSource {
    /// The learner's uploaded document
    Uploaded,
    /// Nothing usable was stored, so the built-in course is shown
    Sample,
}

/// A course ready to present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedCourse {
    pub course: Course,
    pub source: CourseSource,
}

/// Access to the stored course and its progress
pub struct CourseSession<S, I = SystemClock> {
    store: S,
    progress: ProgressStore<S>,
    mapper: CourseMapper<I>,
    title: Option<String>,
}

impl<S: KeyValueStore + Clone> CourseSession<S, SystemClock> {
    /// Session over `store` using clock-based course ids
    pub fn new(store: S) -> Self {
        Self::with_mapper(store, CourseMapper::new())
    }
}

impl<S: KeyValueStore + Clone, I: IdSource> CourseSession<S, I> {
    /// Session with a custom mapper
    pub fn with_mapper(store: S, mapper: CourseMapper<I>) -> Self {
        Self { progress: ProgressStore::new(store.clone()), store, mapper, title: None }
    }

    /// Title given to uploaded courses stored without one
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Load the current course with progress applied.
    ///
    /// A missing or unreadable document falls back to the built-in course;
    /// only storage failures are errors.
    pub fn load(&self) -> Result<LoadedCourse> {
        let (course, source) = match self.store.get(COURSE_DATA_KEY)? {
            Some(json) => match self.mapper.map_json(&json, self.stored_title()?.as_deref()) {
                Ok(course) => (course, CourseSource::Uploaded),
                Err(e) => {
                    warn!(error = %e, "stored course document is unusable, using sample course");
                    (sample_course(), CourseSource::Sample)
                }
            },
            None => {
                debug!("no course uploaded yet, using sample course");
                (sample_course(), CourseSource::Sample)
            }
        };

        let overlay = self.progress.load()?;
        let course = progress::apply_overlay(course, overlay.as_ref());

        Ok(LoadedCourse { course, source })
    }

    /// Title chosen at upload time, else the session default
    fn stored_title(&self) -> Result<Option<String>> {
        let stored = self
            .store
            .get(COURSE_TITLE_KEY)?
            .and_then(|raw| serde_json::from_str::<String>(&raw).ok());
        Ok(stored.or_else(|| self.title.clone()))
    }

    /// Store a freshly processed document and start its progress from zero.
    ///
    /// `title` names the new course; without one the session default applies.
    pub fn replace_document(&self, body: &str, title: Option<&str>) -> Result<()> {
        self.store.set(COURSE_DATA_KEY, body)?;
        match title {
            Some(title) => self.store.set(COURSE_TITLE_KEY, &serde_json::to_string(title)?)?,
            None => self.store.remove(COURSE_TITLE_KEY)?,
        }
        self.progress.clear()?;
        info!(title = title.unwrap_or_default(), "stored new course document");
        Ok(())
    }

    /// Mark a subsection read and persist the change.
    ///
    /// The course is reloaded from storage first, so the update builds on
    /// whatever was saved last rather than on a possibly stale copy.
    pub fn complete_subsection(&self, chapter_id: &str, subsection_id: &str) -> Result<Course> {
        let current = self.load()?.course;
        let completion = progress::complete_subsection(&current, chapter_id, subsection_id)?;
        self.progress.apply_patch(&completion.patch)?;
        info!(chapter_id, subsection_id, total = completion.course.total_progress, "section completed");
        Ok(completion.course)
    }

    /// Record a finished chapter quiz and persist the change
    pub fn complete_chapter_quiz(&self, chapter_id: &str) -> Result<Course> {
        let current = self.load()?.course;
        let completion = progress::complete_chapter_quiz(&current, chapter_id)?;
        self.progress.apply_patch(&completion.patch)?;
        info!(chapter_id, total = completion.course.total_progress, "chapter quiz completed");
        Ok(completion.course)
    }

    /// Forget all progress for the current course
    pub fn reset_progress(&self) -> Result<()> {
        self.progress.clear()?;
        info!("progress reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::course::FixedId;
    use crate::course::sample::SAMPLE_COURSE_ID;
    use crate::progress::ProgressError;
    use crate::storage::{COURSE_PROGRESS_KEY, MemoryStore};

    const DOCUMENT: &str = r#"{
        "modules": [
            {"module_name": "Alpha", "key_concepts": [], "learning_objectives": [],
             "content_summary": "First", "section_quiz": []},
            {"module_name": "Beta", "key_concepts": [], "learning_objectives": [],
             "content_summary": "Second", "section_quiz": []}
        ],
        "comprehensive_summary": "Both",
        "final_quiz": []
    }"#;

    fn session(store: &MemoryStore) -> CourseSession<MemoryStore, FixedId> {
        CourseSession::with_mapper(store.clone(), CourseMapper::with_ids(FixedId("course-x".into())))
    }

    #[test]
    fn empty_store_loads_sample() {
        let store = MemoryStore::new();
        let loaded = session(&store).load().unwrap();
        assert_eq!(loaded.source, CourseSource::Sample);
        assert_eq!(loaded.course.id, SAMPLE_COURSE_ID);
    }

    #[test]
    fn malformed_document_falls_back_to_sample() {
        let store = MemoryStore::new();
        store.set(COURSE_DATA_KEY, r#"{"modules": [{"module_name": 3}]}"#).unwrap();

        let loaded = session(&store).load().unwrap();
        assert_eq!(loaded.source, CourseSource::Sample);
    }

    #[test]
    fn uploaded_document_is_mapped_with_title() {
        let store = MemoryStore::new();
        store.set(COURSE_DATA_KEY, DOCUMENT).unwrap();

        let loaded = session(&store).with_title("Physics").load().unwrap();
        assert_eq!(loaded.source, CourseSource::Uploaded);
        assert_eq!(loaded.course.id, "course-x");
        assert_eq!(loaded.course.title, "Physics");
        assert_eq!(loaded.course.chapters.len(), 2);
    }

    #[test]
    fn upload_title_overrides_default() {
        let store = MemoryStore::new();
        let session = session(&store).with_title("Physics");
        session.replace_document(DOCUMENT, Some("Chemistry")).unwrap();
        assert_eq!(session.load().unwrap().course.title, "Chemistry");

        session.replace_document(DOCUMENT, None).unwrap();
        assert_eq!(session.load().unwrap().course.title, "Physics");
    }

    #[test]
    fn completions_survive_reload() {
        let store = MemoryStore::new();
        let session = session(&store);
        session.replace_document(DOCUMENT, None).unwrap();

        let course = session.complete_subsection("chapter-1", "module-1").unwrap();
        assert_eq!(course.total_progress, 50);

        let reloaded = session.load().unwrap().course;
        assert_eq!(reloaded, course);
        assert!(reloaded.chapters[0].subsections[0].completed);
    }

    #[test]
    fn both_completion_paths_share_one_overlay() {
        let store = MemoryStore::new();
        let session = session(&store);
        session.replace_document(DOCUMENT, None).unwrap();

        session.complete_subsection("chapter-1", "module-1").unwrap();
        session.complete_chapter_quiz("chapter-2").unwrap();

        let reloaded = session.load().unwrap().course;
        assert_eq!(reloaded.chapters[0].progress, 100);
        assert!(reloaded.chapters[0].subsections[0].completed);
        assert_eq!(reloaded.chapters[1].progress, 100);
        assert_eq!(reloaded.total_progress, 100);
    }

    #[test]
    fn missing_chapter_is_a_progress_error() {
        let store = MemoryStore::new();
        let session = session(&store);
        let err = session.complete_chapter_quiz("chapter-42").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProgressError>(),
            Some(ProgressError::ChapterNotFound { .. })
        ));
        assert_eq!(store.get(COURSE_PROGRESS_KEY).unwrap(), None);
    }

    #[test]
    fn new_document_clears_progress() {
        let store = MemoryStore::new();
        let session = session(&store);
        session.replace_document(DOCUMENT, None).unwrap();

        session.complete_chapter_quiz("chapter-1").unwrap();
        session.replace_document(DOCUMENT, None).unwrap();

        let reloaded = session.load().unwrap().course;
        assert!(reloaded.chapters.iter().all(|c| c.progress == 0));
        assert_eq!(reloaded.total_progress, 0);
    }

    #[test]
    fn reset_clears_progress() {
        let store = MemoryStore::new();
        let session = session(&store);
        session.complete_chapter_quiz("chapter-1").unwrap();

        session.reset_progress().unwrap();
        assert_eq!(session.load().unwrap().course.total_progress, 0);
    }
}
