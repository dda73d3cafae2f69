//! Applying and updating course progress
//!
//! Every function here takes a course by value or reference and hands back a
//! new course; nothing is mutated behind the caller's back. Persisting the
//! returned patch is the caller's job (see [`super::ProgressStore`]).

use tracing::warn;

use super::error::ProgressError;
use super::overlay::{ChapterProgress, OverlayPatch, ProgressOverlay};
use crate::course::{Chapter, Course};

/// Result of a completion event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// The course with the completion applied
    pub course: Course,
    /// What to merge into the stored overlay
    pub patch: OverlayPatch,
}

/// Overlay stored progress onto a freshly mapped course.
///
/// Chapter ids the course does not know are ignored, as are unknown
/// subsection ids. Out-of-range values are clamped into 0-100.
pub fn apply_overlay(mut course: Course, overlay: Option<&ProgressOverlay>) -> Course {
    let Some(overlay) = overlay else {
        return course;
    };

    for chapter in &mut course.chapters {
        let Some(stored) = overlay.chapter(&chapter.id) else {
            continue;
        };

        if let Some(progress) = stored.progress {
            chapter.progress = clamp_percent(progress, &chapter.id);
        }

        for subsection in &mut chapter.subsections {
            if stored.completed.contains(&subsection.id) {
                subsection.completed = true;
            }
        }
    }

    if let Some(total) = overlay.total_progress {
        course.total_progress = clamp_percent(total, "totalProgress");
    }

    course
}

/// Mark a subsection as read.
///
/// The chapter's progress becomes the share of completed subsections, but
/// never drops below what it already was. Completing an already completed
/// subsection changes nothing.
pub fn complete_subsection(
    course: &Course,
    chapter_id: &str,
    subsection_id: &str,
) -> Result<Completion, ProgressError> {
    let mut course = course.clone();

    let chapter = chapter_mut(&mut course, chapter_id)?;
    let subsection = chapter
        .subsections
        .iter_mut()
        .find(|s| s.id == subsection_id)
        .ok_or_else(|| ProgressError::SubsectionNotFound {
            chapter_id: chapter_id.to_string(),
            subsection_id: subsection_id.to_string(),
        })?;
    subsection.completed = true;

    let share = percent(chapter.completed_count(), chapter.subsections.len());
    chapter.progress = chapter.progress.max(share);

    Ok(finish(course, chapter_id))
}

/// Record a finished chapter quiz.
///
/// Finishing the quiz completes the chapter outright, whatever the state of
/// its subsections.
pub fn complete_chapter_quiz(course: &Course, chapter_id: &str) -> Result<Completion, ProgressError> {
    let mut course = course.clone();

    chapter_mut(&mut course, chapter_id)?.progress = 100;

    Ok(finish(course, chapter_id))
}

/// Overall progress: the rounded mean of chapter progress (0 for no chapters)
pub fn course_progress(chapters: &[Chapter]) -> u8 {
    let sum: usize = chapters.iter().map(|c| usize::from(c.progress)).sum();
    rounded_ratio(sum, chapters.len(), 1)
}

/// `round(100 * done / total)`, 0 when `total` is 0
pub fn percent(done: usize, total: usize) -> u8 {
    rounded_ratio(done, total, 100)
}

fn finish(mut course: Course, chapter_id: &str) -> Completion {
    course.total_progress = course_progress(&course.chapters);

    let mut patch =
        OverlayPatch { total_progress: Some(i64::from(course.total_progress)), ..Default::default() };
    if let Some(chapter) = course.chapter(chapter_id) {
        patch.chapters.insert(chapter.id.clone(), chapter_entry(chapter));
    }

    Completion { course, patch }
}

fn chapter_entry(chapter: &Chapter) -> ChapterProgress {
    ChapterProgress {
        progress: Some(i64::from(chapter.progress)),
        completed: chapter
            .subsections
            .iter()
            .filter(|s| s.completed)
            .map(|s| s.id.clone())
            .collect(),
    }
}

fn chapter_mut<'a>(course: &'a mut Course, chapter_id: &str) -> Result<&'a mut Chapter, ProgressError> {
    course
        .chapters
        .iter_mut()
        .find(|c| c.id == chapter_id)
        .ok_or_else(|| ProgressError::ChapterNotFound { chapter_id: chapter_id.to_string() })
}

/// `round(scale * num / den)` with halves rounded up, clamped to 100
fn rounded_ratio(num: usize, den: usize, scale: usize) -> u8 {
    if den == 0 {
        return 0;
    }
    let value = (2 * scale * num + den) / (2 * den);
    value.min(100) as u8
}

fn clamp_percent(value: i64, field: &str) -> u8 {
    let clamped = value.clamp(0, 100);
    if clamped != value {
        warn!(field, value, "stored progress out of range, clamping");
    }
    clamped as u8
}
