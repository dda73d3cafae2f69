//! Normalized course model
//!
//! This module defines the structures every other part of the crate works on.
//! A [`Course`] is always derived from a raw processing document plus the
//! persisted progress overlay; it is never stored directly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::quiz::AnswerKey;

/// A complete course built from one processed document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Opaque identifier, unique per mapping call
    pub id: String,
    /// Display title
    pub title: String,
    /// Summary of the whole document
    pub description: String,
    /// Chapters in document order
    pub chapters: Vec<Chapter>,
    /// Overall progress (0-100)
    #[serde(rename = "totalProgress")]
    pub total_progress: u8,
    /// Comprehensive quiz spanning all chapters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_quiz: Option<Vec<FinalQuizQuestion>>,
}

impl Course {
    /// Find a chapter by its id
    pub fn chapter(&self, chapter_id: &str) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.id == chapter_id)
    }

    /// Find a subsection by chapter and subsection id
    pub fn subsection(&self, chapter_id: &str, subsection_id: &str) -> Option<&SubSection> {
        self.chapter(chapter_id).and_then(|c| c.subsection(subsection_id))
    }

    /// Number of subsections across all chapters
    pub fn subsection_count(&self) -> usize {
        self.chapters.iter().map(|c| c.subsections.len()).sum()
    }

    /// Number of completed subsections across all chapters
    pub fn completed_subsection_count(&self) -> usize {
        self.chapters.iter().map(Chapter::completed_count).sum()
    }

    /// Number of chapters at 100%
    pub fn completed_chapter_count(&self) -> usize {
        self.chapters.iter().filter(|c| c.is_complete()).count()
    }

    /// Whether the course has a non-empty final quiz
    pub fn has_final_quiz(&self) -> bool {
        self.final_quiz.as_ref().is_some_and(|q| !q.is_empty())
    }

    /// Map module names to the place a learner should go to revisit them.
    ///
    /// Keys are chapter titles; values are `(chapter id, first subsection id)`.
    /// Chapters without subsections are skipped.
    pub fn module_links(&self) -> HashMap<&str, ModuleLink<'_>> {
        self.chapters
            .iter()
            .filter_map(|chapter| {
                let first = chapter.subsections.first()?;
                Some((
                    chapter.title.as_str(),
                    ModuleLink { chapter_id: &chapter.id, subsection_id: &first.id },
                ))
            })
            .collect()
    }

    /// Resolve the related modules of a final quiz question.
    ///
    /// Names are matched against chapter titles by exact equality; names with
    /// no matching chapter are dropped.
    pub fn related_links<'a>(
        &'a self,
        question: &'a FinalQuizQuestion,
    ) -> Vec<(&'a str, ModuleLink<'a>)> {
        let links = self.module_links();
        question
            .related_modules
            .iter()
            .flatten()
            .filter_map(|name| links.get(name.as_str()).map(|link| (name.as_str(), *link)))
            .collect()
    }
}

/// Navigation target for a module name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleLink<'a> {
    pub chapter_id: &'a str,
    pub subsection_id: &'a str,
}

impl ModuleLink<'_> {
    /// Command that opens the linked section, e.g. `syllabus read chapter-1 module-1`
    pub fn read_command(&self) -> String {
        format!("syllabus read {} {}", self.chapter_id, self.subsection_id)
    }
}

/// A chapter of a course, one per processed module or page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Position-derived id (`chapter-1`, `chapter-2`, ...)
    pub id: String,
    pub title: String,
    /// Clipped summary for listings
    pub description: String,
    pub subsections: Vec<SubSection>,
    pub quiz: ChapterQuiz,
    /// Chapter progress (0-100)
    pub progress: u8,
}

impl Chapter {
    /// Find a subsection by id
    pub fn subsection(&self, subsection_id: &str) -> Option<&SubSection> {
        self.subsections.iter().find(|s| s.id == subsection_id)
    }

    /// Number of completed subsections
    pub fn completed_count(&self) -> usize {
        self.subsections.iter().filter(|s| s.completed).count()
    }

    /// Whether the chapter is at 100%
    pub fn is_complete(&self) -> bool {
        self.progress >= 100
    }

    /// Id of the subsection before `subsection_id`, if any
    pub fn previous_subsection(&self, subsection_id: &str) -> Option<&str> {
        let idx = self.subsections.iter().position(|s| s.id == subsection_id)?;
        idx.checked_sub(1).and_then(|i| self.subsections.get(i)).map(|s| s.id.as_str())
    }

    /// Id of the subsection after `subsection_id`, if any
    pub fn next_subsection(&self, subsection_id: &str) -> Option<&str> {
        let idx = self.subsections.iter().position(|s| s.id == subsection_id)?;
        self.subsections.get(idx + 1).map(|s| s.id.as_str())
    }
}

/// A readable unit inside a chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubSection {
    pub id: String,
    pub title: String,
    /// Full text, never clipped
    pub content: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_concepts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_objectives: Option<Vec<String>>,
}

/// The quiz attached to a chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterQuiz {
    pub id: String,
    pub questions: Vec<QuizQuestion>,
}

/// A chapter quiz question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// 1-based position in the quiz
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    /// 0-based index into `options`
    #[serde(rename = "correctAnswer")]
    pub correct_answer: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// A question of the comprehensive final quiz
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalQuizQuestion {
    /// 1-based position in the quiz
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    /// 0-based index into `options`
    #[serde(rename = "correctAnswer")]
    pub correct_answer: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    /// Chapter titles this question draws on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_modules: Option<Vec<String>>,
}

impl AnswerKey for QuizQuestion {
    fn correct_answer(&self) -> usize {
        self.correct_answer
    }
}

impl AnswerKey for FinalQuizQuestion {
    fn correct_answer(&self) -> usize {
        self.correct_answer
    }
}
