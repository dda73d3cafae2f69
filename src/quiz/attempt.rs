//! Step-by-step quiz attempts

use super::grading::{AnswerKey, QuizResult};

/// Where an attempt stands after moving forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Showing the question at this index
    Question(usize),
    /// Past the last question
    Finished,
}

/// A learner working through a quiz one question at a time
#[derive(Debug, Clone, Default)]
pub struct QuizAttempt {
    /// Index of the question being shown
    current: usize,
    /// Picked option per question (`None` = skipped)
    answers: Vec<Option<usize>>,
    finished: bool,
}

impl QuizAttempt {
    /// Start an attempt for a quiz with `question_count` questions
    pub fn new(question_count: usize) -> Self {
        Self { current: 0, answers: vec![None; question_count], finished: false }
    }

    /// Number of questions in the quiz
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Recorded answers so far
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    /// Record an answer for the current question, replacing any earlier pick
    pub fn answer(&mut self, option: usize) {
        if self.finished {
            return;
        }
        if let Some(slot) = self.answers.get_mut(self.current) {
            *slot = Some(option);
        }
    }

    /// Move to the next question, finishing the attempt after the last one
    pub fn advance(&mut self) -> Step {
        if self.finished {
            return Step::Finished;
        }

        if self.current + 1 < self.answers.len() {
            self.current += 1;
            Step::Question(self.current)
        } else {
            self.finished = true;
            Step::Finished
        }
    }

    /// Grade the attempt against the quiz it was started for
    pub fn result<Q: AnswerKey>(&self, questions: &[Q]) -> QuizResult {
        QuizResult::grade(questions, &self.answers)
    }
}
