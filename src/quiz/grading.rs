//! Quiz scoring

/// Anything that knows which option is correct
pub trait AnswerKey {
    /// 0-based index of the correct option
    fn correct_answer(&self) -> usize;
}

/// Percentage of questions answered correctly (unrounded).
///
/// `answers[i]` is the option picked for `questions[i]`; `None` means the
/// question was skipped and counts as wrong. Answers past the end of the
/// question list are ignored. An empty quiz scores `0.0`.
pub fn score<Q: AnswerKey>(questions: &[Q], answers: &[Option<usize>]) -> f64 {
    QuizResult::grade(questions, answers).percentage
}

/// Outcome of grading a quiz
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuizResult {
    /// Number of correct answers
    pub correct: usize,
    /// Number of questions in the quiz
    pub total: usize,
    /// `100 * correct / total`, or 0 for an empty quiz
    pub percentage: f64,
}

impl QuizResult {
    /// Grade a set of answers
    pub fn grade<Q: AnswerKey>(questions: &[Q], answers: &[Option<usize>]) -> Self {
        let correct = questions
            .iter()
            .zip(answers)
            .filter(|(question, answer)| **answer == Some(question.correct_answer()))
            .count();
        let total = questions.len();

        let percentage = if total == 0 { 0.0 } else { 100.0 * correct as f64 / total as f64 };

        Self { correct, total, percentage }
    }

    /// Percentage rounded for display
    pub fn rounded(&self) -> u8 {
        self.percentage.round().clamp(0.0, 100.0) as u8
    }

    /// Whether every question was answered correctly
    pub fn is_perfect(&self) -> bool {
        self.total > 0 && self.correct == self.total
    }
}
