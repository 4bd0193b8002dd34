use survey_core::model::Question;

/// Result of binding a session to a survey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// Visitor should be sent to question `next` (0 for a fresh run).
    Resume { next: usize },
    /// The run already holds every answer; send the visitor to the summary.
    AlreadyComplete,
}

/// Result of asking to view a question page.
///
/// Page requests never mutate the record; any index other than the true
/// next question normalizes to a redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionPage {
    /// The requested index is the next unanswered question.
    Show {
        index: usize,
        total: usize,
        question: Question,
    },
    /// The requested index got ahead of or fell behind the record.
    Redirect { next: usize },
    /// Every question is answered; the only page left is the summary.
    Finished,
}

/// Result of an accepted answer submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Continue { next: usize },
    Complete,
}
