/// One answered question in the thank-you summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub question: String,
    pub answer: String,
    pub comment: Option<String>,
}

/// Rendered view of a visitor's run, in submission order.
///
/// Completeness is reported but not required; a partially answered survey
/// still summarizes what was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveySummary {
    pub title: String,
    pub rows: Vec<SummaryRow>,
    pub total_questions: usize,
    pub is_complete: bool,
}

impl SurveySummary {
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.rows.len()
    }
}
