//! Minimal inline HTML for the survey pages.
//!
//! Deliberately template-engine free: each page is a small `format!` over
//! escaped dynamic values, enough to exercise the flow end to end.

use services::SurveySummary;
use survey_core::model::{Catalog, Question, Survey};

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

/// The survey list shown at `/`.
#[must_use]
pub fn survey_list(catalog: &Catalog) -> String {
    let mut body = String::from("<h1>Available surveys</h1>\n<ul>\n");
    for survey in catalog.surveys() {
        body.push_str(&format!(
            "<li><a href=\"/start-survey/{}\">{}</a></li>\n",
            survey.slug(),
            escape(survey.title()),
        ));
    }
    body.push_str("</ul>\n");
    page("Surveys", &body)
}

/// Title, instructions, and the begin button for one survey.
#[must_use]
pub fn survey_intro(survey: &Survey) -> String {
    let body = format!(
        "<h1>{}</h1>\n<p>{}</p>\n<form method=\"post\" action=\"/init-session/{}\">\n<button type=\"submit\">Begin survey</button>\n</form>\n",
        escape(survey.title()),
        escape(survey.instructions()),
        survey.slug(),
    );
    page(survey.title(), &body)
}

/// One question page: choices as radio buttons, plus an optional comment
/// box for free-text questions. The hidden `question-id` field carries the
/// index the form was rendered for.
#[must_use]
pub fn question_page(index: usize, total: usize, question: &Question) -> String {
    let mut body = format!(
        "<h1>Question {} of {}</h1>\n<p>{}</p>\n<form method=\"post\" action=\"/answer\">\n<input type=\"hidden\" name=\"question-id\" value=\"{index}\">\n",
        index + 1,
        total,
        escape(question.text()),
    );
    for choice in question.choices() {
        let escaped = escape(choice);
        body.push_str(&format!(
            "<label><input type=\"radio\" name=\"answer\" value=\"{escaped}\"> {escaped}</label><br>\n"
        ));
    }
    if question.allows_free_text() {
        body.push_str(
            "<label>Comment:<br><textarea name=\"comment\"></textarea></label><br>\n",
        );
    }
    body.push_str("<button type=\"submit\">Submit answer</button>\n</form>\n");
    page("Survey question", &body)
}

/// The thank-you page with the recorded answers in submission order.
#[must_use]
pub fn thanks(summary: &SurveySummary) -> String {
    let mut body = format!(
        "<h1>Thank you!</h1>\n<p>Your responses for {}:</p>\n<ol>\n",
        escape(&summary.title),
    );
    for row in &summary.rows {
        body.push_str(&format!(
            "<li>{}: <strong>{}</strong>",
            escape(&row.question),
            escape(&row.answer),
        ));
        if let Some(comment) = &row.comment {
            body.push_str(&format!(" <em>({})</em>", escape(comment)));
        }
        body.push_str("</li>\n");
    }
    body.push_str("</ol>\n");
    if !summary.is_complete {
        body.push_str(&format!(
            "<p>{} of {} questions answered so far.</p>\n",
            summary.answered_count(),
            summary.total_questions,
        ));
    }
    page("Thank you", &body)
}
