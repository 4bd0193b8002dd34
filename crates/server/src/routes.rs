use std::sync::Arc;

use axum::{
    Form,
    extract::{Path, State},
    http::{HeaderMap, header::SET_COOKIE},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::debug;

use services::{AnswerOutcome, QuestionPage, StartOutcome};
use survey_core::model::SurveySlug;

use super::error::AppError;
use super::pages;
use super::session::{resolve_session, session_from_headers, set_cookie_value};
use super::state::AppState;

/// GET `/` — the survey list.
pub async fn survey_list(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(pages::survey_list(state.tracker.catalog()))
}

/// GET `/start-survey/{slug}` — title, instructions, and the begin button.
pub async fn survey_intro(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    let slug: SurveySlug = slug.parse().map_err(|_| AppError::NotFound)?;
    let survey = state
        .tracker
        .catalog()
        .get(&slug)
        .ok_or(AppError::NotFound)?;
    Ok(Html(pages::survey_intro(survey)))
}

/// POST `/init-session/{slug}` — binds the session to the survey and
/// redirects to the next unanswered question (or the summary).
///
/// This is the only handler that issues the session cookie.
pub async fn init_session(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let slug: SurveySlug = slug.parse().map_err(|_| AppError::NotFound)?;
    let (session, issued) = resolve_session(&headers);

    let outcome = state.tracker.start_survey(session, &slug).await?;
    let target = match outcome {
        StartOutcome::Resume { next } => format!("/questions/{next}"),
        StartOutcome::AlreadyComplete => "/thanks".to_string(),
    };
    debug!("session {session} starting {slug}, redirecting to {target}");

    let mut response = Redirect::to(&target).into_response();
    if issued {
        response.headers_mut().insert(
            SET_COOKIE,
            set_cookie_value(session, state.config.session_ttl_secs),
        );
    }
    Ok(response)
}

/// GET `/questions/{index}` — renders the question if `index` is the next
/// unanswered one, otherwise redirects to the true next page.
pub async fn question_page(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let session = session_from_headers(&headers).ok_or(AppError::Tracker(
        services::TrackerError::NoActiveSurvey,
    ))?;

    let page = state.tracker.view_question(session, index).await?;
    Ok(match page {
        QuestionPage::Show {
            index,
            total,
            question,
        } => Html(pages::question_page(index, total, &question)).into_response(),
        QuestionPage::Redirect { next } => {
            Redirect::to(&format!("/questions/{next}")).into_response()
        }
        QuestionPage::Finished => Redirect::to("/thanks").into_response(),
    })
}

/// Form payload of POST `/answer`.
#[derive(Debug, Deserialize)]
pub struct AnswerForm {
    /// Unchecked radio groups arrive absent, not empty.
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(rename = "question-id")]
    pub question_id: usize,
}

/// POST `/answer` — records the answer and redirects onward.
pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<AnswerForm>,
) -> Result<Redirect, AppError> {
    let session = session_from_headers(&headers).ok_or(AppError::Tracker(
        services::TrackerError::NoActiveSurvey,
    ))?;

    let outcome = state
        .tracker
        .submit_answer(
            session,
            form.question_id,
            form.answer.as_deref().unwrap_or(""),
            form.comment.as_deref(),
        )
        .await?;

    Ok(match outcome {
        AnswerOutcome::Continue { next } => Redirect::to(&format!("/questions/{next}")),
        AnswerOutcome::Complete => Redirect::to("/thanks"),
    })
}

/// GET `/thanks` — the summary of everything recorded so far.
pub async fn thanks_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    let session = session_from_headers(&headers).ok_or(AppError::Tracker(
        services::TrackerError::NoActiveSurvey,
    ))?;

    let summary = state.tracker.summary(session).await?;
    Ok(Html(pages::thanks(&summary)))
}
