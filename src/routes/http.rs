//! HTTP endpoint handlers. These are thin wrappers that forward to core
//! logic. Each handler is instrumented; failures come back as a JSON error
//! payload with a matching status code.

use std::sync::Arc;
use axum::{extract::{State, Query}, http::StatusCode, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::banks;
use crate::domain::Visibility;
use crate::logic::*;
use crate::protocol::*;
use crate::session::{QUESTIONS_PER_QUIZ, TIME_LIMIT_SECS};
use crate::state::AppState;

type ApiError = (StatusCode, Json<ErrorOut>);

fn bad_request(message: impl Into<String>) -> ApiError {
  (StatusCode::BAD_REQUEST, Json(ErrorOut { error: message.into() }))
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_subjects(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(SubjectsOut {
    subjects: state.subjects().to_vec(),
    skills: banks::skill_tracks()
      .into_iter()
      .map(|(key, name)| SkillTrackOut { key: key.to_string(), name: name.to_string() })
      .collect(),
  })
}

#[instrument(level = "info", skip(state), fields(subject = %q.subject))]
pub async fn http_get_quiz(
  State(state): State<Arc<AppState>>,
  Query(q): Query<QuizQuery>,
) -> Result<Json<QuizOut>, ApiError> {
  let bank = state
    .quiz_bank(&q.subject)
    .ok_or_else(|| bad_request(format!("Unknown subject: {}", q.subject)))?;
  let questions = bank
    .iter()
    .take(QUESTIONS_PER_QUIZ)
    .enumerate()
    .map(|(index, question)| to_question_out(index, question))
    .collect();
  info!(target: "assessment", subject = %q.subject, "HTTP quiz served");
  Ok(Json(QuizOut {
    subject: q.subject,
    time_limit_seconds: TIME_LIMIT_SECS,
    questions,
  }))
}

#[instrument(level = "info", skip(state, body), fields(subject = %body.subject, answered = body.answers.len()))]
pub async fn http_post_quiz_submit(
  State(state): State<Arc<AppState>>,
  Json(body): Json<QuizSubmitIn>,
) -> Result<Json<QuizSubmitOut>, ApiError> {
  let outcome = grade_quiz_direct(&state, &body.subject, &body.answers).map_err(bad_request)?;
  info!(target: "assessment", subject = %outcome.subject, score = outcome.score, "HTTP quiz graded");
  Ok(Json(to_quiz_submit_out(&outcome)))
}

#[instrument(level = "info", fields(skill = %q.skill))]
pub async fn http_get_assessment_questions(
  Query(q): Query<AssessmentQuery>,
) -> Result<Json<AssessmentQuestionsOut>, ApiError> {
  let (name, questions) = banks::skill_bank(&q.skill)
    .ok_or_else(|| bad_request(format!("Unknown skill track: {}", q.skill)))?;
  Ok(Json(AssessmentQuestionsOut {
    skill: q.skill,
    name: name.to_string(),
    questions,
  }))
}

#[instrument(level = "info", skip(state, body), fields(skill = %body.skill, answers = body.levels.len()))]
pub async fn http_post_assessment(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AssessmentIn>,
) -> Result<Json<AssessmentOut>, ApiError> {
  let outcome = run_skill_assessment(&state, &body.skill, &body.levels).map_err(bad_request)?;
  info!(target: "assessment", skill = %outcome.skill, tier = %outcome.tier.as_tag(), "HTTP assessment scored");
  Ok(Json(to_assessment_out(&outcome)))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_insights(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let insight = state.insights.load().map(|record| to_persisted_out(&record));
  Json(LatestInsightOut { insight })
}

#[instrument(level = "info", skip(state, body), fields(student = %body.student_name, question_len = body.question.len()))]
pub async fn http_post_doubt(
  State(state): State<Arc<AppState>>,
  Json(body): Json<DoubtIn>,
) -> Result<Json<DoubtOut>, ApiError> {
  if body.student_name.trim().is_empty() || body.question.trim().is_empty() {
    return Err(bad_request("Missing studentName or question"));
  }
  let (message, ticket_id) =
    ask_doubt(&state, &body.student_name, &body.question, &body.attachments).await;
  Ok(Json(DoubtOut {
    status: "submitted".into(),
    message,
    ticket_id: Some(ticket_id),
  }))
}

#[instrument(level = "info", skip(state, body), fields(doubt_id = body.doubt_id, teacher = %body.teacher_name))]
pub async fn http_post_respond_doubt(
  State(state): State<Arc<AppState>>,
  Json(body): Json<RespondDoubtIn>,
) -> Result<Json<DoubtOut>, ApiError> {
  if body.teacher_name.trim().is_empty() || body.answer_text.trim().is_empty() {
    return Err(bad_request("Missing fields"));
  }
  match respond_doubt(&state, body.doubt_id, &body.teacher_name, &body.answer_text).await {
    Ok(message) => Ok(Json(DoubtOut {
      status: "answered".into(),
      message,
      ticket_id: Some(body.doubt_id),
    })),
    Err(message) => Err((StatusCode::NOT_FOUND, Json(ErrorOut { error: message }))),
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_doubts(
  State(state): State<Arc<AppState>>,
  Query(q): Query<DoubtsQuery>,
) -> Result<Json<DoubtsOut>, ApiError> {
  let visibility = match q.visibility.as_deref() {
    None => None,
    Some("public") => Some(Visibility::Public),
    Some("private") => Some(Visibility::Private),
    Some(other) => return Err(bad_request(format!("Unknown visibility: {other}"))),
  };
  let doubts = state.doubts(visibility).await;
  Ok(Json(DoubtsOut { doubts }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_videos(
  State(state): State<Arc<AppState>>,
  Query(q): Query<VideosQuery>,
) -> Result<Json<VideosOut>, ApiError> {
  let topic = q
    .topic
    .filter(|t| !t.trim().is_empty())
    .ok_or_else(|| bad_request("Missing topic parameter"))?;
  let videos = recommend_videos(&state, &topic).await;
  Ok(Json(VideosOut { videos }))
}

#[instrument(level = "info", skip(state, body), fields(filename = %body.filename))]
pub async fn http_post_summarize(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SummarizeIn>,
) -> Result<Json<SummaryOut>, ApiError> {
  let summary = summarize_document(&state, &body.filename, &body.content_base64)
    .await
    .map_err(bad_request)?;
  Ok(Json(SummaryOut { summary }))
}
