//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Running the tiered skill assessment and persisting its insight
//!   - Grading a quiz answer map outside a timed session
//!   - The doubt submit/respond flows (Gemini-backed, stub fallback)
//!   - Note summarization and video recommendations

use tracing::{error, info, instrument, warn};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::banks;
use crate::domain::{Video, Visibility};
use crate::engine::{self, QuizOutcome, SkillOutcome};
use crate::protocol::AttachmentIn;
use crate::session::QUESTIONS_PER_QUIZ;
use crate::state::AppState;
use crate::util::{fill_template, trunc_for_log};

/// Run the tiered self-assessment for a skill track and persist the
/// resulting insight. The engine is invoked exactly once, after the final
/// answer, so a partial answer set is rejected here.
#[instrument(level = "info", skip(state, level_tags), fields(%skill_key, answers = level_tags.len()))]
pub fn run_skill_assessment(
  state: &AppState,
  skill_key: &str,
  level_tags: &[String],
) -> Result<SkillOutcome, String> {
  let (display_name, questions) =
    banks::skill_bank(skill_key).ok_or_else(|| format!("Unknown skill track: {skill_key}"))?;
  if level_tags.len() != questions.len() {
    return Err(format!(
      "Expected {} answers for {display_name}, got {}",
      questions.len(),
      level_tags.len()
    ));
  }

  let outcome = engine::assess_skill(display_name, level_tags).map_err(|e| e.to_string())?;
  state.insights.save(&outcome.skill, &outcome.insight);
  info!(target: "assessment", skill = %outcome.skill, tier = %outcome.tier.as_tag(), score = outcome.insight.predicted_score, "Skill assessment scored");
  Ok(outcome)
}

/// Grade a quiz answer map directly (the untimed flow). Uses the same
/// question subset a timed session would serve, then persists the insight.
#[instrument(level = "info", skip(state, answers), fields(%subject, answered = answers.len()))]
pub fn grade_quiz_direct(
  state: &AppState,
  subject: &str,
  answers: &std::collections::HashMap<usize, String>,
) -> Result<QuizOutcome, String> {
  let bank = state
    .quiz_bank(subject)
    .ok_or_else(|| format!("Unknown subject: {subject}"))?;
  let questions: Vec<_> = bank.iter().take(QUESTIONS_PER_QUIZ).cloned().collect();
  let outcome = engine::grade_quiz(subject, &questions, answers).map_err(|e| e.to_string())?;
  persist_quiz_outcome(state, &outcome);
  Ok(outcome)
}

/// Persist a quiz outcome's insight. Shared by the direct flow and the
/// timed session (WS) flow.
pub fn persist_quiz_outcome(state: &AppState, outcome: &QuizOutcome) {
  state.insights.save(&outcome.subject, &outcome.insight);
  info!(target: "assessment", subject = %outcome.subject, score = outcome.score, correct = outcome.correct_count, wrong = outcome.wrong_count, "Quiz outcome persisted");
}

/// Submit a doubt: decode attachments, record the ticket, and auto-answer
/// through Gemini when available. Returns (message, ticket id).
#[instrument(level = "info", skip(state, question, attachments), fields(%student_name, question_len = question.len(), attachment_count = attachments.len()))]
pub async fn ask_doubt(
  state: &AppState,
  student_name: &str,
  question: &str,
  attachments: &[AttachmentIn],
) -> (String, u64) {
  let mut full_text = question.to_string();
  let mut filenames = Vec::new();
  for attachment in attachments {
    filenames.push(attachment.filename.clone());
    match attachment_text(attachment) {
      Ok(text) => {
        full_text.push('\n');
        full_text.push_str(&text);
      }
      Err(reason) => {
        warn!(target: "doubt", filename = %attachment.filename, %reason, "Attachment not inlined");
        full_text.push_str(&format!("\n[attachment '{}' not readable as text]", attachment.filename));
      }
    }
  }

  let ticket_id = state
    .submit_doubt(student_name, full_text.clone(), filenames, Visibility::Public)
    .await;

  let answer = if let Some(gemini) = &state.gemini {
    match gemini.answer_doubt(&state.prompts, &full_text).await {
      Ok(text) => text,
      Err(e) => {
        error!(target: "doubt", %ticket_id, error = %e, "Gemini answer failed; using local stub.");
        doubt_reply_stub(question)
      }
    }
  } else {
    doubt_reply_stub(question)
  };

  state.answer_doubt(ticket_id, None, answer.clone()).await;
  info!(target: "doubt", %ticket_id, answer_preview = %trunc_for_log(&answer, 80), "Doubt answered");
  (
    format!("Doubt submitted successfully with ID {ticket_id}. Answer: {answer}"),
    ticket_id,
  )
}

/// Teacher response to an existing doubt. Overwrites any auto-generated
/// answer.
#[instrument(level = "info", skip(state, answer_text), fields(%doubt_id, %teacher_name))]
pub async fn respond_doubt(
  state: &AppState,
  doubt_id: u64,
  teacher_name: &str,
  answer_text: &str,
) -> Result<String, String> {
  if state
    .answer_doubt(doubt_id, Some(teacher_name), answer_text.to_string())
    .await
  {
    Ok(format!("Response submitted for doubt ID {doubt_id}"))
  } else {
    Err("Doubt ID not found".into())
  }
}

/// Summarize an uploaded document. Only text payloads are summarized;
/// binary formats come back as an error payload rather than garbage.
#[instrument(level = "info", skip(state, content_base64), fields(%filename))]
pub async fn summarize_document(
  state: &AppState,
  filename: &str,
  content_base64: &str,
) -> Result<String, String> {
  let attachment = AttachmentIn {
    filename: filename.to_string(),
    content_base64: content_base64.to_string(),
  };
  let text = attachment_text(&attachment)?;
  if text.trim().is_empty() {
    return Err("The document contains no readable text.".into());
  }

  if let Some(gemini) = &state.gemini {
    match gemini.summarize(&state.prompts, &text).await {
      Ok(summary) => return Ok(summary),
      Err(e) => {
        error!(target: "edumate_backend", %filename, error = %e, "Gemini summarize failed; using local stub.")
      }
    }
  }
  Ok(summarize_stub(&text))
}

/// Topic-based video recommendations, stubbed when the YouTube client is
/// unavailable or errors out.
#[instrument(level = "info", skip(state), fields(%topic))]
pub async fn recommend_videos(state: &AppState, topic: &str) -> Vec<Video> {
  let query = fill_template(&state.prompts.video_query_template, &[("topic", topic)]);
  if let Some(youtube) = &state.youtube {
    match youtube.search(&query, 10).await {
      Ok(videos) if !videos.is_empty() => return videos,
      Ok(_) => warn!(target: "edumate_backend", %topic, "YouTube returned no videos; using stub."),
      Err(e) => error!(target: "edumate_backend", %topic, error = %e, "YouTube search failed; using stub."),
    }
  }
  videos_stub(topic)
}

// -------- Local fallbacks & utilities --------

/// Decode an attachment into text. PDFs and images would need parsing/OCR
/// we do not carry, so they are reported instead of decoded blindly.
fn attachment_text(attachment: &AttachmentIn) -> Result<String, String> {
  let lower = attachment.filename.to_lowercase();
  if lower.ends_with(".pdf")
    || lower.ends_with(".jpg")
    || lower.ends_with(".jpeg")
    || lower.ends_with(".png")
  {
    return Err(format!(
      "'{}' is a binary format; upload notes as plain text",
      attachment.filename
    ));
  }
  let bytes = BASE64
    .decode(attachment.content_base64.as_bytes())
    .map_err(|e| format!("Invalid base64 payload: {e}"))?;
  Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn doubt_reply_stub(question: &str) -> String {
  let q = question.to_lowercase();
  if q.contains("why") {
    "Short answer: break the 'why' into the definition first, then the mechanism. Re-read the definition in your notes and ask a follow-up on the step that is unclear.".into()
  } else if q.contains("how") {
    "Work one small example by hand before the general case; most 'how' questions resolve once a concrete instance is on paper.".into()
  } else {
    "A teacher will pick this up soon. Meanwhile, note which textbook section the question comes from and what you tried already.".into()
  }
}

/// Tiny extractive summary: first few sentences re-shaped as bullets.
fn summarize_stub(text: &str) -> String {
  let mut bullets = Vec::new();
  for sentence in text.split(['.', '\n']) {
    let s = sentence.trim();
    if s.len() >= 20 {
      bullets.push(format!("- {s}."));
    }
    if bullets.len() == 5 {
      break;
    }
  }
  if bullets.is_empty() {
    format!("- {}", text.trim())
  } else {
    bullets.join("\n")
  }
}

fn videos_stub(topic: &str) -> Vec<Video> {
  let search = format!(
    "https://www.youtube.com/results?search_query={}",
    topic.replace(' ', "+")
  );
  vec![
    Video {
      title: format!("{topic} explained for students"),
      url: search.clone(),
      channel: "Search results".into(),
      thumbnail: String::new(),
    },
    Video {
      title: format!("{topic} - worked examples"),
      url: search.clone(),
      channel: "Search results".into(),
      thumbnail: String::new(),
    },
    Video {
      title: format!("{topic} crash course"),
      url: search,
      channel: "Search results".into(),
      thumbnail: String::new(),
    },
  ]
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::insights::{InsightsStore, MemoryKv};
  use crate::state::AppState;
  use std::collections::HashMap;

  fn state() -> AppState {
    AppState::from_parts(
      None,
      InsightsStore::new(Box::new(MemoryKv::default())),
      None,
      None,
    )
  }

  #[test]
  fn skill_assessment_persists_the_insight() {
    let state = state();
    let tags: Vec<String> =
      ["advanced", "advanced", "intermediate"].iter().map(|s| s.to_string()).collect();
    let outcome = run_skill_assessment(&state, "dsa", &tags).expect("outcome");
    assert_eq!(outcome.insight.predicted_score, 89);

    let record = state.insights.load().expect("persisted");
    assert_eq!(record.subject, "Data Structures & Algorithms");
    assert_eq!(record.insight, outcome.insight);
  }

  #[test]
  fn skill_assessment_rejects_partial_answer_sets() {
    let state = state();
    let tags = vec!["advanced".to_string()];
    assert!(run_skill_assessment(&state, "dsa", &tags).is_err());
    assert!(state.insights.load().is_none());
  }

  #[test]
  fn direct_quiz_grading_supersedes_the_previous_insight() {
    let state = state();
    let tags: Vec<String> =
      ["beginner", "beginner", "beginner"].iter().map(|s| s.to_string()).collect();
    run_skill_assessment(&state, "ml", &tags).expect("first");

    let outcome =
      grade_quiz_direct(&state, "Mathematics", &HashMap::new()).expect("graded");
    assert_eq!(outcome.score, 0);

    let record = state.insights.load().expect("persisted");
    assert_eq!(record.subject, "Mathematics");
  }

  #[test]
  fn direct_quiz_grading_rejects_unknown_subjects() {
    let state = state();
    assert!(grade_quiz_direct(&state, "Alchemy", &HashMap::new()).is_err());
  }

  #[tokio::test]
  async fn ask_doubt_records_and_stub_answers() {
    let state = state();
    let (message, ticket_id) =
      ask_doubt(&state, "Asha", "Why does gradient descent converge?", &[]).await;
    assert_eq!(ticket_id, 1);
    assert!(message.contains("ID 1"));

    let doubts = state.doubts(None).await;
    assert_eq!(doubts.len(), 1);
    assert!(doubts[0].answer.is_some());

    let reply = respond_doubt(&state, ticket_id, "Mx. Lee", "See lecture 4.").await;
    assert!(reply.is_ok());
    assert!(respond_doubt(&state, 42, "Mx. Lee", "?").await.is_err());
  }

  #[tokio::test]
  async fn binary_attachments_are_reported_not_decoded() {
    let state = state();
    let attachment = AttachmentIn {
      filename: "notes.pdf".into(),
      content_base64: BASE64.encode(b"%PDF-1.4 ..."),
    };
    let (_message, ticket_id) =
      ask_doubt(&state, "Bo", "Please check my notes", &[attachment]).await;
    let doubts = state.doubts(None).await;
    assert!(doubts[0].question.contains("not readable as text"));
    assert_eq!(ticket_id, 1);
  }

  #[tokio::test]
  async fn summarize_requires_readable_text() {
    let state = state();
    let encoded = BASE64.encode(
      b"Gradient descent minimizes a loss function iteratively. The learning rate controls the step size. Convergence depends on curvature.",
    );
    let summary = summarize_document(&state, "notes.txt", &encoded).await.expect("summary");
    assert!(summary.starts_with('-'));

    assert!(summarize_document(&state, "photo.png", "aGk=").await.is_err());
  }

  #[tokio::test]
  async fn video_stub_always_returns_something() {
    let state = state();
    let videos = recommend_videos(&state, "Linear Algebra").await;
    assert!(!videos.is_empty());
    assert!(videos[0].title.contains("Linear Algebra"));
  }
}
