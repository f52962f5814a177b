//! WebSocket upgrade + message loop.
//!
//! Each connection exclusively owns one `TimedQuizSession` and the 1-second
//! ticker that drives it. The ticker arm is guarded on the session being
//! `InProgress`, so a session that was submitted or reset can never receive
//! a stale tick; closing the socket mid-quiz simply drops the session and
//! persists nothing.

use std::sync::Arc;
use std::time::Duration;

use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tokio::time::MissedTickBehavior;
use tracing::{info, error, instrument, debug};

use crate::logic::{persist_quiz_outcome, run_skill_assessment};
use crate::protocol::{
  assessment_result_message, quiz_result_message, to_question_out, ClientWsMessage,
  ServerWsMessage,
};
use crate::session::TimedQuizSession;
use crate::state::AppState;
use crate::util::format_clock;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "edumate_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "edumate_backend", "WebSocket connected");

  let mut session = TimedQuizSession::new();
  let mut ticker = tokio::time::interval(Duration::from_secs(1));
  ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

  loop {
    tokio::select! {
      // Countdown: only polled while a quiz is actually running.
      _ = ticker.tick(), if session.is_in_progress() => {
        let reply = match session.tick() {
          Some(outcome) => {
            persist_quiz_outcome(&state, &outcome);
            info!(target: "assessment", subject = %outcome.subject, score = outcome.score, "Quiz auto-submitted on timeout");
            quiz_result_message(&outcome)
          }
          None => ServerWsMessage::Tick {
            remaining_seconds: session.remaining_seconds(),
            clock: format_clock(session.remaining_seconds()),
          },
        };
        if send(&mut socket, reply).await.is_err() {
          break;
        }
      }

      incoming = socket.recv() => {
        let Some(Ok(msg)) = incoming else { break };
        match msg {
          Message::Text(txt) => {
            let was_in_progress = session.is_in_progress();
            let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
              Ok(incoming) => {
                debug!(target = "edumate_backend", "WS received: {:?}", &incoming);
                handle_client_ws(incoming, &state, &mut session)
              }
              Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
            };

            // A quiz just started: realign the ticker so the first tick
            // lands a full second from now.
            if !was_in_progress && session.is_in_progress() {
              ticker.reset();
            }

            if send(&mut socket, reply_msg).await.is_err() {
              break;
            }
          }
          Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
          Message::Close(_) => break,
          _ => {}
        }
      }
    }
  }
  info!(target: "edumate_backend", "WebSocket disconnected");
}

async fn send(socket: &mut WebSocket, msg: ServerWsMessage) -> Result<(), ()> {
  let out = serde_json::to_string(&msg).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
  });
  if let Err(e) = socket.send(Message::Text(out)).await {
    error!(target: "edumate_backend", error = %e, "WS send error");
    return Err(());
  }
  Ok(())
}

#[instrument(level = "info", skip(state, session))]
fn handle_client_ws(
  msg: ClientWsMessage,
  state: &AppState,
  session: &mut TimedQuizSession,
) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::StartQuiz { subject } => {
      let Some(bank) = state.quiz_bank(&subject) else {
        return ServerWsMessage::Error { message: format!("Unknown subject: {subject}") };
      };
      match session.select_subject(&subject, bank) {
        Ok(()) => {
          tracing::info!(target: "assessment", %subject, questions = session.questions().len(), started_at_ms = ?session.started_at_epoch_ms(), "WS quiz started");
          ServerWsMessage::QuizStarted {
            subject,
            questions: session
              .questions()
              .iter()
              .enumerate()
              .map(|(index, question)| to_question_out(index, question))
              .collect(),
            remaining_seconds: session.remaining_seconds(),
            total_count: session.questions().len(),
          }
        }
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      }
    }

    ClientWsMessage::RecordAnswer { question_index, option } => {
      if session.record_answer(question_index, &option) {
        ServerWsMessage::AnswerRecorded {
          question_index,
          answered_count: session.answered_count(),
        }
      } else {
        ServerWsMessage::Error { message: "No quiz in progress".into() }
      }
    }

    ClientWsMessage::SubmitQuiz => {
      match session.submit() {
        Some(outcome) => {
          persist_quiz_outcome(state, &outcome);
          tracing::info!(target: "assessment", subject = %outcome.subject, score = outcome.score, "WS quiz submitted");
          quiz_result_message(&outcome)
        }
        // Already submitted (e.g. the timeout won the race): repeat the
        // snapshot without persisting again.
        None => match session.outcome() {
          Some(snapshot) => quiz_result_message(snapshot),
          None => ServerWsMessage::Error { message: "No quiz in progress".into() },
        },
      }
    }

    ClientWsMessage::ResetQuiz => {
      if session.is_in_progress() {
        tracing::info!(target: "assessment", subject = %session.subject(), "Quiz abandoned without submission");
      }
      session.reset();
      ServerWsMessage::QuizReset
    }

    ClientWsMessage::SubmitAssessment { skill, levels } => {
      match run_skill_assessment(state, &skill, &levels) {
        Ok(outcome) => assessment_result_message(&outcome),
        Err(message) => ServerWsMessage::Error { message },
      }
    }
  }
}
