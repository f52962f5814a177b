//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.
//!
//! Quiz questions leave the server WITHOUT the declared correct answer;
//! grading happens here, never in the client.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::{Doubt, Insight, QuizQuestion, SkillQuestion, Video};
use crate::engine::{QuizOutcome, SkillOutcome};
use crate::insights::PersistedInsight;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    StartQuiz {
        subject: String,
    },
    RecordAnswer {
        #[serde(rename = "questionIndex")]
        question_index: usize,
        option: String,
    },
    SubmitQuiz,
    ResetQuiz,
    SubmitAssessment {
        skill: String,
        levels: Vec<String>,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    QuizStarted {
        subject: String,
        questions: Vec<QuizQuestionOut>,
        #[serde(rename = "remainingSeconds")]
        remaining_seconds: u32,
        #[serde(rename = "totalCount")]
        total_count: usize,
    },
    Tick {
        #[serde(rename = "remainingSeconds")]
        remaining_seconds: u32,
        clock: String,
    },
    AnswerRecorded {
        #[serde(rename = "questionIndex")]
        question_index: usize,
        #[serde(rename = "answeredCount")]
        answered_count: usize,
    },
    QuizResult {
        subject: String,
        #[serde(rename = "correctCount")]
        correct_count: u32,
        #[serde(rename = "wrongCount")]
        wrong_count: u32,
        #[serde(rename = "totalCount")]
        total_count: u32,
        score: u32,
        insight: InsightOut,
    },
    AssessmentResult {
        skill: String,
        tier: String,
        #[serde(rename = "totalScore")]
        total_score: u32,
        insight: InsightOut,
    },
    QuizReset,
    Error {
        message: String,
    },
}

/// Quiz question as delivered to clients: the answer stays server-side.
#[derive(Debug, Serialize)]
pub struct QuizQuestionOut {
    pub index: usize,
    pub prompt: String,
    pub options: Vec<String>,
    pub topic: String,
}

pub fn to_question_out(index: usize, q: &QuizQuestion) -> QuizQuestionOut {
    QuizQuestionOut {
        index,
        prompt: q.prompt.clone(),
        options: q.options.clone(),
        topic: q.topic.clone(),
    }
}

/// The dashboard insight DTO (field names match the SPA).
#[derive(Debug, Serialize)]
pub struct InsightOut {
    #[serde(rename = "predictedScore")]
    pub predicted_score: u32,
    #[serde(rename = "weaknessTopic")]
    pub weakness_topic: String,
    #[serde(rename = "learningMilestone")]
    pub learning_milestone: String,
}

pub fn to_insight_out(insight: &Insight) -> InsightOut {
    InsightOut {
        predicted_score: insight.predicted_score,
        weakness_topic: insight.weakness_topic.clone(),
        learning_milestone: insight.learning_milestone.clone(),
    }
}

pub fn quiz_result_message(outcome: &QuizOutcome) -> ServerWsMessage {
    ServerWsMessage::QuizResult {
        subject: outcome.subject.clone(),
        correct_count: outcome.correct_count,
        wrong_count: outcome.wrong_count,
        total_count: outcome.total_count,
        score: outcome.score,
        insight: to_insight_out(&outcome.insight),
    }
}

pub fn assessment_result_message(outcome: &SkillOutcome) -> ServerWsMessage {
    ServerWsMessage::AssessmentResult {
        skill: outcome.skill.clone(),
        tier: outcome.tier.as_tag().to_string(),
        total_score: outcome.total_score,
        insight: to_insight_out(&outcome.insight),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct SubjectsOut {
    pub subjects: Vec<String>,
    pub skills: Vec<SkillTrackOut>,
}

#[derive(Serialize)]
pub struct SkillTrackOut {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct QuizQuery {
    pub subject: String,
}

#[derive(Serialize)]
pub struct QuizOut {
    pub subject: String,
    #[serde(rename = "timeLimitSeconds")]
    pub time_limit_seconds: u32,
    pub questions: Vec<QuizQuestionOut>,
}

#[derive(Deserialize)]
pub struct QuizSubmitIn {
    pub subject: String,
    #[serde(default)]
    pub answers: HashMap<usize, String>,
}

#[derive(Serialize)]
pub struct QuizSubmitOut {
    pub subject: String,
    #[serde(rename = "correctCount")]
    pub correct_count: u32,
    #[serde(rename = "wrongCount")]
    pub wrong_count: u32,
    #[serde(rename = "totalCount")]
    pub total_count: u32,
    pub score: u32,
    pub insight: InsightOut,
}

pub fn to_quiz_submit_out(outcome: &QuizOutcome) -> QuizSubmitOut {
    QuizSubmitOut {
        subject: outcome.subject.clone(),
        correct_count: outcome.correct_count,
        wrong_count: outcome.wrong_count,
        total_count: outcome.total_count,
        score: outcome.score,
        insight: to_insight_out(&outcome.insight),
    }
}

#[derive(Debug, Deserialize)]
pub struct AssessmentQuery {
    pub skill: String,
}

/// The questions of one skill track. Unlike quiz questions there is
/// nothing to hide: the level tags are the whole point.
#[derive(Serialize)]
pub struct AssessmentQuestionsOut {
    pub skill: String,
    pub name: String,
    pub questions: Vec<SkillQuestion>,
}

#[derive(Deserialize)]
pub struct AssessmentIn {
    pub skill: String,
    pub levels: Vec<String>,
}

#[derive(Serialize)]
pub struct AssessmentOut {
    pub skill: String,
    pub tier: String,
    #[serde(rename = "totalScore")]
    pub total_score: u32,
    pub insight: InsightOut,
}

pub fn to_assessment_out(outcome: &SkillOutcome) -> AssessmentOut {
    AssessmentOut {
        skill: outcome.skill.clone(),
        tier: outcome.tier.as_tag().to_string(),
        total_score: outcome.total_score,
        insight: to_insight_out(&outcome.insight),
    }
}

/// Latest persisted insight; `insight` is null until the first submission
/// ever happens (the dashboard renders a placeholder then).
#[derive(Serialize)]
pub struct LatestInsightOut {
    pub insight: Option<PersistedInsightOut>,
}

#[derive(Serialize)]
pub struct PersistedInsightOut {
    pub subject: String,
    #[serde(flatten)]
    pub insight: InsightOut,
}

pub fn to_persisted_out(record: &PersistedInsight) -> PersistedInsightOut {
    PersistedInsightOut {
        subject: record.subject.clone(),
        insight: to_insight_out(&record.insight),
    }
}

#[derive(Deserialize)]
pub struct DoubtIn {
    #[serde(rename = "studentName")]
    pub student_name: String,
    pub question: String,
    #[serde(default)]
    pub attachments: Vec<AttachmentIn>,
}

/// Attachment payload carried as base64 in the JSON body.
#[derive(Clone, Debug, Deserialize)]
pub struct AttachmentIn {
    pub filename: String,
    #[serde(rename = "contentBase64")]
    pub content_base64: String,
}

#[derive(Serialize)]
pub struct DoubtOut {
    pub status: String,
    pub message: String,
    #[serde(rename = "ticketId")]
    pub ticket_id: Option<u64>,
}

#[derive(Deserialize)]
pub struct RespondDoubtIn {
    #[serde(rename = "doubtId")]
    pub doubt_id: u64,
    #[serde(rename = "teacherName")]
    pub teacher_name: String,
    #[serde(rename = "answerText")]
    pub answer_text: String,
}

#[derive(Debug, Deserialize)]
pub struct DoubtsQuery {
    pub visibility: Option<String>,
}

#[derive(Serialize)]
pub struct DoubtsOut {
    pub doubts: Vec<Doubt>,
}

#[derive(Debug, Deserialize)]
pub struct VideosQuery {
    pub topic: Option<String>,
}

#[derive(Serialize)]
pub struct VideosOut {
    pub videos: Vec<Video>,
}

#[derive(Deserialize)]
pub struct SummarizeIn {
    pub filename: String,
    #[serde(rename = "contentBase64")]
    pub content_base64: String,
}

#[derive(Serialize)]
pub struct SummaryOut {
    pub summary: String,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}
