//! Domain models shared by the engine, session, stores and routes.

use serde::{Deserialize, Serialize};

/// Self-reported proficiency tag attached to each option of a tiered
/// skill-assessment question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
  Beginner,
  Intermediate,
  Advanced,
}

impl SkillLevel {
  /// Parse the wire/bank tag. Returns None for anything outside the three
  /// recognized tags so the engine can reject it as invalid input.
  pub fn from_tag(tag: &str) -> Option<Self> {
    match tag {
      "beginner" => Some(SkillLevel::Beginner),
      "intermediate" => Some(SkillLevel::Intermediate),
      "advanced" => Some(SkillLevel::Advanced),
      _ => None,
    }
  }

  pub fn as_tag(&self) -> &'static str {
    match self {
      SkillLevel::Beginner => "beginner",
      SkillLevel::Intermediate => "intermediate",
      SkillLevel::Advanced => "advanced",
    }
  }

  /// Weight used by the tiered scoring formula.
  pub fn weight(&self) -> u32 {
    match self {
      SkillLevel::Beginner => 1,
      SkillLevel::Intermediate => 2,
      SkillLevel::Advanced => 3,
    }
  }
}

/// One option of a tiered skill-assessment question. There is no correct
/// answer; the chosen level IS the signal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SkillOption {
  pub text: String,
  pub level: SkillLevel,
}

/// A tiered skill-assessment question (self-evaluation, one per topic area).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SkillQuestion {
  pub id: u32,
  pub prompt: String,
  pub options: Vec<SkillOption>,
}

/// A timed-quiz question: plain string choices, one declared correct answer,
/// and a topic label used for weakness attribution.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizQuestion {
  pub prompt: String,
  pub options: Vec<String>,
  pub answer: String,
  pub topic: String,
}

/// The insight record driving the dashboard. Created once per completed
/// assessment/quiz submission, immutable, superseded by the next one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
  pub predicted_score: u32,
  pub weakness_topic: String,
  pub learning_milestone: String,
}

/// Who may see a doubt thread.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
  #[default]
  Public,
  Private,
}

/// A student doubt plus its (possibly auto-generated) answer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Doubt {
  pub id: u64,
  pub student: String,
  pub question: String,
  pub answer: Option<String>,
  pub teacher_name: Option<String>,
  pub attachments: Vec<String>,
  pub visibility: Visibility,
}

/// One recommended video as surfaced to the frontend.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Video {
  pub title: String,
  pub url: String,
  pub channel: String,
  pub thumbnail: String,
}
