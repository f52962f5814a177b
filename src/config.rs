//! Loading assistant configuration (prompts + optional extra quiz banks)
//! from TOML.
//!
//! See `AssistantConfig` and `Prompts` for the expected schema.

use serde::Deserialize;
use tracing::{info, error};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AssistantConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub subjects: Vec<SubjectCfg>,
}

/// Extra quiz subject accepted in TOML configuration. Questions that fail
/// the bank invariants (at least two options, answer among the options) are
/// skipped at load time with an error log.
#[derive(Clone, Debug, Deserialize)]
pub struct SubjectCfg {
  pub name: String,
  #[serde(default)]
  pub questions: Vec<QuestionCfg>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct QuestionCfg {
  pub prompt: String,
  pub options: Vec<String>,
  pub answer: String,
  pub topic: String,
}

/// Prompts used by the Gemini client and the video search. Defaults suit
/// the student-assistant tone; override in TOML to tune phrasing.
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  pub doubt_template: String,
  pub summarize_template: String,
  pub video_query_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      doubt_template: "Answer the student doubt in clear, simple language:\n{question}".into(),
      summarize_template: "Summarize the following content in simple language with bullet points:\n{content}".into(),
      video_query_template: "{topic} explained for students".into(),
    }
  }
}

/// Attempt to load `AssistantConfig` from ASSISTANT_CONFIG_PATH. On any
/// parsing/IO error, returns None.
pub fn load_assistant_config_from_env() -> Option<AssistantConfig> {
  let path = std::env::var("ASSISTANT_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<AssistantConfig>(&s) {
      Ok(cfg) => {
        info!(target: "edumate_backend", %path, "Loaded assistant config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "edumate_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "edumate_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
