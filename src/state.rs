//! Application state: question banks, the doubt ledger, the insights store,
//! and the optional external clients.
//!
//! This module owns:
//!   - quiz banks (built-ins merged with TOML extras, startup-immutable)
//!   - the in-memory doubt ledger with its ticket counter
//!   - the injected `InsightsStore`
//!   - optional Gemini / YouTube clients
//!
//! Quiz sessions are NOT held here: each WebSocket connection owns its own
//! `TimedQuizSession` exclusively for the connection's lifetime.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info, instrument};

use crate::banks;
use crate::config::{load_assistant_config_from_env, AssistantConfig, Prompts};
use crate::domain::{Doubt, QuizQuestion, Visibility};
use crate::gemini::Gemini;
use crate::insights::InsightsStore;
use crate::youtube::YouTube;

pub struct AppState {
    quiz_banks: HashMap<String, Vec<QuizQuestion>>,
    subject_order: Vec<String>,
    doubts: Arc<RwLock<Vec<Doubt>>>,
    next_doubt_id: AtomicU64,
    pub insights: InsightsStore,
    pub gemini: Option<Gemini>,
    pub youtube: Option<YouTube>,
    pub prompts: Prompts,
}

impl AppState {
    /// Build state from env: load config, merge banks, init clients.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg = load_assistant_config_from_env();
        let insights = InsightsStore::from_env();

        let gemini = Gemini::from_env();
        if let Some(g) = &gemini {
            info!(target: "edumate_backend", base_url = %g.base_url, model = %g.model, "Gemini enabled.");
        } else {
            info!(target: "edumate_backend", "Gemini disabled (no GEMINI_API_KEY). Using local stubs.");
        }

        let youtube = YouTube::from_env();
        if youtube.is_none() {
            info!(target: "edumate_backend", "YouTube disabled (no YOUTUBE_API_KEY). Using curated stub list.");
        }

        Self::from_parts(cfg, insights, gemini, youtube)
    }

    /// Pure assembly step, separated from `new` so tests can inject config
    /// and storage.
    pub fn from_parts(
        cfg: Option<AssistantConfig>,
        insights: InsightsStore,
        gemini: Option<Gemini>,
        youtube: Option<YouTube>,
    ) -> Self {
        let prompts = cfg.as_ref().map(|c| c.prompts.clone()).unwrap_or_default();

        let mut quiz_banks = HashMap::<String, Vec<QuizQuestion>>::new();
        let mut subject_order = Vec::<String>::new();

        for subject in banks::quiz_subjects() {
            if let Some(bank) = banks::quiz_bank(subject) {
                subject_order.push(subject.to_string());
                quiz_banks.insert(subject.to_string(), bank);
            }
        }

        // Layer config-provided subjects on top. Questions violating the
        // bank invariants are skipped, not fatal.
        if let Some(cfg) = &cfg {
            for subject_cfg in &cfg.subjects {
                let name = subject_cfg.name.clone();
                let mut questions = Vec::new();
                for q in &subject_cfg.questions {
                    if q.options.len() < 2 {
                        error!(target: "assessment", subject = %name, prompt = %q.prompt, "Skipping bank item: fewer than two options.");
                        continue;
                    }
                    if !q.options.contains(&q.answer) {
                        error!(target: "assessment", subject = %name, prompt = %q.prompt, "Skipping bank item: answer not among options.");
                        continue;
                    }
                    questions.push(QuizQuestion {
                        prompt: q.prompt.clone(),
                        options: q.options.clone(),
                        answer: q.answer.clone(),
                        topic: q.topic.clone(),
                    });
                }
                if questions.is_empty() {
                    error!(target: "assessment", subject = %name, "Skipping configured subject: no valid questions.");
                    continue;
                }
                if !quiz_banks.contains_key(&name) {
                    subject_order.push(name.clone());
                }
                quiz_banks.insert(name, questions);
            }
        }

        // Startup inventory summary.
        for subject in &subject_order {
            let count = quiz_banks.get(subject).map(|b| b.len()).unwrap_or(0);
            info!(target: "assessment", %subject, questions = count, "Startup quiz bank inventory");
        }

        Self {
            quiz_banks,
            subject_order,
            doubts: Arc::new(RwLock::new(Vec::new())),
            next_doubt_id: AtomicU64::new(1),
            insights,
            gemini,
            youtube,
            prompts,
        }
    }

    /// Available quiz subjects, in presentation order.
    pub fn subjects(&self) -> &[String] {
        &self.subject_order
    }

    /// The full question bank for a subject, or None if unknown.
    pub fn quiz_bank(&self, subject: &str) -> Option<&[QuizQuestion]> {
        self.quiz_banks.get(subject).map(|b| b.as_slice())
    }

    /// Append a new doubt and return the assigned ticket id.
    #[instrument(level = "debug", skip(self, question, attachments), fields(%student))]
    pub async fn submit_doubt(
        &self,
        student: &str,
        question: String,
        attachments: Vec<String>,
        visibility: Visibility,
    ) -> u64 {
        let id = self.next_doubt_id.fetch_add(1, Ordering::Relaxed);
        let doubt = Doubt {
            id,
            student: student.to_string(),
            question,
            answer: None,
            teacher_name: None,
            attachments,
            visibility,
        };
        self.doubts.write().await.push(doubt);
        id
    }

    /// Attach/overwrite the answer of a doubt. Returns false for an
    /// unknown ticket id.
    #[instrument(level = "debug", skip(self, answer), fields(%doubt_id))]
    pub async fn answer_doubt(
        &self,
        doubt_id: u64,
        teacher_name: Option<&str>,
        answer: String,
    ) -> bool {
        let mut doubts = self.doubts.write().await;
        match doubts.iter_mut().find(|d| d.id == doubt_id) {
            Some(doubt) => {
                doubt.answer = Some(answer);
                if let Some(name) = teacher_name {
                    doubt.teacher_name = Some(name.to_string());
                }
                true
            }
            None => false,
        }
    }

    /// Snapshot of the ledger, optionally filtered by visibility.
    pub async fn doubts(&self, visibility: Option<Visibility>) -> Vec<Doubt> {
        let doubts = self.doubts.read().await;
        doubts
            .iter()
            .filter(|d| visibility.map(|v| d.visibility == v).unwrap_or(true))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{QuestionCfg, SubjectCfg};
    use crate::insights::{InsightsStore, MemoryKv};

    fn memory_store() -> InsightsStore {
        InsightsStore::new(Box::new(MemoryKv::default()))
    }

    #[test]
    fn built_in_subjects_are_listed_in_order() {
        let state = AppState::from_parts(None, memory_store(), None, None);
        let subjects = state.subjects();
        assert_eq!(subjects.first().map(String::as_str), Some("Machine Learning"));
        assert_eq!(subjects.len(), 6);
        assert!(state.quiz_bank("Mathematics").is_some());
        assert!(state.quiz_bank("Alchemy").is_none());
    }

    #[test]
    fn config_subjects_merge_and_invalid_items_are_skipped() {
        let cfg = AssistantConfig {
            prompts: Default::default(),
            subjects: vec![SubjectCfg {
                name: "Operating Systems".into(),
                questions: vec![
                    QuestionCfg {
                        prompt: "Which scheduler runs first?".into(),
                        options: vec!["Long-term".into(), "Short-term".into()],
                        answer: "Long-term".into(),
                        topic: "Scheduling".into(),
                    },
                    QuestionCfg {
                        // Answer not among the options: must be skipped.
                        prompt: "Broken question".into(),
                        options: vec!["a".into(), "b".into()],
                        answer: "c".into(),
                        topic: "Scheduling".into(),
                    },
                ],
            }],
        };
        let state = AppState::from_parts(Some(cfg), memory_store(), None, None);
        let bank = state.quiz_bank("Operating Systems").expect("merged bank");
        assert_eq!(bank.len(), 1);
        assert!(state.subjects().iter().any(|s| s == "Operating Systems"));
    }

    #[tokio::test]
    async fn doubt_ledger_assigns_sequential_tickets() {
        let state = AppState::from_parts(None, memory_store(), None, None);
        let first = state
            .submit_doubt("Asha", "What is a monad?".into(), vec![], Visibility::Public)
            .await;
        let second = state
            .submit_doubt("Bo", "Why is the sky blue?".into(), vec![], Visibility::Private)
            .await;
        assert_eq!(first, 1);
        assert_eq!(second, 2);

        assert!(state.answer_doubt(first, Some("Mx. Lee"), "Context matters.".into()).await);
        assert!(!state.answer_doubt(99, None, "ghost".into()).await);

        let public = state.doubts(Some(Visibility::Public)).await;
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].answer.as_deref(), Some("Context matters."));
        assert_eq!(state.doubts(None).await.len(), 2);
    }
}
