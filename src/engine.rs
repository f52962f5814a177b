//! Pure scoring for the two assessment flavors.
//!
//! Flow:
//! 1) The tiered flow sums self-reported level weights and classifies a tier.
//! 2) The correctness flow counts exact answer matches and attributes the
//!    weakest topic from the incorrect tally.
//! 3) Both project into the `Insight` record the dashboard consumes.
//!
//! Everything here is deterministic and does no I/O. Callers invoke a
//! scoring function exactly once, after the final answer is in.

use std::collections::HashMap;

use crate::domain::{Insight, QuizQuestion, SkillLevel};
use crate::error::EngineError;

/// Outcome of a tiered self-assessment.
#[derive(Clone, Debug)]
pub struct SkillOutcome {
  pub skill: String,
  pub tier: SkillLevel,
  pub total_score: u32,
  pub insight: Insight,
}

/// Outcome of a correctness-graded (timed) quiz.
#[derive(Clone, Debug)]
pub struct QuizOutcome {
  pub subject: String,
  pub correct_count: u32,
  pub wrong_count: u32,
  pub total_count: u32,
  pub score: u32,
  pub insight: Insight,
}

/// Score a tiered self-assessment: one level tag per question, in answer
/// order. Rejects an empty sequence and any tag outside
/// beginner/intermediate/advanced.
pub fn assess_skill(skill: &str, level_tags: &[String]) -> Result<SkillOutcome, EngineError> {
  if level_tags.is_empty() {
    return Err(EngineError::InvalidInput("no answers to score".into()));
  }

  let mut levels = Vec::with_capacity(level_tags.len());
  for tag in level_tags {
    match SkillLevel::from_tag(tag) {
      Some(level) => levels.push(level),
      None => {
        return Err(EngineError::InvalidInput(format!(
          "unrecognized level tag '{tag}'"
        )))
      }
    }
  }

  let n = levels.len() as u32;
  let total_score: u32 = levels.iter().map(|l| l.weight()).sum();

  let tier = if total_score as f64 >= n as f64 * 2.5 {
    SkillLevel::Advanced
  } else if total_score as f64 >= n as f64 * 1.5 {
    SkillLevel::Intermediate
  } else {
    SkillLevel::Beginner
  };

  let predicted_score =
    ((total_score as f64 / (n as f64 * 3.0)) * 100.0).round().clamp(0.0, 100.0) as u32;

  let weakness_topic = match tier {
    SkillLevel::Beginner => format!("{skill} - Foundational Knowledge"),
    SkillLevel::Intermediate => format!("{skill} - Advanced Topics"),
    SkillLevel::Advanced => format!("{skill} - Optimization & Implementation"),
  };
  let learning_milestone =
    format!("Focus on {} {skill} track.", tier.as_tag().to_uppercase());

  Ok(SkillOutcome {
    skill: skill.to_string(),
    tier,
    total_score,
    insight: Insight { predicted_score, weakness_topic, learning_milestone },
  })
}

/// Grade a timed quiz: exact answer matches against the declared correct
/// answers. The answer map may be incomplete; an unanswered question counts
/// as incorrect. Rejects an empty question set.
pub fn grade_quiz(
  subject: &str,
  questions: &[QuizQuestion],
  answers: &HashMap<usize, String>,
) -> Result<QuizOutcome, EngineError> {
  if questions.is_empty() {
    return Err(EngineError::InvalidInput("no questions to grade".into()));
  }

  let total_count = questions.len() as u32;
  let mut correct_count = 0u32;
  // Incorrect tallies keyed by topic, first-seen order preserved. Iteration
  // order is the tie-breaker, so this must not be a hash map.
  let mut missed: Vec<(String, u32)> = Vec::new();

  for (index, question) in questions.iter().enumerate() {
    if answers.get(&index) == Some(&question.answer) {
      correct_count += 1;
    } else {
      match missed.iter_mut().find(|(topic, _)| *topic == question.topic) {
        Some((_, count)) => *count += 1,
        None => missed.push((question.topic.clone(), 1)),
      }
    }
  }

  let wrong_count = total_count - correct_count;
  let score = ((correct_count as f64 / total_count as f64) * 100.0).round() as u32;

  // Strictly highest tally wins; on a tie the topic that reached it first
  // in question order keeps the spot.
  let mut top_topic: Option<&str> = None;
  let mut top_count = 0u32;
  for (topic, count) in &missed {
    if *count > top_count {
      top_count = *count;
      top_topic = Some(topic);
    }
  }

  let weakness_topic = match top_topic {
    Some(topic) => topic.to_string(),
    // Unreachable while score is a pure function of correct_count (an empty
    // missed tally forces score == 100); kept so the fallback chain matches
    // the dashboard contract.
    None if score < 80 => format!("Advanced {subject} concepts"),
    None => "No critical weakness detected.".to_string(),
  };

  let learning_milestone = if score < 60 {
    format!("Review {subject} Fundamentals")
  } else if score < 85 {
    format!("Practice {subject} Intermediate")
  } else {
    format!("Master {subject} Concepts")
  };

  Ok(QuizOutcome {
    subject: subject.to_string(),
    correct_count,
    wrong_count,
    total_count,
    score,
    insight: Insight {
      predicted_score: score,
      weakness_topic,
      learning_milestone,
    },
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn tags(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|t| t.to_string()).collect()
  }

  fn question(answer: &str, topic: &str) -> QuizQuestion {
    QuizQuestion {
      prompt: format!("pick {answer}"),
      options: vec![answer.to_string(), "other".to_string()],
      answer: answer.to_string(),
      topic: topic.to_string(),
    }
  }

  #[test]
  fn tiered_dsa_example_classifies_advanced() {
    let out = assess_skill(
      "Data Structures & Algorithms",
      &tags(&["advanced", "advanced", "intermediate"]),
    )
    .expect("outcome");
    assert_eq!(out.total_score, 8);
    assert_eq!(out.tier, SkillLevel::Advanced);
    assert_eq!(out.insight.predicted_score, 89);
    assert_eq!(
      out.insight.weakness_topic,
      "Data Structures & Algorithms - Optimization & Implementation"
    );
    assert_eq!(
      out.insight.learning_milestone,
      "Focus on ADVANCED Data Structures & Algorithms track."
    );
  }

  #[test]
  fn tiered_score_in_range_and_tier_monotonic() {
    for n in 1usize..=5 {
      let mut seen: Vec<(u32, u8)> = Vec::new();
      for advanced in 0..=n {
        for intermediate in 0..=(n - advanced) {
          let beginner = n - advanced - intermediate;
          let mut answers = vec!["advanced"; advanced];
          answers.extend(vec!["intermediate"; intermediate]);
          answers.extend(vec!["beginner"; beginner]);
          let out = assess_skill("ML", &tags(&answers)).expect("outcome");
          assert!(out.insight.predicted_score <= 100);
          let rank = match out.tier {
            SkillLevel::Beginner => 0,
            SkillLevel::Intermediate => 1,
            SkillLevel::Advanced => 2,
          };
          seen.push((out.total_score, rank));
        }
      }
      seen.sort_by_key(|(total, _)| *total);
      for pair in seen.windows(2) {
        assert!(
          pair[0].1 <= pair[1].1,
          "tier regressed between totals {} and {} (n={n})",
          pair[0].0,
          pair[1].0
        );
      }
    }
  }

  #[test]
  fn tiered_rejects_empty_and_unknown_tags() {
    assert!(matches!(
      assess_skill("ML", &[]),
      Err(EngineError::InvalidInput(_))
    ));
    assert!(matches!(
      assess_skill("ML", &tags(&["beginner", "expert"])),
      Err(EngineError::InvalidInput(_))
    ));
  }

  #[test]
  fn quiz_unanswered_counts_as_incorrect() {
    let questions: Vec<QuizQuestion> =
      (0..4).map(|_| question("yes", "Fundamentals")).collect();
    let out = grade_quiz("Mathematics", &questions, &HashMap::new()).expect("outcome");
    assert_eq!(out.correct_count, 0);
    assert_eq!(out.wrong_count, 4);
    assert_eq!(out.score, 0);
    assert_eq!(out.insight.weakness_topic, "Fundamentals");
    assert_eq!(out.insight.learning_milestone, "Review Mathematics Fundamentals");
  }

  #[test]
  fn quiz_six_of_ten_correct_flags_the_only_topic() {
    let questions: Vec<QuizQuestion> =
      (0..10).map(|_| question("yes", "Fundamentals")).collect();
    let mut answers = HashMap::new();
    for index in 0..6 {
      answers.insert(index, "yes".to_string());
    }
    let out = grade_quiz("Computer Network", &questions, &answers).expect("outcome");
    assert_eq!(out.score, 60);
    assert_eq!(out.correct_count, 6);
    assert_eq!(out.wrong_count, 4);
    assert_eq!(out.insight.weakness_topic, "Fundamentals");
    assert_eq!(
      out.insight.learning_milestone,
      "Practice Computer Network Intermediate"
    );
  }

  #[test]
  fn quiz_perfect_run_has_no_weakness() {
    let questions: Vec<QuizQuestion> =
      (0..10).map(|_| question("yes", "Fundamentals")).collect();
    let answers: HashMap<usize, String> =
      (0..10).map(|index| (index, "yes".to_string())).collect();
    let out = grade_quiz("FLA", &questions, &answers).expect("outcome");
    assert_eq!(out.score, 100);
    assert_eq!(out.insight.weakness_topic, "No critical weakness detected.");
    assert_eq!(out.insight.learning_milestone, "Master FLA Concepts");
  }

  #[test]
  fn quiz_weakness_tie_break_is_stable() {
    // Two topics tied at two misses each; the one appearing first in
    // question order must win.
    let questions = vec![
      question("yes", "Calculus"),
      question("yes", "Calculus"),
      question("yes", "Algebra"),
      question("yes", "Algebra"),
      question("yes", "Geometry"),
    ];
    let mut answers = HashMap::new();
    answers.insert(4usize, "yes".to_string());
    let out = grade_quiz("Mathematics", &questions, &answers).expect("outcome");
    assert_eq!(out.insight.weakness_topic, "Calculus");
  }

  #[test]
  fn quiz_rejects_empty_question_set() {
    assert!(matches!(
      grade_quiz("Mathematics", &[], &HashMap::new()),
      Err(EngineError::InvalidInput(_))
    ));
  }

  #[test]
  fn quiz_ignores_answers_outside_the_option_list() {
    let questions = vec![question("yes", "Fundamentals")];
    let mut answers = HashMap::new();
    answers.insert(0usize, "not-an-option".to_string());
    let out = grade_quiz("AI", &questions, &answers).expect("outcome");
    assert_eq!(out.correct_count, 0);
    assert_eq!(out.score, 0);
  }
}
