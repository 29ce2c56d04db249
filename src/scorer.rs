use crate::model::{MarkingScheme, Question, TestMode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Aggregate outcome of a session, a pure function of
/// `(working_questions, answers, scheme)`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub total_score: i32,
    pub percentage: f32,
    pub correct_count: usize,
    pub attempted_count: usize,
    pub total_questions: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectionScore {
    pub section_name: String,
    pub score: i32,
    pub correct_count: usize,
    pub total_questions: usize,
}

/// Grouping key for the per-section breakdown. Chosen by mode, not by data
/// shape: custom tests group by subject, everything else by section title.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupBy {
    SectionTitle,
    Subject,
}

impl GroupBy {
    pub fn for_mode(mode: TestMode) -> Self {
        match mode {
            TestMode::Custom => GroupBy::Subject,
            TestMode::Subject | TestMode::Full => GroupBy::SectionTitle,
        }
    }
}

/// Marks a single answered question: `+marks_on_correct`, or
/// `-marks_lost_on_incorrect`. Unanswered questions contribute nothing.
fn contribution(q: &Question, answer: Option<usize>) -> i32 {
    match answer {
        None => 0,
        Some(idx) if idx == q.correct_answer_index => q.marks_on_correct,
        Some(_) => -q.marks_lost_on_incorrect,
    }
}

pub fn score(
    questions: &[Question],
    answers: &HashMap<String, usize>,
    scheme: &MarkingScheme,
) -> ScoreSummary {
    let mut total_score = 0;
    let mut correct_count = 0;
    let mut attempted_count = 0;

    for q in questions {
        let answer = answers.get(&q.id).copied();
        total_score += contribution(q, answer);
        if let Some(idx) = answer {
            attempted_count += 1;
            if idx == q.correct_answer_index {
                correct_count += 1;
            }
        }
    }

    // The raw total may be negative; the percentage never is.
    let target = scheme.total_target_marks();
    let percentage = (total_score as f32 / target as f32 * 100.0).max(0.0);

    ScoreSummary {
        total_score,
        percentage,
        correct_count,
        attempted_count,
        total_questions: questions.len(),
    }
}

/// Groups the working set and recomputes each group's score with the same
/// per-question marking. Groups appear in first-encounter order.
pub fn section_scores(
    questions: &[Question],
    answers: &HashMap<String, usize>,
    group_by: GroupBy,
) -> Vec<SectionScore> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut scores: Vec<SectionScore> = Vec::new();

    for q in questions {
        let (key, display) = match group_by {
            GroupBy::SectionTitle => (q.section_title.clone(), q.section_title.clone()),
            GroupBy::Subject => (q.subject_id.clone(), q.subject_name.clone()),
        };
        let slot = *index.entry(key).or_insert_with(|| {
            scores.push(SectionScore {
                section_name: display,
                score: 0,
                correct_count: 0,
                total_questions: 0,
            });
            scores.len() - 1
        });

        let answer = answers.get(&q.id).copied();
        let entry = &mut scores[slot];
        entry.total_questions += 1;
        entry.score += contribution(q, answer);
        if answer == Some(q.correct_answer_index) {
            entry.correct_count += 1;
        }
    }

    scores
}
