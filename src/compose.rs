use crate::api::SubmitResponse;
use crate::model::{MarkingScheme, Question};
use crate::scorer::{score, section_scores, GroupBy, ScoreSummary, SectionScore};
use std::collections::HashMap;

/// Per-question row of the results screen.
#[derive(Debug, Clone)]
pub struct QuestionOutcome {
    pub question_text: String,
    pub options: Vec<String>,
    pub user_answer_index: Option<usize>,
    pub correct_answer_index: Option<usize>,
    pub is_correct: bool,
    pub score_delta: i32,
    pub explanation: Option<String>,
    pub section_title: String,
}

/// Displayable report for a completed session. Derived, never mutated;
/// recomputable from the working set and answers alone.
#[derive(Debug, Clone)]
pub struct ExamResult {
    pub summary: ScoreSummary,
    pub per_section: Vec<SectionScore>,
    pub breakdown: Vec<QuestionOutcome>,
    /// True while no backend-confirmed result has been merged in.
    pub locally_computed: bool,
    pub message: Option<String>,
}

fn outcome_for(q: &Question, answer: Option<usize>) -> QuestionOutcome {
    let is_correct = answer == Some(q.correct_answer_index);
    let score_delta = match answer {
        None => 0,
        Some(_) if is_correct => q.marks_on_correct,
        Some(_) => -q.marks_lost_on_incorrect,
    };
    QuestionOutcome {
        question_text: q.text.clone(),
        options: q.options.clone(),
        user_answer_index: answer,
        correct_answer_index: Some(q.correct_answer_index),
        is_correct,
        score_delta,
        explanation: q.explanation.clone(),
        section_title: q.section_title.clone(),
    }
}

/// Builds the full report from local data only.
pub fn local_result(
    questions: &[Question],
    answers: &HashMap<String, usize>,
    scheme: &MarkingScheme,
    group_by: GroupBy,
) -> ExamResult {
    let breakdown = questions
        .iter()
        .map(|q| outcome_for(q, answers.get(&q.id).copied()))
        .collect();

    ExamResult {
        summary: score(questions, answers, scheme),
        per_section: section_scores(questions, answers, group_by),
        breakdown,
        locally_computed: true,
        message: None,
    }
}

fn usable_percentage(p: f32) -> bool {
    p.is_finite() && p >= 0.0
}

/// Merges a backend-confirmed response over a local result, field by field:
/// a response missing one field does not discard the others. Per-question
/// entries always end up with their options, backfilled from the working
/// set (joined on question text) when the backend omits them.
pub fn merge_backend(
    mut local: ExamResult,
    response: &SubmitResponse,
    working: &[Question],
) -> ExamResult {
    if let Some(s) = response.score {
        local.summary.total_score = s;
    }
    if let Some(p) = response.percentage.filter(|p| usable_percentage(*p)) {
        local.summary.percentage = p;
    }
    if let Some(c) = response.correct_answers {
        local.summary.correct_count = c;
    }
    if let Some(t) = response.total_questions.filter(|t| *t > 0) {
        local.summary.total_questions = t;
    }
    if let Some(msg) = &response.message {
        local.message = Some(msg.clone());
    }

    if let Some(results) = &response.results {
        let by_text: HashMap<&str, &Question> =
            working.iter().map(|q| (q.text.as_str(), q)).collect();

        local.breakdown = results
            .iter()
            .map(|r| {
                let known = by_text.get(r.question.as_str());
                let options = r
                    .options
                    .clone()
                    .filter(|o| !o.is_empty())
                    .or_else(|| known.map(|q| q.options.clone()))
                    .unwrap_or_else(|| vec!["(options unavailable)".to_string()]);
                let correct_answer_index = r
                    .correct_answer
                    .or_else(|| known.map(|q| q.correct_answer_index));
                let is_correct = r
                    .is_correct
                    .unwrap_or(r.user_answer.is_some() && r.user_answer == correct_answer_index);
                let score_delta = match (r.user_answer, known) {
                    (None, _) => 0,
                    (Some(_), Some(q)) if is_correct => q.marks_on_correct,
                    (Some(_), Some(q)) => -q.marks_lost_on_incorrect,
                    (Some(_), None) => 0,
                };
                QuestionOutcome {
                    question_text: r.question.clone(),
                    options,
                    user_answer_index: r.user_answer,
                    correct_answer_index,
                    is_correct,
                    score_delta,
                    explanation: r
                        .explanation
                        .clone()
                        .or_else(|| known.and_then(|q| q.explanation.clone())),
                    section_title: known
                        .map(|q| q.section_title.clone())
                        .unwrap_or_default(),
                }
            })
            .collect();
    }

    local.locally_computed = false;
    local
}
