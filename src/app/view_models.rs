use super::*;

/// Display-ready row for the per-question breakdown.
pub struct OutcomeRow {
    pub number: usize,
    pub question_text: String,
    pub your_answer: String,
    pub correct_answer: String,
    pub delta: i32,
    pub attempted: bool,
    pub is_correct: bool,
    pub explanation: Option<String>,
}

impl ExamApp {
    pub fn outcome_rows(&self) -> Vec<OutcomeRow> {
        let Some(result) = &self.result else {
            return Vec::new();
        };
        result
            .breakdown
            .iter()
            .enumerate()
            .map(|(i, o)| {
                let option_text = |idx: Option<usize>| {
                    idx.and_then(|i| o.options.get(i))
                        .cloned()
                        .unwrap_or_else(|| "—".to_string())
                };
                OutcomeRow {
                    number: i + 1,
                    question_text: o.question_text.clone(),
                    your_answer: option_text(o.user_answer_index),
                    correct_answer: option_text(o.correct_answer_index),
                    delta: o.score_delta,
                    attempted: o.user_answer_index.is_some(),
                    is_correct: o.is_correct,
                    explanation: o.explanation.clone(),
                }
            })
            .collect()
    }
}
