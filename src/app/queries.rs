use super::*;

impl ExamApp {
    pub fn current_question(&self) -> Option<&Question> {
        let session = self.session.as_ref()?;
        session.working_questions.get(session.current_index)
    }

    pub fn selected_answer(&self, question_id: &str) -> Option<usize> {
        self.session
            .as_ref()
            .and_then(|s| s.answers.get(question_id).copied())
    }

    pub fn answered_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| {
            // Duplicate padded questions share an id, so count through the
            // working set rather than the answer map.
            s.working_questions
                .iter()
                .filter(|q| s.answers.contains_key(&q.id))
                .count()
        })
    }

    pub fn question_count(&self) -> usize {
        self.session
            .as_ref()
            .map_or(0, |s| s.working_questions.len())
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.session.as_ref().map_or(0, |s| s.remaining_seconds())
    }

    pub fn on_last_question(&self) -> bool {
        self.session.as_ref().is_some_and(|s| {
            !s.working_questions.is_empty()
                && s.current_index == s.working_questions.len() - 1
        })
    }

    pub fn is_subject_selected(&self, subject_id: &str) -> bool {
        self.selected_subject_ids.iter().any(|id| id == subject_id)
    }
}
