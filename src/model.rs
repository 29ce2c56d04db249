use serde::{Deserialize, Serialize};

/// Test-generation mode picked on the first screen.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TestMode {
    /// One subject's own mock test.
    Subject,
    /// Composite exam mixing every subject.
    Full,
    /// User-picked subject set, synthesized locally.
    Custom,
}

/// Marking scheme fixed per mode at session creation, never mixed afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkingScheme {
    pub question_count: usize,
    pub marks_per_correct: i32,
    pub marks_lost_per_incorrect: i32,
    pub duration_seconds: u64,
}

impl MarkingScheme {
    /// 30 questions, +4/−1, 30 minutes.
    pub const STANDARD: MarkingScheme = MarkingScheme {
        question_count: 30,
        marks_per_correct: 4,
        marks_lost_per_incorrect: 1,
        duration_seconds: 1800,
    };

    /// 50 questions, +2/−1, 50 minutes.
    pub const COMPOSITE: MarkingScheme = MarkingScheme {
        question_count: 50,
        marks_per_correct: 2,
        marks_lost_per_incorrect: 1,
        duration_seconds: 3000,
    };

    pub fn for_mode(mode: TestMode) -> Self {
        match mode {
            TestMode::Subject | TestMode::Custom => Self::STANDARD,
            TestMode::Full => Self::COMPOSITE,
        }
    }

    /// Denominator for the percentage; negative marks never reduce it.
    pub fn total_target_marks(&self) -> i32 {
        self.question_count as i32 * self.marks_per_correct
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub id: String,
    pub name: String,
}

/// Raw question as it lives inside a test template.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TemplateQuestion {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Section {
    pub title: String,
    #[serde(default)]
    pub subject_id: Option<String>,
    #[serde(default)]
    pub subject_name: Option<String>,
    pub questions: Vec<TemplateQuestion>,
}

/// Test template as fetched or synthesized. Never mutated; a session only
/// reads from it to build its working set.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TestTemplate {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub sections: Vec<Section>,
}

impl TestTemplate {
    pub fn question_count(&self) -> usize {
        self.sections.iter().map(|s| s.questions.len()).sum()
    }
}

/// Question as drawn into a session: stamped with its section/subject of
/// origin and the marking arithmetic of the target mode. Immutable once the
/// working set is frozen.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    pub explanation: Option<String>,
    pub subject_id: String,
    pub subject_name: String,
    pub section_title: String,
    pub section_index: usize,
    pub marks_on_correct: i32,
    pub marks_lost_on_incorrect: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    NotStarted,
    Running,
    Completed,
}

/// Which screen the app is on. One variant per view function in `ui/views`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppState {
    ModeSelect,
    SourceSelect,
    Previewing,
    Running,
    Results,
}

impl Default for AppState {
    fn default() -> Self {
        AppState::ModeSelect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_marks_is_count_times_marks() {
        assert_eq!(MarkingScheme::STANDARD.total_target_marks(), 120);
        assert_eq!(MarkingScheme::COMPOSITE.total_target_marks(), 100);
    }

    #[test]
    fn scheme_selection_by_mode() {
        assert_eq!(
            MarkingScheme::for_mode(TestMode::Subject),
            MarkingScheme::STANDARD
        );
        assert_eq!(
            MarkingScheme::for_mode(TestMode::Custom),
            MarkingScheme::STANDARD
        );
        assert_eq!(
            MarkingScheme::for_mode(TestMode::Full),
            MarkingScheme::COMPOSITE
        );
    }
}
