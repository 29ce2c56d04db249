use super::*;

impl ExamApp {
    /// Results (or anywhere) → ModeSelect. Clears every session field.
    /// Dropping the session drops its timer, which cancels it without any
    /// completion side effects.
    pub fn reset_session(&mut self) {
        self.session = None;
        self.result = None;
        self.mode = None;
        self.subjects.clear();
        self.available_tests.clear();
        self.selected_subject_ids.clear();
        self.selected_test = None;
        self.custom_sources = None;
        self.error = None;
        self.message.clear();
        // Any in-flight fetch or submit is orphaned; its send just fails.
        self.last_fetch = None;
        self.fetch_rx = None;
        self.submit_rx = None;
        self.submit_pending = false;
        self.state = AppState::ModeSelect;
    }

    /// SourceSelect/Previewing → back one screen, keeping the mode's data.
    pub fn back_to_source_select(&mut self) {
        if self.state == AppState::Previewing {
            self.selected_test = None;
            self.custom_sources = None;
            self.error = None;
            self.state = AppState::SourceSelect;
        }
    }

    pub fn back_to_mode_select(&mut self) {
        if self.state == AppState::SourceSelect {
            self.reset_session();
        }
    }
}
