pub mod layout;
pub mod views;

use crate::app::ExamApp;
use crate::model::AppState;
use eframe::{App, Frame};
use egui::Context;
use layout::{bottom_panel, top_panel};

impl App for ExamApp {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        // Drain finished background work and advance the countdown before
        // anything is drawn.
        self.poll_background();

        if matches!(self.state, AppState::Running | AppState::Results) {
            top_panel(self, ctx);
        }
        bottom_panel(ctx);

        match self.state {
            AppState::ModeSelect => views::mode_select::ui_mode_select(self, ctx),
            AppState::SourceSelect => views::source_select::ui_source_select(self, ctx),
            AppState::Previewing => views::preview::ui_preview(self, ctx),
            AppState::Running => views::exam::ui_exam(self, ctx),
            AppState::Results => views::results::ui_results(self, ctx),
        }

        // One-second tick granularity while the clock runs.
        if self.state == AppState::Running {
            ctx.request_repaint_after(std::time::Duration::from_secs(1));
        }
    }
}
