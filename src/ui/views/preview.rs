use crate::model::MarkingScheme;
use crate::ui::layout::{centered_panel, format_clock, two_button_row};
use crate::ExamApp;
use egui::Context;

pub fn ui_preview(app: &mut ExamApp, ctx: &Context) {
    centered_panel(ctx, 320.0, 560.0, |ui| {
        ui.vertical_centered(|ui| {
            let Some(test) = app.selected_test.clone() else {
                app.back_to_source_select();
                return;
            };
            let scheme = app
                .mode
                .map(MarkingScheme::for_mode)
                .unwrap_or(MarkingScheme::STANDARD);

            ui.heading(format!("📋 {}", test.title));
            ui.add_space(8.0);
            if !test.description.is_empty() {
                ui.label(&test.description);
                ui.add_space(8.0);
            }

            ui.label(format!("Questions: {}", scheme.question_count));
            ui.label(format!(
                "Marking: +{} correct, −{} incorrect, unanswered 0",
                scheme.marks_per_correct, scheme.marks_lost_per_incorrect
            ));
            ui.label(format!(
                "Duration: {}",
                format_clock(scheme.duration_seconds)
            ));
            ui.label(format!(
                "Maximum marks: {}",
                scheme.total_target_marks()
            ));
            ui.add_space(12.0);

            if let Some(error) = &app.error {
                ui.colored_label(egui::Color32::LIGHT_RED, format!("⚠ {error}"));
                ui.add_space(8.0);
            }

            let (back, start) = two_button_row(ui, 380.0, "⬅ Back", "▶ Start test");
            if start {
                app.start_session();
            }
            if back {
                app.back_to_source_select();
            }
        });
    });
}
