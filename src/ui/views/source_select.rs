use crate::model::TestMode;
use crate::ui::layout::centered_panel;
use crate::ExamApp;
use egui::{Button, Context, ScrollArea};

pub fn ui_source_select(app: &mut ExamApp, ctx: &Context) {
    centered_panel(ctx, 420.0, 560.0, |ui| {
        ui.vertical_centered(|ui| {
            match app.mode {
                Some(TestMode::Custom) => ui.heading("Pick your subjects"),
                Some(TestMode::Full) => ui.heading("Full mock exams"),
                _ => ui.heading("Pick a test"),
            };
            ui.add_space(12.0);

            if let Some(error) = &app.error {
                ui.colored_label(egui::Color32::LIGHT_RED, format!("⚠ {error}"));
                ui.add_space(6.0);
                // Only errors that can be re-attempted get a retry button.
                if error.is_recoverable() && ui.button("↻ Retry").clicked() {
                    app.retry_fetch();
                }
                ui.add_space(10.0);
            } else if app.fetch_pending() {
                ui.spinner();
                ui.label("Loading…");
                ui.add_space(10.0);
            }

            let button_width = 380.0;
            let button_height = 36.0;

            if app.mode == Some(TestMode::Custom) {
                // Ordered multi-select: the click order decides which
                // subjects get the remainder questions.
                let subjects = app.subjects.clone();
                ScrollArea::vertical().max_height(260.0).show(ui, |ui| {
                    for subject in &subjects {
                        let selected = app.is_subject_selected(&subject.id);
                        let label = if selected {
                            format!("☑ {}", subject.name)
                        } else {
                            format!("☐ {}", subject.name)
                        };
                        if ui
                            .add_sized([button_width, button_height], Button::new(label))
                            .clicked()
                        {
                            app.toggle_subject(&subject.id);
                        }
                        ui.add_space(6.0);
                    }
                });

                ui.add_space(10.0);
                ui.label(format!(
                    "{} subject(s) selected",
                    app.selected_subject_ids.len()
                ));
                ui.add_space(6.0);
                let confirm = ui.add_enabled(
                    !app.selected_subject_ids.is_empty(),
                    Button::new("▶ Build my test"),
                );
                if confirm.clicked() {
                    app.confirm_subjects();
                }
            } else {
                let tests: Vec<(String, String, usize)> = app
                    .available_tests
                    .iter()
                    .map(|t| (t.id.clone(), t.title.clone(), t.question_count()))
                    .collect();
                ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                    for (id, title, count) in &tests {
                        let label = format!("📄 {title}  ({count} questions)");
                        if ui
                            .add_sized([button_width, button_height], Button::new(label))
                            .clicked()
                        {
                            app.select_test(id);
                        }
                        ui.add_space(6.0);
                    }
                });
            }

            ui.add_space(16.0);
            if ui
                .add_sized([button_width, button_height], Button::new("⬅ Back"))
                .clicked()
            {
                app.back_to_mode_select();
            }
        });
    });
}
