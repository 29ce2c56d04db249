use crate::model::TestMode;
use crate::ui::layout::centered_panel;
use crate::ExamApp;
use egui::{Button, Context};

pub fn ui_mode_select(app: &mut ExamApp, ctx: &Context) {
    centered_panel(ctx, 260.0, 520.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading("📝 Mock Test Practice");
            ui.add_space(10.0);
            ui.label("How do you want to practice today?");
            ui.add_space(16.0);

            let button_width = 320.0;
            let button_height = 36.0;

            let subject = ui.add_sized(
                [button_width, button_height],
                Button::new("📚 Subject test (30 questions)"),
            );
            ui.add_space(8.0);
            let full = ui.add_sized(
                [button_width, button_height],
                Button::new("🎓 Full mock exam (50 questions)"),
            );
            ui.add_space(8.0);
            let custom = ui.add_sized(
                [button_width, button_height],
                Button::new("🧩 Custom test (pick your subjects)"),
            );

            if subject.clicked() {
                app.select_mode(TestMode::Subject);
            }
            if full.clicked() {
                app.select_mode(TestMode::Full);
            }
            if custom.clicked() {
                app.select_mode(TestMode::Custom);
            }
        });
    });
}
