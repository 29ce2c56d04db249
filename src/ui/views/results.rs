use crate::ui::layout::centered_panel;
use crate::ExamApp;
use egui::{Context, RichText, ScrollArea};

pub fn ui_results(app: &mut ExamApp, ctx: &Context) {
    centered_panel(ctx, 560.0, 680.0, |ui| {
        ui.vertical_centered(|ui| {
            let Some(result) = app.result.clone() else {
                return;
            };

            ui.heading("🏆 Your result");
            if let Some(session) = &app.session {
                ui.label(RichText::new(&session.test_title).weak());
            }
            ui.add_space(6.0);

            if !app.message.is_empty() {
                ui.label(&app.message);
                ui.add_space(4.0);
            }
            if app.submit_pending {
                ui.label(RichText::new("⏳ Syncing with the server…").weak());
            } else if result.locally_computed {
                ui.label(RichText::new("📴 Computed locally on this device").weak());
            }
            if let Some(message) = &result.message {
                ui.label(RichText::new(message).weak());
            }
            ui.add_space(8.0);

            ui.label(
                RichText::new(format!(
                    "{} marks — {:.1}%",
                    result.summary.total_score, result.summary.percentage
                ))
                .size(22.0)
                .strong(),
            );
            ui.label(format!(
                "{} correct · {} attempted · {} questions",
                result.summary.correct_count,
                result.summary.attempted_count,
                result.summary.total_questions
            ));
            ui.add_space(10.0);

            ui.separator();
            ui.label(RichText::new("Section breakdown").strong());
            ui.add_space(4.0);
            for section in &result.per_section {
                ui.label(format!(
                    "{}: {} marks ({}/{} correct)",
                    section.section_name,
                    section.score,
                    section.correct_count,
                    section.total_questions
                ));
            }
            ui.add_space(10.0);

            ui.separator();
            ui.label(RichText::new("Question review").strong());
            ui.add_space(4.0);
            let rows = app.outcome_rows();
            ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
                for row in &rows {
                    let mark = if !row.attempted {
                        "➖"
                    } else if row.is_correct {
                        "✅"
                    } else {
                        "❌"
                    };
                    ui.label(format!("{mark} Q{}: {}", row.number, row.question_text));
                    if row.attempted {
                        ui.label(
                            RichText::new(format!(
                                "    your answer: {} · correct: {} · {:+}",
                                row.your_answer, row.correct_answer, row.delta
                            ))
                            .weak(),
                        );
                    } else {
                        ui.label(
                            RichText::new(format!(
                                "    unanswered · correct: {}",
                                row.correct_answer
                            ))
                            .weak(),
                        );
                    }
                    if let Some(explanation) = &row.explanation {
                        ui.label(RichText::new(format!("    💡 {explanation}")).weak());
                    }
                    ui.add_space(6.0);
                }
            });

            ui.add_space(12.0);
            if ui
                .add_sized([260.0, 36.0], egui::Button::new("🔄 Take another test"))
                .clicked()
            {
                app.reset_session();
            }
        });
    });
}
