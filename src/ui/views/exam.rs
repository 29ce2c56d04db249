use crate::ui::layout::{centered_panel, format_clock, two_button_row};
use crate::ExamApp;
use egui::{Button, Context, RichText, ScrollArea};

pub fn ui_exam(app: &mut ExamApp, ctx: &Context) {
    centered_panel(ctx, 520.0, 640.0, |ui| {
        ui.vertical_centered(|ui| {
            let Some(question) = app.current_question().cloned() else {
                return;
            };
            let index = app.session.as_ref().map_or(0, |s| s.current_index);
            let total = app.question_count();
            let remaining = app.remaining_seconds();

            // Header: position, answered count and the clock.
            ui.horizontal(|ui| {
                ui.label(format!("Question {} / {}", index + 1, total));
                ui.separator();
                ui.label(format!("Answered: {}", app.answered_count()));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let clock = RichText::new(format!("⏱ {}", format_clock(remaining))).strong();
                    if remaining <= 60 {
                        ui.colored_label(egui::Color32::LIGHT_RED, clock);
                    } else {
                        ui.label(clock);
                    }
                });
            });
            ui.add_space(4.0);
            ui.label(
                RichText::new(format!("{} · {}", question.subject_name, question.section_title))
                    .weak(),
            );
            ui.separator();

            // Direct navigation: one cell per working-set slot, marking the
            // current position and everything already answered.
            ui.collapsing("🗺 Question map", |ui| {
                ui.horizontal_wrapped(|ui| {
                    for i in 0..total {
                        let answered = app
                            .session
                            .as_ref()
                            .and_then(|s| s.working_questions.get(i))
                            .map_or(false, |q| app.selected_answer(&q.id).is_some());
                        let label = if i == index {
                            format!("▶{}", i + 1)
                        } else if answered {
                            format!("●{}", i + 1)
                        } else {
                            format!("{}", i + 1)
                        };
                        if ui.small_button(label).clicked() {
                            app.jump_to_question(i);
                        }
                    }
                });
            });
            ui.add_space(8.0);

            ScrollArea::vertical().max_height(120.0).show(ui, |ui| {
                ui.label(RichText::new(&question.text).size(16.0));
            });
            ui.add_space(12.0);

            let selected = app.selected_answer(&question.id);
            for (i, option) in question.options.iter().enumerate() {
                let marker = if selected == Some(i) { "🔘" } else { "⚪" };
                let button = ui.add_sized(
                    [520.0, 32.0],
                    Button::new(format!("{marker} {option}")),
                );
                if button.clicked() {
                    app.select_answer(&question.id, i);
                }
                ui.add_space(4.0);
            }

            ui.add_space(12.0);
            let on_last = app.on_last_question();
            let (prev, next) = two_button_row(
                ui,
                520.0,
                "⬅ Previous",
                if on_last { "🏁 Finish test" } else { "Next ➡" },
            );
            if prev {
                app.previous_question();
            }
            if next {
                if on_last {
                    app.finish_session();
                } else {
                    app.next_question();
                }
            }

            ui.add_space(8.0);
            if ui.button("🏁 Finish now").clicked() {
                app.finish_session();
            }

            if !app.message.is_empty() {
                ui.add_space(8.0);
                ui.label(&app.message);
            }
        });
    });
}
