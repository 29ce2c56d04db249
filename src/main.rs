use exam_prep::ExamApp;

fn main() -> eframe::Result<()> {
    pretty_env_logger::init();

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Exam Prep — Mock Tests",
        options,
        Box::new(|_cc| Ok(Box::new(ExamApp::with_default_backend()))),
    )
}
