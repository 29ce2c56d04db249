pub mod api;
pub mod app;
pub mod compose;
pub mod data;
pub mod error;
pub mod model;
pub mod pool;
pub mod randomizer;
pub mod scorer;
pub mod timer;
pub mod ui;

pub use app::ExamApp;
