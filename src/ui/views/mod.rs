pub mod exam;
pub mod mode_select;
pub mod preview;
pub mod results;
pub mod source_select;
