pub mod main_ui;
pub mod tui;
