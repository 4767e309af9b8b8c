pub mod engine;
pub mod suggestion;
pub mod template;
