pub mod command;
pub mod constants;
pub mod render;
