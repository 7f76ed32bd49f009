pub mod commands;
pub mod menu;
pub mod spinner;
pub mod types;

pub use commands::run;
