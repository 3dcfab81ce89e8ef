pub mod commands;
pub mod handlers;

pub use commands::command_argument_builder;
pub use handlers::{expand_path, options_from_matches};
