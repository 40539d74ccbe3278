pub mod command;
pub mod handler;
pub mod keymap;

pub use command::Command;
pub use handler::handle_command;
pub use keymap::command_for_key;
