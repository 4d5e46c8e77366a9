pub mod commands;
mod handlers;
mod helper;
mod process_command;

pub use process_command::process_command;
