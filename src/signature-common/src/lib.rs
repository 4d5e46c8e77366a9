mod message;

// re-export for convenient use with `message`
pub use colored::Colorize;
