pub mod command;
pub mod picks;

pub use command::{parse_command, CommandHandler};
pub use picks::PicksBot;
