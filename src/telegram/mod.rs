pub mod client;
pub mod types;

pub use client::{Messenger, TelegramClient};
pub use types::Update;
