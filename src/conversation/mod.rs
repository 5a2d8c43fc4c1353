pub mod log;
pub mod types;

pub use log::{ConversationLog, WELCOME_MESSAGE};
pub use types::{ConversationEntry, Role};
