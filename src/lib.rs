//! natter - a voice-enabled chat client core
//!
//! The client sends typed or spoken messages to an HTTP backend that
//! transcribes audio and generates AI responses, keeps the conversation in
//! an append-only log, and lets the user choose which backend models serve
//! each job. `session::ChatSession` owns the moving parts; the binary is a
//! thin terminal shell over it.

pub mod audio;
pub mod conversation;
pub mod error;
pub mod gateway;
pub mod language;
pub mod reply;
pub mod session;
pub mod settings;
pub mod state;

pub use error::{NatterError, Result};
pub use language::Language;
pub use reply::{decompose_reply, DecomposedReply};
pub use session::{ChatSession, SessionConfig, SessionEvent};
pub use state::{InteractionState, StatusLine};
