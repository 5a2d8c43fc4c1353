//! Conversation session orchestration
//!
//! The session module ties the state machine, conversation log, model
//! selector, microphone and backend gateway together behind `ChatSession`.

pub mod config;
pub mod controller;

pub use config::{SessionConfig, DEFAULT_STAGGER_DELAY};
pub use controller::{ChatSession, SessionEvent};
