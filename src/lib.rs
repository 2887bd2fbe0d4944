//! Tokenfield - token input normalization engine
//!
//! This crate provides the core types and logic for a single-line input
//! field that mixes free text with atomic token chips, implementing the Elm
//! Architecture pattern: messages update the model, a normalization pipeline
//! settles the document tree, and commands carry the side effects.

pub mod classify;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod history;
pub mod messages;
pub mod model;
pub mod normalize;
pub mod presentation;
pub mod projection;
pub mod script;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::{Cmd, Collaborator, EventLog, Notification};
pub use config::EditorConfig;
pub use messages::Msg;
pub use model::EditorModel;
pub use projection::ChangeSnapshot;
pub use update::update;
