//! Callsheet - call-flow checklist and objection reference for call-center agents
//!
//! The library holds the session state model, the reference content, and the
//! clipboard seam. The terminal UI lives in the binary.

pub mod clipboard;
pub mod config;
pub mod content;
pub mod objections;
pub mod session;
pub mod view;
