//! Core types shared across the session pipeline.

pub mod event;
pub mod tool_result;
pub mod usage;

pub use event::*;
pub use tool_result::*;
pub use usage::*;
