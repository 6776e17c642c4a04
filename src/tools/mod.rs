//! MCP tool implementations.
//!
//! This module contains the input types, parameter rules and operations
//! behind the four ticket tools.

pub mod handlers;
mod inputs;
pub mod validation;

pub use inputs::*;
