//! Typed records for the search API payloads.
//!
//! Every backend response is deserialized into one of these types at the
//! client boundary. Optional fields default, so schema drift on the backend
//! shows up here and nowhere else.

mod bulk;
mod common;
mod note;
mod search;
mod ticket;

pub use bulk::*;
pub use common::*;
pub use note::*;
pub use search::*;
pub use ticket::*;
