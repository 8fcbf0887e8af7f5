//! Todos module: ownership-scoped CRUD.
//!
//! Every operation is parameterized by the caller's resolved identity; a
//! todo is invisible to non-owners even when its id is known.

pub mod repository;
pub mod service;

pub use service::{TodoPatch, TodoService};
