//! Notebook/note entity model.
//!
//! # Responsibility
//! - Define the plain data holders stored in the notebook tree.
//! - Provide simple in-place mutation and read-only traversal helpers.
//!
//! # Invariants
//! - A `Note` is owned by exactly one `Notebook`.
//! - A `Notebook` owns its child notebooks; the hierarchy is a tree.
//! - Entities do not validate input or enforce id uniqueness; the repository
//!   layer does.

pub mod note;
pub mod notebook;
