//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Plain reads and writes go straight to the repositories in `heist_db`;
//! crew confirmation, start and outcome go through [`crate::engine`].
//! Errors are mapped via [`AppError`](crate::error::AppError).

pub mod heist;
pub mod member;
