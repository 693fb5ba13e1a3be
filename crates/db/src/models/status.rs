//! Status enums re-exported from `heist_core`.
//!
//! Row structs decode `status_id` straight into these enums via
//! `#[sqlx(try_from = "i16")]`, so an id from the wrong lookup table fails
//! at decode time instead of leaking into the engine.

pub use heist_core::status::{HeistStatus, MemberStatus, StatusId};
