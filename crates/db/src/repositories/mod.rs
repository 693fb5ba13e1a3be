//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods that must run
//! inside a caller's transaction take `&mut DbTransaction` instead.

pub mod heist_repo;
pub mod member_repo;

pub use heist_repo::HeistRepo;
pub use member_repo::MemberRepo;
