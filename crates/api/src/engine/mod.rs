//! Transactional heist operations.
//!
//! Each operation loads what it needs from the store, hands the decision to
//! the pure rules in `heist_core`, and writes the result back. Writes that
//! must be all-or-nothing run in a single transaction; an error anywhere
//! drops the transaction uncommitted.

pub mod crew;
pub mod lifecycle;
pub mod outcome;
pub mod roster;
