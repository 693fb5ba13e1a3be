//! Heist domain logic.
//!
//! Everything in this crate is pure: no database, no HTTP, no clock reads.
//! Callers load snapshots, hand them to these functions, and persist the
//! decisions they return.
//!
//! - [`skill`] -- held/required skills and the length-ranked level rule.
//! - [`status`] -- heist lifecycle and member availability enums.
//! - [`lifecycle`] -- legal transitions for both state spaces.
//! - [`eligibility`] -- admissibility of a member for a heist.
//! - [`crew`] -- roster validation for crew confirmation.
//! - [`outcome`] -- staffing-ratio classification and post-heist fates.
//! - [`sweep`] -- time-driven status advancement planning.
//! - [`validation`] -- input checks for member and heist registration.

pub mod crew;
pub mod eligibility;
pub mod error;
pub mod lifecycle;
pub mod outcome;
pub mod skill;
pub mod status;
pub mod sweep;
pub mod types;
pub mod validation;
