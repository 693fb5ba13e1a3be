//! Skill model.
//!
//! A skill level is a string whose *length* is its rank: `"*"` < `"**"` <
//! `"***"`. Comparison never looks at the characters themselves, only at
//! how many there are.

use serde::{Deserialize, Serialize};

/// Level assigned to a held skill when none is given.
pub const DEFAULT_LEVEL: &str = "*";

/// Longest level a skill may carry.
pub const MAX_LEVEL_LEN: usize = 10;

/// Rank of a level string (its character count).
pub fn level_rank(level: &str) -> usize {
    level.chars().count()
}

/// A `(name, level)` pair possessed by a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldSkill {
    pub name: String,
    pub level: String,
}

/// A `(name, minimum level, count needed)` tuple attached to a heist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredSkill {
    pub name: String,
    pub level: String,
    pub members: i32,
}

/// True iff the held skill has the required name and at least the
/// required rank.
pub fn meets(held: &HeldSkill, required: &RequiredSkill) -> bool {
    held.name == required.name && level_rank(&held.level) >= level_rank(&required.level)
}

/// True iff at least one held skill meets at least one required skill.
pub fn any_match(held: &[HeldSkill], required: &[RequiredSkill]) -> bool {
    required
        .iter()
        .any(|r| held.iter().any(|h| meets(h, r)))
}

/// Sum of `members` over all required skills.
pub fn total_members_required(required: &[RequiredSkill]) -> i64 {
    required.iter().map(|s| i64::from(s.members)).sum()
}
