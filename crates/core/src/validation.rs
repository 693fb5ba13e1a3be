//! Input validation for member and heist registration.

use validator::ValidateEmail;

use crate::error::CoreError;
use crate::skill::{HeldSkill, RequiredSkill, DEFAULT_LEVEL, MAX_LEVEL_LEN};
use crate::types::Timestamp;

/// Fill in the default level for a held skill submitted without one.
pub fn level_or_default(level: Option<&str>) -> String {
    match level {
        Some(l) if !l.is_empty() => l.to_string(),
        _ => DEFAULT_LEVEL.to_string(),
    }
}

fn require_non_empty(value: &str, field: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn validate_level(level: &str, skill: &str) -> Result<(), CoreError> {
    let len = level.chars().count();
    if len == 0 || len > MAX_LEVEL_LEN {
        return Err(CoreError::Validation(format!(
            "Level of skill '{skill}' must be between 1 and {MAX_LEVEL_LEN} characters"
        )));
    }
    Ok(())
}

/// Check a member's basic fields.
pub fn validate_member_fields(name: &str, email: &str) -> Result<(), CoreError> {
    require_non_empty(name, "Name")?;
    if !email.validate_email() {
        return Err(CoreError::Validation(format!("'{email}' is not a valid email")));
    }
    Ok(())
}

/// Held skills need a name, a 1-10 character level, and distinct names
/// (case-insensitive).
pub fn validate_held_skills(skills: &[HeldSkill]) -> Result<(), CoreError> {
    let mut seen: Vec<String> = Vec::with_capacity(skills.len());
    for skill in skills {
        require_non_empty(&skill.name, "Skill name")?;
        validate_level(&skill.level, &skill.name)?;
        let key = skill.name.to_lowercase();
        if seen.contains(&key) {
            return Err(CoreError::Validation(format!(
                "Skill '{}' is listed more than once",
                skill.name
            )));
        }
        seen.push(key);
    }
    Ok(())
}

/// `main_skill` must name one of `skill_names` (case-insensitive).
pub fn validate_main_skill<'a>(
    main_skill: &str,
    skill_names: impl IntoIterator<Item = &'a str>,
) -> Result<(), CoreError> {
    let wanted = main_skill.to_lowercase();
    if skill_names.into_iter().any(|n| n.to_lowercase() == wanted) {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "MainSkill must match at least one of the skill names.".to_string(),
        ))
    }
}

/// Check a heist's basic fields.
pub fn validate_heist_fields(name: &str, location: &str) -> Result<(), CoreError> {
    require_non_empty(name, "Name")?;
    require_non_empty(location, "Location")
}

/// `start < end` and `end` not before `now`.
pub fn validate_schedule(start: Timestamp, end: Timestamp, now: Timestamp) -> Result<(), CoreError> {
    if start >= end {
        return Err(CoreError::Validation(
            "The start time must be before the end time.".to_string(),
        ));
    }
    if end < now {
        return Err(CoreError::Validation(
            "The end time cannot be in the past.".to_string(),
        ));
    }
    Ok(())
}

/// Required skills need a name, a 1-10 character level, at least one
/// member, and no two entries with the same `(name, level)` pair
/// (case-insensitive).
pub fn validate_required_skills(skills: &[RequiredSkill]) -> Result<(), CoreError> {
    let mut seen: Vec<(String, String)> = Vec::with_capacity(skills.len());
    for skill in skills {
        require_non_empty(&skill.name, "Skill name")?;
        validate_level(&skill.level, &skill.name)?;
        if skill.members < 1 {
            return Err(CoreError::Validation(format!(
                "Skill '{}' must require at least one member",
                skill.name
            )));
        }
        let key = (skill.name.to_lowercase(), skill.level.to_lowercase());
        if seen.contains(&key) {
            return Err(CoreError::Validation(
                "Duplicate skills with the same name and level are not allowed.".to_string(),
            ));
        }
        seen.push(key);
    }
    Ok(())
}
