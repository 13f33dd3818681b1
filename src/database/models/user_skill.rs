use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use uuid::Uuid;

use super::ValidationErrors;

pub const PROFICIENCY_LEVELS: RangeInclusive<i16> = 1..=5;
pub const INTEREST_LEVELS: RangeInclusive<i16> = 1..=3;
pub const DEFAULT_INTEREST_LEVEL: i16 = 2;

/// A user's rating of one skill. Unique per (user, skill).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSkill {
    pub id: Uuid,
    pub user: Uuid,
    pub skill: Uuid,
    pub proficiency_level: i16,
    pub interest_level: i16,
    pub is_current: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUserSkill {
    pub user: Uuid,
    pub skill: Uuid,
    pub proficiency_level: i16,
    pub interest_level: i16,
    pub is_current: bool,
}

impl NewUserSkill {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        check_levels(&mut errors, Some(self.proficiency_level), Some(self.interest_level));
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserSkillUpdate {
    pub proficiency_level: Option<i16>,
    pub interest_level: Option<i16>,
    pub is_current: Option<bool>,
}

impl UserSkillUpdate {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        check_levels(&mut errors, self.proficiency_level, self.interest_level);
        errors.into_result()
    }

    pub fn apply(&self, user_skill: &mut UserSkill) {
        if let Some(level) = self.proficiency_level {
            user_skill.proficiency_level = level;
        }
        if let Some(level) = self.interest_level {
            user_skill.interest_level = level;
        }
        if let Some(current) = self.is_current {
            user_skill.is_current = current;
        }
    }
}

fn check_levels(errors: &mut ValidationErrors, proficiency: Option<i16>, interest: Option<i16>) {
    if let Some(level) = proficiency {
        if !PROFICIENCY_LEVELS.contains(&level) {
            errors.push(format!(
                "proficiencyLevel must be between {} and {}",
                PROFICIENCY_LEVELS.start(),
                PROFICIENCY_LEVELS.end()
            ));
        }
    }
    if let Some(level) = interest {
        if !INTEREST_LEVELS.contains(&level) {
            errors.push(format!(
                "interestLevel must be between {} and {}",
                INTEREST_LEVELS.start(),
                INTEREST_LEVELS.end()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_bounded() {
        let new = NewUserSkill {
            user: Uuid::new_v4(),
            skill: Uuid::new_v4(),
            proficiency_level: 6,
            interest_level: 0,
            is_current: true,
        };
        let errors = new.validate().unwrap_err();
        assert_eq!(errors.messages().len(), 2);

        let new = NewUserSkill { proficiency_level: 5, interest_level: 3, ..new };
        assert!(new.validate().is_ok());
    }

    #[test]
    fn update_applies_only_given_fields() {
        let now = Utc::now();
        let mut user_skill = UserSkill {
            id: Uuid::new_v4(),
            user: Uuid::new_v4(),
            skill: Uuid::new_v4(),
            proficiency_level: 2,
            interest_level: 2,
            is_current: true,
            created_at: now,
            updated_at: now,
        };
        let update = UserSkillUpdate { proficiency_level: Some(4), ..UserSkillUpdate::default() };
        assert!(update.validate().is_ok());
        update.apply(&mut user_skill);
        assert_eq!(user_skill.proficiency_level, 4);
        assert_eq!(user_skill.interest_level, 2);
        assert!(user_skill.is_current);
    }
}
