use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationRole {
    Developer,
    Designer,
    Tester,
    Lead,
    Analyst,
    Manager,
}

impl AllocationRole {
    pub const ALL: [AllocationRole; 6] = [
        AllocationRole::Developer,
        AllocationRole::Designer,
        AllocationRole::Tester,
        AllocationRole::Lead,
        AllocationRole::Analyst,
        AllocationRole::Manager,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationRole::Developer => "developer",
            AllocationRole::Designer => "designer",
            AllocationRole::Tester => "tester",
            AllocationRole::Lead => "lead",
            AllocationRole::Analyst => "analyst",
            AllocationRole::Manager => "manager",
        }
    }
}

impl fmt::Display for AllocationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AllocationRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == wanted)
            .ok_or_else(|| format!("'{}' is not a valid allocation role", s.trim()))
    }
}

/// A share of a user's time assigned to a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub id: Uuid,
    pub user: Uuid,
    pub project: Uuid,
    pub percentage: i16,
    pub role: AllocationRole,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAllocation {
    pub user: Uuid,
    pub project: Uuid,
    pub percentage: i16,
    pub role: AllocationRole,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl NewAllocation {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if !(0..=100).contains(&self.percentage) {
            errors.push("percentage must be between 0 and 100");
        }
        check_dates(&mut errors, self.start_date, self.end_date);
        errors.into_result()
    }
}

/// Request body of an allocation create. Identifiers are parsed by the
/// handler; everything else is checked by [`AllocationInput::into_new`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AllocationInput {
    pub user_id: String,
    pub project_id: String,
    pub percentage: i64,
    pub role: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl AllocationInput {
    pub fn into_new(
        self,
        user: Uuid,
        project: Uuid,
        max_percent: i16,
    ) -> Result<NewAllocation, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let percentage = match i16::try_from(self.percentage) {
            Ok(p) if (0..=100).contains(&p) => {
                if p > max_percent {
                    errors.push(format!("percentage must not exceed {}", max_percent));
                }
                p
            }
            _ => {
                errors.push("percentage must be between 0 and 100");
                0
            }
        };

        let role = self.role.parse::<AllocationRole>().map_err(|msg| errors.push(msg)).ok();

        check_dates(&mut errors, self.start_date, self.end_date);

        match role {
            Some(role) if errors.is_empty() => Ok(NewAllocation {
                user,
                project,
                percentage,
                role,
                start_date: self.start_date,
                end_date: self.end_date,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AllocationFilter {
    pub user: Option<Uuid>,
    pub project: Option<Uuid>,
}

impl AllocationFilter {
    pub fn matches(&self, allocation: &Allocation) -> bool {
        self.user.map_or(true, |u| allocation.user == u)
            && self.project.map_or(true, |p| allocation.project == p)
    }
}

fn check_dates(errors: &mut ValidationErrors, start: Option<NaiveDate>, end: Option<NaiveDate>) {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            errors.push("endDate must not be before startDate");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(percentage: i64, role: &str) -> AllocationInput {
        AllocationInput {
            percentage,
            role: role.into(),
            ..AllocationInput::default()
        }
    }

    #[test]
    fn percentage_must_be_within_bounds() {
        let errors = input(150, "developer")
            .into_new(Uuid::new_v4(), Uuid::new_v4(), 100)
            .unwrap_err();
        assert_eq!(errors.messages(), ["percentage must be between 0 and 100".to_string()]);

        assert!(input(0, "developer").into_new(Uuid::new_v4(), Uuid::new_v4(), 100).is_ok());
        assert!(input(100, "lead").into_new(Uuid::new_v4(), Uuid::new_v4(), 100).is_ok());
    }

    #[test]
    fn settings_cap_is_enforced() {
        let errors = input(90, "tester")
            .into_new(Uuid::new_v4(), Uuid::new_v4(), 80)
            .unwrap_err();
        assert_eq!(errors.messages(), ["percentage must not exceed 80".to_string()]);
    }

    #[test]
    fn unknown_roles_and_reversed_dates_are_collected() {
        let mut bad = input(50, "wizard");
        bad.start_date = NaiveDate::from_ymd_opt(2026, 3, 1);
        bad.end_date = NaiveDate::from_ymd_opt(2026, 2, 1);
        let errors = bad.into_new(Uuid::new_v4(), Uuid::new_v4(), 100).unwrap_err();
        assert_eq!(errors.messages().len(), 2);
    }

    #[test]
    fn filter_matches_on_given_fields() {
        let user = Uuid::new_v4();
        let now = Utc::now();
        let allocation = Allocation {
            id: Uuid::new_v4(),
            user,
            project: Uuid::new_v4(),
            percentage: 40,
            role: AllocationRole::Analyst,
            start_date: None,
            end_date: None,
            created_at: now,
            updated_at: now,
        };
        assert!(AllocationFilter::default().matches(&allocation));
        assert!(AllocationFilter { user: Some(user), project: None }.matches(&allocation));
        assert!(!AllocationFilter { user: Some(Uuid::new_v4()), project: None }.matches(&allocation));
    }
}
