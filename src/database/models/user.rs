use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationErrors;

/// Access role carried by every user and by their session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Hr,
    Pm,
    #[default]
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Hr => "hr",
            Role::Pm => "pm",
            Role::Employee => "employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "hr" => Ok(Role::Hr),
            "pm" => Ok(Role::Pm),
            "employee" => Ok(Role::Employee),
            other => Err(format!("'{}' is not a valid role", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub image: Option<String>,
    pub role: Role,
    pub bookmarks: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn has_bookmarked(&self, property: Uuid) -> bool {
        self.bookmarks.contains(&property)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub role: Role,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let email = self.email.trim();
        if email.is_empty() {
            errors.push("email is required");
        } else if !email.contains('@') {
            errors.push("email must be a valid address");
        }
        if self.name.trim().is_empty() {
            errors.push("name is required");
        }
        errors.into_result()
    }
}

/// The fields of a user expanded into documents that reference them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_parse_case_insensitively() {
        assert_eq!("HR".parse::<Role>(), Ok(Role::Hr));
        assert_eq!(" pm ".parse::<Role>(), Ok(Role::Pm));
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn new_user_requires_email_and_name() {
        let user = NewUser {
            email: "not-an-email".into(),
            name: " ".into(),
            image: None,
            role: Role::Employee,
        };
        let errors = user.validate().unwrap_err();
        assert_eq!(errors.messages().len(), 2);
    }
}
