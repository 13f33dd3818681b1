use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{non_blank, ValidationErrors};

/// A message for exactly one user. Only its owner may change it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user: Uuid,
    pub message: String,
    pub is_read: bool,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_owned_by(&self, user: Uuid) -> bool {
        self.user == user
    }
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user: Uuid,
    pub message: String,
    pub link: Option<String>,
}

impl NewNotification {
    pub fn new(user: Uuid, message: impl Into<String>, link: Option<String>) -> Self {
        Self {
            user,
            message: message.into().trim().to_string(),
            link: non_blank(link),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.message.trim().is_empty() {
            errors.push("message is required");
        }
        errors.into_result()
    }
}
