use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

use super::{non_blank, ValidationErrors};

pub const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Skill {
    /// Skill names are unique ignoring case.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }

    /// Catalog order: by category (uncategorized first), then by name,
    /// both ignoring case.
    pub fn catalog_order(a: &Skill, b: &Skill) -> Ordering {
        a.catalog_key().cmp(&b.catalog_key())
    }

    fn catalog_key(&self) -> (Option<String>, String) {
        (self.category.as_deref().map(str::to_lowercase), self.name.to_lowercase())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewSkill {
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl NewSkill {
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            category: non_blank(self.category),
            description: non_blank(self.description),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let name = self.name.trim();
        if name.is_empty() {
            errors.push("Skill name is required");
        } else if name.chars().count() > MAX_NAME_LEN {
            errors.push(format!("Skill name must be at most {} characters", MAX_NAME_LEN));
        }
        errors.into_result()
    }
}
