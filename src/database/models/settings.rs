use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ValidationErrors;

/// Organization-wide settings of the resource tool. A single document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub organization_name: String,
    pub max_allocation_percent: i16,
    pub allow_self_assessment: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            organization_name: String::new(),
            max_allocation_percent: 100,
            allow_self_assessment: true,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub organization_name: Option<String>,
    pub max_allocation_percent: Option<i16>,
    pub allow_self_assessment: Option<bool>,
}

impl SettingsUpdate {
    /// Apply the given fields to `current`, validating the result.
    pub fn apply(self, mut current: Settings) -> Result<Settings, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if let Some(name) = self.organization_name {
            current.organization_name = name.trim().to_string();
        }
        if let Some(max) = self.max_allocation_percent {
            if !(1..=100).contains(&max) {
                errors.push("maxAllocationPercent must be between 1 and 100");
            }
            current.max_allocation_percent = max;
        }
        if let Some(allow) = self.allow_self_assessment {
            current.allow_self_assessment = allow;
        }

        errors.into_result().map(|()| current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_keeps_untouched_fields() {
        let update = SettingsUpdate {
            organization_name: Some("  Acme Studio ".into()),
            ..SettingsUpdate::default()
        };
        let settings = update.apply(Settings::default()).unwrap();
        assert_eq!(settings.organization_name, "Acme Studio");
        assert_eq!(settings.max_allocation_percent, 100);
        assert!(settings.allow_self_assessment);
    }

    #[test]
    fn allocation_cap_is_bounded() {
        let update = SettingsUpdate {
            max_allocation_percent: Some(0),
            ..SettingsUpdate::default()
        };
        assert!(update.apply(Settings::default()).is_err());
    }
}
