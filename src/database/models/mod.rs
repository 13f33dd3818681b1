pub mod allocation;
pub mod notification;
pub mod project;
pub mod property;
pub mod settings;
pub mod skill;
pub mod user;
pub mod user_skill;

pub use allocation::{Allocation, AllocationFilter, AllocationInput, AllocationRole, NewAllocation};
pub use notification::{NewNotification, Notification};
pub use project::{NewProject, Project, ProjectDetail, ProjectStatus};
pub use property::{Location, Property, PropertyInput, PropertySearch, Rates, SellerInfo};
pub use settings::{Settings, SettingsUpdate};
pub use skill::{NewSkill, Skill};
pub use user::{NewUser, Role, User, UserSummary};
pub use user_skill::{NewUserSkill, UserSkill, UserSkillUpdate, DEFAULT_INTEREST_LEVEL};

use std::fmt;

/// Constraint violations collected while validating a document, in the
/// order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn into_messages(self) -> Vec<String> {
        self.0
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Trim a free-text field, mapping blank input to `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_errors_are_ok() {
        assert!(ValidationErrors::default().into_result().is_ok());
    }

    #[test]
    fn display_joins_messages() {
        let mut errors = ValidationErrors::default();
        errors.push("name is required");
        errors.push("propertyType is required");
        assert_eq!(errors.to_string(), "name is required; propertyType is required");
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn non_blank_trims_and_drops_empty() {
        assert_eq!(non_blank(Some("  Backend ".into())), Some("Backend".into()));
        assert_eq!(non_blank(Some("   ".into())), None);
        assert_eq!(non_blank(None), None);
    }
}
