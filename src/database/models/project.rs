use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::{non_blank, UserSummary, ValidationErrors};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Planned,
    Active,
    OnHold,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planned => "planned",
            ProjectStatus::Active => "active",
            ProjectStatus::OnHold => "on_hold",
            ProjectStatus::Completed => "completed",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planned" => Ok(ProjectStatus::Planned),
            "active" => Ok(ProjectStatus::Active),
            "on_hold" => Ok(ProjectStatus::OnHold),
            "completed" => Ok(ProjectStatus::Completed),
            other => Err(format!("'{}' is not a valid project status", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub project_manager: Uuid,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A project with its manager reference expanded to name and email.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub project_manager: Option<UserSummary>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectDetail {
    /// `manager` is `None` when the referenced user no longer exists.
    pub fn new(project: Project, manager: Option<UserSummary>) -> Self {
        Self {
            id: project.id,
            name: project.name,
            description: project.description,
            status: project.status,
            project_manager: manager,
            start_date: project.start_date,
            end_date: project.end_date,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    /// Filled in by the handler when the body leaves it out.
    pub project_manager: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl NewProject {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.description = non_blank(self.description);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.name.trim().is_empty() {
            errors.push("Project name is required");
        }
        if self.project_manager.is_none() {
            errors.push("projectManager is required");
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                errors.push("endDate must not be before startDate");
            }
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_in_snake_case() {
        let json = serde_json::to_value(ProjectStatus::OnHold).unwrap();
        assert_eq!(json, serde_json::json!("on_hold"));
        assert_eq!("on_hold".parse::<ProjectStatus>(), Ok(ProjectStatus::OnHold));
    }

    #[test]
    fn detail_replaces_manager_reference() {
        let now = Utc::now();
        let manager = UserSummary {
            id: Uuid::new_v4(),
            name: "Priya".into(),
            email: "priya@example.com".into(),
        };
        let project = Project {
            id: Uuid::new_v4(),
            name: "Atlas".into(),
            description: None,
            status: ProjectStatus::Active,
            project_manager: manager.id,
            start_date: None,
            end_date: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(ProjectDetail::new(project, Some(manager))).unwrap();
        assert_eq!(json["projectManager"]["name"], "Priya");
        assert_eq!(json["projectManager"]["email"], "priya@example.com");
    }

    #[test]
    fn new_project_requires_name_and_manager() {
        let errors = NewProject::default().normalized().validate().unwrap_err();
        assert_eq!(errors.messages().len(), 2);
    }
}
