use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::{corrupt, PgStore};
use crate::database::manager::DatabaseError;
use crate::database::models::{Allocation, AllocationFilter, NewAllocation, NewProject, Project};
use crate::database::store::ProjectStore;

#[derive(FromRow)]
struct ProjectRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    status: String,
    project_manager: Uuid,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = DatabaseError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(Project {
            id: row.id,
            name: row.name,
            description: row.description,
            status: row.status.parse().map_err(|e| corrupt("projects.status", e))?,
            project_manager: row.project_manager,
            start_date: row.start_date,
            end_date: row.end_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct AllocationRow {
    id: Uuid,
    user_id: Uuid,
    project_id: Uuid,
    percentage: i16,
    role: String,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AllocationRow> for Allocation {
    type Error = DatabaseError;

    fn try_from(row: AllocationRow) -> Result<Self, Self::Error> {
        Ok(Allocation {
            id: row.id,
            user: row.user_id,
            project: row.project_id,
            percentage: row.percentage,
            role: row.role.parse().map_err(|e| corrupt("allocations.role", e))?,
            start_date: row.start_date,
            end_date: row.end_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn list_projects(&self) -> Result<Vec<Project>, DatabaseError> {
        let rows: Vec<ProjectRow> =
            sqlx::query_as("SELECT * FROM projects ORDER BY created_at DESC, id DESC")
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(Project::try_from).collect()
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, DatabaseError> {
        let row: Option<ProjectRow> = sqlx::query_as("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Project::try_from).transpose()
    }

    async fn create_project(&self, project: NewProject) -> Result<Project, DatabaseError> {
        let project = project.normalized();
        project.validate()?;
        let row: ProjectRow = sqlx::query_as(
            r#"
            INSERT INTO projects (name, description, status, project_manager, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.status.as_str())
        .bind(project.project_manager)
        .bind(project.start_date)
        .bind(project.end_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::missing_reference(e, "Project manager not found"))?;
        row.try_into()
    }

    async fn list_allocations(&self, filter: AllocationFilter) -> Result<Vec<Allocation>, DatabaseError> {
        let rows: Vec<AllocationRow> = sqlx::query_as(
            r#"
            SELECT * FROM allocations
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::uuid IS NULL OR project_id = $2)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(filter.user)
        .bind(filter.project)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Allocation::try_from).collect()
    }

    async fn create_allocation(&self, allocation: NewAllocation) -> Result<Allocation, DatabaseError> {
        allocation.validate()?;
        let row: AllocationRow = sqlx::query_as(
            r#"
            INSERT INTO allocations (user_id, project_id, percentage, role, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(allocation.user)
        .bind(allocation.project)
        .bind(allocation.percentage)
        .bind(allocation.role.as_str())
        .bind(allocation.start_date)
        .bind(allocation.end_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::missing_reference(e, "User or project not found"))?;
        row.try_into()
    }

    async fn delete_allocation(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let deleted = sqlx::query("DELETE FROM allocations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }
}
