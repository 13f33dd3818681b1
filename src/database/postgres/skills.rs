use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::PgStore;
use crate::database::manager::DatabaseError;
use crate::database::models::{NewSkill, NewUserSkill, Skill, UserSkill, UserSkillUpdate};
use crate::database::store::SkillStore;

#[derive(FromRow)]
struct SkillRow {
    id: Uuid,
    name: String,
    category: Option<String>,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SkillRow> for Skill {
    fn from(row: SkillRow) -> Self {
        Skill {
            id: row.id,
            name: row.name,
            category: row.category,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct UserSkillRow {
    id: Uuid,
    user_id: Uuid,
    skill_id: Uuid,
    proficiency_level: i16,
    interest_level: i16,
    is_current: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserSkillRow> for UserSkill {
    fn from(row: UserSkillRow) -> Self {
        UserSkill {
            id: row.id,
            user: row.user_id,
            skill: row.skill_id,
            proficiency_level: row.proficiency_level,
            interest_level: row.interest_level,
            is_current: row.is_current,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const DUPLICATE_SKILL: &str = "Skill already exists";
const DUPLICATE_USER_SKILL: &str = "User already has this skill";

#[async_trait]
impl SkillStore for PgStore {
    async fn list_skills(&self) -> Result<Vec<Skill>, DatabaseError> {
        // Lowercased byte order, matching Skill::catalog_order
        let rows: Vec<SkillRow> = sqlx::query_as(
            r#"
            SELECT * FROM skills
            ORDER BY lower(category) COLLATE "C" ASC NULLS FIRST, lower(name) COLLATE "C" ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Skill::from).collect())
    }

    async fn find_skill(&self, id: Uuid) -> Result<Option<Skill>, DatabaseError> {
        let row: Option<SkillRow> = sqlx::query_as("SELECT * FROM skills WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Skill::from))
    }

    async fn find_skill_by_name(&self, name: &str) -> Result<Option<Skill>, DatabaseError> {
        let row: Option<SkillRow> = sqlx::query_as("SELECT * FROM skills WHERE lower(name) = lower($1)")
            .bind(name.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Skill::from))
    }

    async fn create_skill(&self, skill: NewSkill) -> Result<Skill, DatabaseError> {
        let skill = skill.normalized();
        skill.validate()?;

        // The unique index on lower(name) catches concurrent inserts.
        if self.find_skill_by_name(&skill.name).await?.is_some() {
            return Err(DatabaseError::Duplicate(DUPLICATE_SKILL.to_string()));
        }

        let row: SkillRow = sqlx::query_as(
            "INSERT INTO skills (name, category, description) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&skill.name)
        .bind(&skill.category)
        .bind(&skill.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::unique_violation(e, DUPLICATE_SKILL))?;
        Ok(row.into())
    }

    async fn delete_skill(&self, id: Uuid) -> Result<bool, DatabaseError> {
        // user_skills rows go with it (ON DELETE CASCADE)
        let deleted = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }

    async fn list_user_skills(&self, user: Uuid) -> Result<Vec<UserSkill>, DatabaseError> {
        let rows: Vec<UserSkillRow> =
            sqlx::query_as("SELECT * FROM user_skills WHERE user_id = $1 ORDER BY created_at ASC")
                .bind(user)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(UserSkill::from).collect())
    }

    async fn find_user_skill(&self, id: Uuid) -> Result<Option<UserSkill>, DatabaseError> {
        let row: Option<UserSkillRow> = sqlx::query_as("SELECT * FROM user_skills WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(UserSkill::from))
    }

    async fn create_user_skill(&self, user_skill: NewUserSkill) -> Result<UserSkill, DatabaseError> {
        user_skill.validate()?;
        let row: UserSkillRow = sqlx::query_as(
            r#"
            INSERT INTO user_skills (user_id, skill_id, proficiency_level, interest_level, is_current)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_skill.user)
        .bind(user_skill.skill)
        .bind(user_skill.proficiency_level)
        .bind(user_skill.interest_level)
        .bind(user_skill.is_current)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match DatabaseError::unique_violation(e, DUPLICATE_USER_SKILL) {
            DatabaseError::Sqlx(e) => DatabaseError::missing_reference(e, "Skill not found"),
            other => other,
        })?;
        Ok(row.into())
    }

    async fn update_user_skill(
        &self,
        id: Uuid,
        update: UserSkillUpdate,
    ) -> Result<Option<UserSkill>, DatabaseError> {
        update.validate()?;
        let row: Option<UserSkillRow> = sqlx::query_as(
            r#"
            UPDATE user_skills
            SET proficiency_level = COALESCE($2, proficiency_level),
                interest_level = COALESCE($3, interest_level),
                is_current = COALESCE($4, is_current),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.proficiency_level)
        .bind(update.interest_level)
        .bind(update.is_current)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(UserSkill::from))
    }

    async fn delete_user_skill(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let deleted = sqlx::query("DELETE FROM user_skills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }
}
