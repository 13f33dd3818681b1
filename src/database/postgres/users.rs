use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::{corrupt, PgStore};
use crate::database::manager::DatabaseError;
use crate::database::models::{NewUser, Role, User};
use crate::database::store::UserStore;

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    image: Option<String>,
    role: String,
    bookmarks: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DatabaseError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            email: row.email,
            name: row.name,
            image: row.image,
            role: row.role.parse().map_err(|e| corrupt("users.role", e))?,
            bookmarks: row.bookmarks,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        user.validate()?;
        let email = user.email.trim().to_lowercase();
        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (email, name, image, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&email)
        .bind(user.name.trim())
        .bind(&user.image)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DatabaseError::unique_violation(e, format!("User with email '{}' already exists", email))
        })?;
        row.try_into()
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }

    async fn find_or_create_user(&self, id: Uuid, user: NewUser) -> Result<User, DatabaseError> {
        if let Some(found) = self.find_user(id).await? {
            return Ok(found);
        }

        user.validate()?;
        let email = user.email.trim().to_lowercase();
        // A concurrent first request may win the insert
        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, image, role)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(&email)
        .bind(user.name.trim())
        .bind(&user.image)
        .bind(user.role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DatabaseError::unique_violation(e, format!("User with email '{}' already exists", email))
        })?;

        self.find_user(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let rows: Vec<UserRow> = sqlx::query_as("SELECT * FROM users ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(User::try_from).collect()
    }

    async fn set_user_role(&self, id: Uuid, role: Role) -> Result<Option<User>, DatabaseError> {
        let row: Option<UserRow> = sqlx::query_as(
            "UPDATE users SET role = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.map(User::try_from).transpose()
    }

    async fn toggle_bookmark(&self, user: Uuid, property: Uuid) -> Result<bool, DatabaseError> {
        // RETURNING sees the updated array
        let bookmarked: Option<bool> = sqlx::query_scalar(
            r#"
            UPDATE users
            SET bookmarks = CASE
                    WHEN $2 = ANY(bookmarks) THEN array_remove(bookmarks, $2)
                    ELSE array_append(bookmarks, $2)
                END,
                updated_at = now()
            WHERE id = $1
            RETURNING $2 = ANY(bookmarks)
            "#,
        )
        .bind(user)
        .bind(property)
        .fetch_optional(&self.pool)
        .await?;

        bookmarked.ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))
    }
}
