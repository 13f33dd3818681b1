mod notifications;
mod projects;
mod properties;
mod settings;
mod skills;
mod users;

use async_trait::async_trait;
use sqlx::PgPool;

use super::manager::{DatabaseError, DatabaseManager};
use super::store::{Pagination, Store};

/// Store backed by PostgreSQL. Nested documents (location, rates, seller
/// info) live in JSONB columns, reference lists in arrays.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(manager: &DatabaseManager) -> Self {
        Self {
            pool: manager.pool().clone(),
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn limit_offset(page: Pagination) -> (i64, i64) {
    (
        i64::try_from(page.limit).unwrap_or(i64::MAX),
        i64::try_from(page.skip).unwrap_or(i64::MAX),
    )
}

fn count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

/// `%needle%` for ILIKE, with the pattern metacharacters escaped.
fn contains_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn corrupt(column: &str, detail: impl std::fmt::Display) -> DatabaseError {
    DatabaseError::Corrupt(format!("{}: {}", column, detail))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_patterns_escape_wildcards() {
        assert_eq!(contains_pattern("austin"), "%austin%");
        assert_eq!(contains_pattern("100%_off"), "%100\\%\\_off%");
    }

    #[test]
    fn pagination_converts_to_sql_bounds() {
        assert_eq!(limit_offset(Pagination::page(3, 10)), (10, 20));
    }
}
