use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use super::{contains_pattern, count, limit_offset, PgStore};
use crate::database::manager::DatabaseError;
use crate::database::models::{Location, Property, PropertyInput, PropertySearch, Rates, SellerInfo};
use crate::database::store::{Pagination, PropertyStore};

#[derive(FromRow)]
struct PropertyRow {
    id: Uuid,
    owner_id: Uuid,
    name: String,
    property_type: String,
    description: Option<String>,
    location: Json<Location>,
    beds: i32,
    baths: i32,
    square_feet: i32,
    amenities: Vec<String>,
    rates: Json<Rates>,
    seller_info: Json<SellerInfo>,
    images: Vec<String>,
    is_featured: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PropertyRow> for Property {
    fn from(row: PropertyRow) -> Self {
        Property {
            id: row.id,
            owner: row.owner_id,
            name: row.name,
            property_type: row.property_type,
            description: row.description,
            location: row.location.0,
            beds: row.beds,
            baths: row.baths,
            square_feet: row.square_feet,
            amenities: row.amenities,
            rates: row.rates.0,
            seller_info: row.seller_info.0,
            images: row.images,
            is_featured: row.is_featured,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn into_properties(rows: Vec<PropertyRow>) -> Vec<Property> {
    rows.into_iter().map(Property::from).collect()
}

#[async_trait]
impl PropertyStore for PgStore {
    async fn list_properties(&self, page: Pagination) -> Result<(Vec<Property>, u64), DatabaseError> {
        let (limit, offset) = limit_offset(page);
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM properties")
            .fetch_one(&self.pool)
            .await?;
        let rows: Vec<PropertyRow> = sqlx::query_as(
            "SELECT * FROM properties ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok((into_properties(rows), count(total)))
    }

    async fn featured_properties(&self) -> Result<Vec<Property>, DatabaseError> {
        let rows: Vec<PropertyRow> = sqlx::query_as(
            "SELECT * FROM properties WHERE is_featured ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(into_properties(rows))
    }

    async fn search_properties(&self, search: &PropertySearch) -> Result<Vec<Property>, DatabaseError> {
        let location = search.location().map(contains_pattern);
        let property_type = search.property_type().map(contains_pattern);
        let rows: Vec<PropertyRow> = sqlx::query_as(
            r#"
            SELECT * FROM properties
            WHERE ($1::text IS NULL
                   OR name ILIKE $1
                   OR description ILIKE $1
                   OR location->>'street' ILIKE $1
                   OR location->>'city' ILIKE $1
                   OR location->>'state' ILIKE $1
                   OR location->>'zipcode' ILIKE $1)
              AND ($2::text IS NULL OR property_type ILIKE $2)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(location)
        .bind(property_type)
        .fetch_all(&self.pool)
        .await?;
        Ok(into_properties(rows))
    }

    async fn properties_by_owner(&self, owner: Uuid) -> Result<Vec<Property>, DatabaseError> {
        let rows: Vec<PropertyRow> = sqlx::query_as(
            "SELECT * FROM properties WHERE owner_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(into_properties(rows))
    }

    async fn find_property(&self, id: Uuid) -> Result<Option<Property>, DatabaseError> {
        let row: Option<PropertyRow> = sqlx::query_as("SELECT * FROM properties WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Property::from))
    }

    async fn find_properties(&self, ids: &[Uuid]) -> Result<Vec<Property>, DatabaseError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let rows: Vec<PropertyRow> = sqlx::query_as(
            "SELECT * FROM properties WHERE id = ANY($1) ORDER BY created_at DESC, id DESC",
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(into_properties(rows))
    }

    async fn create_property(&self, owner: Uuid, input: PropertyInput) -> Result<Property, DatabaseError> {
        let input = input.normalized();
        input.validate()?;
        let row: PropertyRow = sqlx::query_as(
            r#"
            INSERT INTO properties (
                owner_id, name, property_type, description, location, beds, baths,
                square_feet, amenities, rates, seller_info, images, is_featured
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(owner)
        .bind(&input.name)
        .bind(&input.property_type)
        .bind(&input.description)
        .bind(Json(&input.location))
        .bind(input.beds)
        .bind(input.baths)
        .bind(input.square_feet)
        .bind(&input.amenities)
        .bind(Json(&input.rates))
        .bind(Json(&input.seller_info))
        .bind(&input.images)
        .bind(input.is_featured)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::missing_reference(e, "Owner not found"))?;
        Ok(row.into())
    }

    async fn update_property(&self, id: Uuid, input: PropertyInput) -> Result<Option<Property>, DatabaseError> {
        let input = input.normalized();
        input.validate()?;
        let row: Option<PropertyRow> = sqlx::query_as(
            r#"
            UPDATE properties
            SET name = $2, property_type = $3, description = $4, location = $5, beds = $6,
                baths = $7, square_feet = $8, amenities = $9, rates = $10, seller_info = $11,
                images = $12, is_featured = $13, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.property_type)
        .bind(&input.description)
        .bind(Json(&input.location))
        .bind(input.beds)
        .bind(input.baths)
        .bind(input.square_feet)
        .bind(&input.amenities)
        .bind(Json(&input.rates))
        .bind(Json(&input.seller_info))
        .bind(&input.images)
        .bind(input.is_featured)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Property::from))
    }

    async fn delete_property(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted > 0 {
            sqlx::query(
                r#"
                UPDATE users
                SET bookmarks = array_remove(bookmarks, $1), updated_at = now()
                WHERE $1 = ANY(bookmarks)
                "#,
            )
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(deleted > 0)
    }
}
