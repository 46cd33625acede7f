//! Product persistence
//!
//! Product rows only come into existence after a successful analysis; they
//! are never updated or deleted afterwards.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use farmlink_common::db::models::Product;
use farmlink_common::{Error, Result};

/// Fields for a new product record
#[derive(Debug)]
pub struct NewProduct {
    pub farmer_id: i64,
    pub image_path: String,
    pub category: String,
    pub name: String,
    pub pick_time: String,
    pub temperature: String,
    pub expiry_prediction: String,
    pub description: String,
    pub tips: String,
}

pub async fn insert_product(pool: &SqlitePool, new_product: &NewProduct) -> Result<Product> {
    let result = sqlx::query(
        r#"
        INSERT INTO products (
            farmer_id, image_path, category, name, pick_time, temperature,
            expiry_prediction, description, tips, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(new_product.farmer_id)
    .bind(&new_product.image_path)
    .bind(&new_product.category)
    .bind(&new_product.name)
    .bind(&new_product.pick_time)
    .bind(&new_product.temperature)
    .bind(&new_product.expiry_prediction)
    .bind(&new_product.description)
    .bind(&new_product.tips)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Product {} vanished after insert", id)))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Product>> {
    let row = sqlx::query(
        "SELECT id, farmer_id, image_path, category, name, pick_time, temperature, \
         expiry_prediction, description, tips, created_at FROM products WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(|r| map_product(&r)).transpose()
}

/// Farmer's own products, newest first, optionally filtered by a name
/// substring
pub async fn list_for_farmer(
    pool: &SqlitePool,
    farmer_id: i64,
    search: Option<&str>,
) -> Result<Vec<Product>> {
    let rows = match search.filter(|term| !term.is_empty()) {
        Some(term) => {
            sqlx::query(
                "SELECT id, farmer_id, image_path, category, name, pick_time, temperature, \
                 expiry_prediction, description, tips, created_at FROM products \
                 WHERE farmer_id = ? AND name LIKE ? ORDER BY created_at DESC, id DESC",
            )
            .bind(farmer_id)
            .bind(format!("%{}%", term))
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query(
                "SELECT id, farmer_id, image_path, category, name, pick_time, temperature, \
                 expiry_prediction, description, tips, created_at FROM products \
                 WHERE farmer_id = ? ORDER BY created_at DESC, id DESC",
            )
            .bind(farmer_id)
            .fetch_all(pool)
            .await?
        }
    };

    rows.iter().map(map_product).collect()
}

fn map_product(row: &SqliteRow) -> Result<Product> {
    Ok(Product {
        id: row.get("id"),
        farmer_id: row.get("farmer_id"),
        image_path: row.get("image_path"),
        category: row.get("category"),
        name: row.get("name"),
        pick_time: row.get("pick_time"),
        temperature: row.get("temperature"),
        expiry_prediction: row.get("expiry_prediction"),
        description: row.get("description"),
        tips: row.get("tips"),
        created_at: crate::db::users::parse_timestamp(row, "created_at")?,
    })
}
