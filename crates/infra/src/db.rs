//! SQLite connection pool and schema bootstrap.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use stockroom_inventory::CategoryType;

use crate::config::DatabaseConfig;
use crate::error::StoreError;

const CREATE_CATEGORY_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS category (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    description TEXT    NOT NULL
)
"#;

const CREATE_ITEM_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS item (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    brand         TEXT    NOT NULL,
    serial        TEXT    NOT NULL UNIQUE,
    specification TEXT    NOT NULL,
    stock         INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0),
    category_id   INTEGER NOT NULL REFERENCES category (id),
    created_at    TEXT    NOT NULL,
    updated_at    TEXT    NOT NULL
)
"#;

const CREATE_ITEM_CATEGORY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_item_category_id ON item (category_id)";

/// Open the pool, create the schema and optionally seed categories.
///
/// An in-memory database lives only as long as its connection, so the pool
/// is pinned to a single connection that never expires.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, StoreError> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .foreign_keys(true)
        .create_if_missing(true);

    let pool_options = if config.is_in_memory() {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(config.max_connections)
    };

    let pool = pool_options.connect_with(options).await?;
    ensure_schema(&pool).await?;

    if config.seed_categories {
        let seeded = seed_categories(&pool).await?;
        if seeded > 0 {
            tracing::info!(seeded, "seeded default categories");
        }
    }

    Ok(pool)
}

/// Create tables and indexes if they do not exist yet.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), StoreError> {
    for statement in [CREATE_CATEGORY_TABLE, CREATE_ITEM_TABLE, CREATE_ITEM_CATEGORY_INDEX] {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Insert one category per category type when the table is empty.
///
/// Returns the number of rows inserted.
pub async fn seed_categories(pool: &SqlitePool) -> Result<usize, StoreError> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM category")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Ok(0);
    }

    let mut inserted = 0;
    for kind in CategoryType::ALL.iter().filter(|k| **k != CategoryType::Blank) {
        sqlx::query("INSERT INTO category (description) VALUES (?)")
            .bind(kind.label())
            .execute(pool)
            .await?;
        inserted += 1;
    }
    Ok(inserted)
}
