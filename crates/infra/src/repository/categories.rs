use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};

use stockroom_core::CategoryId;
use stockroom_inventory::Category;

use super::CategoryRepository;
use crate::error::StoreError;

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: i64,
    description: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: CategoryId::new(row.id),
            description: row.description,
        }
    }
}

/// SQLite-backed category repository.
#[derive(Debug, Clone)]
pub struct SqliteCategoryRepository {
    pool: SqlitePool,
}

impl SqliteCategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a category. Not exposed over HTTP; used for seeding and tests.
    pub async fn insert(&self, description: &str) -> Result<Category, StoreError> {
        let result = sqlx::query("INSERT INTO category (description) VALUES (?)")
            .bind(description)
            .execute(&self.pool)
            .await?;

        Ok(Category {
            id: CategoryId::new(result.last_insert_rowid()),
            description: description.to_string(),
        })
    }
}

#[async_trait]
impl CategoryRepository for SqliteCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, StoreError> {
        let rows: Vec<CategoryRow> =
            sqlx::query_as("SELECT id, description FROM category ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        let row: Option<CategoryRow> =
            sqlx::query_as("SELECT id, description FROM category WHERE id = ?")
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Category::from))
    }
}
