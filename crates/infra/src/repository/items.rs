use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use stockroom_core::{CategoryId, ItemId};
use stockroom_inventory::{Item, ItemFields, ItemListing};

use super::ItemRepository;
use crate::error::StoreError;
use crate::pagination::{Page, PageRequest};

const FIND_ITEM: &str = "SELECT id, brand, serial, specification, stock, category_id, created_at, updated_at \
                         FROM item WHERE id = ?";

const LISTING_FROM: &str = " FROM item LEFT JOIN category ON item.category_id = category.id";

#[derive(Debug, FromRow)]
struct ItemRow {
    id: i64,
    brand: String,
    serial: String,
    specification: String,
    stock: i64,
    category_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: ItemId::new(row.id),
            brand: row.brand,
            serial: row.serial,
            specification: row.specification,
            stock: row.stock,
            category_id: CategoryId::new(row.category_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ListingRow {
    id: i64,
    brand: String,
    serial: String,
    specification: String,
    stock: i64,
    category_id: i64,
    category_description: Option<String>,
}

impl From<ListingRow> for ItemListing {
    fn from(row: ListingRow) -> Self {
        ItemListing {
            id: ItemId::new(row.id),
            brand: row.brand,
            serial: row.serial,
            specification: row.specification,
            stock: row.stock,
            category_id: CategoryId::new(row.category_id),
            category_description: row.category_description,
        }
    }
}

/// `%term%` with LIKE wildcards in `term` escaped (escape char `\`).
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn push_search_filter(qb: &mut QueryBuilder<'_, Sqlite>, pattern: Option<&str>) {
    let Some(pattern) = pattern else {
        return;
    };

    qb.push(" WHERE (");
    let columns = ["item.brand", "item.serial", "item.specification", "category.description"];
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push(*column)
            .push(" LIKE ")
            .push_bind(pattern.to_string())
            .push(" ESCAPE '\\'");
    }
    qb.push(")");
}

/// SQLite-backed item repository.
#[derive(Debug, Clone)]
pub struct SqliteItemRepository {
    pool: SqlitePool,
}

impl SqliteItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemRepository for SqliteItemRepository {
    async fn search(
        &self,
        term: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<ItemListing>, StoreError> {
        let pattern = term
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(like_pattern);

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*)");
        count.push(LISTING_FROM);
        push_search_filter(&mut count, pattern.as_deref());
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Sqlite>::new(
            "SELECT item.id, item.brand, item.serial, item.specification, item.stock, \
             item.category_id, category.description AS category_description",
        );
        select.push(LISTING_FROM);
        push_search_filter(&mut select, pattern.as_deref());
        select
            .push(" ORDER BY item.id LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows: Vec<ListingRow> = select.build_query_as().fetch_all(&self.pool).await?;

        tracing::debug!(
            search = term,
            page = page.page,
            total,
            returned = rows.len(),
            "item search"
        );

        Ok(Page::new(
            rows.into_iter().map(ItemListing::from).collect(),
            page,
            u64::try_from(total).unwrap_or(0),
        ))
    }

    async fn find(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        let row: Option<ItemRow> = sqlx::query_as(FIND_ITEM)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Item::from))
    }

    async fn serial_exists(&self, serial: &str) -> Result<bool, StoreError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM item WHERE serial = ? LIMIT 1")
            .bind(serial)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    async fn insert(&self, fields: &ItemFields) -> Result<Item, StoreError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO item (brand, serial, specification, stock, category_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&fields.brand)
        .bind(&fields.serial)
        .bind(&fields.specification)
        .bind(fields.stock)
        .bind(fields.category_id.get())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Item {
            id: ItemId::new(result.last_insert_rowid()),
            brand: fields.brand.clone(),
            serial: fields.serial.clone(),
            specification: fields.specification.clone(),
            stock: fields.stock,
            category_id: fields.category_id,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update(&self, id: ItemId, fields: &ItemFields) -> Result<Option<Item>, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE item
            SET brand = ?, serial = ?, specification = ?, stock = ?, category_id = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&fields.brand)
        .bind(&fields.serial)
        .bind(&fields.specification)
        .bind(fields.stock)
        .bind(fields.category_id.get())
        .bind(Utc::now())
        .bind(id.get())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find(id).await
    }

    async fn delete(&self, id: ItemId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM item WHERE id = ?")
            .bind(id.get())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
