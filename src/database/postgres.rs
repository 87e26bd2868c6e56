use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use super::manager::{DatabaseError, DatabaseManager};
use super::models::{Category, CategoryDraft, CategoryRow};
use super::store::{CategoryContext, CategoryStore};

/// PostgreSQL-backed category store
#[derive(Clone)]
pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn begin(&self) -> Result<Box<dyn CategoryContext>, DatabaseError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgCategoryContext { tx }))
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}

/// One transaction per request
pub struct PgCategoryContext {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl CategoryContext for PgCategoryContext {
    async fn find_all(&mut self) -> Result<Vec<Category>, DatabaseError> {
        let rows: Vec<CategoryRow> = sqlx::query_as(
            "SELECT category_id, category_name, category_status FROM categories ORDER BY category_id",
        )
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find(&mut self, id: i32) -> Result<Option<Category>, DatabaseError> {
        let row: Option<CategoryRow> = sqlx::query_as(
            "SELECT category_id, category_name, category_status FROM categories WHERE category_id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(Category::from))
    }

    async fn insert(&mut self, draft: &CategoryDraft) -> Result<Category, DatabaseError> {
        let row: CategoryRow = sqlx::query_as(
            r#"
            INSERT INTO categories (category_name, category_status)
            VALUES ($1, $2)
            RETURNING category_id, category_name, category_status
            "#,
        )
        .bind(&draft.name)
        .bind(draft.status)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(row.into())
    }

    async fn update(
        &mut self,
        id: i32,
        draft: &CategoryDraft,
    ) -> Result<Option<Category>, DatabaseError> {
        let row: Option<CategoryRow> = sqlx::query_as(
            r#"
            UPDATE categories
            SET category_name = $2, category_status = $3
            WHERE category_id = $1
            RETURNING category_id, category_name, category_status
            "#,
        )
        .bind(id)
        .bind(&draft.name)
        .bind(draft.status)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(Category::from))
    }

    async fn remove(&mut self, id: i32) -> Result<Option<Category>, DatabaseError> {
        let row: Option<CategoryRow> = sqlx::query_as(
            r#"
            DELETE FROM categories
            WHERE category_id = $1
            RETURNING category_id, category_name, category_status
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(Category::from))
    }

    async fn commit(self: Box<Self>) -> Result<(), DatabaseError> {
        self.tx.commit().await?;
        debug!("Committed category transaction");
        Ok(())
    }
}
