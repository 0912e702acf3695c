use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder,
    TransactionTrait,
};

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::Product,
    repository::ProductRepository,
};

/// PostgreSQL-backed repository on a shared SeaORM pool
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

/// Moves the id sequence past the largest stored id so later store-assigned
/// ids never land on one a caller picked explicitly.
const SYNC_ID_SEQUENCE: &str = "SELECT setval(pg_get_serial_sequence('products', 'id'), \
     GREATEST((SELECT MAX(id) FROM products), 1))";

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn add(&self, product: Product) -> ProductResult<Product> {
        if product.is_unassigned() {
            let model = entity::ActiveModel::for_insert(product)
                .insert(&self.db)
                .await?;

            tracing::info!(product_id = model.id, "Added product");
            return Ok(model.into());
        }

        let txn = self.db.begin().await?;
        let model = entity::ActiveModel::for_insert(product).insert(&txn).await?;
        txn.execute_unprepared(SYNC_ID_SEQUENCE).await?;
        txn.commit().await?;

        tracing::info!(product_id = model.id, "Added product with caller-supplied id");
        Ok(model.into())
    }

    async fn update(&self, product: Product) -> ProductResult<Product> {
        let id = product.id;
        let active_model: entity::ActiveModel = product.into();

        let model = active_model.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => ProductError::NotFound(id),
            other => ProductError::Database(other),
        })?;

        tracing::info!(product_id = id, "Updated product");
        Ok(model.into())
    }

    async fn remove(&self, id: i64) -> ProductResult<()> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(ProductError::NotFound(id));
        }

        tracing::info!(product_id = id, "Removed product");
        Ok(())
    }

    async fn get_all(&self) -> ProductResult<Vec<Product>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }
}
