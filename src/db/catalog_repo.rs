// src/db/catalog_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::billing::CatalogItem};

// Catálogo de serviços pré-definidos: antes vivia no navegador do usuário,
// agora é uma pequena configuração editável no banco.
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: &str,
        category: &str,
        base_price: Decimal,
    ) -> Result<CatalogItem, AppError> {
        let item = sqlx::query_as::<_, CatalogItem>(
            r#"
            INSERT INTO service_catalog (name, category, base_price)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(category)
        .bind(base_price)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn get_all(&self) -> Result<Vec<CatalogItem>, AppError> {
        let itens =
            sqlx::query_as::<_, CatalogItem>("SELECT * FROM service_catalog ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(itens)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        category: &str,
        base_price: Decimal,
    ) -> Result<CatalogItem, AppError> {
        let item = sqlx::query_as::<_, CatalogItem>(
            r#"
            UPDATE service_catalog
            SET name = $2, category = $3, base_price = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(category)
        .bind(base_price)
        .fetch_optional(&self.pool)
        .await?;

        item.ok_or(AppError::CatalogItemNotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let resultado = sqlx::query("DELETE FROM service_catalog WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if resultado.rows_affected() == 0 {
            return Err(AppError::CatalogItemNotFound);
        }

        Ok(())
    }
}
