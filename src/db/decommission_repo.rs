// src/db/decommission_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::decommission::Decommission};

// Repositório das baixas patrimoniais
#[derive(Clone, Copy, Debug, Default)]
pub struct DecommissionRepository;

impl DecommissionRepository {
    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Decommission>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let decommission = sqlx::query_as::<_, Decommission>("SELECT * FROM decommissions WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(decommission)
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<Decommission>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let decommissions = sqlx::query_as::<_, Decommission>(
            "SELECT * FROM decommissions ORDER BY decommission_date DESC, created_at DESC",
        )
        .fetch_all(executor)
        .await?;
        Ok(decommissions)
    }

    pub async fn list_for_asset<'e, E>(&self, executor: E, asset_id: Uuid) -> Result<Vec<Decommission>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let decommissions = sqlx::query_as::<_, Decommission>(
            "SELECT * FROM decommissions WHERE asset_id = $1 ORDER BY decommission_date DESC, created_at DESC",
        )
        .bind(asset_id)
        .fetch_all(executor)
        .await?;
        Ok(decommissions)
    }

    pub async fn count_for_asset<'e, E>(&self, executor: E, asset_id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM decommissions WHERE asset_id = $1")
            .bind(asset_id)
            .fetch_one(executor)
            .await?;
        Ok(count)
    }

    pub async fn insert<'e, E>(&self, executor: E, d: &Decommission) -> Result<Decommission, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let decommission = sqlx::query_as::<_, Decommission>(
            r#"
            INSERT INTO decommissions (
                id, asset_id, reason, description, decommission_date, residual_value,
                process_number, responsible, approval_date, approved_by,
                sale_date, buyer, sale_value, observations, version, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(d.id)
        .bind(d.asset_id)
        .bind(&d.reason)
        .bind(&d.description)
        .bind(d.decommission_date)
        .bind(d.residual_value)
        .bind(&d.process_number)
        .bind(&d.responsible)
        .bind(d.approval_date)
        .bind(&d.approved_by)
        .bind(d.sale_date)
        .bind(&d.buyer)
        .bind(d.sale_value)
        .bind(&d.observations)
        .bind(d.version)
        .bind(d.created_at)
        .bind(d.updated_at)
        .fetch_one(executor)
        .await?;
        Ok(decommission)
    }

    pub async fn update<'e, E>(&self, executor: E, d: &Decommission) -> Result<Decommission, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let updated = sqlx::query_as::<_, Decommission>(
            r#"
            UPDATE decommissions SET
                description = $3,
                residual_value = $4,
                process_number = $5,
                approval_date = $6,
                approved_by = $7,
                sale_date = $8,
                buyer = $9,
                sale_value = $10,
                observations = $11,
                version = version + 1,
                updated_at = NOW()
            WHERE id = $1 AND version = $2
            RETURNING *
            "#,
        )
        .bind(d.id)
        .bind(d.version)
        .bind(&d.description)
        .bind(d.residual_value)
        .bind(&d.process_number)
        .bind(d.approval_date)
        .bind(&d.approved_by)
        .bind(d.sale_date)
        .bind(&d.buyer)
        .bind(d.sale_value)
        .bind(&d.observations)
        .fetch_optional(executor)
        .await?;

        updated.ok_or(AppError::StaleVersion { entity: "Baixa", id: d.id })
    }

    pub async fn delete<'e, E>(&self, executor: E, d: &Decommission) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM decommissions WHERE id = $1 AND version = $2")
            .bind(d.id)
            .bind(d.version)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::StaleVersion { entity: "Baixa", id: d.id });
        }
        Ok(())
    }
}
