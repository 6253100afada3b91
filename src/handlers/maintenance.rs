// src/handlers/maintenance.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::maintenance::{CancelMaintenance, FinishMaintenance, Maintenance, NewMaintenance},
};

// POST /api/assets/{id}/maintenances
#[utoipa::path(
    post,
    path = "/api/assets/{id}/maintenances",
    tag = "Manutenções",
    params(("id" = Uuid, Path, description = "ID do bem")),
    request_body = NewMaintenance,
    responses(
        (status = 201, description = "Manutenção agendada", body = Maintenance),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Bem não encontrado"),
        (status = 409, description = "Bem baixado")
    )
)]
pub async fn create_maintenance(
    State(app_state): State<AppState>,
    Path(asset_id): Path<Uuid>,
    Json(payload): Json<NewMaintenance>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let maintenance = app_state.maintenance_service.create(asset_id, payload).await?;
    Ok((StatusCode::CREATED, Json(maintenance)))
}

// GET /api/assets/{id}/maintenances
#[utoipa::path(
    get,
    path = "/api/assets/{id}/maintenances",
    tag = "Manutenções",
    params(("id" = Uuid, Path, description = "ID do bem")),
    responses(
        (status = 200, description = "Histórico de manutenções do bem", body = Vec<Maintenance>),
        (status = 404, description = "Bem não encontrado")
    )
)]
pub async fn list_asset_maintenances(
    State(app_state): State<AppState>,
    Path(asset_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let maintenances = app_state.maintenance_service.list_for_asset(asset_id).await?;
    Ok((StatusCode::OK, Json(maintenances)))
}

// GET /api/maintenances/{id}
#[utoipa::path(
    get,
    path = "/api/maintenances/{id}",
    tag = "Manutenções",
    params(("id" = Uuid, Path, description = "ID da manutenção")),
    responses(
        (status = 200, description = "Manutenção", body = Maintenance),
        (status = 404, description = "Manutenção não encontrada")
    )
)]
pub async fn get_maintenance(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let maintenance = app_state.maintenance_service.find_by_id(id).await?;
    Ok((StatusCode::OK, Json(maintenance)))
}

// POST /api/maintenances/{id}/start
#[utoipa::path(
    post,
    path = "/api/maintenances/{id}/start",
    tag = "Manutenções",
    params(("id" = Uuid, Path, description = "ID da manutenção")),
    responses(
        (status = 200, description = "Manutenção em execução; bem em manutenção", body = Maintenance),
        (status = 404, description = "Manutenção não encontrada"),
        (status = 409, description = "Manutenção não está agendada ou bem não pode entrar em manutenção")
    )
)]
pub async fn start_maintenance(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let maintenance = app_state.maintenance_service.start(id).await?;
    Ok((StatusCode::OK, Json(maintenance)))
}

// POST /api/maintenances/{id}/finish
#[utoipa::path(
    post,
    path = "/api/maintenances/{id}/finish",
    tag = "Manutenções",
    params(("id" = Uuid, Path, description = "ID da manutenção")),
    request_body = FinishMaintenance,
    responses(
        (status = 200, description = "Manutenção finalizada", body = Maintenance),
        (status = 400, description = "Datas ou valores inválidos"),
        (status = 404, description = "Manutenção não encontrada"),
        (status = 409, description = "Manutenção já encerrada")
    )
)]
pub async fn finish_maintenance(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FinishMaintenance>,
) -> Result<impl IntoResponse, AppError> {
    let maintenance = app_state.maintenance_service.finish(id, payload).await?;
    Ok((StatusCode::OK, Json(maintenance)))
}

// POST /api/maintenances/{id}/cancel
#[utoipa::path(
    post,
    path = "/api/maintenances/{id}/cancel",
    tag = "Manutenções",
    params(("id" = Uuid, Path, description = "ID da manutenção")),
    request_body = CancelMaintenance,
    responses(
        (status = 200, description = "Manutenção cancelada", body = Maintenance),
        (status = 400, description = "Motivo ausente"),
        (status = 404, description = "Manutenção não encontrada"),
        (status = 409, description = "Manutenção já encerrada")
    )
)]
pub async fn cancel_maintenance(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelMaintenance>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let maintenance = app_state.maintenance_service.cancel(id, &payload.reason).await?;
    Ok((StatusCode::OK, Json(maintenance)))
}

// DELETE /api/maintenances/{id}
#[utoipa::path(
    delete,
    path = "/api/maintenances/{id}",
    tag = "Manutenções",
    params(("id" = Uuid, Path, description = "ID da manutenção")),
    responses(
        (status = 204, description = "Manutenção excluída"),
        (status = 404, description = "Manutenção não encontrada"),
        (status = 409, description = "Manutenção em aberto")
    )
)]
pub async fn delete_maintenance(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.maintenance_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
