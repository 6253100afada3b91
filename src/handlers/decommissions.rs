// src/handlers/decommissions.rs

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
    models::decommission::{ApproveDecommission, DecommissionDetail, NewDecommission, RegisterSale},
};

// POST /api/decommissions
#[utoipa::path(
    post,
    path = "/api/decommissions",
    tag = "Baixas",
    request_body = NewDecommission,
    responses(
        (status = 201, description = "Baixa registrada; bem baixado", body = DecommissionDetail),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Bem não encontrado"),
        (status = 409, description = "Bem já possui baixa")
    )
)]
pub async fn create_decommission(
    State(app_state): State<AppState>,
    Json(payload): Json<NewDecommission>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let detail = app_state.decommission_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

// GET /api/decommissions
#[utoipa::path(
    get,
    path = "/api/decommissions",
    tag = "Baixas",
    responses((status = 200, description = "Lista de baixas", body = Vec<DecommissionDetail>))
)]
pub async fn list_decommissions(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let details = app_state.decommission_service.list().await?;
    Ok((StatusCode::OK, Json(details)))
}

// GET /api/assets/{id}/decommissions
#[utoipa::path(
    get,
    path = "/api/assets/{id}/decommissions",
    tag = "Baixas",
    params(("id" = Uuid, Path, description = "ID do bem")),
    responses(
        (status = 200, description = "Baixas do bem", body = Vec<DecommissionDetail>),
        (status = 404, description = "Bem não encontrado")
    )
)]
pub async fn list_asset_decommissions(
    State(app_state): State<AppState>,
    Path(asset_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let details = app_state.decommission_service.list_for_asset(asset_id).await?;
    Ok((StatusCode::OK, Json(details)))
}

// GET /api/decommissions/{id}
#[utoipa::path(
    get,
    path = "/api/decommissions/{id}",
    tag = "Baixas",
    params(("id" = Uuid, Path, description = "ID da baixa")),
    responses(
        (status = 200, description = "Baixa com prejuízo, ganho e etapa", body = DecommissionDetail),
        (status = 404, description = "Baixa não encontrada")
    )
)]
pub async fn get_decommission(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.decommission_service.find_by_id(id).await?;
    Ok((StatusCode::OK, Json(detail)))
}

// POST /api/decommissions/{id}/approve
#[utoipa::path(
    post,
    path = "/api/decommissions/{id}/approve",
    tag = "Baixas",
    params(("id" = Uuid, Path, description = "ID da baixa")),
    request_body = ApproveDecommission,
    responses(
        (status = 200, description = "Baixa aprovada", body = DecommissionDetail),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Baixa não encontrada"),
        (status = 409, description = "Baixa já aprovada")
    )
)]
pub async fn approve_decommission(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApproveDecommission>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let detail = app_state.decommission_service.approve(id, payload).await?;
    Ok((StatusCode::OK, Json(detail)))
}

// POST /api/decommissions/{id}/sale
#[utoipa::path(
    post,
    path = "/api/decommissions/{id}/sale",
    tag = "Baixas",
    params(("id" = Uuid, Path, description = "ID da baixa")),
    request_body = RegisterSale,
    responses(
        (status = 200, description = "Venda registrada", body = DecommissionDetail),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Baixa não encontrada"),
        (status = 409, description = "Baixa não aprovada ou já vendida")
    )
)]
pub async fn register_sale(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RegisterSale>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let detail = app_state.decommission_service.register_sale(id, payload).await?;
    Ok((StatusCode::OK, Json(detail)))
}

// DELETE /api/decommissions/{id}
#[utoipa::path(
    delete,
    path = "/api/decommissions/{id}",
    tag = "Baixas",
    params(("id" = Uuid, Path, description = "ID da baixa")),
    responses(
        (status = 204, description = "Baixa excluída; bem reativado"),
        (status = 404, description = "Baixa não encontrada"),
        (status = 409, description = "Baixa já aprovada")
    )
)]
pub async fn delete_decommission(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.decommission_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
