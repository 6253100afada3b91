// src/handlers/assets.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::asset::{Asset, AssetChanges, AssetFilter, ChangeStatusRequest, NewAsset},
};

// POST /api/assets
#[utoipa::path(
    post,
    path = "/api/assets",
    tag = "Bens",
    request_body = NewAsset,
    responses(
        (status = 201, description = "Bem cadastrado", body = Asset),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Categoria ou localização inexistente"),
        (status = 409, description = "Patrimônio ou número de série duplicado")
    )
)]
pub async fn create_asset(
    State(app_state): State<AppState>,
    Json(payload): Json<NewAsset>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let asset = app_state.asset_service.create_asset(payload).await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

// GET /api/assets
#[utoipa::path(
    get,
    path = "/api/assets",
    tag = "Bens",
    params(AssetFilter),
    responses(
        (status = 200, description = "Lista de bens", body = Vec<Asset>)
    )
)]
pub async fn list_assets(
    State(app_state): State<AppState>,
    Query(filter): Query<AssetFilter>,
) -> Result<impl IntoResponse, AppError> {
    let assets = app_state.asset_service.list(&filter).await?;
    Ok((StatusCode::OK, Json(assets)))
}

// GET /api/assets/{id}
#[utoipa::path(
    get,
    path = "/api/assets/{id}",
    tag = "Bens",
    params(("id" = Uuid, Path, description = "ID do bem")),
    responses(
        (status = 200, description = "Bem", body = Asset),
        (status = 404, description = "Bem não encontrado")
    )
)]
pub async fn get_asset(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let asset = app_state.asset_service.find_by_id(id).await?;
    Ok((StatusCode::OK, Json(asset)))
}

// PUT /api/assets/{id}
#[utoipa::path(
    put,
    path = "/api/assets/{id}",
    tag = "Bens",
    params(("id" = Uuid, Path, description = "ID do bem")),
    request_body = AssetChanges,
    responses(
        (status = 200, description = "Bem atualizado", body = Asset),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Bem não encontrado"),
        (status = 409, description = "Versão desatualizada ou número de série duplicado")
    )
)]
pub async fn update_asset(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssetChanges>,
) -> Result<impl IntoResponse, AppError> {
    let asset = app_state.asset_service.update(id, payload).await?;
    Ok((StatusCode::OK, Json(asset)))
}

// PUT /api/assets/{id}/status
#[utoipa::path(
    put,
    path = "/api/assets/{id}/status",
    tag = "Bens",
    params(("id" = Uuid, Path, description = "ID do bem")),
    request_body = ChangeStatusRequest,
    responses(
        (status = 200, description = "Status alterado", body = Asset),
        (status = 404, description = "Bem não encontrado"),
        (status = 409, description = "Transição inválida ou versão desatualizada")
    )
)]
pub async fn set_asset_status(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChangeStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let asset = app_state
        .asset_service
        .set_status(id, payload.status, payload.version)
        .await?;
    Ok((StatusCode::OK, Json(asset)))
}

// DELETE /api/assets/{id}
#[utoipa::path(
    delete,
    path = "/api/assets/{id}",
    tag = "Bens",
    params(("id" = Uuid, Path, description = "ID do bem")),
    responses(
        (status = 204, description = "Bem excluído"),
        (status = 404, description = "Bem não encontrado"),
        (status = 409, description = "Bem não pode ser excluído no status atual ou possui baixa")
    )
)]
pub async fn delete_asset(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.asset_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
