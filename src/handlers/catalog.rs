// src/handlers/catalog.rs

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
    models::catalog::{
        Category, CategoryDetail, Location, LocationDetail, NewCategory, NewLocation,
    },
};

// ---
// Categorias
// ---

#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "Catálogo",
    request_body = NewCategory,
    responses(
        (status = 201, description = "Categoria criada", body = Category),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Nome duplicado")
    )
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    Json(payload): Json<NewCategory>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let category = app_state.catalog_service.create_category(payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Catálogo",
    responses((status = 200, description = "Lista de categorias", body = Vec<Category>))
)]
pub async fn list_categories(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let categories = app_state.catalog_service.list_categories().await?;
    Ok((StatusCode::OK, Json(categories)))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    tag = "Catálogo",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    responses(
        (status = 200, description = "Categoria com total de bens", body = CategoryDetail),
        (status = 404, description = "Categoria não encontrada")
    )
)]
pub async fn get_category(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let category = app_state.catalog_service.get_category(id).await?;
    Ok((StatusCode::OK, Json(category)))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "Catálogo",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    responses(
        (status = 204, description = "Categoria excluída"),
        (status = 404, description = "Categoria não encontrada"),
        (status = 409, description = "Categoria possui bens vinculados")
    )
)]
pub async fn delete_category(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Localizações
// ---

#[utoipa::path(
    post,
    path = "/api/locations",
    tag = "Catálogo",
    request_body = NewLocation,
    responses(
        (status = 201, description = "Localização criada", body = Location),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Nome duplicado")
    )
)]
pub async fn create_location(
    State(app_state): State<AppState>,
    Json(payload): Json<NewLocation>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let location = app_state.catalog_service.create_location(payload).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

#[utoipa::path(
    get,
    path = "/api/locations",
    tag = "Catálogo",
    responses((status = 200, description = "Lista de localizações", body = Vec<Location>))
)]
pub async fn list_locations(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let locations = app_state.catalog_service.list_locations().await?;
    Ok((StatusCode::OK, Json(locations)))
}

#[utoipa::path(
    get,
    path = "/api/locations/{id}",
    tag = "Catálogo",
    params(("id" = Uuid, Path, description = "ID da localização")),
    responses(
        (status = 200, description = "Localização com total de bens", body = LocationDetail),
        (status = 404, description = "Localização não encontrada")
    )
)]
pub async fn get_location(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let location = app_state.catalog_service.get_location(id).await?;
    Ok((StatusCode::OK, Json(location)))
}

#[utoipa::path(
    delete,
    path = "/api/locations/{id}",
    tag = "Catálogo",
    params(("id" = Uuid, Path, description = "ID da localização")),
    responses(
        (status = 204, description = "Localização excluída"),
        (status = 404, description = "Localização não encontrada"),
        (status = 409, description = "Localização possui bens vinculados")
    )
)]
pub async fn delete_location(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_location(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
