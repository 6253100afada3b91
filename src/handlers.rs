// src/handlers.rs

pub mod assets;
pub mod catalog;
pub mod decommissions;
pub mod maintenance;

// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Sistema",
    responses((status = 200, description = "Serviço no ar", body = String))
)]
pub async fn health() -> &'static str {
    "OK"
}
