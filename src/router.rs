// src/router.rs

use axum::{
    routing::{get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers};

pub fn build_router(app_state: AppState) -> Router {
    let asset_routes = Router::new()
        .route("/"
               ,post(handlers::assets::create_asset)
               .get(handlers::assets::list_assets)
        )
        .route("/{id}"
               ,get(handlers::assets::get_asset)
               .put(handlers::assets::update_asset)
               .delete(handlers::assets::delete_asset)
        )
        .route("/{id}/status", put(handlers::assets::set_asset_status))
        .route("/{id}/maintenances"
               ,post(handlers::maintenance::create_maintenance)
               .get(handlers::maintenance::list_asset_maintenances)
        )
        .route("/{id}/decommissions", get(handlers::decommissions::list_asset_decommissions));

    let maintenance_routes = Router::new()
        .route("/{id}"
               ,get(handlers::maintenance::get_maintenance)
               .delete(handlers::maintenance::delete_maintenance)
        )
        .route("/{id}/start", post(handlers::maintenance::start_maintenance))
        .route("/{id}/finish", post(handlers::maintenance::finish_maintenance))
        .route("/{id}/cancel", post(handlers::maintenance::cancel_maintenance));

    let decommission_routes = Router::new()
        .route("/"
               ,post(handlers::decommissions::create_decommission)
               .get(handlers::decommissions::list_decommissions)
        )
        .route("/{id}"
               ,get(handlers::decommissions::get_decommission)
               .delete(handlers::decommissions::delete_decommission)
        )
        .route("/{id}/approve", post(handlers::decommissions::approve_decommission))
        .route("/{id}/sale", post(handlers::decommissions::register_sale));

    let category_routes = Router::new()
        .route("/"
               ,post(handlers::catalog::create_category)
               .get(handlers::catalog::list_categories)
        )
        .route("/{id}"
               ,get(handlers::catalog::get_category)
               .delete(handlers::catalog::delete_category)
        );

    let location_routes = Router::new()
        .route("/"
               ,post(handlers::catalog::create_location)
               .get(handlers::catalog::list_locations)
        )
        .route("/{id}"
               ,get(handlers::catalog::get_location)
               .delete(handlers::catalog::delete_location)
        );

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(handlers::health))
        .nest("/api/assets", asset_routes)
        .nest("/api/maintenances", maintenance_routes)
        .nest("/api/decommissions", decommission_routes)
        .nest("/api/categories", category_routes)
        .nest("/api/locations", location_routes)
        .with_state(app_state)
}
