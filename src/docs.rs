// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Patrimônio API",
        description = "Cadastro de bens, manutenções e baixas patrimoniais"
    ),
    paths(
        handlers::health,

        // --- Bens ---
        handlers::assets::create_asset,
        handlers::assets::list_assets,
        handlers::assets::get_asset,
        handlers::assets::update_asset,
        handlers::assets::set_asset_status,
        handlers::assets::delete_asset,

        // --- Catálogo ---
        handlers::catalog::create_category,
        handlers::catalog::list_categories,
        handlers::catalog::get_category,
        handlers::catalog::delete_category,
        handlers::catalog::create_location,
        handlers::catalog::list_locations,
        handlers::catalog::get_location,
        handlers::catalog::delete_location,

        // --- Manutenções ---
        handlers::maintenance::create_maintenance,
        handlers::maintenance::list_asset_maintenances,
        handlers::maintenance::get_maintenance,
        handlers::maintenance::start_maintenance,
        handlers::maintenance::finish_maintenance,
        handlers::maintenance::cancel_maintenance,
        handlers::maintenance::delete_maintenance,

        // --- Baixas ---
        handlers::decommissions::create_decommission,
        handlers::decommissions::list_decommissions,
        handlers::decommissions::list_asset_decommissions,
        handlers::decommissions::get_decommission,
        handlers::decommissions::approve_decommission,
        handlers::decommissions::register_sale,
        handlers::decommissions::delete_decommission,
    ),
    components(
        schemas(
            // --- Bens ---
            models::asset::AssetStatus,
            models::asset::AssetCondition,
            models::asset::Asset,
            models::asset::NewAsset,
            models::asset::AssetChanges,
            models::asset::ChangeStatusRequest,

            // --- Catálogo ---
            models::catalog::Category,
            models::catalog::CategoryDetail,
            models::catalog::NewCategory,
            models::catalog::Location,
            models::catalog::LocationDetail,
            models::catalog::NewLocation,

            // --- Manutenções ---
            models::maintenance::MaintenanceType,
            models::maintenance::MaintenanceStatus,
            models::maintenance::Maintenance,
            models::maintenance::NewMaintenance,
            models::maintenance::FinishMaintenance,
            models::maintenance::CancelMaintenance,

            // --- Baixas ---
            models::decommission::DecommissionStage,
            models::decommission::Decommission,
            models::decommission::DecommissionDetail,
            models::decommission::NewDecommission,
            models::decommission::ApproveDecommission,
            models::decommission::RegisterSale,
        )
    ),
    tags(
        (name = "Sistema", description = "Saúde do serviço"),
        (name = "Bens", description = "Cadastro e ciclo de vida dos bens"),
        (name = "Catálogo", description = "Categorias e localizações"),
        (name = "Manutenções", description = "Agendamento e execução de manutenções"),
        (name = "Baixas", description = "Baixa patrimonial: abertura, aprovação e venda")
    )
)]
pub struct ApiDoc;
