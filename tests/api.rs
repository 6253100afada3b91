//! Testes HTTP: o router completo sobre o armazenamento em memória.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{send, setup, today};

// ---------------------------------------------------------------------------
// Sistema
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_returns_ok() {
    let ctx = setup().await;
    let app = ctx.router();

    let (status, _) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let ctx = setup().await;
    let app = ctx.router();

    let (status, json) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["paths"]["/api/assets/{id}/status"].is_object());
    assert!(json["paths"]["/api/decommissions/{id}/sale"].is_object());
}

// ---------------------------------------------------------------------------
// Bens
// ---------------------------------------------------------------------------

fn asset_body(ctx: &common::TestContext, tag: &str) -> serde_json::Value {
    json!({
        "tagNumber": tag,
        "name": "Monitor 24\"",
        "acquisitionDate": today().to_string(),
        "acquisitionValue": "1000.00",
        "categoryId": ctx.category.id,
        "locationId": ctx.location.id,
    })
}

#[tokio::test]
async fn create_and_fetch_asset() {
    let ctx = setup().await;
    let app = ctx.router();

    let (status, created) =
        send(&app, Method::POST, "/api/assets", Some(asset_body(&ctx, "PAT-0001"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "ACTIVE");
    assert_eq!(created["active"], true);
    assert_eq!(created["condition"], "GOOD");
    assert_eq!(created["acquisitionValue"], "1000.00");

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = send(&app, Method::GET, &format!("/api/assets/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["tagNumber"], "PAT-0001");

    let (status, list) = send(&app, Method::GET, "/api/assets?status=ACTIVE", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn empty_name_is_a_400_with_details() {
    let ctx = setup().await;
    let app = ctx.router();

    let mut body = asset_body(&ctx, "PAT-0001");
    body["name"] = json!("");
    let (status, json) = send(&app, Method::POST, "/api/assets", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["details"]["name"].is_array());
}

#[tokio::test]
async fn sub_cent_value_is_a_400_not_a_500() {
    let ctx = setup().await;
    let app = ctx.router();

    let mut body = asset_body(&ctx, "PAT-0001");
    body["acquisitionValue"] = json!("0.001");
    let (status, json) = send(&app, Method::POST, "/api/assets", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("acquisitionValue"));

    // Número JSON continua aceito na entrada
    let mut body = asset_body(&ctx, "PAT-0002");
    body["acquisitionValue"] = json!(250.5);
    let (status, json) = send(&app, Method::POST, "/api/assets", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["acquisitionValue"], "250.50");
}

#[tokio::test]
async fn unknown_asset_is_a_404() {
    let ctx = setup().await;
    let app = ctx.router();

    let uri = format!("/api/assets/{}", uuid::Uuid::new_v4());
    let (status, json) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn status_changes_go_through_the_transition_table() {
    let ctx = setup().await;
    let app = ctx.router();
    let asset = ctx.create_asset("PAT-0001").await;
    let uri = format!("/api/assets/{}/status", asset.id);

    let (status, json) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "status": "DECOMMISSIONED", "version": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "DECOMMISSIONED");
    assert_eq!(json["version"], 1);

    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({ "status": "ACTIVE" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn stale_version_is_a_409() {
    let ctx = setup().await;
    let app = ctx.router();
    let asset = ctx.create_asset("PAT-0001").await;
    let uri = format!("/api/assets/{}", asset.id);

    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "name": "Primeiro", "version": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "name": "Segundo", "version": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn delete_asset_returns_204() {
    let ctx = setup().await;
    let app = ctx.router();
    let asset = ctx.create_asset("PAT-0001").await;
    let uri = format!("/api/assets/{}", asset.id);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Manutenções
// ---------------------------------------------------------------------------

#[tokio::test]
async fn maintenance_lifecycle_over_http() {
    let ctx = setup().await;
    let app = ctx.router();
    let asset = ctx.create_asset("PAT-0001").await;

    let (status, created) = send(
        &app,
        Method::POST,
        &format!("/api/assets/{}/maintenances", asset.id),
        Some(json!({
            "maintenanceType": "CORRECTIVE",
            "description": "Tela piscando",
            "startDate": today().to_string(),
            "priority": 8,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "SCHEDULED");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, started) =
        send(&app, Method::POST, &format!("/api/maintenances/{id}/start"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(started["status"], "ACTIVE");

    let (status, finished) = send(
        &app,
        Method::POST,
        &format!("/api/maintenances/{id}/finish"),
        Some(json!({ "endDate": today().to_string(), "solutionApplied": "Cabo trocado" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(finished["status"], "FINISHED");

    let (_, asset_json) = send(&app, Method::GET, &format!("/api/assets/{}", asset.id), None).await;
    assert_eq!(asset_json["status"], "ACTIVE");
    assert_eq!(asset_json["lastMaintenanceDate"], today().to_string());

    let (status, list) = send(
        &app,
        Method::GET,
        &format!("/api/assets/{}/maintenances", asset.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn maintenance_without_start_date_is_a_400() {
    let ctx = setup().await;
    let app = ctx.router();
    let asset = ctx.create_asset("PAT-0001").await;

    let (status, json) = send(
        &app,
        Method::POST,
        &format!("/api/assets/{}/maintenances", asset.id),
        Some(json!({ "maintenanceType": "PREVENTIVE", "description": "Revisão" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["details"]["start_date"].is_array() || json["details"]["startDate"].is_array());
}

// ---------------------------------------------------------------------------
// Baixas
// ---------------------------------------------------------------------------

#[tokio::test]
async fn decommission_flow_over_http() {
    let ctx = setup().await;
    let app = ctx.router();
    let asset = ctx.create_asset("PAT-0001").await;

    let body = json!({
        "assetId": asset.id,
        "reason": "obsolescence",
        "decommissionDate": today().to_string(),
        "residualValue": "200.00",
        "responsible": "Setor de Patrimônio",
    });
    let (status, created) = send(&app, Method::POST, "/api/decommissions", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["stage"], "OPEN");
    assert_eq!(created["financialLoss"], "800.00");
    assert_eq!(created["residualValue"], "200.00");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = send(&app, Method::POST, "/api/decommissions", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let sale = json!({ "buyer": "buyer", "saleValue": "500.00", "saleDate": today().to_string() });
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/decommissions/{id}/sale"),
        Some(sale.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, approved) = send(
        &app,
        Method::POST,
        &format!("/api/decommissions/{id}/approve"),
        Some(json!({ "approvedBy": "J. Silva", "approvalDate": today().to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["stage"], "APPROVED");

    let (status, sold) = send(
        &app,
        Method::POST,
        &format!("/api/decommissions/{id}/sale"),
        Some(sale),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sold["stage"], "SOLD");
    assert_eq!(sold["financialGain"], "300.00");
    assert_eq!(sold["saleValue"], "500.00");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/decommissions/{id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, list) = send(
        &app,
        Method::GET,
        &format!("/api/assets/{}/decommissions", asset.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));
}

// ---------------------------------------------------------------------------
// Catálogo
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_category_name_is_a_409() {
    let ctx = setup().await;
    let app = ctx.router();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/categories",
        Some(json!({ "name": "Informática" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/locations",
        Some(json!({ "name": "Almoxarifado", "responsible": "Maria" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/api/locations/{}", created["id"].as_str().unwrap());
    let (status, detail) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["assetCount"], 0);
    assert_eq!(detail["name"], "Almoxarifado");
}
